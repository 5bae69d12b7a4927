//! Search and category filtering over the merged collection

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::record::PromptRecord;

/// Compound filter: free text plus the two category selects
///
/// An empty field places no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterQuery {
    /// Case-insensitive substring of title, content or subject
    pub text: String,
    /// Exact school type
    pub school_type: String,
    /// Case-sensitive substring of the subject tag
    pub subject: String,
}

impl FilterQuery {
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_school_type(mut self, school_type: impl Into<String>) -> Self {
        self.school_type = school_type.into();
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.school_type.is_empty() && self.subject.is_empty()
    }

    pub fn matches(&self, record: &PromptRecord) -> bool {
        self.matches_text(record) && self.matches_school(record) && self.matches_subject(record)
    }

    fn matches_text(&self, record: &PromptRecord) -> bool {
        if self.text.is_empty() {
            return true;
        }
        let needle = fold_case(&self.text);
        [&record.title, &record.content, &record.subject]
            .into_iter()
            .any(|field| !field.is_empty() && fold_case(field).contains(&needle))
    }

    fn matches_school(&self, record: &PromptRecord) -> bool {
        self.school_type.is_empty() || record.school_type == self.school_type
    }

    // Substring so compound tags like "国語・書写" still match "国語"
    fn matches_subject(&self, record: &PromptRecord) -> bool {
        self.subject.is_empty() || record.subject.contains(&self.subject)
    }
}

/// Records matching `query`, in input order
pub fn filter<'a>(all: &'a [PromptRecord], query: &FilterQuery) -> Vec<&'a PromptRecord> {
    all.iter().filter(|r| query.matches(r)).collect()
}

/// Distinct category values present in a collection, sorted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Facets {
    pub school_types: Vec<String>,
    pub subjects: Vec<String>,
}

pub fn facets(all: &[PromptRecord]) -> Facets {
    let mut school_types = BTreeSet::new();
    let mut subjects = BTreeSet::new();
    for record in all {
        if !record.school_type.is_empty() {
            school_types.insert(record.school_type.clone());
        }
        if !record.subject.is_empty() {
            subjects.insert(record.subject.clone());
        }
    }
    Facets {
        school_types: school_types.into_iter().collect(),
        subjects: subjects.into_iter().collect(),
    }
}

/// Per-character lowercase, so a folded substring is always a substring of the folded whole
fn fold_case(s: &str) -> String {
    s.chars().flat_map(char::to_lowercase).collect()
}
