//! Submission of new local prompts

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::LOCAL_ID_PREFIX;
use crate::error::StoreResult;
use crate::record::{PromptRecord, format_timestamp};
use crate::store::PromptStore;

/// The submission form's fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptForm {
    pub title: String,
    pub school_type: String,
    pub subject: String,
    pub content: String,
    /// Optional footer annotation
    pub description: String,
}

impl PromptForm {
    /// All required fields are non-empty (no trimming)
    pub fn is_complete(&self) -> bool {
        !self.title.is_empty() && !self.school_type.is_empty() && !self.subject.is_empty() && !self.content.is_empty()
    }

    /// Clear every field
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Build the record this form describes
    pub fn to_record(&self, id: String, created: DateTime<Utc>) -> PromptRecord {
        PromptRecord {
            id,
            title: self.title.clone(),
            school_type: self.school_type.clone(),
            subject: self.subject.clone(),
            content: self.content.clone(),
            description: Some(self.description.clone()).filter(|d| !d.is_empty()),
            created_at: Some(format_timestamp(created)),
        }
    }
}

/// Source of "now" for ids and timestamps
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(now) }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += by;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.lock().map(|now| *now).unwrap_or_else(|poisoned| *poisoned.into_inner())
    }
}

/// What a submission did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A required field was empty; nothing was read or written
    Ignored,
    /// The record was stored in front of the local collection
    Saved(PromptRecord),
}

/// `local-<millis>`, suffixed with `-<n>` if that id is already taken
pub fn local_id(now: DateTime<Utc>, existing: &[PromptRecord]) -> String {
    let base = format!("{}{}", LOCAL_ID_PREFIX, now.timestamp_millis());
    let taken = |candidate: &str| existing.iter().any(|r| r.id == candidate);
    if !taken(&base) {
        return base;
    }
    (2..)
        .map(|n| format!("{}-{}", base, n))
        .find(|candidate| !taken(candidate))
        .unwrap_or(base)
}

impl PromptStore {
    /// Validate the form and persist it as the newest local prompt
    pub fn submit(&self, form: &PromptForm, clock: &dyn Clock) -> StoreResult<SubmitOutcome> {
        debug!(title = %form.title, "PromptStore::submit: called");
        if !form.is_complete() {
            debug!("PromptStore::submit: required field empty, ignoring");
            return Ok(SubmitOutcome::Ignored);
        }

        let now = clock.now();
        let existing = self.local_records()?;
        let record = form.to_record(local_id(now, &existing), now);
        self.prepend_local(record.clone())?;

        info!(id = %record.id, "Saved local prompt");
        Ok(SubmitOutcome::Saved(record))
    }
}
