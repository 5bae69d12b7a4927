//! Handlebars-backed renderer

use std::path::{Path, PathBuf};

use chrono::{FixedOffset, Local};
use eyre::{Result, eyre};
use handlebars::Handlebars;
use promptstore::{Facets, FilterQuery, PromptRecord};
use serde::Serialize;
use tracing::debug;

use super::embedded;
use super::{COPIED_LABEL, COPY_LABEL};

const DATE_FORMAT: &str = "%Y/%-m/%-d";

/// Which placeholder to show for an empty list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// Nothing has been posted at all
    NoData,
    /// Prompts exist but the filters hide all of them
    NoMatches,
}

impl EmptyState {
    pub fn message(&self) -> &'static str {
        match self {
            EmptyState::NoData => "No prompts yet. Be the first to share one!",
            EmptyState::NoMatches => "No prompts match the current filters.",
        }
    }
}

/// Everything on the page besides the cards
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    /// Status line, e.g. a load failure message
    pub status: String,
    pub failed: bool,
    pub query: FilterQuery,
    pub facets: Facets,
}

#[derive(Serialize)]
struct CardView<'a> {
    dom_id: String,
    id: &'a str,
    title: &'a str,
    school_type: &'a str,
    subject: &'a str,
    content: &'a str,
    description: Option<&'a str>,
    created_at: &'a str,
    date: String,
    copy_label: &'static str,
}

#[derive(Serialize)]
struct FilterView<'a> {
    label: &'static str,
    value: &'a str,
}

#[derive(Serialize)]
struct PageView<'a> {
    title: &'static str,
    status: &'a str,
    status_class: &'static str,
    filters: Vec<FilterView<'a>>,
    school_types: &'a [String],
    subjects: &'a [String],
    list: String,
    feedback_ms: u64,
    copy_label: &'static str,
    copied_label: &'static str,
    copy_failed: &'static str,
}

/// Turns prompt records into HTML
pub struct Renderer {
    hbs: Handlebars<'static>,
    /// Fixed offset for dates; local time zone when unset
    offset: Option<FixedOffset>,
    feedback_ms: u64,
}

impl Renderer {
    /// Renderer using only the embedded templates
    pub fn new() -> Result<Self> {
        Self::with_templates_dir(None)
    }

    /// Renderer preferring `<dir>/{name}.hbs` over the embedded templates
    pub fn with_templates_dir(dir: Option<&Path>) -> Result<Self> {
        debug!(?dir, "Renderer::with_templates_dir: called");
        let mut hbs = Handlebars::new();
        for name in embedded::TEMPLATE_NAMES {
            let source = load_template(dir, name)?;
            hbs.register_template_string(name, source)
                .map_err(|e| eyre!("Failed to compile template {}: {}", name, e))?;
        }
        Ok(Self {
            hbs,
            offset: None,
            feedback_ms: crate::DEFAULT_COPY_FEEDBACK_MS,
        })
    }

    pub fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_feedback_ms(mut self, feedback_ms: u64) -> Self {
        self.feedback_ms = feedback_ms;
        self
    }

    /// `YYYY/M/D` in the display time zone, blank without a usable timestamp
    pub fn format_date(&self, record: &PromptRecord) -> String {
        let Some(at) = record.timestamp() else {
            return String::new();
        };
        match self.offset {
            Some(offset) => at.with_timezone(&offset).format(DATE_FORMAT).to_string(),
            None => at.with_timezone(&Local).format(DATE_FORMAT).to_string(),
        }
    }

    /// One card per record in input order, or the placeholder when empty
    pub fn render(&self, records: &[&PromptRecord], empty: EmptyState) -> Result<String> {
        debug!(count = records.len(), ?empty, "Renderer::render: called");
        if records.is_empty() {
            return self.render_empty(empty);
        }

        let mut html = String::new();
        for (index, record) in records.iter().enumerate() {
            html.push_str(&self.render_card(index, record)?);
        }
        Ok(html)
    }

    /// A single card; `index` makes the element id unique within a list
    pub fn render_card(&self, index: usize, record: &PromptRecord) -> Result<String> {
        let view = CardView {
            dom_id: format!("prompt-{}", index),
            id: &record.id,
            title: &record.title,
            school_type: &record.school_type,
            subject: &record.subject,
            content: &record.content,
            description: record.description_text(),
            created_at: record.created_at.as_deref().unwrap_or(""),
            date: self.format_date(record),
            copy_label: COPY_LABEL,
        };
        self.hbs
            .render("card", &view)
            .map_err(|e| eyre!("Failed to render card {}: {}", record.id, e))
    }

    pub fn render_empty(&self, empty: EmptyState) -> Result<String> {
        self.hbs
            .render("empty", &serde_json::json!({ "message": empty.message() }))
            .map_err(|e| eyre!("Failed to render empty state: {}", e))
    }

    /// Standalone HTML document with the list, status line and active filters
    pub fn render_page(&self, records: &[&PromptRecord], empty: EmptyState, page: &PageContext) -> Result<String> {
        debug!(count = records.len(), failed = page.failed, "Renderer::render_page: called");
        let mut filters = Vec::new();
        if !page.query.text.is_empty() {
            filters.push(FilterView {
                label: "Search",
                value: &page.query.text,
            });
        }
        if !page.query.school_type.is_empty() {
            filters.push(FilterView {
                label: "School",
                value: &page.query.school_type,
            });
        }
        if !page.query.subject.is_empty() {
            filters.push(FilterView {
                label: "Subject",
                value: &page.query.subject,
            });
        }

        let view = PageView {
            title: "Teacher Prompt Board",
            status: &page.status,
            status_class: if page.failed { "failed" } else { "" },
            filters,
            school_types: &page.facets.school_types,
            subjects: &page.facets.subjects,
            list: self.render(records, empty)?,
            feedback_ms: self.feedback_ms,
            copy_label: COPY_LABEL,
            copied_label: COPIED_LABEL,
            copy_failed: "Copy failed",
        };
        self.hbs
            .render("page", &view)
            .map_err(|e| eyre!("Failed to render page: {}", e))
    }
}

fn load_template(dir: Option<&Path>, name: &str) -> Result<String> {
    if let Some(dir) = dir {
        let path: PathBuf = dir.join(format!("{}.hbs", name));
        if path.exists() {
            debug!(?path, "load_template: found user override");
            return std::fs::read_to_string(&path)
                .map_err(|e| eyre!("Failed to read template {}: {}", path.display(), e));
        }
        debug!(?path, "load_template: no override");
    }
    embedded::get_embedded(name)
        .map(str::to_string)
        .ok_or_else(|| eyre!("Template not found: {}", name))
}
