//! Board controller
//!
//! Owns everything the page shows: the merged collection, the load status,
//! the active filters and the per-card copy state. Every operation that
//! changes what is visible goes through `&mut self`, so only one load is in
//! flight at a time.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use eyre::{Context, Result};
use promptstore::{
    Clock, FilterQuery, PromptForm, PromptRecord, PromptStore, SubmitOutcome, SystemClock, facets, filter,
};
use tracing::{debug, error, info, warn};

use crate::clipboard::{Clipboard, CopyTrigger, SystemClipboard, TriggerState, copy_to_clipboard};
use crate::notify::{ConsoleNotifier, Notice, Notifier};
use crate::render::{EmptyState, PageContext, Renderer};

/// Status line shown when the collection cannot be loaded
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load prompts.";

/// Where the board is in its load cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardStatus {
    Loading,
    Ready,
    Failed(String),
}

pub struct Board {
    store: PromptStore,
    renderer: Renderer,
    clock: Arc<dyn Clock>,
    clipboard: Arc<dyn Clipboard>,
    notifier: Arc<dyn Notifier>,
    prompts: Vec<PromptRecord>,
    status: BoardStatus,
    query: FilterQuery,
    /// Copy buttons by position in the visible list
    triggers: HashMap<usize, CopyTrigger>,
    feedback: Duration,
}

impl Board {
    /// Board with the wall clock, system clipboard and console notices
    pub fn new(store: PromptStore, renderer: Renderer) -> Self {
        Self {
            store,
            renderer,
            clock: Arc::new(SystemClock),
            clipboard: Arc::new(SystemClipboard::new()),
            notifier: Arc::new(ConsoleNotifier),
            prompts: Vec::new(),
            status: BoardStatus::Loading,
            query: FilterQuery::default(),
            triggers: HashMap::new(),
            feedback: Duration::from_millis(crate::DEFAULT_COPY_FEEDBACK_MS),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_clipboard(mut self, clipboard: Arc<dyn Clipboard>) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// How long a copy button shows "Copied"
    pub fn with_feedback(mut self, feedback: Duration) -> Self {
        self.feedback = feedback;
        self
    }

    pub fn status(&self) -> &BoardStatus {
        &self.status
    }

    pub fn prompts(&self) -> &[PromptRecord] {
        &self.prompts
    }

    pub fn query(&self) -> &FilterQuery {
        &self.query
    }

    /// Load the merged collection; on failure keep the previous one
    pub async fn reload(&mut self) -> &BoardStatus {
        debug!("Board::reload: called");
        self.status = BoardStatus::Loading;
        match self.store.load().await {
            Ok(prompts) => {
                info!(count = prompts.len(), "Board ready");
                self.prompts = prompts;
                self.triggers.clear();
                self.status = BoardStatus::Ready;
            }
            Err(e) => {
                error!(%e, "Failed to load prompts");
                self.status = BoardStatus::Failed(LOAD_FAILED_MESSAGE.to_string());
            }
        }
        &self.status
    }

    pub fn set_query(&mut self, query: FilterQuery) {
        debug!(?query, "Board::set_query: called");
        self.query = query;
        self.triggers.clear();
    }

    /// Records passing the active filters, in collection order
    pub fn visible(&self) -> Vec<&PromptRecord> {
        filter(&self.prompts, &self.query)
    }

    fn empty_state(&self) -> EmptyState {
        if self.prompts.is_empty() {
            EmptyState::NoData
        } else {
            EmptyState::NoMatches
        }
    }

    /// HTML fragment for the visible records
    pub fn render_list(&self) -> Result<String> {
        self.renderer.render(&self.visible(), self.empty_state())
    }

    /// Standalone HTML document for the current state
    pub fn render_page(&self) -> Result<String> {
        let (status, failed) = match &self.status {
            BoardStatus::Failed(message) => (message.clone(), true),
            _ => (String::new(), false),
        };
        let page = PageContext {
            status,
            failed,
            query: self.query.clone(),
            facets: facets(&self.prompts),
        };
        self.renderer.render_page(&self.visible(), self.empty_state(), &page)
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Save the form as a new local prompt, then clear it and reload
    ///
    /// An incomplete form is ignored without touching storage. A storage
    /// failure is shown to the user and leaves the form as it was.
    pub async fn submit(&mut self, form: &mut PromptForm) -> Result<SubmitOutcome> {
        debug!(title = %form.title, "Board::submit: called");
        let outcome = match self.store.submit(form, self.clock.as_ref()) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(%e, "Failed to save prompt");
                self.notifier.notify(&Notice::SaveFailed(e.to_string()));
                return Err(e).context("Failed to save prompt");
            }
        };

        if let SubmitOutcome::Saved(record) = &outcome {
            form.reset();
            self.reload().await;
            if let BoardStatus::Failed(message) = &self.status {
                warn!(id = %record.id, %message, "Saved prompt but reload failed");
            }
            self.notifier.notify(&Notice::Saved);
        }
        Ok(outcome)
    }

    /// Position of the first visible card with this id
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.visible().iter().position(|r| r.id == id)
    }

    /// Copy the content of the card at `position` in the visible list
    ///
    /// Positions match the `prompt-<n>` element ids of the rendered list.
    /// Returns `Ok(false)` when there is no card at that position.
    pub async fn copy(&mut self, position: usize) -> Result<bool> {
        debug!(position, "Board::copy: called");
        let Some(content) = self.visible().get(position).map(|r| r.content.clone()) else {
            debug!(position, "Board::copy: no card at position");
            return Ok(false);
        };

        let feedback = self.feedback;
        let trigger = self
            .triggers
            .entry(position)
            .or_insert_with(|| CopyTrigger::new(feedback));
        copy_to_clipboard(&content, self.clipboard.as_ref(), trigger, self.notifier.as_ref())
            .await
            .context("Failed to copy prompt")?;
        Ok(true)
    }

    /// Copy button state of the card at `position`
    pub fn card_state(&self, position: usize) -> TriggerState {
        self.triggers.get(&position).map(CopyTrigger::state).unwrap_or_default()
    }
}
