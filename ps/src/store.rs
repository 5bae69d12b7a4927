//! Core PromptStore implementation

use std::cmp::Reverse;
use std::sync::Arc;

use tracing::{debug, info};

use crate::DEFAULT_STORAGE_KEY;
use crate::error::{StoreError, StoreResult};
use crate::record::PromptRecord;
use crate::source::StaticSource;
use crate::storage::LocalStorage;

/// Read side of the board: static catalog plus locally submitted prompts
#[derive(Clone)]
pub struct PromptStore {
    source: Arc<dyn StaticSource>,
    storage: Arc<dyn LocalStorage>,
    key: String,
}

impl PromptStore {
    pub fn new(source: Arc<dyn StaticSource>, storage: Arc<dyn LocalStorage>) -> Self {
        Self {
            source,
            storage,
            key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }

    /// Use a different storage slot for local prompts
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load and merge both collections
    ///
    /// Fails as a whole on a source transport error or malformed JSON in
    /// either collection; never returns a partial result.
    pub async fn load(&self) -> StoreResult<Vec<PromptRecord>> {
        debug!(source = %self.source.location(), key = %self.key, "PromptStore::load: called");
        let static_records = self.source.fetch().await?;
        let local_records = self.local_records()?;

        info!(
            static_count = static_records.len(),
            local_count = local_records.len(),
            "Loaded prompts"
        );
        Ok(merge(local_records, static_records))
    }

    /// Locally submitted prompts, newest submission first
    pub fn local_records(&self) -> StoreResult<Vec<PromptRecord>> {
        match self.storage.get_item(&self.key)? {
            Some(raw) if !raw.trim().is_empty() => serde_json::from_str(&raw)
                .map_err(|e| StoreError::json(format!("local storage slot '{}'", self.key), e)),
            _ => {
                debug!(key = %self.key, "PromptStore::local_records: slot empty");
                Ok(Vec::new())
            }
        }
    }

    /// Put a record in front of the local collection and rewrite the slot
    pub fn prepend_local(&self, record: PromptRecord) -> StoreResult<()> {
        let mut local = self.local_records()?;
        debug!(id = %record.id, existing = local.len(), "PromptStore::prepend_local: called");
        local.insert(0, record);

        let raw = serde_json::to_string(&local)
            .map_err(|e| StoreError::json(format!("local storage slot '{}'", self.key), e))?;
        self.storage.set_item(&self.key, &raw)
    }
}

/// Local records ahead of static ones, then newest first
///
/// The sort is stable, so records with equal timestamps (or none at all)
/// keep their concatenation order.
pub fn merge(local: Vec<PromptRecord>, static_records: Vec<PromptRecord>) -> Vec<PromptRecord> {
    let mut all = local;
    all.extend(static_records);
    all.sort_by_key(|r| Reverse(r.sort_key()));
    all
}
