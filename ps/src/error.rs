//! Prompt store error types

use thiserror::Error;

/// Errors raised while loading, persisting or importing prompts
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Static source error: {0}")]
    Source(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Malformed JSON in {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage quota exceeded for '{key}': {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { key: String, needed: usize, quota: usize },

    #[error("Import error: {0}")]
    Import(#[from] csv::Error),
}

/// Result alias for prompt store operations
pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    /// Wrap a JSON error with a description of what was being parsed
    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        StoreError::Json {
            context: context.into(),
            source,
        }
    }

    /// True when the failure happened while writing to local storage
    pub fn is_storage_write(&self) -> bool {
        matches!(self, StoreError::QuotaExceeded { .. } | StoreError::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error_names_context() {
        let err = serde_json::from_str::<Vec<u8>>("{oops").unwrap_err();
        let err = StoreError::json("local storage slot 'teacherPrompts'", err);
        assert!(err.to_string().contains("teacherPrompts"));
    }

    #[test]
    fn test_quota_display() {
        let err = StoreError::QuotaExceeded {
            key: "teacherPrompts".to_string(),
            needed: 120,
            quota: 100,
        };
        assert_eq!(
            err.to_string(),
            "Storage quota exceeded for 'teacherPrompts': 120 bytes needed, 100 allowed"
        );
        assert!(err.is_storage_write());
    }

    #[test]
    fn test_source_error_is_not_storage_write() {
        assert!(!StoreError::Source("boom".to_string()).is_storage_write());
    }
}
