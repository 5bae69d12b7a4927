//! Static catalog sources
//!
//! A source that is reachable but answers with a non-success status (HTTP
//! non-2xx, missing file) yields an empty catalog. Transport failures and
//! malformed JSON are errors.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::record::PromptRecord;

/// Where the read-only catalog comes from
#[async_trait]
pub trait StaticSource: Send + Sync {
    /// Fetch the catalog
    async fn fetch(&self) -> StoreResult<Vec<PromptRecord>>;

    /// Human readable location, for logs
    fn location(&self) -> String;
}

/// Pick an HTTP or file source for a configured location
pub fn open_source(location: &str) -> StoreResult<Arc<dyn StaticSource>> {
    debug!(%location, "open_source: called");
    if location.starts_with("http://") || location.starts_with("https://") {
        Ok(Arc::new(HttpSource::new(location)?))
    } else {
        Ok(Arc::new(FileSource::new(location)))
    }
}

fn parse_catalog(body: &str, location: &str) -> StoreResult<Vec<PromptRecord>> {
    serde_json::from_str(body).map_err(|e| StoreError::json(format!("static catalog {}", location), e))
}

/// Catalog served over HTTP(S)
pub struct HttpSource {
    url: String,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> StoreResult<Self> {
        let url = url.into();
        debug!(%url, "HttpSource::new: called");
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("promptboard/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { url, client })
    }
}

#[async_trait]
impl StaticSource for HttpSource {
    async fn fetch(&self) -> StoreResult<Vec<PromptRecord>> {
        debug!(url = %self.url, "HttpSource::fetch: sending request");
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            warn!(url = %self.url, status = %response.status(), "Static catalog unavailable, using empty catalog");
            return Ok(Vec::new());
        }

        let body = response.text().await?;
        debug!(body_len = body.len(), "HttpSource::fetch: body read");
        parse_catalog(&body, &self.url)
    }

    fn location(&self) -> String {
        self.url.clone()
    }
}

/// Catalog stored as a JSON file
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl StaticSource for FileSource {
    async fn fetch(&self) -> StoreResult<Vec<PromptRecord>> {
        debug!(path = ?self.path, "FileSource::fetch: called");
        match tokio::fs::read_to_string(&self.path).await {
            Ok(body) => parse_catalog(&body, &self.path.display().to_string()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = ?self.path, "Static catalog not found, using empty catalog");
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[derive(Debug, Clone)]
enum MemoryMode {
    Records(Vec<PromptRecord>),
    Unavailable,
    Failing(String),
}

/// Fixed in-process catalog
#[derive(Debug, Clone)]
pub struct MemorySource {
    mode: MemoryMode,
}

impl MemorySource {
    pub fn new(records: Vec<PromptRecord>) -> Self {
        Self {
            mode: MemoryMode::Records(records),
        }
    }

    /// Behaves like a server answering 404
    pub fn unavailable() -> Self {
        Self {
            mode: MemoryMode::Unavailable,
        }
    }

    /// Behaves like a network failure
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            mode: MemoryMode::Failing(message.into()),
        }
    }
}

#[async_trait]
impl StaticSource for MemorySource {
    async fn fetch(&self) -> StoreResult<Vec<PromptRecord>> {
        match &self.mode {
            MemoryMode::Records(records) => Ok(records.clone()),
            MemoryMode::Unavailable => Ok(Vec::new()),
            MemoryMode::Failing(message) => Err(StoreError::Source(message.clone())),
        }
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
