//! Byte-fetch capability for clip media.
//!
//! The storage collaborator as seen from the export path: given an opaque
//! media handle, produce the raw bytes behind it. [`HttpFetcher`] is the
//! production implementation; tests substitute an in-memory stub.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Reason a media fetch failed.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{0}")]
pub struct FetchError(String);

impl FetchError {
    /// Create a fetch error with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        Self(err.to_string())
    }
}

/// Fetch the raw bytes behind a media handle.
#[async_trait]
pub trait MediaFetch: Send + Sync {
    async fn fetch(&self, media_ref: &str) -> Result<Vec<u8>, FetchError>;
}

/// HTTP fetcher over the hosted storage backend.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Default per-request timeout.
    pub const TIMEOUT: Duration = Duration::from_secs(30);

    /// Build a fetcher with the default timeout and user agent.
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent("AdReelEngine/1.0")
            .timeout(Self::TIMEOUT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl MediaFetch for HttpFetcher {
    async fn fetch(&self, media_ref: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.client.get(media_ref).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::new(format!(
                "fetch failed with status {}",
                response.status()
            )));
        }
        Ok(response.bytes().await?.to_vec())
    }
}
