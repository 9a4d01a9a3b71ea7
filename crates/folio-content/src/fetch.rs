//! Fetching and loading content documents.

use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::document::RawDocument;
use crate::validate::{validate, Document, ValidationError};

/// Errors that can occur while fetching a content document.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Failed to read {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("Request to {url} failed: {message}")]
    Network { url: String, message: String },

    #[error("Request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("Fetching content timed out after {0:?}")]
    Timeout(Duration),
}

/// Errors that can occur while loading a content document.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Malformed content document: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Something that can produce the text of a content document.
pub trait ContentFetcher: Send + Sync {
    /// Fetch the raw document text.
    fn fetch(&self) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Where a content document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    /// A local file
    File(PathBuf),
    /// An `http://` or `https://` URL
    Url(String),
}

impl ContentSource {
    /// Interpret a string as a URL when it has an HTTP scheme, else as a path.
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            Self::Url(location.to_string())
        } else {
            Self::File(PathBuf::from(location))
        }
    }

    /// The local path, for file sources.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::File(path) => Some(path),
            Self::Url(_) => None,
        }
    }
}

impl FromStr for ContentSource {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for ContentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

impl ContentFetcher for ContentSource {
    async fn fetch(&self) -> Result<String, FetchError> {
        match self {
            Self::File(path) => {
                tracing::debug!("Reading content from {}", path.display());
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|e| FetchError::Io {
                        path: path.clone(),
                        message: e.to_string(),
                    })
            }
            Self::Url(url) => {
                tracing::debug!("Fetching content from {}", url);
                let response = reqwest::get(url).await.map_err(|e| FetchError::Network {
                    url: url.clone(),
                    message: e.to_string(),
                })?;

                let status = response.status();
                if !status.is_success() {
                    return Err(FetchError::Status {
                        url: url.clone(),
                        status: status.as_u16(),
                    });
                }

                response.text().await.map_err(|e| FetchError::Network {
                    url: url.clone(),
                    message: e.to_string(),
                })
            }
        }
    }
}

/// Fetch, parse and validate a content document.
///
/// The fetch is cancelled once `timeout` elapses.
pub async fn load<F: ContentFetcher>(fetcher: &F, timeout: Duration) -> Result<Document, ContentError> {
    let text = match tokio::time::timeout(timeout, fetcher.fetch()).await {
        Ok(result) => result?,
        Err(_) => return Err(FetchError::Timeout(timeout).into()),
    };

    let raw = RawDocument::from_json(&text)?;
    let document = validate(raw)?;

    tracing::debug!("Loaded content document with {} sections", document.sections.len());

    Ok(document)
}
