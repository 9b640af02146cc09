//! Error taxonomy shared by the fetcher, the engines, the extractor and the
//! orchestrator.

use thiserror::Error;

/// Errors raised inside the search pipeline.
///
/// Only [`SearchError::UnsupportedProvider`] and [`SearchError::Config`] are
/// meant to reach a caller; everything else is translated into a degraded
/// [`SearchResponse`](crate::results::SearchResponse) or empty page content at
/// the component boundary where it happens.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SearchError {
    /// Network, DNS or TLS failure while talking to a remote host.
    #[error("request to {url} failed: {message}")]
    Fetch { url: String, message: String },

    /// The per-request timeout elapsed.
    #[error("request to {url} timed out")]
    Timeout { url: String },

    /// A provider page did not have the structure its adapter expects.
    #[error("unexpected page structure from {engine}: {reason}")]
    Parse { engine: String, reason: String },

    /// Extraction was attempted on a payload that is not HTML.
    #[error("payload is not HTML (content-type: {content_type})")]
    NotHtml { content_type: String },

    /// Unknown provider name.
    #[error("unsupported search provider: {0}")]
    UnsupportedProvider(String),

    /// Invalid settings or engine configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SearchError {
    pub fn fetch(url: impl Into<String>, message: impl ToString) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.to_string(),
        }
    }

    pub fn parse(engine: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            engine: engine.into(),
            reason: reason.into(),
        }
    }

    /// Map a reqwest failure, keeping timeouts distinguishable.
    pub fn from_reqwest(url: &str, err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else {
            Self::fetch(url, err)
        }
    }

    /// Whether the error means the remote host could not be reached at all,
    /// as opposed to answering with something unusable.
    pub fn is_request_failure(&self) -> bool {
        matches!(self, Self::Fetch { .. } | Self::Timeout { .. })
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
