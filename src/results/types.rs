//! Result type definitions

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Free-form metadata attached to results and responses
pub type Metadata = HashMap<String, Value>;

/// A single search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Title as shown on the provider page
    pub title: String,
    /// Absolute destination URL
    pub url: String,
    /// Snippet from the provider, replaced by page markdown after enrichment
    pub content: String,
    /// Additional metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl SearchResult {
    /// Create a new result, trimming surrounding whitespace
    pub fn new(title: impl Into<String>, url: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into().trim().to_string(),
            url: url.into().trim().to_string(),
            content: content.into().trim().to_string(),
            metadata: None,
        }
    }

    /// Attach a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Whether the result is fit to be emitted by an engine
    pub fn is_valid(&self) -> bool {
        !self.title.is_empty() && is_absolute_http(&self.url)
    }
}

/// Response of a single engine or of the whole fallback chain.
///
/// An empty `results` list without `error` means "no matches"; a request
/// failure sets `error`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResponse {
    pub fn with_results(results: Vec<SearchResult>) -> Self {
        let total = results.len();
        Self {
            results,
            ..Default::default()
        }
        .with_metadata("total_results", total)
    }

    /// A response for a request that never produced a usable page
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Default::default()
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn metadata_value(&self, key: &str) -> Option<&Value> {
        self.metadata.as_ref().and_then(|m| m.get(key))
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }
}

/// Extracted content of a single fetched page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageContent {
    /// URL that was requested
    pub url: String,
    /// URL the request ended up at after HTTP redirects
    pub final_url: String,
    /// Text of the `<title>` element, if any
    pub title: String,
    /// Markdown content, empty when nothing could be extracted
    pub content: String,
}

/// Whether `url` is an absolute `http`/`https` address
pub fn is_absolute_http(url: &str) -> bool {
    url::Url::parse(url)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
        .unwrap_or(false)
}
