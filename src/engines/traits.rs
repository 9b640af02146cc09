//! Engine traits and types

use super::redirect;
use crate::config::{timeout_secs, EngineSettings};
use crate::error::Result;
use crate::network::{EngineRequest, HttpClient};
use crate::results::{SearchResponse, SearchResult};
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Per-provider request configuration.
///
/// Every engine owns a default; overrides are applied before the engine is
/// constructed and the configuration is read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Search endpoint
    pub base_url: String,
    /// Headers sent with every request of this engine
    pub headers: HashMap<String, String>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Proxy for this engine's requests
    pub proxy: Option<String>,
}

impl EngineConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            headers: HashMap::new(),
            timeout: Duration::from_secs(crate::DEFAULT_TIMEOUT),
            proxy: None,
        }
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Scheme, host and port of the search endpoint
    pub fn origin(&self) -> String {
        url::Url::parse(&self.base_url)
            .map(|u| u.origin().ascii_serialization())
            .unwrap_or_else(|_| self.base_url.trim_end_matches('/').to_string())
    }

    /// Apply a settings-file override
    pub fn apply(&mut self, overrides: &EngineSettings) -> Result<()> {
        if let Some(ref base_url) = overrides.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(timeout) = overrides.timeout {
            self.timeout = timeout_secs(&format!("engines.{}.timeout", overrides.name), timeout)?;
        }
        if overrides.proxy.is_some() {
            self.proxy = overrides.proxy.clone();
        }
        for (key, value) in &overrides.headers {
            self.headers.insert(key.clone(), value.clone());
        }
        Ok(())
    }
}

/// Where a parsed result points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultLink {
    /// Absolute destination URL
    Direct(String),
    /// Absolute URL of the provider's own redirector; needs an extra fetch
    Wrapped(String),
}

/// A result candidate that passed the title/link checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedHit {
    pub title: String,
    pub link: ResultLink,
    pub snippet: String,
}

impl ParsedHit {
    pub fn new(title: impl Into<String>, link: ResultLink, snippet: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link,
            snippet: snippet.into(),
        }
    }
}

/// Engine metadata, as listed by the `/engines` endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EngineAbout {
    /// Website URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Name of the query parameter carrying the search terms
    pub query_param: String,
    /// How result links are resolved
    pub links: String,
}

impl EngineAbout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn website(mut self, url: impl Into<String>) -> Self {
        self.website = Some(url.into());
        self
    }

    pub fn query_param(mut self, param: impl Into<String>) -> Self {
        self.query_param = param.into();
        self
    }

    pub fn links(mut self, kind: impl Into<String>) -> Self {
        self.links = kind.into();
        self
    }
}

/// Main engine trait that all search providers implement
#[async_trait]
pub trait Engine: Send + Sync {
    /// Engine name
    fn name(&self) -> &str;

    /// Short description of the engine
    fn about(&self) -> EngineAbout {
        EngineAbout::default()
    }

    /// Configuration the engine was built with
    fn config(&self) -> &EngineConfig;

    /// Build the HTTP request for a search
    fn request(&self, query: &str, max_results: usize) -> EngineRequest;

    /// Parse a results page into at most `max_results` candidates, in page
    /// order.
    fn parse(&self, html: &str, max_results: usize) -> Result<Vec<ParsedHit>>;

    /// A GET request carrying this engine's headers and timeout
    fn base_request(&self, url: &str) -> EngineRequest {
        let config = self.config();
        EngineRequest::get(url)
            .headers(&config.headers)
            .timeout(config.timeout)
    }

    /// Resolve a redirector link to its destination
    async fn follow_wrapper(&self, client: &HttpClient, wrapper: &str) -> Option<String> {
        redirect::follow(client, self.base_request(wrapper)).await
    }

    /// Run a search: one fetch of the results page, parsing, then redirect
    /// resolution for the kept candidates.
    ///
    /// Request failures set `error`; pages that do not parse come back as an
    /// empty response with a `parse_error` metadata entry.
    async fn search(&self, client: &HttpClient, query: &str, max_results: usize) -> SearchResponse {
        let engine = self.name().to_string();
        if max_results == 0 {
            return SearchResponse::with_results(Vec::new()).with_metadata("engine", engine);
        }

        let proxied;
        let client = match self.config().proxy.as_deref() {
            Some(proxy) => match client.with_proxy(proxy) {
                Ok(c) => {
                    proxied = c;
                    &proxied
                }
                Err(e) => {
                    return SearchResponse::failed(e.to_string()).with_metadata("engine", engine)
                }
            },
            None => client,
        };

        let response = match client.execute(self.request(query, max_results)).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Request failed for {}: {}", engine, e);
                return SearchResponse::failed(e.to_string()).with_metadata("engine", engine);
            }
        };

        if !response.is_success() {
            warn!("{} answered with HTTP {}", engine, response.status);
            return SearchResponse::failed(format!("HTTP error: {}", response.status))
                .with_metadata("engine", engine);
        }

        let hits = match self.parse(&response.text, max_results) {
            Ok(hits) => hits,
            Err(e) => {
                warn!("Failed to parse response from {}: {}", engine, e);
                return SearchResponse::with_results(Vec::new())
                    .with_metadata("engine", engine)
                    .with_metadata("parse_error", e.to_string());
            }
        };

        let mut results = Vec::with_capacity(hits.len());
        for hit in hits.into_iter().take(max_results) {
            let url = match hit.link {
                ResultLink::Direct(url) => url,
                ResultLink::Wrapped(wrapper) => match self.follow_wrapper(client, &wrapper).await {
                    Some(destination) => destination,
                    None => {
                        debug!("Could not resolve {}, keeping redirector link", wrapper);
                        wrapper
                    }
                },
            };

            let result = SearchResult::new(hit.title, url, hit.snippet);
            if result.is_valid() {
                results.push(result);
            } else {
                debug!("Discarding malformed result from {}: {:?}", engine, result.url);
            }
        }

        debug!("Engine {} returned {} results", engine, results.len());
        SearchResponse::with_results(results).with_metadata("engine", engine)
    }
}
