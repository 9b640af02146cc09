//! Fallback-chain search and result enrichment

use super::models::SearchConfig;
use crate::config::{timeout_secs, SearchSettings, Settings};
use crate::content;
use crate::engines::{EngineLoader, EngineRegistry};
use crate::error::{Result, SearchError};
use crate::network::HttpClient;
use crate::results::{is_absolute_http, PageContent, SearchResponse, SearchResult};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Search front end: tries the configured providers in order and fetches
/// the pages behind the accepted results.
pub struct WebSearch {
    /// HTTP client for making requests
    client: HttpClient,
    /// Engine registry
    registry: Arc<EngineRegistry>,
    /// Fallback chain and enrichment settings
    settings: SearchSettings,
    /// Timeout of a full-page fetch
    content_timeout: Duration,
}

impl WebSearch {
    /// Create a new search front end.
    ///
    /// Every provider of the fallback chain must be registered.
    pub fn new(
        client: HttpClient,
        registry: Arc<EngineRegistry>,
        settings: &SearchSettings,
    ) -> Result<Self> {
        if let Some(unknown) = settings.providers.iter().find(|p| !registry.contains(p)) {
            return Err(SearchError::UnsupportedProvider(unknown.clone()));
        }

        Ok(Self {
            client,
            registry,
            settings: settings.clone(),
            content_timeout: Duration::from_secs(crate::DEFAULT_TIMEOUT),
        })
    }

    /// Build the client, the registry and the search front end from
    /// validated settings
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        settings.validate()?;
        let content_timeout =
            timeout_secs("outgoing.content_timeout", settings.outgoing.content_timeout)?;
        let client = HttpClient::with_settings(&settings.outgoing)?;
        let registry = Arc::new(EngineLoader::load(settings)?);
        Ok(Self::new(client, registry, &settings.search)?.with_content_timeout(content_timeout))
    }

    /// Set the timeout of full-page fetches
    pub fn with_content_timeout(mut self, timeout: Duration) -> Self {
        self.content_timeout = timeout;
        self
    }

    /// Providers of the fallback chain, in order
    pub fn providers(&self) -> &[String] {
        &self.settings.providers
    }

    /// Engine registry
    pub fn registry(&self) -> &EngineRegistry {
        &self.registry
    }

    /// Query configuration for one provider of the chain
    fn config_for(&self, provider: &str) -> SearchConfig {
        SearchConfig {
            provider: provider.to_string(),
            max_results: self.settings.max_results,
            timeout: self.settings.timeout,
            proxy: self.settings.proxy.clone(),
        }
    }

    /// Search the fallback chain.
    ///
    /// The first provider returning at least one result wins; results are
    /// never merged across providers. The response `error` is only set when
    /// no provider could be reached at all.
    pub async fn search(&self, query: &str) -> SearchResponse {
        let query = query.trim();
        if query.is_empty() {
            return SearchResponse::with_results(Vec::new());
        }

        let start = Instant::now();
        let mut attempted = Vec::new();
        let mut last_error = None;
        let mut answered = false;

        for provider in &self.settings.providers {
            attempted.push(provider.clone());

            let response = match self.search_provider(&self.config_for(provider), query).await {
                Ok(response) => response,
                Err(e) => {
                    warn!("Provider {} cannot be used: {}", provider, e);
                    return SearchResponse::failed(e.to_string()).with_metadata("attempted", attempted);
                }
            };

            if let Some(error) = response.error {
                warn!("Provider {} failed: {}", provider, error);
                last_error = Some(error);
                continue;
            }
            answered = true;

            if response.results.is_empty() {
                info!("Provider {} returned no results, trying next", provider);
                continue;
            }

            info!(
                "Accepted {} results from {} in {:?}",
                response.results.len(),
                provider,
                start.elapsed()
            );

            let results = if self.settings.fetch_content {
                self.enrich(response.results).await
            } else {
                response.results
            };

            return SearchResponse::with_results(results)
                .with_metadata("provider", provider.clone())
                .with_metadata("attempted", attempted);
        }

        let response = match last_error {
            Some(error) if !answered => {
                SearchResponse::failed(format!("all providers unreachable: {}", error))
            }
            _ => SearchResponse::with_results(Vec::new()),
        };
        response.with_metadata("attempted", attempted)
    }

    /// Query a single provider, without fallback or enrichment
    pub async fn search_provider(&self, config: &SearchConfig, query: &str) -> Result<SearchResponse> {
        let engine = self.registry.create(config)?;
        debug!(
            "Searching {} for {:?} (max {} results)",
            engine.name(),
            query,
            config.max_results
        );
        Ok(engine.search(&self.client, query, config.max_results).await)
    }

    /// Replace each snippet with the content of the result's page.
    ///
    /// Pages are fetched with bounded concurrency; output order is input
    /// order.
    async fn enrich(&self, results: Vec<SearchResult>) -> Vec<SearchResult> {
        let concurrency = self.settings.enrich_concurrency.max(1);
        stream::iter(results)
            .map(|result| self.enrich_result(result))
            .buffered(concurrency)
            .collect()
            .await
    }

    async fn enrich_result(&self, mut result: SearchResult) -> SearchResult {
        let snippet = result.content.clone();
        result = result.with_metadata("snippet", snippet);

        match self.fetch_page(&result.url).await {
            Ok(page) => {
                if page.final_url != result.url {
                    result = result.with_metadata("final_url", page.final_url);
                }
                if page.content.is_empty() {
                    debug!("No extractable content at {}, keeping snippet", result.url);
                } else {
                    result.content = page.content;
                }
            }
            Err(e) => {
                warn!("Could not enrich {}: {}", result.url, e);
                result = result.with_metadata("content_error", e.to_string());
            }
        }

        result
    }

    /// Fetch one page and extract its main content as markdown
    pub async fn fetch_page(&self, url: &str) -> Result<PageContent> {
        if !is_absolute_http(url) {
            return Err(SearchError::fetch(url, "only http and https URLs can be fetched"));
        }

        let response = self.client.get_page(url, self.content_timeout).await?;
        if !response.is_success() {
            return Err(SearchError::fetch(url, format!("HTTP error: {}", response.status)));
        }

        let content_type = response.content_type.as_deref();
        let (title, content) = if content::is_html(&response.text, content_type) {
            (
                content::page_title(&response.text),
                content::extract(&response.url, &response.text, content_type),
            )
        } else {
            debug!("{} is not HTML ({:?})", url, content_type);
            (String::new(), String::new())
        };

        Ok(PageContent {
            url: url.to_string(),
            final_url: response.url,
            title,
            content,
        })
    }

    /// Markdown content of a page; empty on any failure
    pub async fn fetch_content(&self, url: &str) -> String {
        match self.fetch_page(url).await {
            Ok(page) => page.content,
            Err(e) => {
                warn!("Failed to fetch {}: {}", url, e);
                String::new()
            }
        }
    }
}
