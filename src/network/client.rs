//! HTTP client used for provider pages, redirector pages and result pages

use super::charset::decode_body;
use super::request::{EngineRequest, EngineResponse};
use super::user_agent::{accept_html, page_user_agent};
use crate::config::{timeout_secs, OutgoingSettings};
use crate::error::{Result, SearchError};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{redirect, Client, Response};
use std::time::Duration;
use tracing::debug;

/// Maximum HTTP redirects followed per request
const MAX_REDIRECTS: usize = 10;

/// HTTP client wrapper; cloning shares the connection pool
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    settings: OutgoingSettings,
    default_timeout: Duration,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &OutgoingSettings) -> Result<Self> {
        let client = Self::build(settings, settings.proxy.as_deref())?;

        Ok(Self {
            client,
            settings: settings.clone(),
            default_timeout: timeout_secs("outgoing.request_timeout", settings.request_timeout)?,
        })
    }

    /// Derive a client that routes every request through `proxy`
    pub fn with_proxy(&self, proxy: &str) -> Result<Self> {
        let client = Self::build(&self.settings, Some(proxy))?;
        Ok(Self {
            client,
            settings: self.settings.clone(),
            default_timeout: self.default_timeout,
        })
    }

    fn build(settings: &OutgoingSettings, proxy: Option<&str>) -> Result<Client> {
        let mut builder = Client::builder()
            .timeout(timeout_secs("outgoing.request_timeout", settings.request_timeout)?)
            .pool_max_idle_per_host(settings.pool_maxsize)
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .gzip(true)
            .brotli(true);

        // SSL verification
        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(proxy_url) = proxy {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| SearchError::Config(format!("invalid proxy {}: {}", proxy_url, e)))?;
            builder = builder.proxy(proxy);
        }

        builder
            .build()
            .map_err(|e| SearchError::Config(format!("failed to build HTTP client: {}", e)))
    }

    /// Default timeout applied when a request does not carry its own
    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Execute a GET request.
    ///
    /// Non-2xx statuses are returned as responses, not errors; only transport
    /// failures and timeouts fail.
    pub async fn execute(&self, request: EngineRequest) -> Result<EngineResponse> {
        let timeout = request.timeout.unwrap_or(self.default_timeout);

        let mut headers = HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            HeaderValue::from_static(accept_html()),
        );
        for (key, value) in &request.headers {
            match (
                HeaderName::from_bytes(key.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => debug!("Skipping invalid header {}", key),
            }
        }

        let mut req_builder = self
            .client
            .get(&request.url)
            .timeout(timeout)
            .headers(headers);

        if !request.params.is_empty() {
            req_builder = req_builder.query(&request.params);
        }

        debug!("GET {} (timeout {:?})", request.url, timeout);

        let response = req_builder
            .send()
            .await
            .map_err(|e| SearchError::from_reqwest(&request.url, &e))?;

        Self::parse_response(&request.url, response).await
    }

    /// GET a result page the way a desktop browser would
    pub async fn get_page(&self, url: &str, timeout: Duration) -> Result<EngineResponse> {
        let request = EngineRequest::get(url)
            .header("User-Agent", page_user_agent())
            .timeout(timeout);
        self.execute(request).await
    }

    /// Parse response into EngineResponse
    async fn parse_response(requested: &str, response: Response) -> Result<EngineResponse> {
        let status = response.status().as_u16();
        let url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SearchError::from_reqwest(requested, &e))?;
        let text = decode_body(&bytes, content_type.as_deref());

        Ok(EngineResponse {
            status,
            content_type,
            text,
            url,
        })
    }
}
