//! Outgoing request and decoded response types

use std::collections::HashMap;
use std::time::Duration;

/// HTTP GET request to be made by the fetcher
#[derive(Debug, Clone)]
pub struct EngineRequest {
    /// URL to request
    pub url: String,
    /// Request headers, overriding the client defaults
    pub headers: HashMap<String, String>,
    /// Query parameters, in the order they are sent
    pub params: Vec<(String, String)>,
    /// Per-request timeout; the client default applies when unset
    pub timeout: Option<Duration>,
}

impl EngineRequest {
    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: HashMap::new(),
            params: Vec::new(),
            timeout: None,
        }
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Add several headers
    pub fn headers<'a>(mut self, headers: impl IntoIterator<Item = (&'a String, &'a String)>) -> Self {
        for (key, value) in headers {
            self.headers.insert(key.clone(), value.clone());
        }
        self
    }

    /// Add a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Set the timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// HTTP response with its body decoded to text
#[derive(Debug, Clone)]
pub struct EngineResponse {
    /// HTTP status code
    pub status: u16,
    /// Declared content type, if any
    pub content_type: Option<String>,
    /// Response body as text
    pub text: String,
    /// Response URL (after redirects)
    pub url: String,
}

impl EngineResponse {
    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Common CAPTCHA / bot-wall markers
pub fn is_captcha_page(text: &str) -> bool {
    text.contains("captcha")
        || text.contains("CAPTCHA")
        || text.contains("unusual traffic")
        || text.contains("automated requests")
        || text.contains("antispider")
        || text.contains("百度安全验证")
}
