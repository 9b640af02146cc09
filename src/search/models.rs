//! Search configuration models

use serde::{Deserialize, Serialize};

/// Configuration of one provider query.
///
/// `timeout` and `proxy` override the engine's defaults when set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Provider name
    pub provider: String,
    /// Maximum number of results collected from the provider
    pub max_results: usize,
    /// Per-request timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<f64>,
    /// Outbound proxy URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
}

impl SearchConfig {
    /// Create a configuration for `provider` with the default result cap
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            max_results: crate::DEFAULT_MAX_RESULTS,
            timeout: None,
            proxy: None,
        }
    }

    /// Set the result cap
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Set the timeout in seconds
    pub fn with_timeout(mut self, timeout: f64) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the proxy
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }
}
