//! Settings structures for WebSearch-RS configuration

use crate::error::SearchError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// Longest timeout accepted anywhere, in seconds
pub const MAX_TIMEOUT_SECS: f64 = 3600.0;

/// Convert a timeout given in seconds.
///
/// Fails unless `secs` lies in `(0, MAX_TIMEOUT_SECS]`; `name` labels the
/// error.
pub fn timeout_secs(name: &str, secs: f64) -> std::result::Result<Duration, SearchError> {
    if !(secs > 0.0 && secs <= MAX_TIMEOUT_SECS) {
        return Err(SearchError::Config(format!(
            "{} must be greater than 0 and at most {} seconds, got {}",
            name, MAX_TIMEOUT_SECS, secs
        )));
    }
    Duration::try_from_secs_f64(secs).map_err(|e| SearchError::Config(format!("{}: {}", name, e)))
}

/// Main settings structure, loaded from `settings.yml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub outgoing: OutgoingSettings,
    pub search: SearchSettings,
    /// Per-engine overrides of the built-in defaults
    pub engines: Vec<EngineSettings>,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from a YAML document
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        Ok(settings)
    }

    /// Merge with environment variables (WEBSEARCH_* prefix)
    pub fn merge_env(&mut self) {
        self.merge_vars(|key| std::env::var(key).ok());
    }

    fn merge_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("WEBSEARCH_DEBUG") {
            self.general.debug = matches!(
                val.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }
        if let Some(val) = var("WEBSEARCH_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = var("WEBSEARCH_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Some(val) = var("WEBSEARCH_PROXY") {
            self.outgoing.proxy = Some(val).filter(|p| !p.is_empty());
        }
        if let Some(val) = var("WEBSEARCH_PROVIDERS") {
            let providers: Vec<String> = val
                .split(',')
                .map(|p| p.trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect();
            if !providers.is_empty() {
                self.search.providers = providers;
            }
        }
    }

    /// Reject settings that can never produce a working search
    pub fn validate(&self) -> std::result::Result<(), SearchError> {
        if self.search.providers.is_empty() {
            return Err(SearchError::Config("search.providers is empty".into()));
        }
        if self.search.max_results == 0 {
            return Err(SearchError::Config("search.max_results must be positive".into()));
        }
        if self.search.enrich_concurrency == 0 {
            return Err(SearchError::Config(
                "search.enrich_concurrency must be positive".into(),
            ));
        }
        let timeouts = [
            ("outgoing.request_timeout", Some(self.outgoing.request_timeout)),
            ("outgoing.content_timeout", Some(self.outgoing.content_timeout)),
            ("search.timeout", self.search.timeout),
        ];
        for (name, value) in timeouts {
            if let Some(t) = value {
                timeout_secs(name, t)?;
            }
        }
        for engine in &self.engines {
            if let Some(t) = engine.timeout {
                timeout_secs(&format!("engines.{}.timeout", engine.name), t)?;
            }
        }
        Ok(())
    }

    /// Get engine overrides by name
    pub fn get_engine(&self, name: &str) -> Option<&EngineSettings> {
        self.engines
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
    /// Instance name reported by the HTTP surface
    pub instance_name: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "websearch-rs".to_string(),
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8889,
            bind_address: "127.0.0.1".to_string(),
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Default request timeout in seconds
    pub request_timeout: f64,
    /// Timeout for full-page fetches during enrichment, in seconds
    pub content_timeout: f64,
    /// Pool max idle connections per host
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy for every outgoing request
    pub proxy: Option<String>,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: crate::DEFAULT_TIMEOUT as f64,
            content_timeout: crate::DEFAULT_TIMEOUT as f64,
            pool_maxsize: 20,
            verify_ssl: true,
            proxy: None,
        }
    }
}

/// Search orchestration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Ordered fallback chain of providers
    pub providers: Vec<String>,
    /// Results requested from each provider
    pub max_results: usize,
    /// Timeout override applied to every provider, in seconds
    pub timeout: Option<f64>,
    /// Proxy override applied to every provider
    pub proxy: Option<String>,
    /// Fetch and extract each result page
    pub fetch_content: bool,
    /// Maximum concurrent page fetches while enriching results
    pub enrich_concurrency: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            providers: vec!["baidu".to_string(), "sogou".to_string(), "bing".to_string()],
            max_results: crate::DEFAULT_MAX_RESULTS,
            timeout: None,
            proxy: None,
            fetch_content: true,
            enrich_concurrency: 4,
        }
    }
}

/// Override for one engine's built-in configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Provider name (e.g. "bing")
    pub name: String,
    /// Replacement search endpoint
    pub base_url: Option<String>,
    /// Timeout in seconds
    pub timeout: Option<f64>,
    /// Proxy for this provider only
    pub proxy: Option<String>,
    /// Extra headers, replacing built-in ones with the same name
    pub headers: HashMap<String, String>,
}
