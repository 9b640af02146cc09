//! Engine registry mapping provider names to constructors

use super::traits::{Engine, EngineAbout, EngineConfig};
use super::{baidu, bing, duckduckgo, google, sogou};
use crate::error::{Result, SearchError};
use crate::config::timeout_secs;
use crate::search::SearchConfig;
use std::collections::BTreeMap;

/// Builds an engine from its effective configuration
pub type EngineFactory = fn(EngineConfig) -> Box<dyn Engine>;

struct Registration {
    factory: EngineFactory,
    config: EngineConfig,
}

/// Registry of all available search engines.
///
/// Engines are not shared between searches: every call to
/// [`EngineRegistry::create`] builds a fresh adapter from the stored default
/// configuration.
pub struct EngineRegistry {
    /// Registrations by lower-case name
    engines: BTreeMap<String, Registration>,
}

impl EngineRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            engines: BTreeMap::new(),
        }
    }

    /// Registry holding every built-in provider with its default config
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("baidu", |c| Box::new(baidu::Baidu::with_config(c)), baidu::Baidu::default_config());
        registry.register("sogou", |c| Box::new(sogou::Sogou::with_config(c)), sogou::Sogou::default_config());
        registry.register("bing", |c| Box::new(bing::Bing::with_config(c)), bing::Bing::default_config());
        registry.register(
            "duckduckgo",
            |c| Box::new(duckduckgo::DuckDuckGo::with_config(c)),
            duckduckgo::DuckDuckGo::default_config(),
        );
        registry.register("google", |c| Box::new(google::Google::with_config(c)), google::Google::default_config());
        registry
    }

    /// Register an engine; an existing registration with the same name is
    /// replaced.
    pub fn register(&mut self, name: &str, factory: EngineFactory, config: EngineConfig) {
        self.engines
            .insert(name.to_lowercase(), Registration { factory, config });
    }

    /// Check if an engine exists
    pub fn contains(&self, name: &str) -> bool {
        self.engines.contains_key(&name.to_lowercase())
    }

    /// Get all engine names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.engines.keys().map(|s| s.as_str()).collect()
    }

    /// Default configuration of an engine
    pub fn default_config(&self, name: &str) -> Option<&EngineConfig> {
        self.engines.get(&name.to_lowercase()).map(|r| &r.config)
    }

    /// Metadata of a registered engine
    pub fn about(&self, name: &str) -> Option<EngineAbout> {
        self.engines
            .get(&name.to_lowercase())
            .map(|r| (r.factory)(r.config.clone()).about())
    }

    /// Mutable default configuration, used to apply settings overrides
    pub fn config_mut(&mut self, name: &str) -> Option<&mut EngineConfig> {
        self.engines.get_mut(&name.to_lowercase()).map(|r| &mut r.config)
    }

    /// Build an engine for a search.
    ///
    /// `timeout` and `proxy` of the search configuration override the
    /// engine's defaults when present.
    pub fn create(&self, search: &SearchConfig) -> Result<Box<dyn Engine>> {
        let registration = self
            .engines
            .get(&search.provider.to_lowercase())
            .ok_or_else(|| SearchError::UnsupportedProvider(search.provider.clone()))?;

        let mut config = registration.config.clone();
        if let Some(timeout) = search.timeout {
            config.timeout = timeout_secs("timeout", timeout)?;
        }
        if search.proxy.is_some() {
            config.proxy = search.proxy.clone();
        }

        Ok((registration.factory)(config))
    }

    /// Get number of registered engines
    pub fn len(&self) -> usize {
        self.engines.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}

impl Default for EngineRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
