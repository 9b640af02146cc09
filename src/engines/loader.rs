//! Engine loader for initializing the registry from configuration

use super::registry::EngineRegistry;
use crate::config::Settings;
use crate::error::{Result, SearchError};
use tracing::{debug, info};

/// Loader for initializing engines from configuration
pub struct EngineLoader;

impl EngineLoader {
    /// Build the registry and apply the per-engine overrides of `settings`
    pub fn load(settings: &Settings) -> Result<EngineRegistry> {
        let mut registry = EngineRegistry::with_defaults();

        for overrides in &settings.engines {
            let config = registry.config_mut(&overrides.name).ok_or_else(|| {
                SearchError::Config(format!("unknown engine in settings: {}", overrides.name))
            })?;
            config.apply(overrides)?;
            debug!("Applied settings overrides to engine {}", overrides.name);
        }

        info!("Loaded {} engines", registry.len());
        Ok(registry)
    }

    /// Get list of available engine names
    pub fn available_engines() -> Vec<String> {
        EngineRegistry::with_defaults()
            .names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}
