//! Application state shared across handlers

use crate::config::{timeout_secs, Settings};
use crate::engines::EngineLoader;
use crate::error::Result;
use crate::network::HttpClient;
use crate::search::WebSearch;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Search front end, owning the engine registry
    pub search: Arc<WebSearch>,
}

impl AppState {
    /// Create new application state from validated settings
    pub fn new(settings: Settings, client: HttpClient) -> Result<Self> {
        settings.validate()?;
        let content_timeout =
            timeout_secs("outgoing.content_timeout", settings.outgoing.content_timeout)?;
        let registry = Arc::new(EngineLoader::load(&settings)?);
        let search = WebSearch::new(client, registry, &settings.search)?
            .with_content_timeout(content_timeout);

        Ok(Self {
            settings: Arc::new(settings),
            search: Arc::new(search),
        })
    }

    /// Create state around an existing search front end
    pub fn with_search(settings: Settings, search: WebSearch) -> Self {
        Self {
            settings: Arc::new(settings),
            search: Arc::new(search),
        }
    }

    /// Get instance name
    pub fn instance_name(&self) -> &str {
        &self.settings.general.instance_name
    }
}
