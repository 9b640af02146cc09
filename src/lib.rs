//! WebSearch-RS: fallback-chain web search with readable page extraction
//!
//! Queries interchangeable search providers in order until one returns
//! results, resolves their redirect indirection, and turns the pages behind
//! the results into clean markdown.

pub mod config;
pub mod content;
pub mod engines;
pub mod error;
pub mod network;
pub mod results;
pub mod search;
pub mod web;

pub use config::Settings;
pub use engines::Engine;
pub use error::SearchError;
pub use results::{PageContent, SearchResponse, SearchResult};
pub use search::{SearchConfig, WebSearch};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default timeout for engine requests and page fetches in seconds
pub const DEFAULT_TIMEOUT: u64 = 10;

/// Default number of results requested from a provider
pub const DEFAULT_MAX_RESULTS: usize = 10;
