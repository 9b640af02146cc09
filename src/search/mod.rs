//! Search orchestration module
//!
//! Runs the provider fallback chain and enriches the accepted results with
//! the content of the pages they point to.

mod models;
mod orchestrator;

pub use models::*;
pub use orchestrator::WebSearch;
