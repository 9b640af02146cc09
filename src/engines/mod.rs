//! Search engine module
//!
//! Defines the Engine trait, the provider adapters and the registry that
//! builds them by name.

mod dom;
mod loader;
pub mod redirect;
mod registry;
mod traits;

// Engine implementations
pub mod baidu;
pub mod bing;
pub mod duckduckgo;
pub mod google;
pub mod sogou;

pub use loader::EngineLoader;
pub use registry::{EngineFactory, EngineRegistry};
pub use traits::*;
