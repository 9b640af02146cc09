//! Result types passed between the engines, the orchestrator and the HTTP
//! surface.

mod types;

pub use types::*;
