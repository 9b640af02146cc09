//! Web server module
//!
//! Exposes search and page extraction as a small JSON API.

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
