//! HTTP networking module
//!
//! Provides the fetcher used for provider pages and result pages.

mod charset;
mod client;
mod request;
pub mod user_agent;

pub use charset::{declared_encoding, decode_body};
pub use client::HttpClient;
pub use request::{is_captcha_page, EngineRequest, EngineResponse};
