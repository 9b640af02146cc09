//! HTTP request handlers

use super::state::AppState;
use crate::engines::EngineAbout;
use crate::error::SearchError;
use crate::search::SearchConfig;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Query parameters for search
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Search query
    pub q: Option<String>,
    /// Single provider to query instead of the fallback chain
    pub provider: Option<String>,
}

/// Query parameters for page extraction
#[derive(Debug, Deserialize)]
pub struct FetchParams {
    pub url: Option<String>,
}

/// Extracted page
#[derive(Debug, Serialize)]
pub struct FetchResponse {
    pub url: String,
    pub final_url: String,
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Registered providers and the fallback chain
#[derive(Debug, Serialize)]
pub struct EnginesResponse {
    pub instance_name: String,
    pub fallback_chain: Vec<String>,
    pub available: Vec<EngineInfo>,
}

/// One registered engine
#[derive(Debug, Serialize)]
pub struct EngineInfo {
    pub name: String,
    pub base_url: String,
    #[serde(flatten)]
    pub about: EngineAbout,
}

fn bad_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message.into() })),
    )
        .into_response()
}

/// Search handler
pub async fn search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Response {
    let query = match params.q {
        Some(q) if !q.trim().is_empty() => q,
        _ => return bad_request("missing query parameter q"),
    };

    let Some(provider) = params.provider.filter(|p| !p.trim().is_empty()) else {
        info!("Searching fallback chain for {:?}", query);
        return Json(state.search.search(&query).await).into_response();
    };

    let search = &state.settings.search;
    let config = SearchConfig {
        provider: provider.trim().to_string(),
        max_results: search.max_results,
        timeout: search.timeout,
        proxy: search.proxy.clone(),
    };

    info!("Searching {} for {:?}", config.provider, query);
    match state.search.search_provider(&config, &query).await {
        Ok(response) => Json(response).into_response(),
        Err(e @ SearchError::UnsupportedProvider(_)) => bad_request(e.to_string()),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

/// Page extraction handler; failures are reported in the body
pub async fn fetch(State(state): State<AppState>, Query(params): Query<FetchParams>) -> Response {
    let url = match params.url {
        Some(url) if !url.trim().is_empty() => url.trim().to_string(),
        _ => return bad_request("missing query parameter url"),
    };

    let response = match state.search.fetch_page(&url).await {
        Ok(page) => FetchResponse {
            url: page.url,
            final_url: page.final_url,
            title: page.title,
            content: page.content,
            error: None,
        },
        Err(e) => FetchResponse {
            url: url.clone(),
            final_url: String::new(),
            title: String::new(),
            content: String::new(),
            error: Some(e.to_string()),
        },
    };

    Json(response).into_response()
}

/// Provider listing handler
pub async fn engines(State(state): State<AppState>) -> impl IntoResponse {
    let registry = state.search.registry();
    let available = registry
        .names()
        .into_iter()
        .map(|name| EngineInfo {
            name: name.to_string(),
            base_url: registry
                .default_config(name)
                .map(|c| c.base_url.clone())
                .unwrap_or_default(),
            about: registry.about(name).unwrap_or_default(),
        })
        .collect();

    Json(EnginesResponse {
        instance_name: state.instance_name().to_string(),
        fallback_chain: state.search.providers().to_vec(),
        available,
    })
}

/// Health check handler
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION
    }))
}
