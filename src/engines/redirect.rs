//! Resolution of provider link indirection: relative paths, query-embedded
//! destinations and redirector pages.

use crate::network::{EngineRequest, HttpClient};
use crate::results::is_absolute_http;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

static LOCATION_REPLACE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"location\.replace\(\s*["']([^"']+)["']\s*\)"#)
        .expect("location.replace pattern is valid")
});

static META_REFRESH_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)url\s*=\s*['"]?([^'"]+)['"]?"#).expect("meta refresh pattern is valid")
});

/// Base that relative hrefs are joined onto before their query is read
static QUERY_BASE: Lazy<Url> =
    Lazy::new(|| Url::parse("http://localhost/").expect("query base URL is valid"));

/// Resolve `href` against `base`, keeping only `http`/`https` results
pub fn absolutize(base: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    let resolved = Url::parse(base).ok()?.join(href).ok()?;
    let resolved = resolved.to_string();
    is_absolute_http(&resolved).then_some(resolved)
}

/// Extract and percent-decode the destination carried in query parameter
/// `param` of `href`.
pub fn embedded_target(href: &str, param: &str) -> Option<String> {
    let url = QUERY_BASE.join(href.trim()).ok()?;
    let (_, value) = url.query_pairs().find(|(key, _)| key == param)?;
    let value = value.trim();
    is_absolute_http(value).then(|| value.to_string())
}

/// Find the destination announced by a redirector page.
///
/// A `location.replace(...)` call in a script wins over a meta refresh tag.
/// Relative destinations are resolved against `page_url`.
pub fn destination_from_page(html: &str, page_url: &str) -> Option<String> {
    let document = Html::parse_document(html);

    let from_script = Selector::parse("script").ok().and_then(|script| {
        document.select(&script).find_map(|s| {
            let code = s.text().collect::<String>();
            LOCATION_REPLACE
                .captures(&code)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().replace("\\/", "/"))
        })
    });

    let from_meta = || {
        let meta = Selector::parse("meta[http-equiv][content]").ok()?;
        document
            .select(&meta)
            .filter(|m| {
                m.value()
                    .attr("http-equiv")
                    .map(|v| v.trim().eq_ignore_ascii_case("refresh"))
                    .unwrap_or(false)
            })
            .find_map(|m| {
                let content = m.value().attr("content")?;
                META_REFRESH_URL
                    .captures(content)
                    .and_then(|c| c.get(1))
                    .map(|u| u.as_str().trim().to_string())
            })
    };

    from_script
        .or_else(from_meta)
        .and_then(|target| absolutize(page_url, &target))
}

/// Fetch a redirector page and return the destination it announces.
///
/// HTTP-level redirects are followed by the client; a final URL that left
/// the redirector's host counts as the destination.
pub async fn follow(client: &HttpClient, request: EngineRequest) -> Option<String> {
    let wrapper = request.url.clone();
    let response = match client.execute(request).await {
        Ok(response) => response,
        Err(e) => {
            debug!("Redirector fetch failed for {}: {}", wrapper, e);
            return None;
        }
    };

    if let Some(destination) = destination_from_page(&response.text, &response.url) {
        return Some(destination);
    }

    let left_host = match (Url::parse(&wrapper), Url::parse(&response.url)) {
        (Ok(from), Ok(to)) => from.host_str() != to.host_str(),
        _ => false,
    };
    (left_host && is_absolute_http(&response.url)).then(|| response.url)
}
