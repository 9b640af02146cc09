//! Bing search engine implementation

use super::dom::{first, first_href, missing_results, selector, selectors, snippet, text_of};
use super::traits::*;
use crate::error::Result;
use crate::network::user_agent::{accept_language, CHROME_LINUX};
use crate::network::{is_captcha_page, EngineRequest};
use crate::results::is_absolute_http;
use async_trait::async_trait;
use scraper::Html;

const SNIPPET_CHAIN: &[&str] = &[
    "div.b_caption p",
    "p.b_lineclamp2",
    "p.b_lineclamp3",
    ".b_caption",
];

/// Bing web search engine
pub struct Bing {
    config: EngineConfig,
}

impl Bing {
    pub fn new() -> Self {
        Self::with_config(Self::default_config())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn default_config() -> EngineConfig {
        EngineConfig::new("https://www.bing.com/search")
            .header("User-Agent", CHROME_LINUX)
            .header("Accept-Language", accept_language("en"))
    }

    /// Decode Bing's click-tracking URLs.
    ///
    /// Bing often returns URLs like `https://www.bing.com/ck/a?...&u=a1<base64>&...`
    /// where the real URL is base64 encoded in the `u` parameter after an `a1`
    /// prefix.
    fn decode_bing_url(url: &str) -> String {
        if !url.starts_with("https://www.bing.com/ck/a?") {
            return url.to_string();
        }

        if let Ok(parsed) = url::Url::parse(url) {
            if let Some((_, encoded)) = parsed.query_pairs().find(|(k, _)| k == "u") {
                if let Some(encoded_url) = encoded.get(2..).filter(|e| !e.is_empty()) {
                    let encoded_url = encoded_url.trim_end_matches('=');

                    if let Ok(decoded_bytes) = base64::Engine::decode(
                        &base64::engine::general_purpose::URL_SAFE_NO_PAD,
                        encoded_url,
                    ) {
                        if let Ok(decoded_url) = String::from_utf8(decoded_bytes) {
                            if is_absolute_http(&decoded_url) {
                                return decoded_url;
                            }
                        }
                    }

                    // Standard alphabet with padding restored
                    let padding = (4 - encoded_url.len() % 4) % 4;
                    let padded = format!("{}{}", encoded_url, "=".repeat(padding));
                    if let Ok(decoded_bytes) = base64::Engine::decode(
                        &base64::engine::general_purpose::STANDARD,
                        &padded,
                    ) {
                        if let Ok(decoded_url) = String::from_utf8(decoded_bytes) {
                            if is_absolute_http(&decoded_url) {
                                return decoded_url;
                            }
                        }
                    }
                }
            }
        }

        url.to_string()
    }
}

impl Default for Bing {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Engine for Bing {
    fn name(&self) -> &str {
        "bing"
    }

    fn about(&self) -> EngineAbout {
        EngineAbout::new()
            .website("https://www.bing.com")
            .query_param("q")
            .links("absolute")
    }

    fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn request(&self, query: &str, max_results: usize) -> EngineRequest {
        self.base_request(&self.config.base_url)
            .param("q", query)
            .param("count", max_results.to_string())
    }

    fn parse(&self, html: &str, max_results: usize) -> Result<Vec<ParsedHit>> {
        let document = Html::parse_document(html);

        // Results live in ol#b_results; fall back to the whole page
        let results_container = selector("#b_results")?;
        let result_selector = selector("li.b_algo")?;
        let heading = selector("h2")?;
        let heading_link = selector("h2 a[href]")?;
        let chain = selectors(SNIPPET_CHAIN)?;

        let search_area = document
            .select(&results_container)
            .next()
            .unwrap_or_else(|| document.root_element());

        let mut hits = Vec::new();
        for element in search_area.select(&result_selector) {
            if hits.len() >= max_results {
                break;
            }

            let title = match first(element, &heading) {
                Some(h2) => text_of(h2),
                None => continue,
            };
            if title.is_empty() {
                continue;
            }

            let raw_url = match first_href(element, &heading_link) {
                Some(href) if href.starts_with("http") => href,
                _ => continue,
            };
            let url = Self::decode_bing_url(&raw_url);

            let content = snippet(element, &chain, &title);
            hits.push(ParsedHit::new(title, ResultLink::Direct(url), content));
        }

        if hits.is_empty() && is_captcha_page(html) {
            return Err(missing_results(self.name(), html, "li.b_algo"));
        }

        Ok(hits)
    }
}
