//! DuckDuckGo search engine implementation (HTML endpoint)

use super::dom::{first, first_href, missing_results, selector, selectors, snippet, text_of};
use super::redirect::{absolutize, embedded_target};
use super::traits::*;
use crate::error::Result;
use crate::network::user_agent::{accept_language, CHROME_WINDOWS};
use crate::network::{is_captcha_page, EngineRequest};
use async_trait::async_trait;
use scraper::Html;

const SNIPPET_CHAIN: &[&str] = &["a.result__snippet", ".result__snippet"];

/// DuckDuckGo web search engine
pub struct DuckDuckGo {
    config: EngineConfig,
}

impl DuckDuckGo {
    pub fn new() -> Self {
        Self::with_config(Self::default_config())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn default_config() -> EngineConfig {
        EngineConfig::new("https://html.duckduckgo.com/html/")
            .header("User-Agent", CHROME_WINDOWS)
            .header("Accept-Language", accept_language("en"))
    }

    /// Result links go through `duckduckgo.com/l/?uddg=<destination>`
    fn resolve_link(&self, href: &str) -> Option<String> {
        if let Some(target) = embedded_target(href, "uddg") {
            return Some(target);
        }
        let url = absolutize(&self.config.base_url, href)?;
        // Skip DuckDuckGo internal links
        let internal = url::Url::parse(&url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.ends_with("duckduckgo.com")))
            .unwrap_or(true);
        (!internal).then_some(url)
    }
}

impl Default for DuckDuckGo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Engine for DuckDuckGo {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    fn about(&self) -> EngineAbout {
        EngineAbout::new()
            .website("https://duckduckgo.com")
            .query_param("q")
            .links("query-embedded")
    }

    fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn request(&self, query: &str, _max_results: usize) -> EngineRequest {
        self.base_request(&self.config.base_url).param("q", query)
    }

    fn parse(&self, html: &str, max_results: usize) -> Result<Vec<ParsedHit>> {
        let document = Html::parse_document(html);

        let result_selector = selector("div.result")?;
        let heading = selector("h2")?;
        let title_link = selector("a.result__a[href]")?;
        let chain = selectors(SNIPPET_CHAIN)?;

        let mut hits = Vec::new();
        for element in document.select(&result_selector) {
            if hits.len() >= max_results {
                break;
            }
            if element.value().classes().any(|c| c == "result--ad") {
                continue;
            }

            let title = match first(element, &heading).or_else(|| first(element, &title_link)) {
                Some(t) => text_of(t),
                None => continue,
            };
            if title.is_empty() {
                continue;
            }

            let url = match first_href(element, &title_link).and_then(|h| self.resolve_link(&h)) {
                Some(url) => url,
                None => continue,
            };

            let content = snippet(element, &chain, &title);
            hits.push(ParsedHit::new(title, ResultLink::Direct(url), content));
        }

        if hits.is_empty() && is_captcha_page(html) {
            return Err(missing_results(self.name(), html, "div.result"));
        }

        Ok(hits)
    }
}
