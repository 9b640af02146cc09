//! Google search engine implementation

use super::dom::{
    first, first_href, has_matching_ancestor, missing_results, selector, selectors, snippet,
    text_of,
};
use super::redirect::{absolutize, embedded_target};
use super::traits::*;
use crate::error::Result;
use crate::network::user_agent::{accept_language, CHROME_WINDOWS};
use crate::network::{is_captcha_page, EngineRequest};
use async_trait::async_trait;
use scraper::Html;
use url::Url;

const SNIPPET_CHAIN: &[&str] = &["div.VwiC3b", "span.aCOpRe", "div[data-sncf]"];

/// Google web search engine
pub struct Google {
    config: EngineConfig,
}

impl Google {
    pub fn new() -> Self {
        Self::with_config(Self::default_config())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn default_config() -> EngineConfig {
        EngineConfig::new("https://www.google.com/search")
            .header("User-Agent", CHROME_WINDOWS)
            .header("Accept-Language", accept_language("en"))
    }

    /// Google wraps destinations as `/url?q=<destination>&sa=...`, either
    /// site-relative or on an absolute `google.*` host.
    fn resolve_link(&self, href: &str) -> Option<String> {
        if href.starts_with("/url?") {
            return embedded_target(href, "q");
        }
        if !href.starts_with("http") {
            return None;
        }
        let absolute = absolutize(&self.config.origin(), href)?;
        if is_redirector(&absolute) {
            return embedded_target(&absolute, "q");
        }
        Some(absolute)
    }
}

fn is_redirector(url: &str) -> bool {
    Url::parse(url)
        .map(|u| {
            u.path() == "/url"
                && u.host_str()
                    .map(|h| h.split('.').any(|label| label == "google"))
                    .unwrap_or(false)
        })
        .unwrap_or(false)
}

impl Default for Google {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Engine for Google {
    fn name(&self) -> &str {
        "google"
    }

    fn about(&self) -> EngineAbout {
        EngineAbout::new()
            .website("https://www.google.com")
            .query_param("q")
            .links("query-embedded")
    }

    fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn request(&self, query: &str, max_results: usize) -> EngineRequest {
        self.base_request(&self.config.base_url)
            .param("q", query)
            .param("num", max_results.to_string())
            .param("hl", "en")
    }

    fn parse(&self, html: &str, max_results: usize) -> Result<Vec<ParsedHit>> {
        let document = Html::parse_document(html);

        let result_selector = selector("div.g")?;
        let heading = selector("h3")?;
        let link = selector("a[href]")?;
        let chain = selectors(SNIPPET_CHAIN)?;

        let mut hits = Vec::new();
        for element in document.select(&result_selector) {
            if hits.len() >= max_results {
                break;
            }
            // Result blocks nest, e.g. `div.g > div.g.tF2Cxc`
            if has_matching_ancestor(element, &result_selector) {
                continue;
            }

            let title = match first(element, &heading) {
                Some(h3) => text_of(h3),
                None => continue,
            };
            if title.is_empty() {
                continue;
            }

            let url = match first_href(element, &link).and_then(|h| self.resolve_link(&h)) {
                Some(url) => url,
                None => continue,
            };

            let content = snippet(element, &chain, &title);
            hits.push(ParsedHit::new(title, ResultLink::Direct(url), content));
        }

        if hits.is_empty() && is_captcha_page(html) {
            return Err(missing_results(self.name(), html, "div.g"));
        }

        Ok(hits)
    }
}
