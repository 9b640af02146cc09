//! Sogou search engine implementation
//!
//! Sogou hides every destination behind `/link?url=...`. Resolving one
//! takes an extra fetch of the redirector page, which announces the target
//! in a script or a meta refresh tag.

use super::dom::{
    first, first_href, has_matching_ancestor, missing_results, selector, selectors, snippet,
    text_of,
};
use super::redirect::{self, absolutize, embedded_target};
use super::traits::*;
use crate::error::Result;
use crate::network::user_agent::CHROME_WINDOWS;
use crate::network::{is_captcha_page, EngineRequest, HttpClient};
use async_trait::async_trait;
use scraper::Html;
use tracing::debug;

const SNIPPET_CHAIN: &[&str] = &[".str-pd", ".ft", ".str-text-info", ".sp-text", ".text-layout"];

/// Sogou web search engine
pub struct Sogou {
    config: EngineConfig,
}

impl Sogou {
    pub fn new() -> Self {
        Self::with_config(Self::default_config())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn default_config() -> EngineConfig {
        EngineConfig::new("https://www.sogou.com/web").header("User-Agent", CHROME_WINDOWS)
    }

    fn link_for(&self, href: &str) -> Option<ResultLink> {
        let url = absolutize(&self.config.origin(), href)?;
        if href.starts_with("/link?") {
            Some(ResultLink::Wrapped(url))
        } else {
            Some(ResultLink::Direct(url))
        }
    }
}

impl Default for Sogou {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Engine for Sogou {
    fn name(&self) -> &str {
        "sogou"
    }

    fn about(&self) -> EngineAbout {
        EngineAbout::new()
            .website("https://www.sogou.com")
            .query_param("query")
            .links("wrapper-redirect")
    }

    fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn request(&self, query: &str, _max_results: usize) -> EngineRequest {
        self.base_request(&self.config.base_url).param("query", query)
    }

    fn parse(&self, html: &str, max_results: usize) -> Result<Vec<ParsedHit>> {
        let document = Html::parse_document(html);

        let candidates = selector(".vrwrap, .rb")?;
        let heading = selector("h3, .pt")?;
        let heading_link = selector("h3 a[href]")?;
        let any_link = selector("a[href]")?;
        let chain = selectors(SNIPPET_CHAIN)?;

        let mut hits = Vec::new();
        for element in document.select(&candidates) {
            if hits.len() >= max_results {
                break;
            }
            if has_matching_ancestor(element, &candidates) {
                continue;
            }

            let title = match first(element, &heading) {
                Some(h) => text_of(h),
                None => continue,
            };
            if title.is_empty() {
                continue;
            }

            let link = first_href(element, &heading_link)
                .or_else(|| first_href(element, &any_link))
                .and_then(|href| self.link_for(&href));
            let link = match link {
                Some(link) => link,
                None => {
                    debug!("sogou candidate {:?} has no usable link", title);
                    continue;
                }
            };

            let content = snippet(element, &chain, &title);
            hits.push(ParsedHit::new(title, link, content));
        }

        if hits.is_empty() && is_captcha_page(html) {
            return Err(missing_results(self.name(), html, ".vrwrap"));
        }

        Ok(hits)
    }

    async fn follow_wrapper(&self, client: &HttpClient, wrapper: &str) -> Option<String> {
        match redirect::follow(client, self.base_request(wrapper)).await {
            Some(destination) => Some(destination),
            None => embedded_target(wrapper, "url"),
        }
    }
}
