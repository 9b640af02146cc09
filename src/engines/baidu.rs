//! Baidu search engine implementation

use super::dom::{first, first_href, missing_results, selector, selectors, snippet, text_of};
use super::redirect::{absolutize, embedded_target};
use super::traits::*;
use crate::error::Result;
use crate::network::user_agent::{accept_language, CHROME_LINUX};
use crate::network::EngineRequest;
use async_trait::async_trait;
use scraper::Html;
use tracing::debug;

const SNIPPET_CHAIN: &[&str] = &[
    ".c-abstract",
    "[class*='content-right']",
    ".c-span-last",
    ".c-color-text",
];

/// Baidu web search engine
pub struct Baidu {
    config: EngineConfig,
}

impl Baidu {
    pub fn new() -> Self {
        Self::with_config(Self::default_config())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn default_config() -> EngineConfig {
        EngineConfig::new("https://www.baidu.com/s")
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8",
            )
            .header("Content-Type", "text/html; charset=utf-8")
            .header("User-Agent", CHROME_LINUX)
            .header("Referer", "https://www.baidu.com/")
            .header("Accept-Language", accept_language("zh"))
    }

    /// Baidu links are site-relative or point at its own `/s?word=` search
    /// page with the destination in `url=`.
    fn resolve_link(&self, href: &str) -> Option<String> {
        if href.contains("/s?word=") {
            if let Some(target) = embedded_target(href, "url") {
                return Some(target);
            }
        }
        absolutize(&self.config.origin(), href)
    }
}

impl Default for Baidu {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Engine for Baidu {
    fn name(&self) -> &str {
        "baidu"
    }

    fn about(&self) -> EngineAbout {
        EngineAbout::new()
            .website("https://www.baidu.com")
            .query_param("wd")
            .links("relative")
    }

    fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn request(&self, query: &str, max_results: usize) -> EngineRequest {
        self.base_request(&self.config.base_url)
            .param("wd", query)
            .param("ie", "utf-8")
            .param("tn", "baidu")
            .param("rn", max_results.to_string())
    }

    fn parse(&self, html: &str, max_results: usize) -> Result<Vec<ParsedHit>> {
        let document = Html::parse_document(html);

        let content_left = selector("div#content_left")?;
        let candidates = selector("div#content_left > .c-container")?;
        let heading = selector("h3")?;
        let heading_link = selector("h3 a[href]")?;
        let chain = selectors(SNIPPET_CHAIN)?;

        if document.select(&content_left).next().is_none() {
            return Err(missing_results(self.name(), html, "div#content_left"));
        }

        let mut hits = Vec::new();
        for element in document.select(&candidates) {
            if hits.len() >= max_results {
                break;
            }

            let title = match first(element, &heading) {
                Some(h3) => text_of(h3),
                None => continue,
            };
            if title.is_empty() {
                continue;
            }

            let url = match first_href(element, &heading_link).and_then(|h| self.resolve_link(&h)) {
                Some(url) => url,
                None => {
                    debug!("baidu candidate {:?} has no usable link", title);
                    continue;
                }
            };

            let content = snippet(element, &chain, &title);
            hits.push(ParsedHit::new(title, ResultLink::Direct(url), content));
        }

        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body>
        <div id="content_left">
            <div class="result c-container" id="1">
                <h3 class="t"><a href="http://www.baidu.com/link?url=AAA">Rust 程序设计语言</a></h3>
                <div class="c-abstract">一门赋予每个人构建可靠且高效软件能力的语言。</div>
            </div>
            <div class="c-container">
                <h3><a href="/s?word=rust&amp;url=https%3A%2F%2Fdoc.rust-lang.org%2Fbook%2F">The Book</a></h3>
                <div class="content-right_8Zs40"><span>Learn Rust</span></div>
            </div>
            <div class="c-container">
                <h3><a href="/link?url=BBB">Relative</a></h3>
                <span class="c-color-text">colored text</span>
            </div>
            <div class="c-container"><p>no heading here</p></div>
            <div class="other"><div class="c-container"><h3><a href="/nested">Nested</a></h3></div></div>
        </div>
    </body></html>"#;

    #[test]
    fn test_baidu_request() {
        let baidu = Baidu::new();
        let request = baidu.request("rust 教程", 5);

        assert_eq!(request.url, "https://www.baidu.com/s");
        assert!(request.params.contains(&("wd".to_string(), "rust 教程".to_string())));
        assert!(request.params.contains(&("rn".to_string(), "5".to_string())));
        assert_eq!(request.headers["Referer"], "https://www.baidu.com/");
        assert_eq!(request.headers["User-Agent"], CHROME_LINUX);
    }

    #[test]
    fn test_baidu_parse() {
        let hits = Baidu::new().parse(PAGE, 10).unwrap();
        assert_eq!(hits.len(), 3);

        assert_eq!(hits[0].title, "Rust 程序设计语言");
        assert_eq!(
            hits[0].link,
            ResultLink::Direct("http://www.baidu.com/link?url=AAA".into())
        );
        assert!(hits[0].snippet.contains("可靠且高效"));

        assert_eq!(
            hits[1].link,
            ResultLink::Direct("https://doc.rust-lang.org/book/".into())
        );
        assert_eq!(hits[1].snippet, "Learn Rust");

        assert_eq!(
            hits[2].link,
            ResultLink::Direct("https://www.baidu.com/link?url=BBB".into())
        );
        assert_eq!(hits[2].snippet, "colored text");
    }

    #[test]
    fn test_baidu_relative_links_follow_base_url() {
        let mut config = Baidu::default_config();
        config.base_url = "http://127.0.0.1:4000/s".into();
        let hits = Baidu::with_config(config).parse(PAGE, 10).unwrap();
        assert_eq!(
            hits[2].link,
            ResultLink::Direct("http://127.0.0.1:4000/link?url=BBB".into())
        );
    }

    #[test]
    fn test_baidu_cap() {
        let hits = Baidu::new().parse(PAGE, 1).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Rust 程序设计语言");
    }

    #[test]
    fn test_baidu_missing_anchor() {
        let err = Baidu::new()
            .parse("<html><body><p>nothing</p></body></html>", 10)
            .unwrap_err();
        assert!(err.to_string().contains("content_left"));

        let err = Baidu::new()
            .parse("<html><title>百度安全验证</title><body></body></html>", 10)
            .unwrap_err();
        assert!(err.to_string().contains("bot-detection"));
    }

    #[test]
    fn test_baidu_empty_results_page() {
        let hits = Baidu::new()
            .parse(r#"<div id="content_left"></div>"#, 10)
            .unwrap();
        assert!(hits.is_empty());
    }
}
