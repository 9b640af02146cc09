//! End-to-end tests of the fallback chain, redirect resolution and result
//! enrichment against mock provider and page hosts.

use serde_json::json;
use std::time::Duration;
use websearch_rs::config::{EngineSettings, Settings};
use websearch_rs::{SearchConfig, WebSearch};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HTML: &str = "text/html; charset=utf-8";

fn settings_for(providers: &[(&str, String)]) -> Settings {
    let mut settings = Settings::default();
    settings.search.providers = providers.iter().map(|(name, _)| name.to_string()).collect();
    settings.search.fetch_content = false;
    settings.engines = providers
        .iter()
        .map(|(name, base_url)| EngineSettings {
            name: name.to_string(),
            base_url: Some(base_url.clone()),
            ..Default::default()
        })
        .collect();
    settings
}

fn html(status: u16, body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_raw(body.into(), HTML)
}

fn bing_page(results: &[(&str, &str, &str)]) -> String {
    let items: String = results
        .iter()
        .map(|(title, url, snippet)| {
            format!(
                r#"<li class="b_algo"><h2><a href="{url}">{title}</a></h2><div class="b_caption"><p>{snippet}</p></div></li>"#
            )
        })
        .collect();
    format!(r#"<html><body><ol id="b_results">{items}</ol></body></html>"#)
}

fn baidu_page(count: usize) -> String {
    let items: String = (0..count)
        .map(|i| {
            format!(
                r#"<div class="c-container"><h3><a href="https://example.com/{i}">Result {i}</a></h3><div class="c-abstract">Abstract {i}</div></div>"#
            )
        })
        .collect();
    format!(r#"<html><body><div id="content_left">{items}</div></body></html>"#)
}

const EMPTY_BAIDU: &str = r#"<html><body><div id="content_left"></div></body></html>"#;
const EMPTY_SOGOU: &str = r#"<html><body><div class="results"></div></body></html>"#;

#[tokio::test]
async fn test_fallback_returns_first_non_empty_provider() {
    let baidu = MockServer::start().await;
    let sogou = MockServer::start().await;
    let bing = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/s"))
        .and(query_param("wd", "rust"))
        .respond_with(html(200, EMPTY_BAIDU))
        .expect(1)
        .mount(&baidu)
        .await;
    Mock::given(method("GET"))
        .and(path("/web"))
        .and(query_param("query", "rust"))
        .respond_with(html(200, EMPTY_SOGOU))
        .expect(1)
        .mount(&sogou)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "rust"))
        .respond_with(html(
            200,
            bing_page(&[
                ("Rust", "https://www.rust-lang.org/", "A language"),
                ("Crates", "https://crates.io/", "Registry"),
            ]),
        ))
        .expect(1)
        .mount(&bing)
        .await;

    let settings = settings_for(&[
        ("baidu", format!("{}/s", baidu.uri())),
        ("sogou", format!("{}/web", sogou.uri())),
        ("bing", format!("{}/search", bing.uri())),
    ]);
    let search = WebSearch::from_settings(&settings).unwrap();

    let response = search.search("rust").await;

    assert!(response.error.is_none());
    assert_eq!(response.len(), 2);
    assert_eq!(response.results[0].title, "Rust");
    assert_eq!(response.results[0].url, "https://www.rust-lang.org/");
    assert_eq!(response.results[0].content, "A language");
    assert_eq!(response.results[1].url, "https://crates.io/");
    assert_eq!(response.metadata_value("provider"), Some(&json!("bing")));
    assert_eq!(
        response.metadata_value("attempted"),
        Some(&json!(["baidu", "sogou", "bing"]))
    );
}

#[tokio::test]
async fn test_first_non_empty_provider_stops_the_chain() {
    let baidu = MockServer::start().await;
    let bing = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/s"))
        .respond_with(html(200, baidu_page(2)))
        .mount(&baidu)
        .await;
    Mock::given(method("GET"))
        .respond_with(html(200, bing_page(&[])))
        .expect(0)
        .mount(&bing)
        .await;

    let settings = settings_for(&[
        ("baidu", format!("{}/s", baidu.uri())),
        ("bing", format!("{}/search", bing.uri())),
    ]);
    let response = WebSearch::from_settings(&settings).unwrap().search("rust").await;

    assert_eq!(response.len(), 2);
    assert_eq!(response.metadata_value("provider"), Some(&json!("baidu")));
}

#[tokio::test]
async fn test_timeout_moves_to_next_provider() {
    let baidu = MockServer::start().await;
    let sogou = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/s"))
        .respond_with(html(200, baidu_page(3)).set_delay(Duration::from_secs(3)))
        .mount(&baidu)
        .await;
    Mock::given(method("GET"))
        .and(path("/web"))
        .respond_with(html(
            200,
            r#"<div class="vrwrap"><h3><a href="https://docs.rs/">Docs.rs</a></h3><p class="str-pd">Docs</p></div>"#,
        ))
        .mount(&sogou)
        .await;

    let mut settings = settings_for(&[
        ("baidu", format!("{}/s", baidu.uri())),
        ("sogou", format!("{}/web", sogou.uri())),
    ]);
    settings.search.timeout = Some(0.5);
    let response = WebSearch::from_settings(&settings).unwrap().search("rust").await;

    assert!(response.error.is_none());
    assert_eq!(response.len(), 1);
    assert_eq!(response.results[0].url, "https://docs.rs/");
    assert_eq!(response.metadata_value("provider"), Some(&json!("sogou")));
}

#[tokio::test]
async fn test_sogou_wrapper_links_are_resolved() {
    let sogou = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/web"))
        .respond_with(html(
            200,
            r#"<html><body>
                <div class="vrwrap"><h3><a href="/link?url=abc123">Rust</a></h3><p class="str-pd">Rust site</p></div>
                <div class="vrwrap"><h3><a href="/link?url=def456">Book</a></h3><p class="str-pd">The book</p></div>
            </body></html>"#,
        ))
        .mount(&sogou)
        .await;
    Mock::given(method("GET"))
        .and(path("/link"))
        .and(query_param("url", "abc123"))
        .respond_with(html(
            200,
            r#"<meta http-equiv="refresh" content="0;URL='https://meta.example.com/'"><script>window.location.replace("https://www.rust-lang.org/")</script>"#,
        ))
        .mount(&sogou)
        .await;
    Mock::given(method("GET"))
        .and(path("/link"))
        .and(query_param("url", "def456"))
        .respond_with(html(
            200,
            r#"<meta http-equiv="refresh" content="0;URL='https://doc.rust-lang.org/book/'">"#,
        ))
        .mount(&sogou)
        .await;

    let settings = settings_for(&[("sogou", format!("{}/web", sogou.uri()))]);
    let response = WebSearch::from_settings(&settings).unwrap().search("rust").await;

    assert_eq!(response.len(), 2);
    assert_eq!(response.results[0].url, "https://www.rust-lang.org/");
    assert_eq!(response.results[1].url, "https://doc.rust-lang.org/book/");
}

#[tokio::test]
async fn test_unresolvable_wrapper_keeps_absolute_link() {
    let sogou = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/web"))
        .respond_with(html(
            200,
            r#"<div class="rb"><h3><a href="/link?url=gone">Gone</a></h3><div class="ft">Snippet</div></div>"#,
        ))
        .mount(&sogou)
        .await;
    Mock::given(method("GET"))
        .and(path("/link"))
        .respond_with(html(404, "<html><body>not found</body></html>"))
        .mount(&sogou)
        .await;

    let settings = settings_for(&[("sogou", format!("{}/web", sogou.uri()))]);
    let response = WebSearch::from_settings(&settings).unwrap().search("rust").await;

    assert_eq!(response.len(), 1);
    assert_eq!(response.results[0].url, format!("{}/link?url=gone", sogou.uri()));
}

#[tokio::test]
async fn test_max_results_caps_redirect_resolution() {
    let sogou = MockServer::start().await;

    let items: String = (0..4)
        .map(|i| format!(r#"<div class="vrwrap"><h3><a href="/link?url=r{i}">R{i}</a></h3></div>"#))
        .collect();
    Mock::given(method("GET"))
        .and(path("/web"))
        .respond_with(html(200, format!("<html><body>{items}</body></html>")))
        .mount(&sogou)
        .await;
    Mock::given(method("GET"))
        .and(path("/link"))
        .respond_with(html(
            200,
            r#"<script>location.replace("https://example.com/")</script>"#,
        ))
        .expect(2)
        .mount(&sogou)
        .await;

    let mut settings = settings_for(&[("sogou", format!("{}/web", sogou.uri()))]);
    settings.search.max_results = 2;
    let response = WebSearch::from_settings(&settings).unwrap().search("rust").await;

    assert_eq!(response.len(), 2);
}

#[tokio::test]
async fn test_provider_cap_is_respected() {
    let baidu = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/s"))
        .and(query_param("rn", "3"))
        .respond_with(html(200, baidu_page(8)))
        .mount(&baidu)
        .await;

    let settings = settings_for(&[("baidu", format!("{}/s", baidu.uri()))]);
    let search = WebSearch::from_settings(&settings).unwrap();
    let response = search
        .search_provider(&SearchConfig::new("baidu").with_max_results(3), "rust")
        .await
        .unwrap();

    assert_eq!(response.len(), 3);
    assert_eq!(response.results[2].title, "Result 2");
    assert!(response
        .results
        .iter()
        .all(|r| !r.title.is_empty() && r.url.starts_with("https://")));
}

#[tokio::test]
async fn test_all_providers_unreachable() {
    let baidu = MockServer::start().await;
    let bing = MockServer::start().await;

    for server in [&baidu, &bing] {
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(server)
            .await;
    }

    let settings = settings_for(&[
        ("baidu", format!("{}/s", baidu.uri())),
        ("bing", format!("{}/search", bing.uri())),
    ]);
    let response = WebSearch::from_settings(&settings).unwrap().search("rust").await;

    assert!(response.is_empty());
    assert_eq!(
        response.error.as_deref(),
        Some("all providers unreachable: HTTP error: 503")
    );
}

#[tokio::test]
async fn test_no_results_is_not_an_error() {
    let baidu = MockServer::start().await;
    let bing = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&baidu)
        .await;
    Mock::given(method("GET"))
        .respond_with(html(200, "<html><body><p>unexpected layout</p></body></html>"))
        .mount(&bing)
        .await;

    let settings = settings_for(&[
        ("baidu", format!("{}/s", baidu.uri())),
        ("bing", format!("{}/search", bing.uri())),
    ]);
    let response = WebSearch::from_settings(&settings).unwrap().search("rust").await;

    assert!(response.is_empty());
    assert!(response.error.is_none());
}

#[tokio::test]
async fn test_enrichment_keeps_order_and_degrades() {
    let bing = MockServer::start().await;
    let pages = MockServer::start().await;

    let slow = format!("{}/slow", pages.uri());
    let fast = format!("{}/fast", pages.uri());
    let missing = format!("{}/missing", pages.uri());

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(html(
            200,
            bing_page(&[
                ("Slow", slow.as_str(), "slow snippet"),
                ("Fast", fast.as_str(), "fast snippet"),
                ("Missing", missing.as_str(), "missing snippet"),
            ]),
        ))
        .mount(&bing)
        .await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            html(
                200,
                r#"<html><head><title>Slow</title></head><body><nav><a href="/">Home</a></nav>
                <article><h1>Slow page</h1><p>The slow page has a long paragraph, with commas, that is worth reading.</p></article>
                </body></html>"#,
            )
            .set_delay(Duration::from_millis(400)),
        )
        .mount(&pages)
        .await;
    Mock::given(method("GET"))
        .and(path("/fast"))
        .respond_with(html(
            200,
            r#"<html><body><div class="content"><p>The fast page answers at once, with enough words in it to count.</p></div></body></html>"#,
        ))
        .mount(&pages)
        .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&pages)
        .await;

    let mut settings = settings_for(&[("bing", format!("{}/search", bing.uri()))]);
    settings.search.fetch_content = true;
    settings.search.enrich_concurrency = 3;
    let response = WebSearch::from_settings(&settings).unwrap().search("rust").await;

    let titles: Vec<_> = response.results.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, ["Slow", "Fast", "Missing"]);

    let slow = &response.results[0];
    assert!(slow.content.contains("worth reading"));
    assert!(!slow.content.contains('<'));
    assert_eq!(slow.metadata.as_ref().unwrap()["snippet"], json!("slow snippet"));

    assert!(response.results[1].content.contains("answers at once"));

    let missing = &response.results[2];
    assert_eq!(missing.content, "missing snippet");
    assert!(missing.metadata.as_ref().unwrap().contains_key("content_error"));
}

#[tokio::test]
async fn test_fetch_page_extracts_markdown() {
    let pages = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/doc"))
        .respond_with(html(
            200,
            "<html><head><title>Doc</title></head><body><p>Hello world</p></body></html>",
        ))
        .mount(&pages)
        .await;
    Mock::given(method("GET"))
        .and(path("/blob"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(vec![0u8, 159, 146, 150], "application/octet-stream"),
        )
        .mount(&pages)
        .await;

    let search = WebSearch::from_settings(&Settings::default()).unwrap();

    let page = search.fetch_page(&format!("{}/doc", pages.uri())).await.unwrap();
    assert_eq!(page.title, "Doc");
    assert!(page.content.contains("Hello world"));
    assert_eq!(page.final_url, format!("{}/doc", pages.uri()));

    assert_eq!(search.fetch_content(&format!("{}/blob", pages.uri())).await, "");
}
