//! Page content extraction
//!
//! Turns a fetched page into de-noised markdown: classify the payload, find
//! the main content, convert it to markdown, normalize whitespace. When the
//! detector finds nothing, a plain-text summary of the document is returned
//! instead.

mod article;
mod markdown;

pub use markdown::{normalize_whitespace, to_markdown};

use crate::error::{Result, SearchError};
use scraper::Html;
use tracing::debug;
use url::Url;

/// Number of leading characters inspected for an `<html` root tag
const SNIFF_CHARS: usize = 100;

/// Containers tried, in order, by the summary fallback
const SUMMARY_CONTAINERS: &[&str] = &["article", "main", "[role=\"main\"]", "body"];

/// Decide whether a payload should be treated as HTML.
///
/// A missing content type counts as HTML since many servers omit it.
pub fn is_html(body: &str, content_type: Option<&str>) -> bool {
    let content_type = content_type.map(str::trim).unwrap_or("");
    if content_type.is_empty() {
        return true;
    }
    let content_type = content_type.to_ascii_lowercase();
    if content_type.contains("text/html") || content_type.contains("application/xhtml") {
        return true;
    }
    let head: String = body.chars().take(SNIFF_CHARS).collect();
    head.to_ascii_lowercase().contains("<html")
}

/// Extract markdown from the page fetched from `page_url`, failing with
/// [`SearchError::NotHtml`] on non-HTML payloads.
///
/// Relative links are resolved against `page_url`; when it does not parse,
/// only the summary fallback runs. The result is either trimmed, non-empty
/// markdown or an empty string.
pub fn try_extract(page_url: &str, body: &str, content_type: Option<&str>) -> Result<String> {
    if !is_html(body, content_type) {
        return Err(SearchError::NotHtml {
            content_type: content_type.unwrap_or_default().to_string(),
        });
    }

    match Url::parse(page_url) {
        Ok(base) => {
            if let Some(html) = article::main_content(body, &base) {
                match to_markdown(&html) {
                    Ok(markdown) if !markdown.is_empty() => return Ok(markdown),
                    Ok(_) => debug!("Main content converted to empty markdown"),
                    Err(e) => debug!("Markdown conversion failed: {}", e),
                }
            }
        }
        Err(e) => debug!("Cannot resolve links against {:?}: {}", page_url, e),
    }

    debug!("No main content detected, using document summary");
    Ok(summary(&Html::parse_document(body)))
}

/// Extract markdown from a page; non-HTML payloads yield an empty string.
pub fn extract(page_url: &str, body: &str, content_type: Option<&str>) -> String {
    match try_extract(page_url, body, content_type) {
        Ok(markdown) => markdown,
        Err(e) => {
            debug!("Skipping extraction: {}", e);
            String::new()
        }
    }
}

/// Plain-text summary of the first non-empty content container
pub fn summary(document: &Html) -> String {
    for css in SUMMARY_CONTAINERS {
        if let Some(element) = article::first_match(document, css) {
            let text = normalize_whitespace(&article::visible_text(element));
            if !text.is_empty() {
                return text;
            }
        }
    }
    String::new()
}

/// Text of the document's `<title>` element
pub fn page_title(body: &str) -> String {
    let document = Html::parse_document(body);
    article::first_match(&document, "title")
        .map(|t| t.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_URL: &str = "https://example.com/page";
    const HELLO: &str = "<html><body><p>Hello world</p></body></html>";

    #[test]
    fn minimal_document() {
        let markdown = extract(PAGE_URL, HELLO, Some("text/html"));
        assert!(markdown.contains("Hello world"));
        assert!(!markdown.contains('<'));
        assert!(!markdown.contains('>'));
    }

    #[test]
    fn unparsable_page_url_uses_summary() {
        assert_eq!(extract("not a url", HELLO, Some("text/html")), "Hello world");
    }

    #[test]
    fn extraction_is_deterministic() {
        let page = r#"<html><body>
            <div class="content"><h2>Heading</h2><p>First paragraph, with a comma, and more words in it.</p></div>
            <div class="content"><p>Second paragraph, also with commas, equally long as the first one.</p></div>
        </body></html>"#;
        let first = extract(PAGE_URL, page, Some("text/html; charset=utf-8"));
        let second = extract(PAGE_URL, page, Some("text/html; charset=utf-8"));
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn output_has_no_blank_line_runs() {
        let page = "<html><body><div><p>One</p><br><br><br><p>Two</p>\n\n\n\n<p>   Three</p></div></body></html>";
        let markdown = extract(PAGE_URL, page, None);
        assert!(!markdown.contains("\n\n\n"));
        assert_eq!(markdown, markdown.trim());
        assert!(markdown.lines().all(|l| l == l.trim_start()));
    }

    #[test]
    fn binary_payload_yields_empty_content() {
        let body = String::from_utf8_lossy(&[0x89, 0x50, 0x4e, 0x47, 0x00, 0xff, 0x10]).into_owned();
        assert_eq!(extract(PAGE_URL, &body, Some("application/octet-stream")), "");
        assert!(matches!(
            try_extract(PAGE_URL, &body, Some("application/octet-stream")),
            Err(SearchError::NotHtml { .. })
        ));
    }

    #[test]
    fn html_is_sniffed_despite_content_type() {
        assert!(is_html("<!doctype html><html lang=\"en\">", Some("text/plain")));
        assert!(is_html("{\"a\": 1}", None));
        assert!(is_html("{\"a\": 1}", Some("")));
        assert!(!is_html("{\"a\": 1}", Some("application/json")));
        assert!(is_html("x", Some("Text/HTML; charset=UTF-8")));
    }

    #[test]
    fn summary_fallback_for_textless_detection() {
        let document = Html::parse_document(
            "<html><body><article>  Only   article\n\n\n text </article></body></html>",
        );
        assert_eq!(summary(&document), "Only   article\n\ntext");
    }

    #[test]
    fn empty_page_gives_empty_string() {
        assert_eq!(extract(PAGE_URL, "<html><body></body></html>", Some("text/html")), "");
        assert_eq!(extract(PAGE_URL, "", None), "");
    }

    #[test]
    fn title_is_extracted() {
        assert_eq!(
            page_title("<html><head><title> Docs </title></head><body></body></html>"),
            "Docs"
        );
        assert_eq!(page_title(HELLO), "");
    }
}
