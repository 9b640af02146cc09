//! Main-content detection backed by the `readability` extractor, plus the
//! plain-text helpers used when it finds nothing.

use scraper::{ElementRef, Html, Node, Selector};
use std::io::Cursor;
use tracing::debug;
use url::Url;

/// Elements whose text never counts as visible
const HIDDEN_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "head", "svg", "canvas", "iframe",
];

const BLOCK_TAGS: &[&str] = &[
    "address", "article", "blockquote", "dd", "div", "dl", "dt", "figcaption", "figure", "h1",
    "h2", "h3", "h4", "h5", "h6", "hr", "li", "main", "ol", "p", "pre", "section", "table",
    "td", "th", "tr", "ul", "br",
];

/// Run the readability scorer over `body` and return the winning subtree as
/// HTML, with relative links resolved against `base`.
///
/// Returns `None` when the extractor fails or the subtree has no visible text.
pub fn main_content(body: &str, base: &Url) -> Option<String> {
    let mut reader = Cursor::new(body.as_bytes());
    let product = match readability::extractor::extract(&mut reader, base) {
        Ok(product) => product,
        Err(e) => {
            debug!("Readability extraction failed for {}: {}", base, e);
            return None;
        }
    };

    if product.text.trim().is_empty() {
        None
    } else {
        Some(product.content)
    }
}

/// Visible text of `element`, one line per block element
pub fn visible_text(element: ElementRef) -> String {
    let mut out = String::new();
    collect_text(element, &mut out);
    out
}

/// First element matching `css`, if the selector is valid and matches
pub fn first_match<'a>(document: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    document.select(&selector).next()
}

fn collect_text(element: ElementRef, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    let name = child.value().name();
                    if HIDDEN_TAGS.contains(&name) {
                        continue;
                    }
                    let block = BLOCK_TAGS.contains(&name);
                    if block {
                        out.push('\n');
                    }
                    collect_text(child, out);
                    if block {
                        out.push('\n');
                    }
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://blog.example.com/posts/release").unwrap()
    }

    const ARTICLE: &str = r#"<html><head><title>Release</title><script>var x = 1;</script></head><body>
        <div id="nav-menu" class="menu"><a href="/">Home</a> <a href="/about">About</a></div>
        <div id="main-content" class="post-content">
          <p>The new release improves startup time, memory usage, and error messages across the board, for every platform.</p>
          <p>Upgrading is straightforward: bump the version, rebuild, and run the migration tool once, then restart.</p>
          <p>Read the <a href="/docs/upgrade">upgrade guide</a> for details, caveats, and a list of removed flags.</p>
        </div>
        <div class="sidebar"><p>Subscribe to our newsletter.</p></div>
        <footer>Copyright</footer>
    </body></html>"#;

    #[test]
    fn picks_article_over_boilerplate() {
        let html = main_content(ARTICLE, &base()).unwrap();
        assert!(html.contains("migration tool"));
        assert!(!html.contains("newsletter"));
        assert!(!html.contains("Copyright"));
        assert!(!html.contains("var x"));
    }

    #[test]
    fn relative_links_are_resolved() {
        let html = main_content(ARTICLE, &base()).unwrap();
        assert!(html.contains("https://blog.example.com/docs/upgrade"));
    }

    #[test]
    fn textless_page_yields_nothing() {
        assert!(main_content("<html><body><script>only()</script></body></html>", &base()).is_none());
    }

    #[test]
    fn visible_text_skips_scripts() {
        let document = Html::parse_document(
            "<html><body><p>one</p><script>two()</script><div>three</div></body></html>",
        );
        let body = first_match(&document, "body").unwrap();
        let text = visible_text(body);
        assert!(text.contains("one"));
        assert!(text.contains("three"));
        assert!(!text.contains("two"));
    }
}
