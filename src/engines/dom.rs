//! Small DOM helpers shared by the result-page parsers

use crate::error::{Result, SearchError};
use crate::network::is_captcha_page;
use scraper::{ElementRef, Selector};

/// Compile a CSS selector
pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| SearchError::parse("selector", format!("{}: {:?}", css, e)))
}

/// Compile a list of selectors tried in order
pub fn selectors(chain: &[&str]) -> Result<Vec<Selector>> {
    chain.iter().map(|css| selector(css)).collect()
}

/// Text content with whitespace runs collapsed to single spaces
pub fn text_of(element: ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// First descendant matching `selector`
pub fn first<'a>(element: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    element.select(selector).next()
}

/// `href` of the first descendant matching `selector` that has one
pub fn first_href(element: ElementRef, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .filter_map(|a| a.value().attr("href"))
        .map(str::trim)
        .find(|h| !h.is_empty())
        .map(str::to_string)
}

/// Snippet from the first selector in `chain` that yields text; otherwise
/// the candidate's text without its title.
pub fn snippet(element: ElementRef, chain: &[Selector], title: &str) -> String {
    for selector in chain {
        let text = element
            .select(selector)
            .map(text_of)
            .find(|t| !t.is_empty());
        if let Some(text) = text {
            return text;
        }
    }
    text_of(element).replacen(title, "", 1).trim().to_string()
}

/// Whether an ancestor of `element` also matches `selector`
pub fn has_matching_ancestor(element: ElementRef, selector: &Selector) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| selector.matches(&a))
}

/// Error for a page without the expected results anchor
pub fn missing_results(engine: &str, html: &str, anchor: &str) -> SearchError {
    if is_captcha_page(html) {
        SearchError::parse(engine, "bot-detection page")
    } else {
        SearchError::parse(engine, format!("results anchor {} not found", anchor))
    }
}
