//! HTML to markdown conversion and whitespace normalization

use crate::error::{Result, SearchError};
use htmd::options::{HeadingStyle, Options};
use htmd::{Element, HtmlToMarkdown};

/// Convert cleaned HTML to markdown with ATX headings.
///
/// Table rows become one `| a | b |` line each.
pub fn to_markdown(html: &str) -> Result<String> {
    let converter = HtmlToMarkdown::builder()
        .options(Options {
            heading_style: HeadingStyle::Atx,
            ..Default::default()
        })
        .skip_tags(vec!["script", "style", "head"])
        .add_handler(vec!["td", "th"], |cell: Element| {
            Some(format!("| {} ", cell.content.trim()))
        })
        .add_handler(vec!["tr"], |row: Element| {
            Some(format!("\n\n{} |\n\n", row.content.trim()))
        })
        .build();

    converter
        .convert(html)
        .map(|markdown| normalize_whitespace(&markdown))
        .map_err(|e| SearchError::parse("markdown", e.to_string()))
}

/// Strip surrounding whitespace from every line, collapse runs of blank
/// lines into one, and drop leading/trailing blank lines.
pub fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_blank = false;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            pending_blank = true;
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
            if pending_blank {
                out.push('\n');
            }
        }
        pending_blank = false;
        out.push_str(line);
    }

    out
}
