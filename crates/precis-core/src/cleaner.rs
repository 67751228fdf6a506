//! Best-effort extraction of plain text from HTML-embedded input.
//!
//! Blog posts arrive with markup, embedded frames, and whitespace noise. The
//! summarization model wants plain prose, so this module parses the input as
//! HTML, drops every `<iframe>` subtree outright, and joins the remaining text
//! nodes with single spaces. Malformed markup never fails: the html5ever parser
//! behind `scraper` recovers the same way a browser would.

use scraper::Html;

/// Strips markup from `input` and returns whitespace-normalized plain text.
///
/// `<iframe>` elements are removed entirely, inner text included. Plain text
/// without any markup passes through with only whitespace normalization.
/// Empty input yields an empty string.
pub fn clean_html(input: &str) -> String {
    if input.trim().is_empty() {
        return String::new();
    }

    let document = Html::parse_document(input);
    let mut parts: Vec<&str> = Vec::new();
    let mut stack = vec![document.tree.root()];

    while let Some(node) = stack.pop() {
        if let Some(element) = node.value().as_element() {
            if element.name() == "iframe" {
                continue;
            }
        }
        if let Some(text) = node.value().as_text() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                parts.push(trimmed);
            }
        }
        // Children pushed in reverse so the stack walks in document order.
        let children: Vec<_> = node.children().collect();
        for child in children.into_iter().rev() {
            stack.push(child);
        }
    }

    parts
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
