// src/scan/content.rs
// =============================================================================
// This module turns a page's markup into one searchable blob of text.
//
// Keywords hide in more places than the visible text, so we gather from:
// 1. The visible text of the document
// 2. Simple text content of common block/inline elements
// 3. title/alt attributes and <meta content="...">
// 4. The bodies of <script> elements
// 5. Every data-* attribute value
//
// Sources are joined with spaces and HTML entities are decoded at the end.
// The same text may appear more than once (e.g. a <p> is both visible text
// and an element text source); the blob is for searching, not display.
// =============================================================================

use super::dom::{sole_text, Document};

// Elements whose direct text is collected a second time
const TEXT_TAGS: &[&str] = &[
    "p", "div", "span", "h1", "h2", "h3", "h4", "h5", "a", "li", "td",
];

// Extracts the aggregated text of a document
//
// Example:
//   <p title="Keyword here">x</p>  ->  "x x Keyword here"
pub fn extract_text(document: &Document) -> String {
    let visible = document.visible_text().join(" ");

    let mut element_text = String::new();
    for element in document.elements() {
        if !TEXT_TAGS.contains(&element.value().name()) {
            continue;
        }
        if let Some(text) = sole_text(element) {
            element_text.push(' ');
            element_text.push_str(text);
        }
    }

    let mut attr_text = String::new();
    for attr in ["title", "alt"] {
        for element in document.elements_with_attr(attr) {
            if let Some(value) = element.value().attr(attr) {
                attr_text.push(' ');
                attr_text.push_str(value);
            }
        }
    }
    for meta in document.elements_by_tag("meta") {
        if let Some(content) = meta.value().attr("content") {
            attr_text.push(' ');
            attr_text.push_str(content);
        }
    }

    let mut script_text = String::new();
    for script in document.elements_by_tag("script") {
        if let Some(body) = sole_text(script) {
            script_text.push(' ');
            script_text.push_str(body);
        }
    }
    for element in document.elements() {
        for (name, value) in element.value().attrs() {
            if name.starts_with("data-") {
                script_text.push(' ');
                script_text.push_str(value);
            }
        }
    }

    let combined = [visible, element_text, attr_text, script_text].join(" ");
    html_escape::decode_html_entities(&combined).into_owned()
}
