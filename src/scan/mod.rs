// src/scan/mod.rs
// =============================================================================
// This module contains everything that looks inside a single page.
//
// Submodules:
// - dom: a minimal typed view over the parsed HTML
// - content: builds the searchable text blob from a page
// - links: finds same-site links to crawl next
// - matcher: counts keywords and captures context around them
//
// None of this does any I/O, it only transforms strings.
// =============================================================================

mod content;
mod dom;
mod links;
mod matcher;

pub use content::extract_text;
pub use dom::Document;
pub use links::{extract_links, page_base};
pub use matcher::{ContextSnippet, KeywordMatcher, MatchInfo, MatchOptions};
