// src/scan/matcher.rs
// =============================================================================
// This module finds keywords in a page and reports how often they occur.
//
// Each keyword is searched twice:
// 1. In the aggregated page text, with up to 40 characters of context on
//    each side. Only the first 10 matches are kept as context snippets.
// 2. In the raw markup, as a plain substring. This gives the occurrence count.
//
// The whole-word option only applies to the first pass: the raw count is
// purely substring based, so "cat" in "category" is counted but never
// shown as a context when whole-word matching is on.
//
// Patterns are compiled once per crawl and shared by every page.
// =============================================================================

use crate::error::CrawlError;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Characters of context captured on each side of a match
pub const CONTEXT_CHARS: usize = 40;

/// Context snippets kept per keyword per page
pub const MAX_CONTEXTS: usize = 10;

// Matching behaviour shared by all keywords
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchOptions {
    pub case_sensitive: bool,
    pub whole_word: bool,
}

// One match with its surroundings, whitespace collapsed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextSnippet {
    pub before: String,
    pub matched: String,
    pub after: String,
}

// Everything found for one keyword on one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchInfo {
    /// Occurrences in the raw markup (never fewer than `contexts.len()`)
    pub count: usize,
    pub contexts: Vec<ContextSnippet>,
}

// The two compiled passes for one keyword
#[derive(Debug)]
struct KeywordPattern {
    keyword: String,
    window: Regex,
    literal: Regex,
}

#[derive(Debug)]
pub struct KeywordMatcher {
    patterns: Vec<KeywordPattern>,
}

impl KeywordMatcher {
    /// Compiles both passes for every keyword.
    ///
    /// Fails with `CrawlError::InvalidKeyword` when a pattern exceeds the
    /// regex size limit (extremely long keywords).
    pub fn new(keywords: &[String], options: MatchOptions) -> Result<Self, CrawlError> {
        let mut patterns = Vec::with_capacity(keywords.len());

        for keyword in keywords {
            let escaped = regex::escape(keyword);
            let boundary = if options.whole_word { r"\b" } else { "" };
            let window_pattern = format!(
                "(.{{0,{n}}}){b}({kw}){b}(.{{0,{n}}})",
                n = CONTEXT_CHARS,
                b = boundary,
                kw = escaped,
            );

            let compile = |pattern: &str| {
                RegexBuilder::new(pattern)
                    .case_insensitive(!options.case_sensitive)
                    .build()
                    .map_err(|source| CrawlError::InvalidKeyword {
                        keyword: keyword.clone(),
                        source,
                    })
            };

            patterns.push(KeywordPattern {
                keyword: keyword.clone(),
                window: compile(&window_pattern)?,
                literal: compile(&escaped)?,
            });
        }

        Ok(KeywordMatcher { patterns })
    }

    /// Searches one page.
    ///
    /// Keywords found by neither pass are left out of the map entirely.
    pub fn scan(&self, text: &str, markup: &str) -> BTreeMap<String, MatchInfo> {
        let mut matches = BTreeMap::new();

        for pattern in &self.patterns {
            let contexts: Vec<ContextSnippet> = pattern
                .window
                .captures_iter(text)
                .take(MAX_CONTEXTS)
                .map(|caps| ContextSnippet {
                    before: collapse_whitespace(&caps[1]),
                    matched: collapse_whitespace(&caps[2]),
                    after: collapse_whitespace(&caps[3]),
                })
                .collect();

            let raw_count = pattern.literal.find_iter(markup).count();

            if raw_count == 0 && contexts.is_empty() {
                continue;
            }

            matches.insert(
                pattern.keyword.clone(),
                MatchInfo {
                    count: raw_count.max(contexts.len()),
                    contexts,
                },
            );
        }

        matches
    }
}

// Collapses whitespace runs into single spaces and trims both ends
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
