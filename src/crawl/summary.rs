// src/crawl/summary.rs
// =============================================================================
// The final product of a crawl: every page result plus per-keyword totals.
//
// This is what the report printer (or the --json output) consumes.
// =============================================================================

use super::fetch::PageResult;
use serde::Serialize;

// Totals for one keyword across the whole crawl
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordTotal {
    pub keyword: String,
    /// Sum of occurrence counts over all pages
    pub total: usize,
    /// Number of pages where the keyword occurs at least once
    pub pages: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CrawlSummary {
    pub seed: String,
    /// One entry per keyword, in the order the user gave them
    pub keywords: Vec<KeywordTotal>,
    pub pages: Vec<PageResult>,
    pub pages_visited: usize,
}

impl CrawlSummary {
    pub fn new(seed: String, keywords: &[String], pages: Vec<PageResult>, pages_visited: usize) -> Self {
        let mut totals: Vec<KeywordTotal> = Vec::with_capacity(keywords.len());

        for keyword in keywords {
            // The same keyword given twice is reported once
            if totals.iter().any(|t| &t.keyword == keyword) {
                continue;
            }

            let mut total = KeywordTotal {
                keyword: keyword.clone(),
                total: 0,
                pages: 0,
            };
            for info in pages.iter().filter_map(|p| p.matches()?.get(keyword)) {
                if info.count > 0 {
                    total.total += info.count;
                    total.pages += 1;
                }
            }
            totals.push(total);
        }

        CrawlSummary {
            seed,
            keywords: totals,
            pages,
            pages_visited,
        }
    }

    /// True when at least one keyword was found somewhere
    pub fn found_any(&self) -> bool {
        self.keywords.iter().any(|t| t.total > 0)
    }

    pub fn failed_pages(&self) -> usize {
        self.pages.iter().filter(|p| p.error().is_some()).count()
    }
}
