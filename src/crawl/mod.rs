// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Breadth-first crawling, one depth level at a time
// - Same-site restriction (doesn't crawl external sites)
// - Depth and page-count limits
// - Bounded number of concurrent fetches
//
// Submodules:
// - controller: the level-by-level crawl loop
// - fetch: fetching and scanning a single page
// - summary: per-keyword totals over all pages
// =============================================================================

mod controller;
mod fetch;
mod summary;

pub use controller::{crawl_website, CrawlRequest, DEFAULT_CONCURRENCY};
pub use fetch::DEFAULT_TIMEOUT;
pub use summary::CrawlSummary;

#[cfg(test)]
pub use fetch::{PageOutcome, PageResult};
