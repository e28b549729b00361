// src/crawl/fetch.rs
// =============================================================================
// This module fetches one page and scans it.
//
// Key functionality:
// - Makes one HTTP GET with a fixed User-Agent and a timeout
// - Treats non-2xx responses as request errors
// - Hands the markup to the scanner (text extraction, keyword matching,
//   link extraction) on tokio's blocking pool
// - Never fails: every problem becomes an error on the page's result
//
// The HTTP client sits behind the `Fetch` trait so the crawler can be driven
// by an in-memory site in tests.
//
// Rust concepts:
// - async-trait: async methods in traits
// - spawn_blocking: runs CPU-heavy parsing off the async worker threads
// - Arc: shares the compiled keyword patterns between concurrent fetches
// =============================================================================

use crate::error::{CrawlError, PageError};
use crate::scan::{extract_links, extract_text, page_base, Document, KeywordMatcher, MatchInfo};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Sent with every request
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

// The HTTP capability the crawler needs: GET a URL, return the body
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn get(&self, url: &str) -> Result<String, PageError>;
}

// The real implementation, backed by reqwest
//
// One client is shared by all fetches so connections are pooled.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, CrawlError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(HttpFetcher { client })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn get(&self, url: &str) -> Result<String, PageError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| PageError::request(describe_error(&e)))?;

        response
            .text()
            .await
            .map_err(|e| PageError::request(describe_error(&e)))
    }
}

// Turns a reqwest error into a short, human-readable message
//
// reqwest errors can happen for many reasons:
// - Network timeout
// - Non-2xx status (from error_for_status)
// - Too many redirects
// - DNS or connection failure
fn describe_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "Request timed out".to_string()
    } else if let Some(status) = error.status() {
        format!("HTTP {}", status)
    } else if error.is_redirect() {
        "Too many redirects".to_string()
    } else if error.is_connect() {
        format!("Connection failed: {}", error)
    } else {
        error.to_string()
    }
}

// What a fetch produced for one URL
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageOutcome {
    /// keyword -> what was found; keywords not found are absent
    Matches(BTreeMap<String, MatchInfo>),
    Error(PageError),
}

// The result for a single fetched URL
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageResult {
    pub url: String,
    #[serde(flatten)]
    pub outcome: PageOutcome,
}

impl PageResult {
    pub fn matches(&self) -> Option<&BTreeMap<String, MatchInfo>> {
        match &self.outcome {
            PageOutcome::Matches(matches) => Some(matches),
            PageOutcome::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&PageError> {
        match &self.outcome {
            PageOutcome::Error(error) => Some(error),
            PageOutcome::Matches(_) => None,
        }
    }
}

// A page result plus the links to consider for the next level
#[derive(Debug)]
pub struct FetchedPage {
    pub result: PageResult,
    pub links: Vec<String>,
}

impl FetchedPage {
    fn failed(url: &str, error: PageError) -> Self {
        warn!(%url, %error, "page failed");
        FetchedPage {
            result: PageResult {
                url: url.to_string(),
                outcome: PageOutcome::Error(error),
            },
            links: Vec::new(),
        }
    }
}

// Fetches and scans one page
//
// Links are only extracted when `depth < max_depth`; deeper pages are never
// followed, so their links are not worth parsing.
pub async fn fetch_page<F: Fetch>(
    fetcher: &F,
    url: &str,
    matcher: Arc<KeywordMatcher>,
    depth: usize,
    max_depth: usize,
) -> FetchedPage {
    debug!(%url, depth, "fetching page");

    let markup = match fetcher.get(url).await {
        Ok(markup) => markup,
        Err(error) => return FetchedPage::failed(url, error),
    };

    let page_url = url.to_string();
    let follow_links = depth < max_depth;
    let scanned =
        tokio::task::spawn_blocking(move || scan_markup(&page_url, &markup, &matcher, follow_links))
            .await;

    match scanned {
        Ok(Ok((matches, links))) => {
            debug!(%url, keywords = matches.len(), links = links.len(), "page scanned");
            FetchedPage {
                result: PageResult {
                    url: url.to_string(),
                    outcome: PageOutcome::Matches(matches),
                },
                links,
            }
        }
        Ok(Err(error)) => FetchedPage::failed(url, error),
        Err(join_error) => FetchedPage::failed(url, PageError::processing(join_error.to_string())),
    }
}

// The synchronous part of a fetch: parse, extract, match
//
// `scraper::Html` is not Send, so the document lives and dies in here.
fn scan_markup(
    url: &str,
    markup: &str,
    matcher: &KeywordMatcher,
    follow_links: bool,
) -> Result<(BTreeMap<String, MatchInfo>, Vec<String>), PageError> {
    let document = Document::parse(markup);
    let text = extract_text(&document);
    let matches = matcher.scan(&text, markup);

    let links = if follow_links {
        let page = Url::parse(url)
            .map_err(|e| PageError::processing(format!("invalid page URL '{}': {}", url, e)))?;
        extract_links(&document, &page_base(&page))
    } else {
        Vec::new()
    };

    Ok((matches, links))
}
