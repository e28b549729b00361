// src/crawl/controller.rs
// =============================================================================
// This module implements the crawl itself, level by level (breadth-first).
//
// How it works:
// 1. Start with the seed URL as the only page of depth 0
// 2. Fetch every page of the current depth, up to N at a time
// 3. Wait for the whole level to finish
// 4. Build the next level from the links those pages returned
// 5. Repeat until max depth, max pages, or nothing left to visit
//
// Only this module touches the visited set and the frontier. Fetches run
// concurrently but just return what they found, the bookkeeping happens
// between levels on a single task.
//
// Rust concepts:
// - HashSet: To track visited URLs (O(1) lookup)
// - Streams: `buffered(n)` runs at most n fetches at once
// - Arc: to share the compiled keyword patterns
// =============================================================================

use super::fetch::{fetch_page, Fetch, HttpFetcher, PageResult, DEFAULT_TIMEOUT};
use super::summary::CrawlSummary;
use crate::error::CrawlError;
use crate::scan::{KeywordMatcher, MatchOptions};
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use url::Url;

/// Default worker-pool width
pub const DEFAULT_CONCURRENCY: usize = 5;

// Everything that describes one crawl. Not modified once the crawl starts.
#[derive(Debug, Clone)]
pub struct CrawlRequest {
    pub seed: String,
    pub keywords: Vec<String>,
    pub case_sensitive: bool,
    pub whole_word: bool,
    pub max_depth: usize,
    pub max_pages: usize,
    pub concurrency: usize,
    pub timeout: Duration,
}

impl CrawlRequest {
    pub fn new(seed: impl Into<String>, keywords: Vec<String>) -> Self {
        CrawlRequest {
            seed: seed.into(),
            keywords,
            case_sensitive: false,
            whole_word: false,
            max_depth: 1,
            max_pages: 20,
            concurrency: DEFAULT_CONCURRENCY,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            case_sensitive: self.case_sensitive,
            whole_word: self.whole_word,
        }
    }

    // Rejects requests that could never produce a useful crawl
    fn validate(&self) -> Result<(), CrawlError> {
        if self.keywords.is_empty() {
            return Err(CrawlError::InvalidRequest("no keywords given".to_string()));
        }
        if self.keywords.iter().any(|k| k.is_empty()) {
            return Err(CrawlError::InvalidRequest("keywords must not be empty".to_string()));
        }
        if self.max_pages == 0 {
            return Err(CrawlError::InvalidRequest("max pages must be at least 1".to_string()));
        }
        if self.concurrency == 0 {
            return Err(CrawlError::InvalidRequest("concurrency must be at least 1".to_string()));
        }
        Ok(())
    }
}

// Turns the user's seed into an absolute URL
//
// A missing scheme means https. The result must have a host.
//
// Examples:
//   "example.com"          -> https://example.com/
//   "http://example.com/a" -> http://example.com/a
//   "https://"             -> Err(InvalidUrl)
pub fn normalize_seed(seed: &str) -> Result<Url, CrawlError> {
    let seed = seed.trim();
    let with_scheme = if seed.starts_with("http://") || seed.starts_with("https://") {
        seed.to_string()
    } else {
        format!("https://{}", seed)
    };

    let invalid = |reason: String| CrawlError::InvalidUrl {
        url: with_scheme.clone(),
        reason,
    };

    let url = Url::parse(&with_scheme).map_err(|e| invalid(e.to_string()))?;
    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(invalid("missing host".to_string())),
    }
}

// Crawls a website over HTTP
pub async fn crawl_website(request: &CrawlRequest) -> Result<CrawlSummary, CrawlError> {
    let fetcher = HttpFetcher::new(request.timeout)?;
    crawl(request, &fetcher).await
}

// Crawls a website with any `Fetch` implementation
//
// Errors only for an invalid request; page failures end up in the summary.
pub async fn crawl<F: Fetch>(request: &CrawlRequest, fetcher: &F) -> Result<CrawlSummary, CrawlError> {
    request.validate()?;
    let seed = normalize_seed(&request.seed)?;
    let matcher = Arc::new(KeywordMatcher::new(&request.keywords, request.match_options())?);

    let max_depth = request.max_depth;
    let max_pages = request.max_pages;

    let mut visited: HashSet<String> = HashSet::new();
    let mut frontier: Vec<String> = vec![seed.to_string()];
    let mut results: Vec<PageResult> = Vec::new();

    for depth in 0..=max_depth {
        if frontier.is_empty() || visited.len() >= max_pages {
            break;
        }

        // Mark before dispatching so a URL can never be fetched twice
        let mut dispatch = Vec::new();
        for url in frontier.drain(..) {
            if visited.len() >= max_pages {
                break;
            }
            if visited.insert(url.clone()) {
                dispatch.push(url);
            }
        }

        info!(depth, pages = dispatch.len(), "crawling level");

        // Fan out, then wait for the whole level
        let fetched: Vec<_> = stream::iter(dispatch)
            .map(|url| {
                let matcher = Arc::clone(&matcher);
                async move { fetch_page(fetcher, &url, matcher, depth, max_depth).await }
            })
            .buffered(request.concurrency)
            .collect()
            .await;

        let mut slated: HashSet<String> = HashSet::new();
        let mut next = Vec::new();
        for page in fetched {
            results.push(page.result);

            if depth >= max_depth {
                continue;
            }
            for link in page.links {
                if visited.contains(&link) || slated.contains(&link) {
                    continue;
                }
                if slated.len() + visited.len() >= max_pages {
                    break;
                }
                slated.insert(link.clone());
                next.push(link);
            }
        }

        frontier = next;
    }

    info!(pages = visited.len(), "crawl finished");

    Ok(CrawlSummary::new(
        seed.to_string(),
        &request.keywords,
        results,
        visited.len(),
    ))
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why level by level?
//    - The links for depth d+1 only exist once every page of depth d is back
//    - Awaiting `collect()` on the stream is our barrier between levels
//
// 2. buffered vs buffer_unordered:
//    - Both run at most n futures at once
//    - buffered(n) hands results back in the order they were started,
//      so the report lists pages in a stable order
//
// 3. Why insert into `visited` before fetching?
//    - A failed page is still "visited", so it is never retried
//    - Two links to the same page in one level can't both be dispatched
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::super::fetch::fake::StaticSite;
    use super::*;
    use crate::error::{ErrorKind, PageError};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn request(seed: &str, keywords: &[&str], max_depth: usize, max_pages: usize) -> CrawlRequest {
        let mut request = CrawlRequest::new(seed, keywords.iter().map(|k| k.to_string()).collect());
        request.max_depth = max_depth;
        request.max_pages = max_pages;
        request
    }

    fn urls(summary: &CrawlSummary) -> Vec<&str> {
        summary.pages.iter().map(|p| p.url.as_str()).collect()
    }

    #[test]
    fn test_normalize_seed_adds_https() {
        assert_eq!(normalize_seed("example.com").unwrap().as_str(), "https://example.com/");
        assert_eq!(
            normalize_seed("http://example.com/docs").unwrap().as_str(),
            "http://example.com/docs"
        );
    }

    #[test]
    fn test_normalize_seed_rejects_missing_host() {
        assert!(matches!(normalize_seed("https://"), Err(CrawlError::InvalidUrl { .. })));
        assert!(matches!(normalize_seed(""), Err(CrawlError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_invalid_seed_fetches_nothing() {
        let site = StaticSite::new();
        let result = crawl(&request("https://", &["test"], 1, 5), &site).await;
        assert!(matches!(result, Err(CrawlError::InvalidUrl { .. })));
        assert!(site.fetched().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_limits_are_rejected() {
        let site = StaticSite::new();
        let result = crawl(&request("example.com", &["test"], 1, 0), &site).await;
        assert!(matches!(result, Err(CrawlError::InvalidRequest(_))));

        let result = crawl(&request("example.com", &[], 1, 5), &site).await;
        assert!(matches!(result, Err(CrawlError::InvalidRequest(_))));

        let mut zero_workers = request("example.com", &["test"], 1, 5);
        zero_workers.concurrency = 0;
        let result = crawl(&zero_workers, &site).await;
        assert!(matches!(result, Err(CrawlError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_depth_zero_single_page() {
        let site = StaticSite::new().page(
            "https://example.com/",
            r#"<p>a test page</p><a href="/about">About</a>"#,
        );

        let summary = crawl(&request("example.com", &["test"], 0, 1), &site).await.unwrap();

        assert_eq!(urls(&summary), vec!["https://example.com/"]);
        assert_eq!(summary.pages_visited, 1);
        assert_eq!(site.fetched(), vec!["https://example.com/"]);
    }

    #[tokio::test]
    async fn test_depth_limit() {
        let site = StaticSite::new()
            .page("https://example.com/", r#"<a href="/b">b</a>"#)
            .page("https://example.com/b", r#"<a href="/c">c</a>"#)
            .page("https://example.com/c", "<p>too deep</p>");

        let summary = crawl(&request("https://example.com/", &["deep"], 1, 20), &site)
            .await
            .unwrap();

        assert_eq!(urls(&summary), vec!["https://example.com/", "https://example.com/b"]);
        assert!(!site.fetched().contains(&"https://example.com/c".to_string()));
    }

    #[tokio::test]
    async fn test_page_cap_bounds_dispatch() {
        let links: String = (1..=6).map(|i| format!(r#"<a href="/p{}">p</a>"#, i)).collect();
        let mut site = StaticSite::new().page("https://example.com/", &links);
        for i in 1..=6 {
            site = site.page(&format!("https://example.com/p{}", i), "<p>leaf</p>");
        }

        let summary = crawl(&request("example.com", &["leaf"], 3, 3), &site).await.unwrap();

        assert_eq!(summary.pages_visited, 3);
        assert_eq!(summary.pages.len(), 3);
        assert_eq!(site.fetched().len(), 3);
    }

    #[tokio::test]
    async fn test_shared_links_fetched_once() {
        let site = StaticSite::new()
            .page("https://example.com/", r#"<a href="/a">a</a><a href="/b">b</a>"#)
            .page("https://example.com/a", r#"<a href="/shared">s</a><a href="/">home</a>"#)
            .page("https://example.com/b", r#"<a href="/shared">s</a><a href="/a">a</a>"#)
            .page("https://example.com/shared", "<p>shared</p>");

        let summary = crawl(&request("example.com", &["shared"], 3, 20), &site).await.unwrap();

        let mut fetched = site.fetched();
        fetched.sort();
        assert_eq!(
            fetched,
            vec![
                "https://example.com/",
                "https://example.com/a",
                "https://example.com/b",
                "https://example.com/shared",
            ]
        );
        assert_eq!(summary.pages_visited, 4);
    }

    #[tokio::test]
    async fn test_failed_page_recorded_and_crawl_continues() {
        let site = StaticSite::new()
            .page("https://example.com/", r#"<a href="/gone">x</a><a href="/ok">y</a>"#)
            .page("https://example.com/ok", "<p>found it</p>");

        let summary = crawl(&request("example.com", &["found"], 1, 20), &site).await.unwrap();

        let gone = summary
            .pages
            .iter()
            .find(|p| p.url == "https://example.com/gone")
            .unwrap();
        assert_eq!(gone.error().unwrap().kind, ErrorKind::Request);

        let ok = summary
            .pages
            .iter()
            .find(|p| p.url == "https://example.com/ok")
            .unwrap();
        assert_eq!(ok.matches().unwrap()["found"].count, 1);
        assert_eq!(site.fetched().len(), 3);
    }

    #[tokio::test]
    async fn test_never_leaves_the_seed_site() {
        let site = StaticSite::new()
            .page(
                "https://example.com/",
                r#"<a href="https://evil.com/">e</a>
                   <a href="http://example.com:8080/">p</a>
                   <a href="/in">i</a>
                   <a href="http://example.com/legacy">l</a>"#,
            )
            .page("https://example.com/in", "<p>inside</p>")
            .page("http://example.com/legacy", "<p>inside, but old</p>");

        let summary = crawl(&request("example.com", &["inside"], 2, 20), &site).await.unwrap();

        let fetched = site.fetched();
        for url in &fetched {
            let url = Url::parse(url).unwrap();
            assert_eq!(url.host_str(), Some("example.com"));
            assert_eq!(url.port(), None);
        }
        assert!(fetched.contains(&"http://example.com/legacy".to_string()));
        assert_eq!(summary.pages_visited, 3);
    }

    // Counts how many `get` calls are running at once
    struct SlowSite {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        links: usize,
    }

    #[async_trait]
    impl Fetch for SlowSite {
        async fn get(&self, url: &str) -> Result<String, PageError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if url == "https://example.com/" {
                Ok((1..=self.links).map(|i| format!(r#"<a href="/p{}">p</a>"#, i)).collect())
            } else {
                Ok("<p>leaf</p>".to_string())
            }
        }
    }

    #[tokio::test]
    async fn test_worker_pool_bounds_concurrent_fetches() {
        let site = SlowSite {
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            links: 30,
        };
        let req = request("example.com", &["leaf"], 1, 31);

        let summary = crawl(&req, &site).await.unwrap();

        assert_eq!(summary.pages_visited, 31);
        let peak = site.peak.load(Ordering::SeqCst);
        assert!(peak <= req.concurrency, "peak {} > {}", peak, req.concurrency);
        assert_eq!(peak, DEFAULT_CONCURRENCY);
    }

    #[tokio::test]
    async fn test_results_keep_dispatch_order_with_one_worker() {
        let site = StaticSite::new()
            .page("https://example.com/", r#"<a href="/x">x</a>"#)
            .page("https://example.com/x", "<p>x</p>");
        let mut req = request("example.com", &["x"], 1, 20);
        req.concurrency = 1;

        let summary = crawl(&req, &site).await.unwrap();

        assert_eq!(urls(&summary), vec!["https://example.com/", "https://example.com/x"]);
    }
}
