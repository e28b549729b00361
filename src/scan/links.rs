// src/scan/links.rs
// =============================================================================
// This module extracts crawlable links from a parsed HTML page.
//
// We use the `url` crate to:
// - Resolve relative URLs to absolute URLs
// - Compare the network location (host + port) of two URLs
//
// Only links that stay on the same site are returned, the crawler never
// leaves the seed's domain.
// =============================================================================

use super::dom::Document;
use std::collections::HashSet;
use url::Url;

// hrefs starting with these never point at a crawlable page
const SKIPPED_PREFIXES: &[&str] = &["javascript:", "#", "mailto:", "tel:"];

// Extracts all same-site links from a document
//
// Parameters:
//   document: the parsed page
//   base: the URL relative links are resolved against
//
// Returns: distinct absolute URLs sharing `base`'s host and port.
// The order is not meaningful.
//
// Example:
//   <a href="#">, <a href="mailto:x@y.com">, <a href="/about">
//   base = "https://example.com"
//   result = ["https://example.com/about"]
pub fn extract_links(document: &Document, base: &Url) -> Vec<String> {
    let mut links = HashSet::new();

    for anchor in document.elements_by_tag("a") {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if let Some(url) = resolve_link(base, href) {
            if same_site(base, &url) {
                links.insert(url.to_string());
            }
        }
    }

    links.into_iter().collect()
}

// Resolves a link (possibly relative) to an absolute URL
//
// Returns None for empty hrefs, anchors, special protocols and anything
// `url` refuses to join.
fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    if href.is_empty() || SKIPPED_PREFIXES.iter().any(|prefix| href.starts_with(prefix)) {
        return None;
    }

    base.join(href).ok()
}

// True when both URLs share a network location (host and explicit port)
//
// The scheme is not part of the network location, so http://example.com and
// https://example.com are the same site. `url` drops default ports while
// parsing, so https://example.com:443 has no explicit port either.
pub fn same_site(a: &Url, b: &Url) -> bool {
    a.host_str() == b.host_str() && a.port() == b.port()
}

// The origin of a page (scheme://host[:port]/), which links are resolved against
pub fn page_base(page_url: &Url) -> Url {
    let mut base = page_url.clone();
    base.set_path("/");
    base.set_query(None);
    base.set_fragment(None);
    base
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links_of(markup: &str, base: &str) -> Vec<String> {
        let mut links = extract_links(&Document::parse(markup), &Url::parse(base).unwrap());
        links.sort();
        links
    }

    #[test]
    fn test_only_crawlable_link_survives() {
        let links = links_of(
            r##"<a href="#">Top</a>
                <a href="mailto:x@y.com">Mail</a>
                <a href="/about">About</a>"##,
            "https://example.com",
        );
        assert_eq!(links, vec!["https://example.com/about"]);
    }

    #[test]
    fn test_skip_javascript_tel_and_empty() {
        let links = links_of(
            r#"<a href="javascript:void(0)">x</a><a href="tel:123">y</a><a href="">z</a><a>no href</a>"#,
            "https://example.com",
        );
        assert!(links.is_empty());
    }

    #[test]
    fn test_skip_other_domains() {
        let links = links_of(
            r#"<a href="https://www.rust-lang.org">Rust</a><a href="https://example.com/docs">Docs</a>"#,
            "https://example.com",
        );
        assert_eq!(links, vec!["https://example.com/docs"]);
    }

    #[test]
    fn test_port_is_part_of_the_site() {
        let links = links_of(
            r#"<a href="https://example.com:8443/admin">A</a><a href="https://example.com:443/home">B</a>"#,
            "https://example.com",
        );
        assert_eq!(links, vec!["https://example.com/home"]);
    }

    #[test]
    fn test_scheme_is_not_part_of_the_site() {
        let links = links_of(
            r#"<a href="http://example.com/legacy">Old</a><a href="http://example.com:8080/alt">Alt</a>"#,
            "https://example.com",
        );
        assert_eq!(links, vec!["http://example.com/legacy"]);
    }

    #[test]
    fn test_duplicates_collapse() {
        let links = links_of(
            r#"<a href="/docs">Docs</a><a href="https://example.com/docs">Docs again</a><a href="docs">Relative</a>"#,
            "https://example.com",
        );
        assert_eq!(links, vec!["https://example.com/docs"]);
    }

    #[test]
    fn test_page_base_drops_path_and_query() {
        let page = Url::parse("https://example.com:8080/blog/post?id=3#comments").unwrap();
        assert_eq!(page_base(&page).as_str(), "https://example.com:8080/");
    }

    #[test]
    fn test_relative_links_resolve_against_origin() {
        let page = Url::parse("https://example.com/blog/post").unwrap();
        let links = links_of(r#"<a href="next">Next</a>"#, page_base(&page).as_str());
        assert_eq!(links, vec!["https://example.com/next"]);
    }
}
