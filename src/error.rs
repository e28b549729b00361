// src/error.rs
// =============================================================================
// Error types for the crawler.
//
// There are two very different kinds of failure:
// - CrawlError: something is wrong with the request itself (bad seed URL,
//   zero page budget, a keyword that can't be compiled). The crawl never starts.
// - PageError: one page failed (network trouble, non-2xx status, processing
//   failure). It is recorded on that page's result and the crawl keeps going.
//
// Rust concepts:
// - thiserror: derive Display/Error implementations from attributes
// - #[source]: keeps the underlying error around for error chains
// =============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// Fatal errors, reported once before any page is fetched
#[derive(Debug, Error)]
pub enum CrawlError {
    /// The seed URL has no scheme or host
    #[error("Invalid URL: {url} ({reason})")]
    InvalidUrl { url: String, reason: String },

    /// A limit or keyword list that makes the crawl meaningless
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A keyword whose match pattern could not be compiled
    #[error("Invalid keyword '{keyword}': {source}")]
    InvalidKeyword {
        keyword: String,
        #[source]
        source: regex::Error,
    },

    /// The HTTP client could not be built (e.g. TLS backend failure)
    #[error("Failed to create HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

// Which stage of a page fetch went wrong
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Network failure, timeout or non-2xx status
    Request,
    /// The markup could not be processed
    Processing,
}

// A per-page failure. Never fatal to the crawl.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageError {
    pub kind: ErrorKind,
    pub message: String,
}

impl PageError {
    pub fn request(message: impl Into<String>) -> Self {
        PageError {
            kind: ErrorKind::Request,
            message: message.into(),
        }
    }

    pub fn processing(message: impl Into<String>) -> Self {
        PageError {
            kind: ErrorKind::Processing,
            message: message.into(),
        }
    }
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ErrorKind::Request => write!(f, "Request error: {}", self.message),
            ErrorKind::Processing => write!(f, "Processing error: {}", self.message),
        }
    }
}

impl std::error::Error for PageError {}
