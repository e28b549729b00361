// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// clap is a popular Rust library for parsing command-line arguments.
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
// =============================================================================

use crate::crawl::{CrawlRequest, DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
#[derive(Parser, Debug)]
#[command(
    name = "keyword-scout",
    version,
    about = "Crawl a website and report where your keywords appear",
    long_about = "keyword-scout crawls a website breadth-first, staying on the same domain, \
                  and reports how often each keyword occurs on every page along with the \
                  text around each match."
)]
pub struct Cli {
    /// The URL of the website to scan (https:// is assumed when no scheme is given)
    pub url: String,

    /// Keywords to search for
    #[arg(required = true, num_args = 1..)]
    pub keywords: Vec<String>,

    /// Output file to save results (colors are stripped)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Enable case-sensitive matching
    #[arg(short, long)]
    pub case_sensitive: bool,

    /// Match whole words only
    #[arg(short, long)]
    pub whole_word: bool,

    /// Crawl depth: 0 = only the starting page, 1 = plus the pages it links to, ...
    #[arg(short, long, default_value_t = 1)]
    pub depth: usize,

    /// Maximum pages to scan
    #[arg(short = 'p', long, default_value_t = 20)]
    pub max_pages: usize,

    /// Disable colorized output
    #[arg(short, long)]
    pub no_color: bool,

    /// Output results in JSON format instead of text
    #[arg(long)]
    pub json: bool,

    /// How many pages to fetch at the same time
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout: u64,
}

impl Cli {
    // Colors only make sense on a terminal
    pub fn use_colors(&self) -> bool {
        !self.no_color && self.output.is_none() && !self.json
    }

    pub fn to_request(&self) -> CrawlRequest {
        let mut request = CrawlRequest::new(self.url.clone(), self.keywords.clone());
        request.case_sensitive = self.case_sensitive;
        request.whole_word = self.whole_word;
        request.max_depth = self.depth;
        request.max_pages = self.max_pages;
        request.concurrency = self.concurrency;
        request.timeout = Duration::from_secs(self.timeout);
        request
    }
}
