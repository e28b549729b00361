// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (to stderr, so stdout only carries results)
// 3. Crawl the website and collect keyword matches
// 4. Print the report (text or JSON), or save it to a file
// 5. Exit with proper code (0 = keywords found, 1 = nothing found, 2 = error)
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli;     // src/cli.rs - command-line parsing
mod crawl;   // src/crawl/ - the crawl loop and page fetching
mod error;   // src/error.rs - error types
mod report;  // src/report.rs - turning results into text
mod scan;    // src/scan/ - text extraction, link extraction, keyword matching

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use tracing::warn;
use tracing_subscriber::EnvFilter;

// The #[tokio::main] attribute transforms our async main into a real main function
#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging();

    let exit_code = match run(&cli).await {
        Ok(code) => code,
        Err(e) => {
            // If the crawl could not run, print one line and exit with code 2
            eprintln!("{}", fatal_message(&e, cli.use_colors()));
            2
        }
    };

    std::process::exit(exit_code);
}

// The single line printed when the crawl can't run at all
fn fatal_message(error: &anyhow::Error, color: bool) -> String {
    report::paint(&format!("Error: {:#}", error), report::Style::Error, color)
}

// Logs go to stderr; RUST_LOG overrides the default level
fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("keyword_scout=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// Returns:
//   Ok(0) = at least one keyword found
//   Ok(1) = crawl finished, no keyword found anywhere
//   Err   = the crawl could not run (main exits with 2)
async fn run(cli: &Cli) -> Result<i32> {
    let request = cli.to_request();

    if !cli.json {
        println!("Scraping {} for keywords: {}", cli.url, cli.keywords.join(", "));
        println!("Options: depth={}, max_pages={}", cli.depth, cli.max_pages);
    }

    let summary = crawl::crawl_website(&request).await?;
    let failed = summary.failed_pages();
    if failed > 0 {
        warn!(failed, "some pages could not be scanned");
    }

    let output = if cli.json {
        serde_json::to_string_pretty(&summary)?
    } else {
        report::render(&summary, cli.use_colors())
    };

    match &cli.output {
        Some(path) => {
            report::write_report(path, &output)?;
            println!("Results saved to {}", path.display());
        }
        None => println!("{}", output),
    }

    if summary.found_any() {
        Ok(0)
    } else {
        Ok(1)
    }
}
