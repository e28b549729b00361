// src/report.rs
// =============================================================================
// Turns a crawl summary into the text we show the user.
//
// Colours are applied by `paint`, a plain function of (text, style, enabled),
// there is no global colour state. When results go to a file the escape
// sequences are stripped again with `strip_ansi`.
// =============================================================================

use crate::crawl::CrawlSummary;
use crate::scan::ContextSnippet;
use anyhow::{Context, Result};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

const RESET: &str = "\x1b[0m";

static ANSI_ESCAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1B(?:[@-Z\\-_]|\[[0-?]*[ -/]*[@-~])").expect("hardcoded regex pattern is valid")
});

// What a piece of text means, each maps to an ANSI style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Heading,
    Label,
    Url,
    Seed,
    Keyword,
    Count,
    Pages,
    Highlight,
    Error,
}

impl Style {
    fn code(self) -> &'static str {
        match self {
            Style::Heading => "\x1b[1m\x1b[95m",
            Style::Label => "\x1b[1m",
            Style::Url => "\x1b[94m\x1b[4m",
            Style::Seed => "\x1b[94m",
            Style::Keyword => "\x1b[92m",
            Style::Count => "\x1b[93m",
            Style::Pages => "\x1b[96m",
            Style::Highlight => "\x1b[91m\x1b[1m",
            Style::Error => "\x1b[91m",
        }
    }
}

// Wraps text in the escape codes for `style`, or returns it untouched
pub fn paint(text: &str, style: Style, enabled: bool) -> String {
    if enabled {
        format!("{}{}{}", style.code(), text, RESET)
    } else {
        text.to_string()
    }
}

// Removes ANSI escape sequences
pub fn strip_ansi(text: &str) -> String {
    ANSI_ESCAPE.replace_all(text, "").into_owned()
}

// Renders the whole report: summary block first, then errors and pages
pub fn render(summary: &CrawlSummary, color: bool) -> String {
    let mut lines = vec![paint("Keyword Search Summary:", Style::Heading, color)];

    for total in &summary.keywords {
        let keyword = paint(&total.keyword, Style::Keyword, color);
        if total.total > 0 {
            lines.push(format!(
                "- '{}': Found {} times across {} pages",
                keyword,
                paint(&total.total.to_string(), Style::Count, color),
                paint(&total.pages.to_string(), Style::Pages, color),
            ));
        } else {
            lines.push(format!(
                "- '{}': {} on any page",
                keyword,
                paint("Not found", Style::Error, color)
            ));
        }
    }

    lines.push(format!(
        "\nScanned {} pages from {}",
        paint(&summary.pages_visited.to_string(), Style::Pages, color),
        paint(&summary.seed, Style::Seed, color),
    ));

    let sections = render_pages(summary, color);
    if sections.is_empty() {
        lines.push(format!("\n{}", paint("No keywords found on any page.", Style::Error, color)));
        return lines.join("\n");
    }

    format!("{}\n{}", lines.join("\n"), sections.join("\n"))
}

// One block per failed page and per page with at least one match
fn render_pages(summary: &CrawlSummary, color: bool) -> Vec<String> {
    let mut sections = Vec::new();

    for page in &summary.pages {
        if let Some(error) = page.error() {
            sections.push(paint(
                &format!("\nError processing {}: {}", page.url, error),
                Style::Error,
                color,
            ));
            continue;
        }

        let Some(matches) = page.matches() else {
            continue;
        };

        let mut block = vec![format!(
            "\n{} {}",
            paint("Page:", Style::Label, color),
            paint(&page.url, Style::Url, color)
        )];
        let mut has_matches = false;

        // Keyword order follows the user's order, not the map's
        for total in &summary.keywords {
            let Some(info) = matches.get(&total.keyword) else {
                continue;
            };
            if info.count == 0 {
                continue;
            }
            has_matches = true;

            block.push(format!(
                "  {} '{}': {} occurrences",
                paint("Keyword", Style::Label, color),
                paint(&total.keyword, Style::Keyword, color),
                paint(&info.count.to_string(), Style::Count, color),
            ));

            if info.contexts.is_empty() {
                continue;
            }
            block.push("  Contexts:".to_string());
            for (i, context) in info.contexts.iter().enumerate() {
                block.push(format!("    {}. {}", i + 1, render_context(context, color)));
            }
            if info.count > info.contexts.len() {
                let remaining = info.count - info.contexts.len();
                block.push(format!(
                    "    ... and {} more occurrences",
                    paint(&remaining.to_string(), Style::Count, color)
                ));
            }
        }

        if has_matches {
            sections.push(block.join("\n"));
        }
    }

    sections
}

// "...beforeMATCHafter..." with the match highlighted
//
// Parts are concatenated as-is, so a match inside a word reads as that word.
fn render_context(context: &ContextSnippet, color: bool) -> String {
    format!(
        "...{}{}{}...",
        context.before,
        paint(&context.matched, Style::Highlight, color),
        context.after
    )
}

// Writes the report to a file with all escape sequences removed
pub fn write_report(path: &Path, report: &str) -> Result<()> {
    std::fs::write(path, strip_ansi(report))
        .with_context(|| format!("Failed to write results to {}", path.display()))
}
