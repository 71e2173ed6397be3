// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Every flag has a default except --url, so the shortest invocation is:
//   page-harvester -u https://example.com
// =============================================================================

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::crawl::{
    CrawlConfig, BULK_SIZE_DEFAULT, CONCURRENCY_DEFAULT, DELAY_MS_DEFAULT, TIMEOUT_MS_DEFAULT,
};
use crate::report::ReportFormat;

#[derive(Parser, Debug)]
#[command(
    name = "page-harvester",
    version,
    about = "Crawl a website and save every page's title, description and keywords",
    long_about = "page-harvester crawls a website breadth-first from a start URL, stays on that \
                  site, honors robots.txt, and saves the status code, title, description and \
                  keywords of every page it visits to a CSV or JSON report."
)]
pub struct Cli {
    /// Start URL (e.g., https://example.com)
    #[arg(short = 'u', long = "url")]
    pub url: String,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Csv)]
    pub output: ReportFormat,

    /// Report file path (default: result.csv or result.json)
    #[arg(long)]
    pub output_file: Option<PathBuf>,

    /// Delay between requests in milliseconds
    ///
    /// A Crawl-delay in robots.txt takes precedence.
    #[arg(long, default_value_t = DELAY_MS_DEFAULT)]
    pub delay: u64,

    /// Maximum crawl depth (0 = unlimited)
    ///
    /// Depth 0 is the start page, depth 1 the pages it links to, etc.
    #[arg(long, default_value_t = 0)]
    pub depth: usize,

    /// Stop after this many URLs (0 = unlimited)
    #[arg(long, default_value_t = 0)]
    pub limit: usize,

    /// Request timeout in milliseconds
    #[arg(long, default_value_t = TIMEOUT_MS_DEFAULT)]
    pub timeout: u64,

    /// Number of records buffered before they are written to the report
    #[arg(long, default_value_t = BULK_SIZE_DEFAULT)]
    pub bulk_size: usize,

    /// Maximum number of requests in flight at once
    #[arg(long, default_value_t = CONCURRENCY_DEFAULT)]
    pub concurrency: usize,

    /// Quiet mode: only warnings and errors are logged
    #[arg(short, long)]
    pub quiet: bool,

    /// Ignore crawl-delay and disallowed URLs from robots.txt
    #[arg(long)]
    pub ignore_robots: bool,
}

impl Cli {
    /// The crawl settings these flags describe
    pub fn crawl_config(&self) -> CrawlConfig {
        CrawlConfig {
            concurrency: self.concurrency,
            limit_urls: self.limit,
            request_timeout: Duration::from_millis(self.timeout),
            delay: Duration::from_millis(self.delay),
            bulk_size: self.bulk_size,
            max_depth: self.depth,
            quiet: self.quiet,
        }
    }
}
