// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing, printed to stderr)
// 3. Load robots.txt for the site, unless --ignore-robots is given
// 4. Build the report writer and the crawl queue, then run the crawl
// 5. Exit with proper code (0 = success, 1 = error, 2 = bad arguments)
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli; // src/cli.rs - command-line parsing
mod crawl; // src/crawl/ - crawl queue, stores, fetch tasks
mod error; // src/error.rs - errors that stop a crawl
mod parser; // src/parser/ - page metadata and link extraction
mod report; // src/report/ - CSV/JSON report writers
mod robots; // src/robots/ - robots.txt fetching and matching

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use url::Url;

use cli::Cli;
use crawl::CrawlQueue;
use robots::CrawlPolicy;

#[tokio::main]
async fn main() {
    // clap prints usage errors itself and exits with code 2
    let cli = Cli::parse();

    init_logging(cli.quiet);

    let exit_code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            // Logged at error level, so quiet mode still shows it
            error!("{:#}", e);
            1
        }
    };

    std::process::exit(exit_code);
}

// Installs a stderr logger; RUST_LOG overrides the default level
fn init_logging(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    // Check the URL before touching the network
    let start = Url::parse(&cli.url).with_context(|| format!("invalid start URL '{}'", cli.url))?;

    let policy: Option<Arc<dyn CrawlPolicy>> = if cli.ignore_robots {
        info!("ignoring robots.txt");
        None
    } else {
        info!("parsing robots.txt");
        let client = crawl::http_client().context("failed to build HTTP client")?;
        let rules = robots::fetch_robots(&client, &start).await?;
        Some(Arc::new(rules))
    };

    let report = report::create_report(cli.output, cli.output_file.clone());
    let report_path = report.path().display().to_string();

    let queue = CrawlQueue::new(cli.crawl_config(), &cli.url, Some(report), policy)?;

    let config = queue.config();
    info!(
        "Starting crawling, delay: {}ms, depth: {}, limit: {}, timeout: {}ms, bulk-size: {}, \
         concurrency: {}, output: {}, output-file: {}, ignore-robots: {}",
        config.delay.as_millis(),
        config.max_depth,
        config.limit_urls,
        config.request_timeout.as_millis(),
        config.bulk_size,
        config.concurrency,
        cli.output.extension(),
        report_path,
        cli.ignore_robots
    );

    let summary = queue.run().await?;

    if summary.failed > 0 {
        info!("{} of {} URLs did not return a 2xx status", summary.failed, summary.processed);
    }

    Ok(())
}
