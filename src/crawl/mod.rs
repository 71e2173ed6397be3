// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Breadth-first crawling in rounds, starting from a seed URL
// - Stays on the seed's host (links are resolved against it)
// - Configurable depth limit, URL limit and concurrency
// - Polite crawling with a delay between fetch launches
// - robots.txt allow/deny rules
// - Bulk saving of page records to a report
//
// Submodules:
// - store:  the concurrent key/value store crawl state is kept in
// - config: crawl settings
// - queue:  the round loop, flushing and the summary
// - task:   what happens to a single URL
// =============================================================================

mod config;
mod queue;
mod store;
mod task;

pub use config::{
    CrawlConfig, BULK_SIZE_DEFAULT, CONCURRENCY_DEFAULT, DELAY_MS_DEFAULT, TIMEOUT_MS_DEFAULT,
};
pub use queue::{http_client, CrawlQueue};
