// src/crawl/queue.rs
// =============================================================================
// This module implements the crawl queue: it decides what to fetch next, how
// many fetches run at once, and when results get written to the report.
//
// How it works:
// 1. The start URL goes into the to-do store at depth 0
// 2. A "round" takes a snapshot of to-do and launches a fetch task per URL
//    - at most `concurrency` tasks run at once (a semaphore gates launches)
//    - launches are spaced out by the politeness delay
// 3. Tasks record their page and put newly found links back into to-do
// 4. When every task of the round has finished, the next round starts
// 5. The crawl ends when to-do is empty or the URL limit is reached,
//    followed by one final flush and a summary line
//
// The URL limit is only checked between launches, so a crawl may finish a
// few URLs past the limit: at most `limit + concurrency - 1` fetches.
//
// Rust concepts:
// - Arc: Shared ownership of the crawl state between spawned tasks
// - Semaphore: Counting gate for concurrent fetches
// - JoinSet: Waiting for every task spawned in a round
// =============================================================================

use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;
use tracing::{error, info, warn};
use url::Url;

use super::config::CrawlConfig;
use super::store::Store;
use crate::error::CrawlError;
use crate::parser::PageRecord;
use crate::report::ReportSink;
use crate::robots::CrawlPolicy;

/// The name robots.txt groups address us by
pub const ROBOTS_AGENT: &str = env!("CARGO_PKG_NAME");

/// Sent as the User-Agent header with every request
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

// Builds the HTTP client shared by the robots.txt fetch and the crawl
pub fn http_client() -> Result<Client, reqwest::Error> {
    Client::builder().user_agent(USER_AGENT).build()
}

/// What a finished crawl did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSummary {
    /// URLs that were fetched (successfully or not)
    pub processed: usize,
    /// URLs seen in total, including ones never fetched because of the limit
    pub discovered: usize,
    /// Processed URLs without a 2xx response
    pub failed: usize,
    pub elapsed: Duration,
    pub limit_reached: bool,
}

// State shared by the coordinator and every fetch task
//
// Tasks only ever touch the stores through their own methods; nothing hands
// out references into a store's map.
pub(super) struct Shared {
    pub(super) config: CrawlConfig,
    pub(super) start_url: Url,
    pub(super) client: Client,
    pub(super) policy: Option<Arc<dyn CrawlPolicy>>,
    // The mutex also serializes flushes
    report: Option<Arc<Mutex<Box<dyn ReportSink>>>>,

    /// Discovered, not fetched yet: URL -> depth
    pub(super) todo: Store<usize>,
    /// Being fetched right now: URL -> depth
    pub(super) in_progress: Store<usize>,
    /// Fetched, successfully or not
    pub(super) done: Store<PageRecord>,
    /// Fetched but not written to the report yet
    pub(super) to_save: Store<PageRecord>,
}

pub struct CrawlQueue {
    shared: Arc<Shared>,
}

impl CrawlQueue {
    // Creates a crawl queue seeded with `start_url`
    //
    // Parameters:
    //   config: crawl settings
    //   start_url: the seed URL, must be absolute and have a host
    //   report: where records are flushed, or None to keep them in memory
    //   policy: robots.txt rules, or None to crawl without restrictions
    //
    // A crawl delay from the policy replaces `config.delay`.
    pub fn new(
        mut config: CrawlConfig,
        start_url: &str,
        report: Option<Box<dyn ReportSink>>,
        policy: Option<Arc<dyn CrawlPolicy>>,
    ) -> Result<Self, CrawlError> {
        let start = Url::parse(start_url).map_err(|source| CrawlError::InvalidStartUrl {
            url: start_url.to_string(),
            source,
        })?;

        if start.host_str().is_none() {
            return Err(CrawlError::MissingHost(start_url.to_string()));
        }

        if let Some(delay) = policy.as_ref().and_then(|p| p.crawl_delay(ROBOTS_AGENT)) {
            if !config.quiet {
                info!(
                    "found crawl-delay in robots.txt: {:?}. Ignoring delay from the config",
                    delay
                );
            }
            config.delay = delay;
        }

        let client = http_client().map_err(CrawlError::Client)?;

        // Url normalizes the seed ("https://example.com" -> "https://example.com/"),
        // the same form discovered links resolve to
        let todo = Store::new();
        todo.add(start.to_string(), 0);

        Ok(Self {
            shared: Arc::new(Shared {
                config,
                start_url: start,
                client,
                policy,
                report: report.map(|sink| Arc::new(Mutex::new(sink))),
                todo,
                in_progress: Store::new(),
                done: Store::new(),
                to_save: Store::new(),
            }),
        })
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.shared.config
    }

    // Runs the crawl to completion
    //
    // Returns a summary, or the error of the final flush if the last records
    // couldn't be written (the summary is logged either way).
    pub async fn run(&self) -> Result<CrawlSummary, CrawlError> {
        let shared = &self.shared;
        let started = Instant::now();
        let gate = Arc::new(Semaphore::new(shared.config.concurrency.max(1)));
        let mut limit_reached = false;

        loop {
            let urls = shared.todo.keys();
            let mut round = JoinSet::new();

            for url in urls {
                // Waiting for a free slot first means every fetch that gave
                // its slot back is already counted in `done`
                let Ok(permit) = Arc::clone(&gate).acquire_owned().await else {
                    break;
                };

                if shared.config.limit_reached(shared.done.len()) {
                    shared.progress(format!(
                        "reached max URLs limit of {}",
                        shared.config.limit_urls
                    ));
                    limit_reached = true;
                    break;
                }

                let Ok(depth) = shared.todo.get(&url) else {
                    continue;
                };
                shared.todo.delete(&url);
                shared.in_progress.add(url.clone(), depth);

                let task = Arc::clone(shared);
                round.spawn(async move {
                    task.process(url, depth).await;
                    drop(permit);
                });

                if !shared.config.delay.is_zero() {
                    tokio::time::sleep(shared.config.delay).await;
                }
            }

            while let Some(joined) = round.join_next().await {
                if let Err(e) = joined {
                    error!("fetch task failed: {}", e);
                }
            }
            shared.reclaim_orphans();
            debug_assert!(shared.between_rounds_consistent());

            if limit_reached || (shared.todo.is_empty() && shared.in_progress.is_empty()) {
                break;
            }
        }

        // A failed final flush is returned to the caller, after the summary
        let flushed = shared.flush().await;

        let summary = shared.summary(started.elapsed(), limit_reached);
        shared.progress(format!(
            "crawling completed. {} of {} URLs processed in {}s",
            summary.processed,
            summary.discovered,
            summary.elapsed.as_secs()
        ));

        flushed?;
        Ok(summary)
    }

    #[cfg(test)]
    pub(super) fn shared(&self) -> &Shared {
        &self.shared
    }
}

impl Shared {
    // Progress messages are the only thing quiet mode hides
    pub(super) fn progress(&self, message: impl AsRef<str>) {
        if !self.config.quiet {
            info!("{}", message.as_ref());
        }
    }

    // Saves a finished page
    pub(super) fn record(&self, url: &str, record: PageRecord) {
        self.done.add(url, record.clone());
        self.to_save.add(url, record);
    }

    // Writes everything in to-save to the report
    //
    // - No report or nothing pending: nothing to do
    // - Success: exactly the records that were written leave to-save
    // - Failure: to-save is untouched, the next flush tries again
    pub(super) async fn flush(&self) -> Result<usize, CrawlError> {
        let Some(report) = &self.report else {
            return Ok(0);
        };

        // Held for the whole flush so two flushes never interleave writes
        let sink = Arc::clone(report).lock_owned().await;

        if self.to_save.is_empty() {
            return Ok(0);
        }

        self.progress("saving to the file...");

        let pending = self.to_save.list();
        let records: Vec<PageRecord> = pending.values().cloned().collect();

        // File writes block, so they run on the blocking pool; the guard
        // travels with them and comes back
        let (sink, records, saved) = tokio::task::spawn_blocking(move || {
            let mut sink = sink;
            let saved = sink.save_bulk(&records);
            (sink, records, saved)
        })
        .await
        .map_err(CrawlError::FlushTask)?;
        saved?;

        // Records added while we were writing stay for the next flush
        for url in pending.keys() {
            self.to_save.delete(url);
        }

        self.progress(format!(
            "saved {} records to {}. Done {}, to do {}",
            records.len(),
            sink.path().display(),
            self.done.len(),
            self.todo.len()
        ));

        Ok(records.len())
    }

    // After a round is joined no task is running, so anything still in
    // in-progress belongs to a task that panicked. Record it as failed so
    // the crawl can finish.
    pub(super) fn reclaim_orphans(&self) {
        for url in self.in_progress.keys() {
            warn!("fetch of {} ended without a result", url);
            self.record(&url, PageRecord::failed(url.as_str(), 0));
            self.in_progress.delete(&url);
        }
    }

    // Between rounds no URL is both waiting and being fetched, and every
    // record waiting to be saved is also done
    pub(super) fn between_rounds_consistent(&self) -> bool {
        let disjoint = self
            .todo
            .keys()
            .iter()
            .all(|url| !self.in_progress.contains(url));
        let saved_are_done = self
            .to_save
            .keys()
            .iter()
            .all(|url| self.done.contains(url));

        disjoint && saved_are_done
    }

    fn summary(&self, elapsed: Duration, limit_reached: bool) -> CrawlSummary {
        let processed = self.done.len();
        let failed = self
            .done
            .values()
            .iter()
            .filter(|record| !record.is_success())
            .count();

        CrawlSummary {
            processed,
            discovered: processed + self.todo.len() + self.in_progress.len(),
            failed,
            elapsed,
            limit_reached,
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why Arc<Shared>?
//    - tokio::spawn needs futures that own their data ('static)
//    - Arc lets every task own a pointer to the same state
//    - Cloning an Arc only bumps a counter
//
// 2. How does the Semaphore limit concurrency?
//    - It starts with `concurrency` permits
//    - acquire_owned() waits until one is free and hands it to us
//    - The permit moves into the task and is dropped when the task ends,
//      which frees the slot for the next launch
//
// 3. What is JoinSet?
//    - A collection of spawned tasks
//    - join_next() waits for the next one to finish
//    - Draining it is our "wait for the whole round" barrier
//
// 4. What is let-else?
//    - let Ok(x) = expr else { ... };
//    - Binds x on success, otherwise runs the block (which must exit)
// -----------------------------------------------------------------------------
