// src/crawl/task.rs
// =============================================================================
// One fetch task: one URL at one depth.
//
// Steps:
// 1. GET the URL with the configured timeout
// 2. Parse the response into a PageRecord and a list of links
//    (a failed request or a non-2xx page still produces a record)
// 3. Store the record in done and to-save
// 4. Queue the links that are allowed, not done yet, and not too deep
// 5. Leave in-progress
// 6. Flush if enough records are waiting
//
// Nothing that goes wrong here stops the crawl: errors are logged and the
// URL is simply marked done.
// =============================================================================

use tracing::{debug, error, warn};

use super::queue::{Shared, ROBOTS_AGENT};
use crate::parser::{parse_response, PageRecord};

impl Shared {
    pub(super) async fn process(&self, url: String, depth: usize) {
        self.progress(format!(
            "processing: {} (depth {}, found: {})",
            url,
            depth,
            self.todo.len()
        ));

        let (record, links) = self.fetch(&url).await;

        self.record(&url, record);
        self.enqueue_links(&links, depth);
        self.in_progress.delete(&url);

        if self.to_save.len() >= self.config.bulk_size {
            self.progress(format!("store is full: {}", self.to_save.len()));

            if let Err(e) = self.flush().await {
                error!("{}", e);
            }
        }
    }

    // Fetches and parses a page, turning every failure into a record
    async fn fetch(&self, url: &str) -> (PageRecord, Vec<String>) {
        let response = self
            .client
            .get(url)
            .timeout(self.config.request_timeout)
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                warn!("can't send request to url {}: {}", url, e);
                let status = e.status().map(|status| status.as_u16()).unwrap_or(0);
                return (PageRecord::failed(url, status), Vec::new());
            }
        };

        match parse_response(response).await {
            Ok(page) => (page.record, page.links),
            Err(e) => {
                warn!("{}", e);
                (e.partial_record(), Vec::new())
            }
        }
    }

    // Puts newly found links into to-do
    //
    // Links are resolved against the start URL, so the crawl never leaves
    // the site it started on. A link is skipped when robots.txt forbids it,
    // when it's already done, or when it would exceed the max depth.
    //
    // Only `done` is checked: a link that is already in to-do is overwritten
    // with the new depth, and one that is in-progress right now is queued
    // again (and fetched a second time in the next round).
    pub(super) fn enqueue_links(&self, links: &[String], depth: usize) {
        let next_depth = depth + 1;

        for link in links {
            let absolute = match self.start_url.join(link) {
                Ok(absolute) => absolute.to_string(),
                Err(e) => {
                    debug!("skipping unresolvable link {}: {}", link, e);
                    continue;
                }
            };

            if let Some(policy) = &self.policy {
                if !policy.is_allowed(ROBOTS_AGENT, &absolute) {
                    continue;
                }
            }

            if self.done.contains(&absolute) {
                continue;
            }

            if !self.config.depth_allowed(next_depth) {
                continue;
            }

            self.todo.add(absolute, next_depth);
        }
    }
}
