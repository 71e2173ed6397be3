// src/crawl/config.rs
// =============================================================================
// Settings for one crawl.
//
// Every knob is explicit. The Default values are the same ones the CLI uses
// when a flag is left out.
// =============================================================================

use std::time::Duration;

/// Maximum number of fetches in flight at once
pub const CONCURRENCY_DEFAULT: usize = 50;
/// Records buffered before they are written to the report
pub const BULK_SIZE_DEFAULT: usize = 30;
pub const DELAY_MS_DEFAULT: u64 = 1000;
pub const TIMEOUT_MS_DEFAULT: u64 = 5000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlConfig {
    /// Maximum number of fetches running at the same time
    pub concurrency: usize,
    /// Stop once this many URLs are done (0 = unlimited)
    pub limit_urls: usize,
    /// Per-request timeout, covering connect, headers and body
    pub request_timeout: Duration,
    /// Pause between two fetch launches
    pub delay: Duration,
    /// Flush to the report as soon as this many records are waiting
    pub bulk_size: usize,
    /// Deepest link level to follow (0 = unlimited)
    pub max_depth: usize,
    /// Suppress progress logging
    pub quiet: bool,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            concurrency: CONCURRENCY_DEFAULT,
            limit_urls: 0,
            request_timeout: Duration::from_millis(TIMEOUT_MS_DEFAULT),
            delay: Duration::from_millis(DELAY_MS_DEFAULT),
            bulk_size: BULK_SIZE_DEFAULT,
            max_depth: 0,
            quiet: false,
        }
    }
}

impl CrawlConfig {
    pub(crate) fn limit_reached(&self, done: usize) -> bool {
        self.limit_urls > 0 && done >= self.limit_urls
    }

    pub(crate) fn depth_allowed(&self, depth: usize) -> bool {
        self.max_depth == 0 || depth <= self.max_depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_means_unlimited() {
        let config = CrawlConfig::default();
        assert!(!config.limit_reached(1_000_000));
        assert!(config.depth_allowed(1_000_000));
    }

    #[test]
    fn test_limits() {
        let config = CrawlConfig {
            limit_urls: 10,
            max_depth: 2,
            ..Default::default()
        };
        assert!(!config.limit_reached(9));
        assert!(config.limit_reached(10));
        assert!(config.depth_allowed(2));
        assert!(!config.depth_allowed(3));
    }
}
