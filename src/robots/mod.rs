// src/robots/mod.rs
// =============================================================================
// This module handles robots.txt, the site's crawl policy.
//
// Currently implements:
// - Fetching <scheme>://<host>/robots.txt once, before the crawl starts
// - Allow/Disallow matching (via Google's matcher, the `robotstxt` crate)
// - Reading the Crawl-delay directive
//
// The crawl queue only depends on the CrawlPolicy trait, so a crawl can run
// with robots.txt rules, with no policy at all (--ignore-robots), or with a
// hand-written policy in tests.
// =============================================================================

mod fetch;
mod rules;

pub use fetch::{fetch_robots, PolicyError};
pub use rules::RobotsRules;

use std::time::Duration;

/// Decides which URLs a crawler may visit, and how fast
///
/// `user_agent` may be a bare product token ("page-harvester") or a full
/// User-Agent value ("page-harvester/0.1.0"); only the product token is
/// compared with robots.txt groups.
pub trait CrawlPolicy: Send + Sync {
    /// Whether `user_agent` may fetch `url`
    fn is_allowed(&self, user_agent: &str, url: &str) -> bool;

    /// Minimum pause between requests, if the site asks for one
    fn crawl_delay(&self, user_agent: &str) -> Option<Duration>;
}
