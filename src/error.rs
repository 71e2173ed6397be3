//! Errors that stop a crawl
//!
//! Anything that goes wrong for a single URL (timeouts, HTTP errors, bad
//! HTML) is logged and recorded by the fetch task instead; it never turns
//! into a `CrawlError`.

use thiserror::Error;

use crate::report::ReportError;
use crate::robots::PolicyError;

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("invalid start URL '{url}': {source}")]
    InvalidStartUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("start URL '{0}' has no host to crawl")]
    MissingHost(String),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("failed to load robots.txt: {0}")]
    Policy(#[from] PolicyError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("report writer stopped unexpectedly: {0}")]
    FlushTask(#[source] tokio::task::JoinError),
}
