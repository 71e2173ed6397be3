// src/robots/fetch.rs
// =============================================================================
// This module downloads robots.txt for the site being crawled.
//
// Strategy:
// - Build <scheme>://<host>[:port]/robots.txt from the start URL
// - 2xx: parse the body
// - 4xx: the site has no robots.txt, so nothing is restricted
// - anything else (5xx, network failure): give up, the crawl must not start
//   without knowing the rules
// =============================================================================

use reqwest::Client;
use thiserror::Error;
use tracing::debug;
use url::Url;

use super::RobotsRules;

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("invalid robots.txt location for {url}: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("can't fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("can't fetch {url}: HTTP {status}")]
    Status { url: String, status: u16 },
}

// Fetches and parses robots.txt for the host of `start_url`
//
// Parameters:
//   client: reqwest HTTP client (carries our user agent)
//   start_url: the crawl's seed URL
//
// Returns: RobotsRules, or an error if the rules can't be determined
pub async fn fetch_robots(client: &Client, start_url: &Url) -> Result<RobotsRules, PolicyError> {
    let robots_url = start_url.join("/robots.txt").map_err(|source| PolicyError::Url {
        url: start_url.to_string(),
        source,
    })?;
    let url = robots_url.to_string();

    let response = client
        .get(robots_url)
        .send()
        .await
        .map_err(|source| PolicyError::Fetch {
            url: url.clone(),
            source,
        })?;

    let status = response.status();

    if status.is_client_error() {
        debug!("{} returned HTTP {}, crawling without restrictions", url, status);
        return Ok(RobotsRules::allow_all());
    }

    if !status.is_success() {
        return Err(PolicyError::Status {
            url,
            status: status.as_u16(),
        });
    }

    let content = response
        .text()
        .await
        .map_err(|source| PolicyError::Fetch {
            url: url.clone(),
            source,
        })?;

    Ok(RobotsRules::parse(&content))
}
