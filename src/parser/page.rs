// src/parser/page.rs
// =============================================================================
// This module turns an HTTP response into a PageRecord plus a list of links.
//
// A PageRecord is the row we eventually write to the CSV/JSON report.
// It is created once per crawled URL and never changed afterwards.
//
// Failure modes:
// - Non-2xx status: we still know the URL and the status code, so the error
//   carries a partial record the crawler can save
// - Unreadable body: same, the record keeps URL and status
// =============================================================================

use reqwest::Response;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::html::extract_page;

/// One row of the crawl report
///
/// The JSON field names match the report format users already consume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    #[serde(rename = "path")]
    pub url: String,
    /// HTTP status, or 0 when the request never got a response
    #[serde(rename = "status code")]
    pub status_code: u16,
    pub title: String,
    #[serde(rename = "desc")]
    pub description: String,
    pub keywords: String,
}

impl PageRecord {
    /// A record for a URL we couldn't fetch or parse
    pub fn failed(url: impl Into<String>, status_code: u16) -> Self {
        Self {
            url: url.into(),
            status_code,
            ..Default::default()
        }
    }

    /// True for 2xx responses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// A successfully parsed page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPage {
    pub record: PageRecord,
    /// Root-relative links found on the page, already de-duplicated
    pub links: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("returned status: {status}, url: {url}")]
    Status { url: String, status: u16 },

    #[error("can't read response body, url: {url}: {source}")]
    Body {
        url: String,
        status: u16,
        #[source]
        source: reqwest::Error,
    },
}

impl ParseError {
    /// The record we can still save for this page
    pub fn partial_record(&self) -> PageRecord {
        match self {
            ParseError::Status { url, status } => PageRecord::failed(url.as_str(), *status),
            ParseError::Body { url, status, .. } => PageRecord::failed(url.as_str(), *status),
        }
    }
}

// Reads the body of a response and extracts title, description, keywords
// and links
//
// The record's URL is the final URL of the response, so a redirected page
// is reported under the address that actually served it.
pub async fn parse_response(response: Response) -> Result<ParsedPage, ParseError> {
    let url = response.url().to_string();
    let status = response.status();

    if !status.is_success() {
        return Err(ParseError::Status {
            url,
            status: status.as_u16(),
        });
    }

    let body = match response.text().await {
        Ok(body) => body,
        Err(source) => {
            return Err(ParseError::Body {
                url,
                status: status.as_u16(),
                source,
            })
        }
    };

    Ok(parse_html(url, status.as_u16(), &body))
}

// The synchronous half of parse_response, handy when the body is already
// in memory
pub fn parse_html(url: String, status_code: u16, html: &str) -> ParsedPage {
    let extract = extract_page(html);

    ParsedPage {
        record: PageRecord {
            url,
            status_code,
            title: extract.meta.title,
            description: extract.meta.description,
            keywords: extract.meta.keywords,
        },
        links: extract.links,
    }
}
