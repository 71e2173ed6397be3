// src/parser/mod.rs
// =============================================================================
// This module turns fetched pages into report records.
//
// Submodules:
// - html: Extracts title, description, keywords and links from HTML
// - page: Defines PageRecord and reads a reqwest::Response into one
//
// The crawl queue calls parse_response(); the report writers only need
// PageRecord.
// =============================================================================

mod html;
mod page;

pub use page::{parse_response, PageRecord};
