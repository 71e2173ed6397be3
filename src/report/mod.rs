// src/report/mod.rs
// =============================================================================
// This module writes crawled page records to disk.
//
// Two formats are supported:
// - csv:  one header row, then one row per page, appended flush by flush
// - json: a single JSON array that is rewritten in full on every flush
//
// The crawl queue only sees the ReportSink trait, so tests can swap in an
// in-memory sink and the queue never cares which format is in use.
//
// Rust concepts:
// - Traits: A shared interface implemented by several types
// - Box<dyn Trait>: Choosing the implementation at runtime
// =============================================================================

mod csv;
mod json;

pub use self::csv::CsvReport;
pub use self::json::JsonReport;

use crate::parser::PageRecord;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Base name of the report file when --output-file isn't given
const FILE_NAME_DEFAULT: &str = "result";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to write CSV report: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("failed to encode JSON report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Destination for batches of crawled pages
///
/// `save_bulk` takes `&mut self`: implementations keep track of whether
/// they've written to their file yet, and the crawl queue serializes calls.
pub trait ReportSink: Send {
    /// Persists a batch of records, in order
    fn save_bulk(&mut self, records: &[PageRecord]) -> Result<(), ReportError>;

    /// Where the records end up
    fn path(&self) -> &Path;
}

/// Output formats selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    Csv,
    Json,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
        }
    }

    /// "result.csv" or "result.json"
    pub fn default_path(self) -> PathBuf {
        PathBuf::from(format!("{}.{}", FILE_NAME_DEFAULT, self.extension()))
    }
}

// Builds the report writer for a format
//
// Parameters:
//   format: csv or json
//   path: output file, or None for the default "result.<ext>"
pub fn create_report(format: ReportFormat, path: Option<PathBuf>) -> Box<dyn ReportSink> {
    let path = path.unwrap_or_else(|| format.default_path());

    match format {
        ReportFormat::Csv => Box::new(CsvReport::new(path)),
        ReportFormat::Json => Box::new(JsonReport::new(path)),
    }
}
