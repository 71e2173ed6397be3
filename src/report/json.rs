// src/report/json.rs
// =============================================================================
// JSON report writer.
//
// The file always holds one JSON array with every record saved so far.
// Each save reads the array back, appends the new batch and rewrites the
// whole file, so an interrupted crawl still leaves valid JSON behind.
// The first save ignores anything a previous run left in the file.
// =============================================================================

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{ReportError, ReportSink};
use crate::parser::PageRecord;

#[derive(Debug)]
pub struct JsonReport {
    path: PathBuf,
    first_insert: bool,
}

impl JsonReport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            first_insert: true,
        }
    }

    // Loads the records already in the file (none if it doesn't exist or is empty)
    fn read_existing(&self) -> Result<Vec<PageRecord>, ReportError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        Ok(serde_json::from_str(&content)?)
    }
}

impl ReportSink for JsonReport {
    fn save_bulk(&mut self, records: &[PageRecord]) -> Result<(), ReportError> {
        let mut data = if self.first_insert {
            Vec::new()
        } else {
            self.read_existing()?
        };

        data.extend_from_slice(records);

        let mut json = serde_json::to_vec(&data)?;
        json.push(b'\n');
        fs::write(&self.path, json)?;

        self.first_insert = false;

        Ok(())
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
