// src/report/csv.rs
// =============================================================================
// CSV report writer.
//
// The first save truncates the file and writes the header row; later saves
// append. However many flushes a crawl performs, the file ends up with
// exactly one header followed by every record in the order it was saved.
// =============================================================================

use csv::WriterBuilder;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use super::{ReportError, ReportSink};
use crate::parser::PageRecord;

const HEADER: [&str; 5] = ["URL", "StatusCode", "Title", "Description", "Keywords"];

#[derive(Debug)]
pub struct CsvReport {
    path: PathBuf,
    first_insert: bool,
}

impl CsvReport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            first_insert: true,
        }
    }

    fn open(&self) -> std::io::Result<File> {
        if self.first_insert {
            // Creates the file or truncates whatever a previous run left
            File::create(&self.path)
        } else {
            OpenOptions::new().create(true).append(true).open(&self.path)
        }
    }
}

impl ReportSink for CsvReport {
    fn save_bulk(&mut self, records: &[PageRecord]) -> Result<(), ReportError> {
        let file = self.open()?;

        // We write the header ourselves so it only appears once per file
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

        if self.first_insert {
            writer.write_record(HEADER)?;
        }

        for record in records {
            let status = record.status_code.to_string();
            writer.write_record([
                record.url.as_str(),
                status.as_str(),
                record.title.as_str(),
                record.description.as_str(),
                record.keywords.as_str(),
            ])?;
        }

        writer.flush()?;

        // Only after a successful write; a failed first save retries the header
        self.first_insert = false;

        Ok(())
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn records() -> Vec<PageRecord> {
        vec![
            PageRecord {
                url: "https://en.wikipedia.org/wiki/Yuri_Gagarin".to_string(),
                status_code: 200,
                title: "Yuri Gagarin - Wikipedia".to_string(),
                description: "Soviet pilot and cosmonaut, the first human in outer space."
                    .to_string(),
                keywords: "Pilot, cosmonaut".to_string(),
            },
            PageRecord {
                url: "https://en.wikipedia.org/wiki/Fyodor_Dostoevsky".to_string(),
                status_code: 200,
                title: "Fyodor Dostoevsky - Wikipedia".to_string(),
                description: "Russian novelist, \"short story\" writer".to_string(),
                keywords: "Fyodor Dostoevsky, novelist".to_string(),
            },
            PageRecord::failed("https://en.wikipedia.org/wiki/Missing", 404),
        ]
    }

    fn read_rows(path: &Path) -> Vec<Vec<String>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(path)
            .unwrap();
        reader
            .records()
            .map(|row| row.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_save_bulk_with_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("result.csv");
        let mut report = CsvReport::new(&path);

        report.save_bulk(&records()).unwrap();

        let rows = read_rows(&path);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], HEADER);
        assert_eq!(rows[2][3], "Russian novelist, \"short story\" writer");
        assert_eq!(rows[3], vec!["https://en.wikipedia.org/wiki/Missing", "404", "", "", ""]);
    }

    #[test]
    fn test_header_written_once_across_flushes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("result.csv");
        let mut report = CsvReport::new(&path);
        let all = records();

        report.save_bulk(&all[..1]).unwrap();
        report.save_bulk(&all[1..]).unwrap();

        let rows = read_rows(&path);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows.iter().filter(|row| row[0] == "URL").count(), 1);

        let urls: Vec<_> = rows[1..].iter().map(|row| row[0].clone()).collect();
        let expected: Vec<_> = all.iter().map(|record| record.url.clone()).collect();
        assert_eq!(urls, expected);
    }

    #[test]
    fn test_first_save_truncates_old_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("result.csv");
        std::fs::write(&path, "stale,data\nfrom,last run\n").unwrap();

        let mut report = CsvReport::new(&path);
        report.save_bulk(&records()[..1]).unwrap();

        let rows = read_rows(&path);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], HEADER);
    }
}
