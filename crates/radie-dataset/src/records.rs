//! JSONL record input

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use radie_core::ExtractionRecord;
use tracing::warn;

use crate::{DatasetError, Result};

/// Records read from a JSONL stream
#[derive(Debug, Default)]
pub struct JsonlRecords {
    pub records: Vec<ExtractionRecord>,
    /// Non-blank lines that did not parse as a record
    pub skipped_lines: usize,
}

/// Read extraction records from a JSONL file
pub fn read_records(path: &Path) -> Result<JsonlRecords> {
    if !path.exists() {
        return Err(DatasetError::MissingInput(path.to_path_buf()));
    }
    let file = File::open(path).map_err(|e| DatasetError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    read_from(BufReader::new(file), path)
}

/// Read records from any buffered source; `origin` is used for diagnostics
pub fn read_from<R: BufRead>(reader: R, origin: &Path) -> Result<JsonlRecords> {
    let mut out = JsonlRecords::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| DatasetError::Io {
            path: origin.to_path_buf(),
            source: e,
        })?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<ExtractionRecord>(line) {
            Ok(record) => out.records.push(record),
            Err(e) => {
                warn!(
                    path = %origin.display(),
                    line = index + 1,
                    error = %e,
                    "Skipping malformed record"
                );
                out.skipped_lines += 1;
            }
        }
    }

    Ok(out)
}
