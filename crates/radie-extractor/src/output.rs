//! JSONL output
//!
//! One JSON object per line, one line per document.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use radie_core::{ExtractionRecord, RadieError, Result};

/// Line-oriented writer for extraction records
pub struct JsonlWriter<W: Write> {
    inner: W,
    written: usize,
}

impl JsonlWriter<BufWriter<File>> {
    /// Create (or truncate) a JSONL file
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|e| RadieError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> JsonlWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    /// Append one record as a line
    pub fn write_record(&mut self, record: &ExtractionRecord) -> Result<()> {
        serde_json::to_writer(&mut self.inner, record)?;
        self.inner
            .write_all(b"\n")
            .map_err(|e| RadieError::Other(e.into()))?;
        self.written += 1;
        Ok(())
    }

    /// Number of records written so far
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush and return the inner writer
    pub fn finish(mut self) -> Result<W> {
        self.inner
            .flush()
            .map_err(|e| RadieError::Other(e.into()))?;
        Ok(self.inner)
    }
}
