//! Radie Dataset - Tabular projection of extraction records
//!
//! Reads extraction records, maps each one onto the columns of an externally
//! supplied dataset template, and writes the rows as CSV. Only columns the
//! template names are ever populated; everything else about the template is
//! opaque to this crate.

use std::path::PathBuf;

use thiserror::Error;

pub mod mapper;
pub mod records;
pub mod schema;
pub mod units;
pub mod writer;

pub use mapper::{CellValue, DatasetMapper, DatasetRow, EXTRACTION_METHOD};
pub use records::{read_records, JsonlRecords};
pub use schema::DatasetSchema;
pub use units::parse_dose_to_gy;
pub use writer::{write_dataset, write_dataset_file};

// ============================================================================
// Error Types
// ============================================================================

/// Errors from reading inputs or writing the dataset
#[derive(Error, Debug)]
pub enum DatasetError {
    /// IO error on an input or output file
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Required input file does not exist
    #[error("Input file not found: {0}")]
    MissingInput(PathBuf),

    /// Template has no header columns
    #[error("Dataset template has no columns: {0}")]
    EmptySchema(PathBuf),

    /// CSV reading or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, DatasetError>;
