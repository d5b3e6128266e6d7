//! Radie Extractor - Rule-based information extraction
//!
//! Turns a document's normalized text into an `ExtractionRecord`:
//! beam type, energy, dose, sensitization metrics, fold-change, keyword
//! flags and material class, each with its evidence span, plus an
//! aggregate confidence score.

use radie_core::{ExtractionRecord, Result};

/// Trait for per-document record extractors
///
/// Implementations must be pure functions of the text so documents can be
/// processed in any order, or in parallel, without coordination.
pub trait RecordExtractor: Send + Sync {
    fn extract(&self, text: &str) -> Result<ExtractionRecord>;
}

pub mod builder;
pub mod confidence;
pub mod fields;
pub mod output;
pub mod patterns;
pub mod summary;

pub use builder::{BatchOutput, RecordBuilder, RuleBasedExtractor};
pub use confidence::{score_record, ConfidenceAggregator, MAX_CONFIDENCE};
pub use output::JsonlWriter;
pub use summary::ExtractionSummary;
