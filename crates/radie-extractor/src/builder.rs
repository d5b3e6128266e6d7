//! Record building
//!
//! Runs every field extractor over one document's text and assembles the
//! result into an `ExtractionRecord`. Batches isolate failures: a document
//! that cannot be read or extracted is logged and skipped.

use std::fmt::Display;

use tracing::{debug, warn};

use radie_core::{Evidence, ExtractionRecord, FieldKind, KeywordFlag, Result};

use crate::confidence::ConfidenceAggregator;
use crate::fields::{self, FieldMatch};
use crate::summary::ExtractionSummary;
use crate::RecordExtractor;

// ============================================================================
// Rule-based extractor
// ============================================================================

/// Extractor built from the fixed pattern tables
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedExtractor;

impl RuleBasedExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl RecordExtractor for RuleBasedExtractor {
    fn extract(&self, text: &str) -> Result<ExtractionRecord> {
        let mut record = ExtractionRecord {
            material_type_guess: fields::material_type(text),
            has_ros: fields::keyword_flag(KeywordFlag::Ros, text),
            has_xeol: fields::keyword_flag(KeywordFlag::Xeol, text),
            has_radiosensitization: fields::keyword_flag(KeywordFlag::Radiosensitization, text),
            ..Default::default()
        };
        let mut confidence = ConfidenceAggregator::new();

        if let Some(found) = fields::beam_type(text) {
            record.beam_type = Some(accept(
                &mut record,
                &mut confidence,
                FieldKind::BeamType,
                found,
            ));
        }
        if let Some(found) = fields::energy(text) {
            record.energy_str = Some(accept(
                &mut record,
                &mut confidence,
                FieldKind::Energy,
                found,
            ));
        }
        if let Some(found) = fields::dose(text) {
            record.dose_str = Some(accept(&mut record, &mut confidence, FieldKind::Dose, found));
        }

        for field in [FieldKind::Ser, FieldKind::Def, FieldKind::Sf2] {
            if let Some(found) = fields::metric(field, text)? {
                let value = accept(&mut record, &mut confidence, field, found);
                match field {
                    FieldKind::Ser => record.ser = Some(value),
                    FieldKind::Def => record.def = Some(value),
                    _ => record.sf2 = Some(value),
                }
            }
        }

        if let Some(found) = fields::fold_change(text)? {
            record.fold_change = Some(accept(
                &mut record,
                &mut confidence,
                FieldKind::FoldChange,
                found,
            ));
        }

        if record.material_type_guess.is_some() {
            confidence.add_material();
        }
        record.confidence = confidence.finish();

        Ok(record)
    }
}

/// Log evidence and credit confidence for a match, returning its value
fn accept<T>(
    record: &mut ExtractionRecord,
    confidence: &mut ConfidenceAggregator,
    field: FieldKind,
    found: FieldMatch<T>,
) -> T {
    record.evidence.push(Evidence::new(field, found.span));
    confidence.add_field(field);
    found.value
}

// ============================================================================
// Record builder
// ============================================================================

/// Records produced by a batch, with its summary
#[derive(Debug, Clone, Default)]
pub struct BatchOutput {
    pub records: Vec<ExtractionRecord>,
    pub summary: ExtractionSummary,
}

/// Builds one record per document, annotating it with its source
pub struct RecordBuilder<E: RecordExtractor = RuleBasedExtractor> {
    extractor: E,
}

impl RecordBuilder<RuleBasedExtractor> {
    /// Builder using the rule-based extractor
    pub fn new() -> Self {
        Self {
            extractor: RuleBasedExtractor::new(),
        }
    }
}

impl Default for RecordBuilder<RuleBasedExtractor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: RecordExtractor> RecordBuilder<E> {
    /// Builder around a custom extractor
    pub fn with_extractor(extractor: E) -> Self {
        Self { extractor }
    }

    /// Extract one document's normalized text
    pub fn build(&self, source_file: &str, text: &str) -> Result<ExtractionRecord> {
        let record = self.extractor.extract(text)?.with_source_file(source_file);
        debug!(
            source_file,
            confidence = record.confidence,
            evidence = record.evidence.len(),
            "Document extracted"
        );
        Ok(record)
    }

    /// Build one document, logging and counting it as skipped on failure
    ///
    /// `text` is the outcome of reading the document; a read error is
    /// treated like an extraction error.
    pub fn process_document<R: Display>(
        &self,
        source_file: &str,
        text: std::result::Result<String, R>,
        summary: &mut ExtractionSummary,
    ) -> Option<ExtractionRecord> {
        let outcome = match text {
            Ok(text) => self.build(source_file, &text).map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        match outcome {
            Ok(record) => {
                summary.record_extracted(&record);
                Some(record)
            }
            Err(e) => {
                warn!(source_file, "Skipping document: {}", e);
                summary.record_skipped();
                None
            }
        }
    }

    /// Build every document of a batch, skipping the ones that fail
    pub fn extract_batch<I, S, R>(&self, documents: I) -> BatchOutput
    where
        I: IntoIterator<Item = (S, std::result::Result<String, R>)>,
        S: AsRef<str>,
        R: Display,
    {
        let mut output = BatchOutput::default();

        for (source_file, text) in documents {
            if let Some(record) =
                self.process_document(source_file.as_ref(), text, &mut output.summary)
            {
                output.records.push(record);
            }
        }

        output
    }
}

// ============================================================================
// Tests
// ============================================================================
