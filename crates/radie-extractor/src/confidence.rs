//! Confidence aggregation
//!
//! Confidence starts at a fixed base and grows by a fixed weight for every
//! field that matched. The sum is clamped below 1.0: a rule-based label is
//! never treated as certain. Downstream "Bronze"-tier filtering relies on
//! these exact constants and on the order the weights are added.

use radie_core::{ExtractionRecord, FieldKind, BASE_CONFIDENCE};

/// Upper bound of any rule-based confidence
pub const MAX_CONFIDENCE: f64 = 0.95;

/// Bonus for a classified material type
pub const MATERIAL_WEIGHT: f64 = 0.05;

/// Weight added when a scalar field matched
pub fn field_weight(field: FieldKind) -> f64 {
    match field {
        FieldKind::BeamType | FieldKind::Energy | FieldKind::Dose => 0.1,
        FieldKind::Ser | FieldKind::Def | FieldKind::Sf2 => 0.15,
        FieldKind::FoldChange => 0.05,
    }
}

/// Running confidence for one document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceAggregator {
    score: f64,
}

impl ConfidenceAggregator {
    pub fn new() -> Self {
        Self {
            score: BASE_CONFIDENCE,
        }
    }

    /// Credit a matched field
    pub fn add_field(&mut self, field: FieldKind) {
        self.score += field_weight(field);
    }

    /// Credit a classified material type
    pub fn add_material(&mut self) {
        self.score += MATERIAL_WEIGHT;
    }

    /// Unclamped running total
    pub fn raw(&self) -> f64 {
        self.score
    }

    /// Final clamped score
    pub fn finish(self) -> f64 {
        self.score.min(MAX_CONFIDENCE)
    }
}

impl Default for ConfidenceAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// Recompute the confidence a record's fields would earn
pub fn score_record(record: &ExtractionRecord) -> f64 {
    let mut aggregator = ConfidenceAggregator::new();
    for field in FieldKind::ALL {
        if record.has_field(field) {
            aggregator.add_field(field);
        }
    }
    if record.material_type_guess.is_some() {
        aggregator.add_material();
    }
    aggregator.finish()
}
