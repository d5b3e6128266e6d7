//! Extraction run summary
//!
//! Counts documents and per-field hits across a batch so a run can report
//! field coverage alongside the records it wrote.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use radie_core::{ExtractionRecord, FieldKind, KeywordFlag};

/// Aggregate counts for one extraction run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionSummary {
    /// Documents offered to the builder
    pub documents_seen: usize,
    /// Documents that produced a record
    pub documents_extracted: usize,
    /// Documents skipped after an error
    pub documents_skipped: usize,
    /// Hits per scalar field
    pub field_hits: BTreeMap<String, usize>,
    /// Hits per keyword flag
    pub flag_hits: BTreeMap<String, usize>,
    /// Records with a classified material type
    pub material_hits: usize,
    /// Sum of record confidences
    pub confidence_total: f64,
}

impl ExtractionSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a successfully built record
    pub fn record_extracted(&mut self, record: &ExtractionRecord) {
        self.documents_seen += 1;
        self.documents_extracted += 1;

        for field in FieldKind::ALL {
            if record.has_field(field) {
                *self.field_hits.entry(field.to_string()).or_insert(0) += 1;
            }
        }
        for flag in record.active_flags() {
            *self.flag_hits.entry(flag.to_string()).or_insert(0) += 1;
        }
        if record.material_type_guess.is_some() {
            self.material_hits += 1;
        }
        self.confidence_total += record.confidence;
    }

    /// Count a skipped document
    pub fn record_skipped(&mut self) {
        self.documents_seen += 1;
        self.documents_skipped += 1;
    }

    /// Hits for one field
    pub fn hits(&self, field: FieldKind) -> usize {
        self.field_hits.get(field.as_str()).copied().unwrap_or(0)
    }

    /// Hits for one flag
    pub fn flag_count(&self, flag: KeywordFlag) -> usize {
        self.flag_hits.get(flag.label()).copied().unwrap_or(0)
    }

    /// Fraction of extracted documents where the field matched
    pub fn coverage(&self, field: FieldKind) -> f32 {
        if self.documents_extracted == 0 {
            0.0
        } else {
            self.hits(field) as f32 / self.documents_extracted as f32
        }
    }

    /// Mean confidence over extracted documents
    pub fn mean_confidence(&self) -> f64 {
        if self.documents_extracted == 0 {
            0.0
        } else {
            self.confidence_total / self.documents_extracted as f64
        }
    }

    /// Human-readable report
    pub fn report(&self) -> String {
        let mut out = format!(
            "=== Extraction Summary ===\n\n\
             Documents: {} seen | {} extracted | {} skipped\n\
             Mean confidence: {:.3}\n\n\
             Field coverage:\n",
            self.documents_seen,
            self.documents_extracted,
            self.documents_skipped,
            self.mean_confidence(),
        );

        for field in FieldKind::ALL {
            out.push_str(&format!(
                "  {:<12} {:>5} ({:.1}%)\n",
                field.as_str(),
                self.hits(field),
                self.coverage(field) * 100.0
            ));
        }

        out.push_str(&format!("  {:<12} {:>5}\n", "material", self.material_hits));
        for flag in KeywordFlag::ALL {
            out.push_str(&format!(
                "  {:<12} {:>5}\n",
                flag.label(),
                self.flag_count(flag)
            ));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use radie_core::MaterialType;

    #[test]
    fn test_counts() {
        let mut summary = ExtractionSummary::new();

        summary.record_extracted(&ExtractionRecord {
            dose_str: Some("5 Gy".to_string()),
            has_ros: true,
            confidence: 0.3,
            ..Default::default()
        });
        summary.record_extracted(&ExtractionRecord {
            dose_str: Some("2 Gy".to_string()),
            ser: Some(1.3),
            material_type_guess: Some(MaterialType::Oxide),
            confidence: 0.5,
            ..Default::default()
        });
        summary.record_skipped();

        assert_eq!(summary.documents_seen, 3);
        assert_eq!(summary.documents_extracted, 2);
        assert_eq!(summary.documents_skipped, 1);
        assert_eq!(summary.hits(FieldKind::Dose), 2);
        assert_eq!(summary.hits(FieldKind::Ser), 1);
        assert_eq!(summary.hits(FieldKind::Energy), 0);
        assert_eq!(summary.flag_count(KeywordFlag::Ros), 1);
        assert_eq!(summary.material_hits, 1);
        assert!((summary.coverage(FieldKind::Ser) - 0.5).abs() < f32::EPSILON);
        assert!((summary.mean_confidence() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_empty_summary() {
        let summary = ExtractionSummary::new();
        assert_eq!(summary.coverage(FieldKind::Dose), 0.0);
        assert_eq!(summary.mean_confidence(), 0.0);
    }

    #[test]
    fn test_report_lists_fields() {
        let report = ExtractionSummary::new().report();
        assert!(report.contains("Documents: 0 seen"));
        assert!(report.contains("fold_change"));
        assert!(report.contains("RADIOSENS"));
    }
}
