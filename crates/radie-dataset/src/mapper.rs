//! Dataset mapper
//!
//! Projects extraction records onto the columns of a dataset schema. Columns
//! the mapper knows are filled from the record; every other schema column is
//! left missing, and columns outside the schema are never produced.

use radie_core::{ExtractionRecord, KeywordFlag};

use crate::schema::DatasetSchema;
use crate::units::parse_dose_to_gy;

/// Value written to the `extraction_method` column
pub const EXTRACTION_METHOD: &str = "regex_rules_grobid";

/// Column names the mapper fills
pub mod columns {
    pub const MATERIAL_TYPE: &str = "material_type";
    pub const BEAM_TYPE: &str = "beam_type";
    pub const ENERGY: &str = "e_peak_or_MV";
    pub const TOTAL_DOSE: &str = "total_dose_Gy";
    pub const LABEL_TYPE: &str = "label_type";
    pub const CONFIDENCE: &str = "confidence_0_1";
    pub const EXTRACTION_METHOD: &str = "extraction_method";
    pub const PROVENANCE: &str = "provenance";
    pub const NOTES: &str = "notes";
    pub const SENSITIZATION_EFFECT: &str = "Sensitization_Effect_ratio_or_SER";
}

// ============================================================================
// Cells and rows
// ============================================================================

/// A single dataset cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Missing,
    Text(String),
    Number(f64),
}

impl CellValue {
    fn text(value: Option<&str>) -> Self {
        value.map_or(Self::Missing, |v| Self::Text(v.to_string()))
    }

    fn number(value: Option<f64>) -> Self {
        value.map_or(Self::Missing, Self::Number)
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// CSV rendering: missing is empty, integral numbers keep a `.0`
    pub fn to_field(&self) -> String {
        match self {
            Self::Missing => String::new(),
            Self::Text(text) => text.clone(),
            Self::Number(value) => format_number(*value),
        }
    }
}

fn format_number(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// One dataset row, cells in schema order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DatasetRow {
    cells: Vec<(String, CellValue)>,
}

impl DatasetRow {
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &CellValue> {
        self.cells.iter().map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

// ============================================================================
// Mapper
// ============================================================================

/// Maps records onto a fixed schema
#[derive(Debug, Clone)]
pub struct DatasetMapper {
    schema: DatasetSchema,
}

impl DatasetMapper {
    pub fn new(schema: DatasetSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &DatasetSchema {
        &self.schema
    }

    /// Map a single record
    pub fn map_record(&self, record: &ExtractionRecord) -> DatasetRow {
        let cells = self
            .schema
            .columns()
            .iter()
            .map(|column| (column.clone(), map_column(record, column)))
            .collect();
        DatasetRow { cells }
    }

    /// Map records, keeping input order
    pub fn map_records<'a, I>(&self, records: I) -> Vec<DatasetRow>
    where
        I: IntoIterator<Item = &'a ExtractionRecord>,
    {
        records
            .into_iter()
            .map(|record| self.map_record(record))
            .collect()
    }
}

fn map_column(record: &ExtractionRecord, column: &str) -> CellValue {
    match column {
        columns::MATERIAL_TYPE => {
            CellValue::text(record.material_type_guess.map(|m| m.as_str()))
        }
        columns::BEAM_TYPE => CellValue::text(record.beam_type.as_deref()),
        columns::ENERGY => CellValue::text(record.energy_str.as_deref()),
        columns::TOTAL_DOSE => {
            CellValue::number(record.dose_str.as_deref().and_then(parse_dose_to_gy))
        }
        columns::LABEL_TYPE => CellValue::Text(record.label_type.as_str().to_string()),
        columns::CONFIDENCE => CellValue::Number(record.confidence),
        columns::EXTRACTION_METHOD => CellValue::Text(EXTRACTION_METHOD.to_string()),
        columns::PROVENANCE => CellValue::text(record.source_file.as_deref()),
        columns::NOTES => CellValue::Text(notes(record)),
        columns::SENSITIZATION_EFFECT => CellValue::number(record.sensitization_effect()),
        _ => CellValue::Missing,
    }
}

/// `evidence=<json array>`, plus ` | flags=...` when any flag is set
fn notes(record: &ExtractionRecord) -> String {
    let evidence =
        serde_json::to_string(&record.evidence).unwrap_or_else(|_| String::from("[]"));
    let mut notes = format!("evidence={evidence}");

    let flags: Vec<&str> = record
        .active_flags()
        .iter()
        .map(KeywordFlag::label)
        .collect();
    if !flags.is_empty() {
        notes.push_str(" | flags=");
        notes.push_str(&flags.join(","));
    }
    notes
}
