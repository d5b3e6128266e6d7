//! Radie Core - Domain models, configuration, and shared types
//!
//! This crate defines the types shared by every stage of the pipeline:
//! - The per-document extraction record and its evidence trail
//! - Field, flag, material and label-tier vocabularies
//! - Common error types
//! - Configuration management

pub mod config;

pub use config::{AppConfig, ConfigError, ExtractionConfig, LoggingConfig, PathsConfig};

use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for radie operations
#[derive(Error, Debug)]
pub enum RadieError {
    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("Invalid number for {field}: {value:?}")]
    InvalidNumber { field: FieldKind, value: String },

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, RadieError>;

// ============================================================================
// Vocabularies
// ============================================================================

/// Scalar fields that leave an evidence entry when they match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FieldKind {
    #[serde(rename = "beam_type")]
    BeamType,
    #[serde(rename = "energy")]
    Energy,
    #[serde(rename = "dose")]
    Dose,
    #[serde(rename = "SER")]
    Ser,
    #[serde(rename = "DEF")]
    Def,
    #[serde(rename = "SF2")]
    Sf2,
    #[serde(rename = "fold_change")]
    FoldChange,
}

impl FieldKind {
    /// All fields, in extractor execution order
    pub const ALL: [FieldKind; 7] = [
        Self::BeamType,
        Self::Energy,
        Self::Dose,
        Self::Ser,
        Self::Def,
        Self::Sf2,
        Self::FoldChange,
    ];

    /// Get the string representation used in evidence entries
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BeamType => "beam_type",
            Self::Energy => "energy",
            Self::Dose => "dose",
            Self::Ser => "SER",
            Self::Def => "DEF",
            Self::Sf2 => "SF2",
            Self::FoldChange => "fold_change",
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Presence-only keyword flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordFlag {
    Ros,
    Xeol,
    Radiosensitization,
}

impl KeywordFlag {
    /// Flags in the order they are reported in dataset notes
    pub const ALL: [KeywordFlag; 3] = [Self::Ros, Self::Xeol, Self::Radiosensitization];

    /// Short label used in dataset notes
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ros => "ROS",
            Self::Xeol => "XEOL",
            Self::Radiosensitization => "RADIOSENS",
        }
    }
}

impl std::fmt::Display for KeywordFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Material class guessed from keywords
///
/// Categories are checked in declaration order; the first one whose
/// vocabulary matches wins:
/// - `Mof`: metal-organic frameworks
/// - `Oxide`: metal oxides
/// - `Nanoparticle`: generic nanostructures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialType {
    #[serde(rename = "MOF")]
    Mof,
    #[serde(rename = "oxide")]
    Oxide,
    #[serde(rename = "nanoparticle")]
    Nanoparticle,
}

impl MaterialType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mof => "MOF",
            Self::Oxide => "oxide",
            Self::Nanoparticle => "nanoparticle",
        }
    }
}

impl std::fmt::Display for MaterialType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Provenance tier of a record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LabelType {
    /// Heuristic, unverified extraction
    #[default]
    Bronze,
    /// Manually curated
    Gold,
}

impl LabelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bronze => "Bronze",
            Self::Gold => "Gold",
        }
    }
}

impl std::fmt::Display for LabelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Extraction Record
// ============================================================================

/// Confidence assigned to a record before any field matched
pub const BASE_CONFIDENCE: f64 = 0.2;

/// The literal text that triggered a field match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    pub field: FieldKind,
    pub span: String,
}

impl Evidence {
    pub fn new(field: FieldKind, span: impl Into<String>) -> Self {
        Self {
            field,
            span: span.into(),
        }
    }
}

/// Everything extracted from one source document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionRecord {
    /// Guessed material class; `None` when no vocabulary matched
    #[serde(default, deserialize_with = "material_or_none")]
    pub material_type_guess: Option<MaterialType>,

    /// First beam descriptor found in the text
    pub beam_type: Option<String>,

    /// First energy mention, as "<value> <unit>"
    pub energy_str: Option<String>,

    /// First dose mention, as "<value> <unit>"
    pub dose_str: Option<String>,

    #[serde(rename = "has_ROS", default)]
    pub has_ros: bool,

    #[serde(rename = "has_XEOL", default)]
    pub has_xeol: bool,

    #[serde(default)]
    pub has_radiosensitization: bool,

    #[serde(rename = "SER")]
    pub ser: Option<f64>,

    #[serde(rename = "DEF")]
    pub def: Option<f64>,

    #[serde(rename = "SF2")]
    pub sf2: Option<f64>,

    pub fold_change: Option<f64>,

    /// One entry per matched field, in extractor order
    #[serde(default, deserialize_with = "null_as_default")]
    pub evidence: Vec<Evidence>,

    /// Aggregate confidence in `[0, 0.95]`
    #[serde(default = "default_confidence", deserialize_with = "null_as_base_confidence")]
    pub confidence: f64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub label_type: LabelType,

    /// Originating document, set by the caller
    #[serde(alias = "file")]
    pub source_file: Option<String>,
}

impl Default for ExtractionRecord {
    fn default() -> Self {
        Self {
            material_type_guess: None,
            beam_type: None,
            energy_str: None,
            dose_str: None,
            has_ros: false,
            has_xeol: false,
            has_radiosensitization: false,
            ser: None,
            def: None,
            sf2: None,
            fold_change: None,
            evidence: Vec::new(),
            confidence: BASE_CONFIDENCE,
            label_type: LabelType::Bronze,
            source_file: None,
        }
    }
}

impl ExtractionRecord {
    /// Set the source document identifier
    pub fn with_source_file(mut self, source_file: impl Into<String>) -> Self {
        self.source_file = Some(source_file.into());
        self
    }

    /// Whether a keyword flag is set
    pub fn has_flag(&self, flag: KeywordFlag) -> bool {
        match flag {
            KeywordFlag::Ros => self.has_ros,
            KeywordFlag::Xeol => self.has_xeol,
            KeywordFlag::Radiosensitization => self.has_radiosensitization,
        }
    }

    /// Active flags, in reporting order
    pub fn active_flags(&self) -> Vec<KeywordFlag> {
        KeywordFlag::ALL
            .into_iter()
            .filter(|flag| self.has_flag(*flag))
            .collect()
    }

    /// Single sensitization value with priority SER > DEF > SF2
    pub fn sensitization_effect(&self) -> Option<f64> {
        self.ser.or(self.def).or(self.sf2)
    }

    /// Whether a scalar field was populated
    pub fn has_field(&self, field: FieldKind) -> bool {
        match field {
            FieldKind::BeamType => self.beam_type.is_some(),
            FieldKind::Energy => self.energy_str.is_some(),
            FieldKind::Dose => self.dose_str.is_some(),
            FieldKind::Ser => self.ser.is_some(),
            FieldKind::Def => self.def.is_some(),
            FieldKind::Sf2 => self.sf2.is_some(),
            FieldKind::FoldChange => self.fold_change.is_some(),
        }
    }
}

fn default_confidence() -> f64 {
    BASE_CONFIDENCE
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts a material label, `null`, or the literal `"none"`
fn material_or_none<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<MaterialType>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawMaterial {
        Known(MaterialType),
        Other(String),
    }

    match Option::<RawMaterial>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawMaterial::Known(material)) => Ok(Some(material)),
        Some(RawMaterial::Other(label)) if label == "none" => Ok(None),
        Some(RawMaterial::Other(label)) => Err(serde::de::Error::unknown_variant(
            &label,
            &["MOF", "oxide", "nanoparticle", "none"],
        )),
    }
}

fn null_as_base_confidence<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(BASE_CONFIDENCE))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_with_exact_field_names() {
        let record = ExtractionRecord {
            has_ros: true,
            ser: Some(1.5),
            evidence: vec![Evidence::new(FieldKind::Ser, "SER = 1.5")],
            ..Default::default()
        }
        .with_source_file("paper.tei.xml");

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["has_ROS"], serde_json::json!(true));
        assert_eq!(json["SER"], serde_json::json!(1.5));
        assert_eq!(json["DEF"], serde_json::Value::Null);
        assert_eq!(json["material_type_guess"], serde_json::Value::Null);
        assert_eq!(json["label_type"], serde_json::json!("Bronze"));
        assert_eq!(json["source_file"], serde_json::json!("paper.tei.xml"));
        assert_eq!(
            json["evidence"],
            serde_json::json!([{"field": "SER", "span": "SER = 1.5"}])
        );
    }

    #[test]
    fn test_record_deserialize_defaults() {
        let record: ExtractionRecord = serde_json::from_str(r#"{"file": "a.tei.xml"}"#).unwrap();

        assert_eq!(record.source_file.as_deref(), Some("a.tei.xml"));
        assert_eq!(record.label_type, LabelType::Bronze);
        assert_eq!(record.confidence, BASE_CONFIDENCE);
        assert!(record.evidence.is_empty());
        assert!(!record.has_xeol);
    }

    #[test]
    fn test_record_deserialize_nulls() {
        let record: ExtractionRecord =
            serde_json::from_str(r#"{"label_type": null, "confidence": null, "evidence": null}"#)
                .unwrap();

        assert_eq!(record.label_type, LabelType::Bronze);
        assert_eq!(record.confidence, BASE_CONFIDENCE);
    }

    #[test]
    fn test_material_none_reads_as_absent() {
        for raw in [r#"{"material_type_guess": "none"}"#, r#"{"material_type_guess": null}"#] {
            let record: ExtractionRecord = serde_json::from_str(raw).unwrap();
            assert_eq!(record.material_type_guess, None);
        }

        let record: ExtractionRecord =
            serde_json::from_str(r#"{"material_type_guess": "oxide"}"#).unwrap();
        assert_eq!(record.material_type_guess, Some(MaterialType::Oxide));

        let unknown = r#"{"material_type_guess": "glass"}"#;
        assert!(serde_json::from_str::<ExtractionRecord>(unknown).is_err());
    }

    #[test]
    fn test_material_type_names() {
        assert_eq!(serde_json::to_string(&MaterialType::Mof).unwrap(), "\"MOF\"");
        assert_eq!(MaterialType::Nanoparticle.to_string(), "nanoparticle");
    }

    #[test]
    fn test_sensitization_priority() {
        let record = ExtractionRecord {
            def: Some(2.0),
            sf2: Some(0.4),
            ..Default::default()
        };
        assert_eq!(record.sensitization_effect(), Some(2.0));

        let record = ExtractionRecord {
            sf2: Some(0.4),
            ..Default::default()
        };
        assert_eq!(record.sensitization_effect(), Some(0.4));
    }

    #[test]
    fn test_active_flags_order() {
        let record = ExtractionRecord {
            has_radiosensitization: true,
            has_ros: true,
            ..Default::default()
        };
        assert_eq!(
            record.active_flags(),
            vec![KeywordFlag::Ros, KeywordFlag::Radiosensitization]
        );
    }

    #[test]
    fn test_label_type_ordering() {
        assert!(LabelType::Bronze < LabelType::Gold);
    }
}
