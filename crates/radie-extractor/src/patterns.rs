//! Pattern tables
//!
//! Every vocabulary the extractors use is declared here as data: ordered
//! lists of `(category, alternatives)` pairs compiled once into
//! case-insensitive regexes. Extending a vocabulary or adding a category is
//! a table edit; the matching code in `fields` never changes.

use once_cell::sync::Lazy;
use regex::Regex;

use radie_core::{FieldKind, KeywordFlag, MaterialType};

/// Decimal number as written in papers ("5", "0.25")
pub const NUMBER: &str = r"([0-9]+(?:\.[0-9]+)?)";

/// Longest gap between a metric label and its value
pub const METRIC_GAP: usize = 12;

/// Metric evidence spans are cut to this many characters
pub const METRIC_SPAN_LIMIT: usize = 120;

// ============================================================================
// Vocabularies
// ============================================================================

/// Beam descriptors, tried as one alternation (leftmost match wins)
pub const BEAM_VOCABULARY: &[&str] = &[
    r"X[- ]?ray",
    r"Xray",
    r"gamma",
    r"γ[- ]?ray",
    r"electron beam",
    r"e[- ]?beam",
];

/// Energy units recognized after a number
pub const ENERGY_UNITS: &[&str] = &["keV", "MeV", "MV"];

/// Dose units recognized after a number
pub const DOSE_UNITS: &[&str] = &["mGy", "Gy"];

/// Multiplier suffixes for fold-change values
pub const FOLD_SUFFIXES: &[&str] = &["x", "×", "fold"];

/// Sensitization metrics, in extractor execution order
pub const METRIC_LABELS: &[(FieldKind, &str)] = &[
    (FieldKind::Ser, "SER"),
    (FieldKind::Def, "DEF"),
    (FieldKind::Sf2, "SF2"),
];

/// Keyword vocabularies for presence flags
pub const FLAG_VOCABULARY: &[(KeywordFlag, &[&str])] = &[
    (
        KeywordFlag::Ros,
        &[
            "ROS",
            "hydroxyl radical",
            "·OH",
            "OH radical",
            "H2O2",
            "superoxide",
            "O2·-",
        ],
    ),
    (
        KeywordFlag::Xeol,
        &["XEOL", "radioluminescence", r"X[- ]?ray excited"],
    ),
    (
        KeywordFlag::Radiosensitization,
        &[
            "radiosensitizer",
            "radiosensitization",
            "enhanced radiotherapy",
        ],
    ),
];

/// Material categories in priority order
pub const MATERIAL_VOCABULARY: &[(MaterialType, &[&str])] = &[
    (
        MaterialType::Mof,
        &[
            "MOF",
            r"metal[- ]?organic framework",
            "UiO",
            r"NU[- ]?1000",
            "ZIF",
        ],
    ),
    (MaterialType::Oxide, &["oxide"]),
    (
        MaterialType::Nanoparticle,
        &["nanoparticle", "NPs", "nanorod", "nanosheet"],
    ),
];

// ============================================================================
// Compiled tables
// ============================================================================

/// Ordered `(category, regex)` pairs; the first matching entry wins
pub struct PatternTable<C> {
    entries: Vec<(C, Regex)>,
}

impl<C: Copy> PatternTable<C> {
    /// Compile each category's alternatives into a word-bounded regex
    pub fn from_vocabulary(vocabulary: &[(C, &[&str])]) -> Result<Self, regex::Error> {
        let entries = vocabulary
            .iter()
            .map(|(category, terms)| keyword_regex(terms).map(|regex| (*category, regex)))
            .collect::<Result<Vec<_>, regex::Error>>()?;

        Ok(Self { entries })
    }

    /// First category, in table order, whose vocabulary occurs in the text
    pub fn classify(&self, text: &str) -> Option<C> {
        self.entries
            .iter()
            .find(|(_, regex)| regex.is_match(text))
            .map(|(category, _)| *category)
    }

    /// Regex for one category
    pub fn get(&self, category: C) -> Option<&Regex>
    where
        C: PartialEq,
    {
        self.entries
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, regex)| regex)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `(?i)\b(?:a|b|c)\b`
pub fn keyword_regex(terms: &[&str]) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"(?i)\b(?:{})\b", terms.join("|")))
}

/// `(?i)NUMBER\s*(unit|...)\b`
pub fn measurement_regex(units: &[&str]) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"(?i){NUMBER}\s*({})\b", units.join("|")))
}

/// `(?i)\bLABEL\b[^0-9]{0,12}NUMBER`
pub fn metric_regex(label: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"(?i)\b{label}\b[^0-9]{{0,{METRIC_GAP}}}{NUMBER}"))
}

pub static BEAM: Lazy<Regex> =
    Lazy::new(|| keyword_regex(BEAM_VOCABULARY).expect("valid beam vocabulary"));

pub static ENERGY: Lazy<Regex> =
    Lazy::new(|| measurement_regex(ENERGY_UNITS).expect("valid energy pattern"));

pub static DOSE: Lazy<Regex> =
    Lazy::new(|| measurement_regex(DOSE_UNITS).expect("valid dose pattern"));

pub static FOLD_CHANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i){NUMBER}\s*(?:{})\b",
        FOLD_SUFFIXES.join("|")
    ))
    .expect("valid fold-change pattern")
});

pub static METRICS: Lazy<Vec<(FieldKind, Regex)>> = Lazy::new(|| {
    METRIC_LABELS
        .iter()
        .map(|(field, label)| (*field, metric_regex(label).expect("valid metric pattern")))
        .collect()
});

pub static FLAGS: Lazy<PatternTable<KeywordFlag>> = Lazy::new(|| {
    PatternTable::from_vocabulary(FLAG_VOCABULARY).expect("valid flag vocabulary")
});

pub static MATERIALS: Lazy<PatternTable<MaterialType>> = Lazy::new(|| {
    PatternTable::from_vocabulary(MATERIAL_VOCABULARY).expect("valid material vocabulary")
});
