//! Field extractors
//!
//! Each extractor is a pure function of the normalized text. Scalar
//! extractors report only the first match of their own pattern; absence is
//! `None`, never an error.

use regex::Regex;

use radie_core::{FieldKind, KeywordFlag, MaterialType, RadieError, Result};

use crate::patterns::{self, METRIC_SPAN_LIMIT};

/// A successful match: the extracted value and the text that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMatch<T> {
    pub value: T,
    pub span: String,
}

/// First beam descriptor, e.g. "X-ray" or "electron beam"
pub fn beam_type(text: &str) -> Option<FieldMatch<String>> {
    patterns::BEAM.find(text).map(|m| FieldMatch {
        value: m.as_str().to_string(),
        span: m.as_str().to_string(),
    })
}

/// First energy mention, normalized to "<value> <unit>"
pub fn energy(text: &str) -> Option<FieldMatch<String>> {
    measurement(&patterns::ENERGY, text)
}

/// First dose mention, normalized to "<value> <unit>"
pub fn dose(text: &str) -> Option<FieldMatch<String>> {
    measurement(&patterns::DOSE, text)
}

fn measurement(regex: &Regex, text: &str) -> Option<FieldMatch<String>> {
    let caps = regex.captures(text)?;
    let whole = caps.get(0)?;
    let value = caps.get(1)?;
    let unit = caps.get(2)?;

    Some(FieldMatch {
        value: format!("{} {}", value.as_str(), unit.as_str()),
        span: whole.as_str().to_string(),
    })
}

/// First value of one sensitization metric (SER, DEF or SF2)
///
/// Returns `Ok(None)` for fields that are not metrics.
pub fn metric(field: FieldKind, text: &str) -> Result<Option<FieldMatch<f64>>> {
    let Some((_, regex)) = patterns::METRICS.iter().find(|(f, _)| *f == field) else {
        return Ok(None);
    };

    let Some(caps) = regex.captures(text) else {
        return Ok(None);
    };

    let (Some(whole), Some(number)) = (caps.get(0), caps.get(1)) else {
        return Ok(None);
    };

    Ok(Some(FieldMatch {
        value: parse_number(field, number.as_str())?,
        span: truncate_chars(whole.as_str(), METRIC_SPAN_LIMIT),
    }))
}

/// First fold-change value ("3 fold", "2.5x", "4×10")
pub fn fold_change(text: &str) -> Result<Option<FieldMatch<f64>>> {
    let Some(caps) = patterns::FOLD_CHANGE.captures(text) else {
        return Ok(None);
    };

    let (Some(whole), Some(number)) = (caps.get(0), caps.get(1)) else {
        return Ok(None);
    };

    Ok(Some(FieldMatch {
        value: parse_number(FieldKind::FoldChange, number.as_str())?,
        span: whole.as_str().to_string(),
    }))
}

/// Whether any term of a flag's vocabulary occurs
pub fn keyword_flag(flag: KeywordFlag, text: &str) -> bool {
    patterns::FLAGS
        .get(flag)
        .map(|regex| regex.is_match(text))
        .unwrap_or(false)
}

/// Material class by priority: MOF, then oxide, then nanoparticle
pub fn material_type(text: &str) -> Option<MaterialType> {
    patterns::MATERIALS.classify(text)
}

fn parse_number(field: FieldKind, raw: &str) -> Result<f64> {
    raw.parse::<f64>().map_err(|_| RadieError::InvalidNumber {
        field,
        value: raw.to_string(),
    })
}

fn truncate_chars(s: &str, limit: usize) -> String {
    match s.char_indices().nth(limit) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beam_type_variants() {
        assert_eq!(beam_type("using X-ray tubes").unwrap().value, "X-ray");
        assert_eq!(beam_type("an x ray source").unwrap().value, "x ray");
        assert_eq!(beam_type("Xray imaging").unwrap().value, "Xray");
        assert_eq!(beam_type("γ-ray exposure").unwrap().value, "γ-ray");
        assert_eq!(beam_type("Electron Beam").unwrap().value, "Electron Beam");
        assert_eq!(beam_type("e-beam lithography").unwrap().value, "e-beam");
        assert!(beam_type("gammaglobulin").is_none());
        assert!(beam_type("no radiation here").is_none());
    }

    #[test]
    fn test_beam_type_first_occurrence() {
        let found = beam_type("gamma sources and later X-ray tubes").unwrap();
        assert_eq!(found.value, "gamma");
    }

    #[test]
    fn test_energy_first_in_document_order() {
        let found = energy("a 6 MV linac and a 150 keV tube").unwrap();
        assert_eq!(found.value, "6 MV");
        assert_eq!(found.span, "6 MV");
    }

    #[test]
    fn test_energy_keeps_written_case() {
        let found = energy("photons of 1.25mev").unwrap();
        assert_eq!(found.value, "1.25 mev");
        assert_eq!(found.span, "1.25mev");
    }

    #[test]
    fn test_energy_requires_unit_boundary() {
        assert!(energy("150 keVs").is_none());
    }

    #[test]
    fn test_dose_units() {
        assert_eq!(dose("dose of 200 mGy").unwrap().value, "200 mGy");
        assert_eq!(dose("2Gy fractions").unwrap().value, "2 Gy");
        assert!(dose("grey cells").is_none());
    }

    #[test]
    fn test_metric_window() {
        let found = metric(FieldKind::Ser, "an SER value of 1.45 was found").unwrap().unwrap();
        assert_eq!(found.value, 1.45);
        assert_eq!(found.span, "SER value of 1.45");

        // 13 non-digit characters between label and value
        assert!(metric(FieldKind::Ser, "SER is close to 1.2").unwrap().is_none());
    }

    #[test]
    fn test_metrics_are_independent() {
        let text = "SF2 = 0.42 and DEF: 1.8";
        assert!(metric(FieldKind::Ser, text).unwrap().is_none());
        assert_eq!(metric(FieldKind::Def, text).unwrap().unwrap().value, 1.8);
        assert_eq!(metric(FieldKind::Sf2, text).unwrap().unwrap().value, 0.42);
    }

    #[test]
    fn test_metric_ignores_non_metric_fields() {
        assert!(metric(FieldKind::Dose, "SER = 1.2").unwrap().is_none());
    }

    #[test]
    fn test_fold_change() {
        assert_eq!(fold_change("a 3-fold rise").unwrap(), None);
        assert_eq!(fold_change("a 3 fold rise").unwrap().unwrap().value, 3.0);
        assert_eq!(fold_change("rose 2.5x").unwrap().unwrap().value, 2.5);
        assert_eq!(fold_change("increased 4.2-fold").unwrap(), None);
        assert_eq!(fold_change("increased 4.2fold").unwrap().unwrap().span, "4.2fold");
    }

    #[test]
    fn test_keyword_flags() {
        assert!(keyword_flag(KeywordFlag::Ros, "generation of hydroxyl radical species"));
        assert!(keyword_flag(KeywordFlag::Ros, "H2O2 levels"));
        assert!(!keyword_flag(KeywordFlag::Ros, "prose"));
        assert!(keyword_flag(KeywordFlag::Xeol, "X-ray excited optical luminescence"));
        assert!(keyword_flag(
            KeywordFlag::Radiosensitization,
            "a potent radiosensitizer"
        ));
        assert!(!keyword_flag(KeywordFlag::Radiosensitization, "radiotherapy"));
    }

    #[test]
    fn test_material_priority() {
        assert_eq!(
            material_type("hafnium oxide embedded in a UiO-66 MOF"),
            Some(MaterialType::Mof)
        );
        assert_eq!(
            material_type("oxide nanoparticle"),
            Some(MaterialType::Oxide)
        );
        assert_eq!(
            material_type("gold nanorod"),
            Some(MaterialType::Nanoparticle)
        );
        assert_eq!(material_type("plain water"), None);
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("γγγγ", 2), "γγ");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}
