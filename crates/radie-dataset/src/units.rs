//! Unit normalization

/// Convert a normalized dose string ("5 Gy", "200 mGy") to gray
///
/// The string must be exactly `<value> <unit>`; anything else, including an
/// unknown unit, yields `None`.
pub fn parse_dose_to_gy(dose: &str) -> Option<f64> {
    let mut parts = dose.split_whitespace();
    let (Some(value), Some(unit), None) = (parts.next(), parts.next(), parts.next()) else {
        return None;
    };

    let value: f64 = value.parse().ok()?;
    if value.is_nan() {
        return None;
    }

    match unit.to_lowercase().as_str() {
        "gy" => Some(value),
        "mgy" => Some(value / 1000.0),
        _ => None,
    }
}
