//! Numerical (floating-point) pattern inference.

use std::sync::LazyLock;

use regex::Regex;

use crate::pattern::NumericalPattern;

// Sign, digits, a decimal point or comma, optional fractional digits,
// optional suffix. Integers without a decimal separator are not numerical.
static NUMERICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?\d+([.,])\d*([^\d.,]{1,10}\d{0,3})?$").expect("regex"));

/// Infer a numerical pattern for a raw value, or `None`.
pub fn infer(value: &str) -> Option<NumericalPattern> {
    let caps = NUMERICAL.captures(value.trim())?;
    let decimal_char = caps.get(1).and_then(|m| m.as_str().chars().next())?;
    Some(NumericalPattern {
        decimal_char,
        suffix: caps.get(2).map(|m| m.as_str().to_string()),
    })
}

/// Parse the numeric part of a value, honoring the declared decimal
/// separator and suffix.
pub fn parse(value: &str, decimal_char: Option<char>, suffix: Option<&str>) -> Option<f64> {
    let mut core = value.trim();
    if let Some(suffix) = suffix
        && let Some(stripped) = core.strip_suffix(suffix)
    {
        core = stripped.trim_end();
    }
    let normalized = match decimal_char {
        Some(',') => core.replace(',', "."),
        _ => core.to_string(),
    };
    normalized.parse::<f64>().ok()
}
