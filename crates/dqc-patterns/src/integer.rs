//! Integer pattern inference and correction.

use std::sync::LazyLock;

use regex::Regex;

use crate::pattern::IntegerPattern;

// Optional sign, digits, optional short non-numeric suffix (units,
// parenthesized text) of up to 10 characters plus up to 3 trailing digits.
static INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?\d+([^\d.,]{1,10}\d{0,3})?$").expect("regex"));

/// Infer an integer pattern for a raw value, or `None`.
///
/// Decimal separators disqualify the value; those belong to the numerical
/// grammar.
pub fn infer(value: &str) -> Option<IntegerPattern> {
    let caps = INTEGER.captures(value.trim())?;
    Some(IntegerPattern {
        suffix: caps.get(1).map(|m| m.as_str().to_string()),
    })
}

/// Parse the numeric part of a value matching an integer pattern.
pub fn parse(value: &str, suffix: Option<&str>) -> Option<i64> {
    let mut core = value.trim();
    if let Some(suffix) = suffix
        && let Some(stripped) = core.strip_suffix(suffix)
    {
        core = stripped.trim_end();
    }
    core.parse::<i64>().ok()
}

/// Propose a replacement for a datatype-violated integer value.
///
/// Truncates a float-looking string toward zero; anything else is
/// unrepairable.
pub fn suggest_datatype(value: &str) -> Option<String> {
    let parsed = value.trim().parse::<f64>().ok()?;
    if !parsed.is_finite() {
        return None;
    }
    Some(format!("{}", parsed.trunc() as i64))
}
