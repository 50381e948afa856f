//! Date pattern inference and correction.
//!
//! Tries an ordered list of day/month/year permutations, numeric first and
//! month-name variants after, each with a separator that must be consistent
//! within the value. A shape match alone is not enough: the candidate format
//! must survive an actual calendar parse before it wins, which is what sends
//! `31-05-1980` to `%d-%m-%Y` instead of `%m-%d-%Y`.

use std::sync::LazyLock;

use chrono::NaiveDate;
use chrono::format::{Item, StrftimeItems};
use regex::Regex;

static NUMERIC_DMY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})([-/. ])(\d{1,2})([-/. ])(\d{4})$").expect("regex"));
static NUMERIC_YMD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})([-/. ])(\d{1,2})([-/. ])(\d{1,2})$").expect("regex"));
static NAME_DMY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})([-/. ])([A-Za-z]{3,9})([-/. ])(\d{4})$").expect("regex")
});
static NAME_MDY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z]{3,9})([-/. ])(\d{1,2})([-/. ])(\d{4})$").expect("regex")
});
static NUMERIC_DMY2: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})([-/. ])(\d{1,2})([-/. ])(\d{2})$").expect("regex"));
static COMPACT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{8}$").expect("regex"));

/// Infer a strftime-style pattern for a raw value, or `None`.
pub fn infer(value: &str) -> Option<String> {
    let trimmed = value.trim();

    if let Some(sep) = captured_separator(&NUMERIC_DMY, trimmed) {
        for template in ["%d_%m_%Y", "%m_%d_%Y"] {
            let format = template.replace('_', sep);
            if parses(trimmed, &format) {
                return Some(format);
            }
        }
    }

    if let Some(sep) = captured_separator(&NUMERIC_YMD, trimmed) {
        let format = format!("%Y{sep}%m{sep}%d");
        if parses(trimmed, &format) {
            return Some(format);
        }
    }

    if let Some(caps) = NAME_DMY.captures(trimmed) {
        let (sep1, sep2) = (&caps[2], &caps[4]);
        if sep1 == sep2 {
            let month = month_specifier(&caps[3]);
            let format = format!("%d{sep1}{month}{sep1}%Y");
            if parses(trimmed, &format) {
                return Some(format);
            }
        }
    }

    if let Some(caps) = NAME_MDY.captures(trimmed) {
        let (sep1, sep2) = (&caps[2], &caps[4]);
        if sep1 == sep2 {
            let month = month_specifier(&caps[1]);
            let format = format!("{month}{sep1}%d{sep1}%Y");
            if parses(trimmed, &format) {
                return Some(format);
            }
        }
    }

    None
}

/// Relaxed inference used for datatype-violation repair.
///
/// Extends the strict grammar with two-digit years and separator-free
/// eight-digit dates, so values like `20191212` become repairable.
pub fn infer_relaxed(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if let Some(format) = infer(trimmed) {
        return Some(format);
    }

    if let Some(sep) = captured_separator(&NUMERIC_DMY2, trimmed) {
        for template in ["%d_%m_%y", "%m_%d_%y", "%y_%m_%d"] {
            let format = template.replace('_', sep);
            if parses(trimmed, &format) {
                return Some(format);
            }
        }
    }

    if COMPACT.is_match(trimmed) {
        for format in ["%Y%m%d", "%d%m%Y", "%m%d%Y"] {
            if parses(trimmed, format) {
                return Some(format.to_string());
            }
        }
    }

    None
}

/// Propose a replacement for a datatype-violated date value.
///
/// Re-runs inference with the relaxed grammar and reformats the parsed date
/// into the field's declared format. `None` when nothing parses or the
/// declared format itself is malformed.
pub fn suggest_datatype(value: &str, declared_format: &str) -> Option<String> {
    let trimmed = value.trim();
    let found = infer_relaxed(trimmed)?;
    let date = NaiveDate::parse_from_str(trimmed, &found).ok()?;
    reformat(date, declared_format)
}

/// Format a date with a caller-supplied template without panicking on a
/// malformed template.
pub fn reformat(date: NaiveDate, format: &str) -> Option<String> {
    let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return None;
    }
    Some(date.format_with_items(items.into_iter()).to_string())
}

/// Parse a value against a field's declared date format.
pub fn parse_with_format(value: &str, format: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), format).ok()
}

fn parses(value: &str, format: &str) -> bool {
    NaiveDate::parse_from_str(value, format).is_ok()
}

fn captured_separator<'v>(regex: &Regex, value: &'v str) -> Option<&'v str> {
    let caps = regex.captures(value)?;
    let sep1 = caps.get(2)?;
    let sep2 = caps.get(4)?;
    if sep1.as_str() != sep2.as_str() {
        return None;
    }
    Some(sep1.as_str())
}

/// Abbreviated names get `%b`, full names `%B`, so the returned pattern
/// reproduces the observed shape when reformatting.
fn month_specifier(token: &str) -> &'static str {
    if token.len() == 3 { "%b" } else { "%B" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_day_month_year_with_dash() {
        assert_eq!(infer("31-05-1980"), Some("%d-%m-%Y".to_string()));
    }

    #[test]
    fn infers_month_day_year_when_day_slot_invalid() {
        // 05-31-1980 cannot be dd-mm (month 31), so the mm-dd permutation wins.
        assert_eq!(infer("05-31-1980"), Some("%m-%d-%Y".to_string()));
    }

    #[test]
    fn infers_iso_order() {
        assert_eq!(infer("1980-05-31"), Some("%Y-%m-%d".to_string()));
        assert_eq!(infer("1980/05/31"), Some("%Y/%m/%d".to_string()));
    }

    #[test]
    fn infers_month_name_variants() {
        assert_eq!(infer("31 May 1980"), Some("%d %b %Y".to_string()));
        assert_eq!(infer("May 31 1980"), Some("%b %d %Y".to_string()));
        assert_eq!(infer("31-January-1980"), Some("%d-%B-%Y".to_string()));
    }

    #[test]
    fn rejects_mixed_separators() {
        assert_eq!(infer("31-05/1980"), None);
    }

    #[test]
    fn rejects_non_dates() {
        assert_eq!(infer("20191212"), None);
        assert_eq!(infer("12.5"), None);
        assert_eq!(infer("hello"), None);
        assert_eq!(infer("31-13-1980"), None);
    }

    #[test]
    fn relaxed_accepts_compact_and_short_years() {
        assert_eq!(infer_relaxed("20191212"), Some("%Y%m%d".to_string()));
        assert_eq!(infer_relaxed("31-05-80"), Some("%d-%m-%y".to_string()));
    }

    #[test]
    fn suggest_reformats_into_declared_format() {
        assert_eq!(
            suggest_datatype("31 May 1980", "%Y-%m-%d"),
            Some("1980-05-31".to_string())
        );
        assert_eq!(
            suggest_datatype("20191212", "%d/%m/%Y"),
            Some("12/12/2019".to_string())
        );
        assert_eq!(suggest_datatype("not a date", "%Y-%m-%d"), None);
    }

    #[test]
    fn reformat_rejects_malformed_template() {
        let date = NaiveDate::from_ymd_opt(1980, 5, 31).expect("date");
        assert_eq!(reformat(date, "%Q-%m"), None);
    }
}
