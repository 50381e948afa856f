//! Descriptive statistics per MIPType.
//!
//! Profilers are purely descriptive: they parse already-validated values and
//! never fail. A batch with zero parseable values yields an empty map.

use std::collections::BTreeMap;

use dqc_model::{StatValue, Statistics};

use crate::{date, integer as integer_pattern, numerical as numerical_pattern};

/// Default number of standard deviations beyond which a numerical value is
/// reported as an outlier.
pub const DEFAULT_OUTLIER_SIGMA: f64 = 3.0;

/// Number of entries in the top/bottom frequency lists.
pub const FREQUENCY_LIST_LEN: usize = 5;

/// Mode, min, max, quartiles, mean and sample standard deviation of an
/// integer batch.
///
/// Min, max and mode are taken from the parsed `i64` values directly, so
/// they stay exact beyond the range `f64` can represent; only the derived
/// moments and quantiles go through floating point.
pub fn integer(pairs: &[(usize, String)], suffix: Option<&str>) -> Statistics {
    let mut values: Vec<i64> = pairs
        .iter()
        .filter_map(|(_, raw)| integer_pattern::parse(raw, suffix))
        .collect();
    let mut stats = Statistics::new();
    if values.is_empty() {
        return stats;
    }
    values.sort_unstable();
    let floats: Vec<f64> = values.iter().map(|&v| v as f64).collect();

    stats.insert("count".to_string(), StatValue::Int(values.len() as i64));
    stats.insert("min".to_string(), StatValue::Int(values[0]));
    stats.insert("max".to_string(), StatValue::Int(values[values.len() - 1]));
    if let Some(mean) = mean(&floats) {
        stats.insert("mean".to_string(), StatValue::Float(mean));
    }
    if let Some(std) = sample_std(&floats) {
        stats.insert("std".to_string(), StatValue::Float(std));
    }
    stats.insert("q1".to_string(), StatValue::Float(quantile(&floats, 0.25)));
    stats.insert(
        "median".to_string(),
        StatValue::Float(quantile(&floats, 0.5)),
    );
    stats.insert("q3".to_string(), StatValue::Float(quantile(&floats, 0.75)));
    if let Some(mode) = mode_of_sorted(&values) {
        stats.insert("mode".to_string(), StatValue::Int(mode));
    }
    stats
}

/// Numerical batch summary plus outlier rows outside mean ± sigma·std.
pub fn numerical(
    pairs: &[(usize, String)],
    decimal_char: Option<char>,
    suffix: Option<&str>,
    outlier_sigma: f64,
) -> Statistics {
    let parsed: Vec<(usize, f64)> = pairs
        .iter()
        .filter_map(|(row, raw)| {
            numerical_pattern::parse(raw, decimal_char, suffix).map(|v| (*row, v))
        })
        .collect();
    let values: Vec<f64> = parsed.iter().map(|(_, v)| *v).collect();
    let mut stats = numeric_summary(&values);
    if let (Some(mean), Some(std)) = (mean(&values), sample_std(&values))
        && std > 0.0
    {
        let outliers: Vec<usize> = parsed
            .iter()
            .filter(|(_, v)| (v - mean).abs() > outlier_sigma * std)
            .map(|(row, _)| *row)
            .collect();
        if !outliers.is_empty() {
            stats.insert("outliers".to_string(), StatValue::Rows(outliers));
        }
    }
    stats
}

/// Min, max and mode of a date batch, reported in the field's format.
pub fn date_stats(pairs: &[(usize, String)], format: &str) -> Statistics {
    let mut dates: Vec<chrono::NaiveDate> = pairs
        .iter()
        .filter_map(|(_, raw)| date::parse_with_format(raw, format))
        .collect();
    let mut stats = Statistics::new();
    if dates.is_empty() {
        return stats;
    }
    dates.sort();
    stats.insert("count".to_string(), StatValue::Int(dates.len() as i64));
    let render = |d: chrono::NaiveDate| {
        date::reformat(d, format).unwrap_or_else(|| d.format("%Y-%m-%d").to_string())
    };
    stats.insert("min".to_string(), StatValue::Text(render(dates[0])));
    stats.insert(
        "max".to_string(),
        StatValue::Text(render(dates[dates.len() - 1])),
    );
    if let Some(mode) = mode_of_sorted(&dates) {
        stats.insert("mode".to_string(), StatValue::Text(render(mode)));
    }
    stats
}

/// Frequency profile of a text or nominal batch: distinct count plus top-k
/// and bottom-k value frequencies.
pub fn text(pairs: &[(usize, String)]) -> Statistics {
    let mut stats = Statistics::new();
    if pairs.is_empty() {
        return stats;
    }
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for (_, raw) in pairs {
        *counts.entry(raw.as_str()).or_default() += 1;
    }
    stats.insert("count".to_string(), StatValue::Int(pairs.len() as i64));
    stats.insert("unique".to_string(), StatValue::Int(counts.len() as i64));

    // Most frequent first; ties resolve lexicographically via the BTreeMap.
    let mut by_frequency: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(value, count)| (value.to_string(), count))
        .collect();
    by_frequency.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let top: Vec<(String, usize)> = by_frequency.iter().take(FREQUENCY_LIST_LEN).cloned().collect();
    let bottom: Vec<(String, usize)> = by_frequency
        .iter()
        .rev()
        .take(FREQUENCY_LIST_LEN)
        .cloned()
        .collect();
    stats.insert("top".to_string(), StatValue::Frequencies(top));
    stats.insert("bottom".to_string(), StatValue::Frequencies(bottom));
    stats
}

fn numeric_summary(values: &[f64]) -> Statistics {
    let mut stats = Statistics::new();
    if values.is_empty() {
        return stats;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    stats.insert("count".to_string(), StatValue::Int(values.len() as i64));
    stats.insert("min".to_string(), StatValue::Float(sorted[0]));
    stats.insert("max".to_string(), StatValue::Float(sorted[sorted.len() - 1]));
    if let Some(mean) = mean(values) {
        stats.insert("mean".to_string(), StatValue::Float(mean));
    }
    if let Some(std) = sample_std(values) {
        stats.insert("std".to_string(), StatValue::Float(std));
    }
    stats.insert("q1".to_string(), StatValue::Float(quantile(&sorted, 0.25)));
    stats.insert(
        "median".to_string(),
        StatValue::Float(quantile(&sorted, 0.5)),
    );
    stats.insert("q3".to_string(), StatValue::Float(quantile(&sorted, 0.75)));
    if let Some(mode) = mode_of_sorted(&sorted) {
        stats.insert("mode".to_string(), StatValue::Float(mode));
    }
    stats
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation with ddof = 1. `None` for fewer than two values.
fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some((sum_sq / (values.len() - 1) as f64).sqrt())
}

/// Linear-interpolation quantile over a sorted slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Most frequent element of a sorted slice; ties resolve to the smallest.
fn mode_of_sorted<T: PartialEq + Copy>(sorted: &[T]) -> Option<T> {
    let mut best: Option<(T, usize)> = None;
    let mut index = 0;
    while index < sorted.len() {
        let value = sorted[index];
        let mut run = 1;
        while index + run < sorted.len() && sorted[index + run] == value {
            run += 1;
        }
        if best.map(|(_, n)| run > n).unwrap_or(true) {
            best = Some((value, run));
        }
        index += run;
    }
    best.map(|(value, _)| value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(values: &[&str]) -> Vec<(usize, String)> {
        values
            .iter()
            .enumerate()
            .map(|(idx, v)| (idx + 1, (*v).to_string()))
            .collect()
    }

    #[test]
    fn integer_summary() {
        let stats = integer(&pairs(&["1", "2", "2", "4"]), None);
        assert_eq!(stats["count"], StatValue::Int(4));
        assert_eq!(stats["min"], StatValue::Int(1));
        assert_eq!(stats["max"], StatValue::Int(4));
        assert_eq!(stats["mode"], StatValue::Int(2));
        assert_eq!(stats["median"], StatValue::Float(2.0));
        let std = stats["std"].as_f64().expect("std");
        assert!((std - 1.258_305_739_211_791_6).abs() < 1e-9);
    }

    #[test]
    fn integer_summary_is_exact_beyond_f64_precision() {
        // 2^53 + 1 is not representable as f64; min/max/mode must not drift.
        let big = "9007199254740993";
        let stats = integer(&pairs(&[big, big, "3"]), None);
        assert_eq!(stats["max"], StatValue::Int(9_007_199_254_740_993));
        assert_eq!(stats["mode"], StatValue::Int(9_007_199_254_740_993));
        assert_eq!(stats["min"], StatValue::Int(3));
    }

    #[test]
    fn empty_batch_is_empty_map() {
        assert!(integer(&[], None).is_empty());
        assert!(text(&[]).is_empty());
        assert!(date_stats(&[], "%Y-%m-%d").is_empty());
    }

    #[test]
    fn numerical_flags_outliers() {
        let mut raw: Vec<&str> = vec!["10.0"; 20];
        raw[4] = "10.4";
        raw[9] = "1000.0";
        let stats = numerical(&pairs(&raw), Some('.'), None, DEFAULT_OUTLIER_SIGMA);
        assert_eq!(stats["outliers"], StatValue::Rows(vec![10]));
    }

    #[test]
    fn date_summary_uses_field_format() {
        let stats = date_stats(
            &pairs(&["2019-01-02", "2019-05-01", "2019-01-02"]),
            "%Y-%m-%d",
        );
        assert_eq!(stats["min"], StatValue::Text("2019-01-02".to_string()));
        assert_eq!(stats["max"], StatValue::Text("2019-05-01".to_string()));
        assert_eq!(stats["mode"], StatValue::Text("2019-01-02".to_string()));
    }

    #[test]
    fn text_frequencies() {
        let stats = text(&pairs(&["a", "b", "a", "c", "a", "b"]));
        assert_eq!(stats["count"], StatValue::Int(6));
        assert_eq!(stats["unique"], StatValue::Int(3));
        match &stats["top"] {
            StatValue::Frequencies(top) => {
                assert_eq!(top[0], ("a".to_string(), 3));
                assert_eq!(top[1], ("b".to_string(), 2));
            }
            other => panic!("unexpected top value: {other:?}"),
        }
    }
}
