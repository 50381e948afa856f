//! Fuzzy correction of nominal constraint violations.

use strsim::levenshtein;

/// Maximum case-insensitive edit distance accepted for a nominal repair.
pub const MAX_EDIT_DISTANCE: usize = 3;

/// Propose the closest enum member for an out-of-vocabulary nominal value.
///
/// Distance is Levenshtein over case-normalized strings. The minimum-distance
/// candidate wins only when its distance is at most [`MAX_EDIT_DISTANCE`];
/// ties break toward the lexicographically smaller candidate.
pub fn suggest_constraint(value: &str, enum_values: &[String]) -> Option<String> {
    let needle = value.trim().to_lowercase();
    let mut candidates: Vec<&String> = enum_values.iter().collect();
    candidates.sort();

    let mut best: Option<(&String, usize)> = None;
    for candidate in candidates {
        let distance = levenshtein(&needle, &candidate.to_lowercase());
        if best.map(|(_, d)| distance < d).unwrap_or(true) {
            best = Some((candidate, distance));
        }
    }
    match best {
        Some((candidate, distance)) if distance <= MAX_EDIT_DISTANCE => {
            Some(candidate.clone())
        }
        _ => None,
    }
}
