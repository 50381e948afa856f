//! Type pattern library: per-MIPType lexical inference, field description,
//! descriptive statistics and correction heuristics.
//!
//! # Inference priority
//!
//! A single raw value is tested against the type grammars in specificity
//! order (date, then integer, then numerical) and falls back to text.
//! Values found in the missing-value vocabulary resolve to
//! [`ValuePattern::Missing`] before any grammar runs.
//!
//! # Correction contract
//!
//! The `suggest_*` entry points are total: they never panic and report "no
//! safe correction" as `None`, which callers render as the vocabulary's null
//! literal.

pub mod date;
pub mod describe;
pub mod integer;
pub mod nominal;
pub mod numerical;
pub mod pattern;
pub mod profile;

pub use describe::describe;
pub use pattern::{IntegerPattern, NumericalPattern, ValuePattern};
pub use profile::DEFAULT_OUTLIER_SIGMA;

use dqc_model::{FieldDescriptor, MipType, MissingValues, Statistics, StorageType};

/// Resolve the most specific pattern for one raw value.
pub fn infer_value(value: &str, missing: &MissingValues) -> ValuePattern {
    let trimmed = value.trim();
    if missing.contains(trimmed) {
        return ValuePattern::Missing;
    }
    if let Some(format) = date::infer(trimmed) {
        return ValuePattern::Date(format);
    }
    if let Some(pattern) = integer::infer(trimmed) {
        return ValuePattern::Integer(pattern);
    }
    if let Some(pattern) = numerical::infer(trimmed) {
        return ValuePattern::Numerical(pattern);
    }
    ValuePattern::Text
}

/// Datatype-violation repair for a field. `None` when no heuristic applies.
pub fn suggest_datatype(descriptor: &FieldDescriptor, value: &str) -> Option<String> {
    match descriptor.miptype {
        MipType::Date => date::suggest_datatype(value, &descriptor.format),
        MipType::Integer => integer::suggest_datatype(value),
        MipType::Nominal => match descriptor.storage_type {
            StorageType::Integer | StorageType::Boolean => integer::suggest_datatype(value),
            _ => None,
        },
        MipType::Numerical | MipType::Text => None,
    }
}

/// Constraint-violation repair for a field.
///
/// Only nominal fields have a heuristic (fuzzy enum matching); for every
/// other MIPType the only safe outcome is the null literal, reported as
/// `None`.
pub fn suggest_constraint(descriptor: &FieldDescriptor, value: &str) -> Option<String> {
    match descriptor.miptype {
        MipType::Nominal => {
            let enum_values = descriptor.enum_values()?;
            nominal::suggest_constraint(value, enum_values)
        }
        MipType::Date | MipType::Integer | MipType::Numerical | MipType::Text => None,
    }
}

/// Profile a batch of valid values with the profiler matching the field's
/// MIPType.
pub fn profile_field(
    descriptor: &FieldDescriptor,
    pairs: &[(usize, String)],
    outlier_sigma: f64,
) -> Statistics {
    match descriptor.miptype {
        MipType::Integer => profile::integer(pairs, descriptor.suffix.as_deref()),
        MipType::Numerical => profile::numerical(
            pairs,
            descriptor.decimal_char,
            descriptor.suffix.as_deref(),
            outlier_sigma,
        ),
        MipType::Date => profile::date_stats(pairs, &descriptor.format),
        MipType::Nominal | MipType::Text => profile::text(pairs),
    }
}
