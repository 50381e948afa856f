//! Turn a resolved pattern plus sample statistics into a field descriptor.

use std::collections::BTreeSet;

use dqc_model::{Constraints, DEFAULT_FORMAT, FieldDescriptor, MipType, StorageType};

use crate::pattern::ValuePattern;

/// Describe a column from its winning pattern and observed distinct values.
///
/// Cardinality policy: integer and text columns with at most `maxlevels`
/// distinct values are reclassified as nominal with an `enum` constraint;
/// integer columns whose values are exactly `{"0", "1"}` become boolean.
/// Numerical and date columns are described directly from the pattern.
pub fn describe(
    name: &str,
    pattern: &ValuePattern,
    uniques: &BTreeSet<String>,
    maxlevels: usize,
) -> FieldDescriptor {
    match pattern {
        ValuePattern::Date(format) => FieldDescriptor {
            name: name.to_string(),
            storage_type: StorageType::Date,
            format: format.clone(),
            miptype: MipType::Date,
            constraints: None,
            suffix: None,
            decimal_char: None,
        },
        ValuePattern::Integer(integer) => {
            let mut descriptor = FieldDescriptor {
                name: name.to_string(),
                storage_type: StorageType::Integer,
                format: DEFAULT_FORMAT.to_string(),
                miptype: MipType::Integer,
                constraints: None,
                suffix: integer.suffix.clone(),
                decimal_char: None,
            };
            if is_boolean(uniques) {
                descriptor.storage_type = StorageType::Boolean;
                descriptor.miptype = MipType::Nominal;
                descriptor.constraints = Some(Constraints::with_enum(sorted(uniques)));
            } else if uniques.len() <= maxlevels {
                descriptor.miptype = MipType::Nominal;
                descriptor.constraints = Some(Constraints::with_enum(sorted(uniques)));
            }
            descriptor
        }
        ValuePattern::Numerical(numerical) => FieldDescriptor {
            name: name.to_string(),
            storage_type: StorageType::Number,
            format: DEFAULT_FORMAT.to_string(),
            miptype: MipType::Numerical,
            constraints: None,
            suffix: numerical.suffix.clone(),
            decimal_char: Some(numerical.decimal_char),
        },
        ValuePattern::Text | ValuePattern::Missing => {
            let mut descriptor = FieldDescriptor::text(name);
            if !uniques.is_empty() && uniques.len() <= maxlevels {
                descriptor.miptype = MipType::Nominal;
                descriptor.constraints = Some(Constraints::with_enum(sorted(uniques)));
            }
            descriptor
        }
    }
}

fn sorted(uniques: &BTreeSet<String>) -> Vec<String> {
    uniques.iter().cloned().collect()
}

fn is_boolean(uniques: &BTreeSet<String>) -> bool {
    uniques.len() == 2 && uniques.contains("0") && uniques.contains("1")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::IntegerPattern;

    fn uniques(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn low_cardinality_integer_becomes_nominal() {
        let descriptor = describe(
            "group",
            &ValuePattern::Integer(IntegerPattern::default()),
            &uniques(&["1", "2", "3"]),
            10,
        );
        assert_eq!(descriptor.miptype, MipType::Nominal);
        assert_eq!(descriptor.storage_type, StorageType::Integer);
        assert_eq!(
            descriptor.enum_values(),
            Some(["1", "2", "3"].map(String::from).as_slice())
        );
    }

    #[test]
    fn zero_one_integer_becomes_boolean() {
        let descriptor = describe(
            "flag",
            &ValuePattern::Integer(IntegerPattern::default()),
            &uniques(&["0", "1"]),
            10,
        );
        assert_eq!(descriptor.storage_type, StorageType::Boolean);
        assert_eq!(descriptor.miptype, MipType::Nominal);
    }

    #[test]
    fn high_cardinality_integer_stays_integer() {
        let values: Vec<String> = (0..50).map(|v| v.to_string()).collect();
        let set: BTreeSet<String> = values.into_iter().collect();
        let descriptor = describe(
            "id",
            &ValuePattern::Integer(IntegerPattern::default()),
            &set,
            10,
        );
        assert_eq!(descriptor.miptype, MipType::Integer);
        assert!(descriptor.constraints.is_none());
    }

    #[test]
    fn date_keeps_inferred_format() {
        let descriptor = describe(
            "visit",
            &ValuePattern::Date("%d/%m/%Y".to_string()),
            &BTreeSet::new(),
            10,
        );
        assert_eq!(descriptor.storage_type, StorageType::Date);
        assert_eq!(descriptor.format, "%d/%m/%Y");
        assert!(descriptor.constraints.is_none());
    }

    #[test]
    fn numerical_never_reclassifies_on_cardinality() {
        let descriptor = describe(
            "score",
            &ValuePattern::Numerical(crate::pattern::NumericalPattern {
                decimal_char: ',',
                suffix: None,
            }),
            &uniques(&["1,5", "2,5"]),
            10,
        );
        assert_eq!(descriptor.miptype, MipType::Numerical);
        assert_eq!(descriptor.decimal_char, Some(','));
        assert!(descriptor.constraints.is_none());
    }

    #[test]
    fn all_missing_column_defaults_to_text() {
        let descriptor = describe("empty", &ValuePattern::Missing, &BTreeSet::new(), 10);
        assert_eq!(descriptor.miptype, MipType::Text);
        assert_eq!(descriptor.storage_type, StorageType::String);
    }
}
