//! Property tests for the correction heuristics.

use proptest::prelude::*;

use dqc_patterns::nominal::{MAX_EDIT_DISTANCE, suggest_constraint};
use dqc_patterns::{ValuePattern, infer_value};
use dqc_model::MissingValues;

proptest! {
    // No constraint heuristic exists for numerical, integer or date fields:
    // the dispatcher must report "no correction" for every input.
    #[test]
    fn non_nominal_constraint_repair_is_always_null(value in ".{0,40}") {
        use dqc_model::{FieldDescriptor, MipType};
        for miptype in [MipType::Numerical, MipType::Integer, MipType::Date] {
            let mut descriptor = FieldDescriptor::text("field");
            descriptor.miptype = miptype;
            prop_assert_eq!(dqc_patterns::suggest_constraint(&descriptor, &value), None);
        }
    }

    // A nominal repair is always a member of the enum, and only within the
    // edit-distance bound.
    #[test]
    fn nominal_repair_stays_inside_enum(
        value in "[a-zA-Z0-9_]{0,12}",
        enum_values in proptest::collection::vec("[a-zA-Z][a-zA-Z0-9]{0,10}", 1..6),
    ) {
        if let Some(suggested) = suggest_constraint(&value, &enum_values) {
            prop_assert!(enum_values.contains(&suggested));
            let distance = strsim::levenshtein(
                &value.trim().to_lowercase(),
                &suggested.to_lowercase(),
            );
            prop_assert!(distance <= MAX_EDIT_DISTANCE);
        }
    }

    // The inference chain is total: every value resolves to exactly one
    // pattern, and values in the vocabulary always resolve to Missing.
    #[test]
    fn inference_is_total(value in ".{0,40}") {
        let missing = MissingValues::default();
        let pattern = infer_value(&value, &missing);
        if missing.contains(value.trim()) {
            prop_assert_eq!(pattern, ValuePattern::Missing);
        } else {
            prop_assert!(!pattern.is_missing());
        }
    }

    // Integer truncation repair always yields a value the integer grammar
    // accepts.
    #[test]
    fn integer_repair_yields_integers(value in "-?[0-9]{1,6}\\.[0-9]{1,4}") {
        let suggested = dqc_patterns::integer::suggest_datatype(&value)
            .expect("float-looking strings are repairable");
        prop_assert!(dqc_patterns::integer::infer(&suggested).is_some());
    }
}
