//! Field validator: wraps one column's descriptor and exposes validation
//! plus correction entry points.
//!
//! `validate` distinguishes the two violation kinds: a cast failure is a
//! datatype violation, a clean cast that fails a declared constraint is a
//! constraint violation. No library error ever escapes this boundary as
//! anything other than [`ValueError`].

use chrono::NaiveDate;

use dqc_model::{FieldDescriptor, MissingValues, StorageType, ValueError};
use dqc_patterns::{date, integer, numerical};

/// A raw value normalized into its declared storage type.
#[derive(Debug, Clone, PartialEq)]
pub enum CastValue {
    Integer(i64),
    Number(f64),
    Date(NaiveDate),
    Boolean(bool),
    Text(String),
}

impl CastValue {
    fn as_f64(&self) -> Option<f64> {
        match self {
            CastValue::Integer(v) => Some(*v as f64),
            CastValue::Number(v) => Some(*v),
            _ => None,
        }
    }
}

/// Validator for one field descriptor.
#[derive(Debug, Clone)]
pub struct FieldValidator {
    descriptor: FieldDescriptor,
    missing: MissingValues,
}

impl FieldValidator {
    pub fn new(descriptor: FieldDescriptor, missing: MissingValues) -> Self {
        Self {
            descriptor,
            missing,
        }
    }

    pub fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }

    pub fn missing_values(&self) -> &MissingValues {
        &self.missing
    }

    pub fn null_literal(&self) -> &str {
        self.missing.null_literal()
    }

    pub fn is_missing(&self, value: &str) -> bool {
        self.missing.contains(value.trim())
    }

    /// Cast the value to the declared storage type, then check constraints.
    pub fn validate(&self, value: &str) -> Result<CastValue, ValueError> {
        let cast = self.cast(value)?;
        self.check_constraints(value, &cast)?;
        Ok(cast)
    }

    /// Datatype-violation repair: apply the type heuristic, then re-validate
    /// the candidate. A repaired value that now violates a constraint chains
    /// into the constraint heuristic. Always returns a value; the null
    /// literal means "no safe correction".
    pub fn suggest_datatype(&self, value: &str) -> String {
        let Some(candidate) = dqc_patterns::suggest_datatype(&self.descriptor, value) else {
            return self.null_literal().to_string();
        };
        match self.validate(&candidate) {
            Ok(_) => candidate,
            Err(error) if error.is_datatype() => self.null_literal().to_string(),
            Err(_) => self.suggest_constraint(&candidate),
        }
    }

    /// Constraint-violation repair. Always returns a value; the null literal
    /// means "no safe correction".
    pub fn suggest_constraint(&self, value: &str) -> String {
        dqc_patterns::suggest_constraint(&self.descriptor, value)
            .unwrap_or_else(|| self.null_literal().to_string())
    }

    fn cast(&self, value: &str) -> Result<CastValue, ValueError> {
        let trimmed = value.trim();
        let datatype_error = || ValueError::DataType {
            value: trimmed.to_string(),
            storage_type: self.descriptor.storage_type.to_string(),
        };
        match self.descriptor.storage_type {
            StorageType::Integer => integer::parse(trimmed, self.descriptor.suffix.as_deref())
                .map(CastValue::Integer)
                .ok_or_else(datatype_error),
            StorageType::Number => numerical::parse(
                trimmed,
                self.descriptor.decimal_char,
                self.descriptor.suffix.as_deref(),
            )
            .map(CastValue::Number)
            .ok_or_else(datatype_error),
            StorageType::Date => date::parse_with_format(trimmed, &self.descriptor.format)
                .map(CastValue::Date)
                .ok_or_else(datatype_error),
            StorageType::Boolean => match trimmed {
                "0" => Ok(CastValue::Boolean(false)),
                "1" => Ok(CastValue::Boolean(true)),
                other if other.eq_ignore_ascii_case("true") => Ok(CastValue::Boolean(true)),
                other if other.eq_ignore_ascii_case("false") => Ok(CastValue::Boolean(false)),
                _ => Err(datatype_error()),
            },
            StorageType::String => Ok(CastValue::Text(trimmed.to_string())),
        }
    }

    /// Check declared `minimum`/`maximum`/`enum` constraints.
    ///
    /// `required` is presence-level and `unique` is table-level; neither is
    /// checked here.
    fn check_constraints(&self, value: &str, cast: &CastValue) -> Result<(), ValueError> {
        let Some(constraints) = self.descriptor.constraints.as_ref() else {
            return Ok(());
        };
        let trimmed = value.trim();
        let violation = |detail: String| ValueError::Constraint {
            value: trimmed.to_string(),
            detail,
        };

        if let Some(enum_values) = constraints.enum_values.as_ref()
            && !enum_values.iter().any(|allowed| allowed == trimmed)
        {
            return Err(violation("not an allowed value".to_string()));
        }
        if let Some(number) = cast.as_f64() {
            if let Some(minimum) = constraints.minimum
                && number < minimum
            {
                return Err(violation(format!("below minimum {minimum}")));
            }
            if let Some(maximum) = constraints.maximum
                && number > maximum
            {
                return Err(violation(format!("above maximum {maximum}")));
            }
        }
        Ok(())
    }
}
