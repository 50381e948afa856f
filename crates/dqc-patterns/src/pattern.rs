use dqc_model::MipType;

/// Canonical pattern resolved for one raw value.
///
/// Patterns are the unit the schema inference engine tallies per column, so
/// two values with the same lexical shape must produce equal patterns.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValuePattern {
    /// strftime-style template embedding the observed separator.
    Date(String),
    Integer(IntegerPattern),
    Numerical(NumericalPattern),
    Text,
    /// Value found in the missing-value vocabulary ("nan").
    Missing,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IntegerPattern {
    /// Short non-numeric suffix (units, parenthesized text), if any.
    pub suffix: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NumericalPattern {
    /// Decimal separator observed in the value (`.` or `,`).
    pub decimal_char: char,
    pub suffix: Option<String>,
}

impl ValuePattern {
    pub fn miptype(&self) -> Option<MipType> {
        match self {
            ValuePattern::Date(_) => Some(MipType::Date),
            ValuePattern::Integer(_) => Some(MipType::Integer),
            ValuePattern::Numerical(_) => Some(MipType::Numerical),
            ValuePattern::Text => Some(MipType::Text),
            ValuePattern::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, ValuePattern::Missing)
    }
}
