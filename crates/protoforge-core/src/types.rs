use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic category of a plain record field
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    // Numeric
    Auto,
    SmallInteger,
    Integer,
    BigInteger,
    PositiveSmallInteger,
    PositiveInteger,
    Float,
    Decimal,
    // Boolean
    Boolean,
    NullBoolean,
    // Date and time
    Date,
    Time,
    DateTime,
    Duration,
    // String
    Char,
    Text,
    Email,
    Slug,
    Url,
    Uuid,
    IpAddress,
    FilePath,
    /// Anything the document names that is not listed above
    #[serde(other)]
    Other,
}

impl ScalarKind {
    pub const ALL: [ScalarKind; 23] = [
        ScalarKind::Auto,
        ScalarKind::SmallInteger,
        ScalarKind::Integer,
        ScalarKind::BigInteger,
        ScalarKind::PositiveSmallInteger,
        ScalarKind::PositiveInteger,
        ScalarKind::Float,
        ScalarKind::Decimal,
        ScalarKind::Boolean,
        ScalarKind::NullBoolean,
        ScalarKind::Date,
        ScalarKind::Time,
        ScalarKind::DateTime,
        ScalarKind::Duration,
        ScalarKind::Char,
        ScalarKind::Text,
        ScalarKind::Email,
        ScalarKind::Slug,
        ScalarKind::Url,
        ScalarKind::Uuid,
        ScalarKind::IpAddress,
        ScalarKind::FilePath,
        ScalarKind::Other,
    ];

    pub fn is_temporal(self) -> bool {
        matches!(
            self,
            ScalarKind::Date | ScalarKind::Time | ScalarKind::DateTime | ScalarKind::Duration
        )
    }
}

/// How many related records a relation points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Multiplicity {
    One,
    Many,
}

impl Default for Multiplicity {
    fn default() -> Self {
        Multiplicity::One
    }
}

impl fmt::Display for Multiplicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Multiplicity::One => write!(f, "one"),
            Multiplicity::Many => write!(f, "many"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_kind_falls_back_to_other() {
        let kind: ScalarKind = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(kind, ScalarKind::Other);

        let kind: ScalarKind = serde_json::from_str("\"big_integer\"").unwrap();
        assert_eq!(kind, ScalarKind::BigInteger);
    }

    #[test]
    fn test_multiplicity_names() {
        let many: Multiplicity = serde_json::from_str("\"many\"").unwrap();
        assert_eq!(many, Multiplicity::Many);
        assert_eq!(Multiplicity::default().to_string(), "one");
    }
}
