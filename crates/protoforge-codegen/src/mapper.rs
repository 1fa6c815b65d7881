use protoforge_core::ScalarKind;
use std::collections::BTreeMap;

/// IDL type used for any kind without an entry in the table
pub const DEFAULT_SCALAR: &str = "string";

const SCALAR_TABLE: &[(ScalarKind, &str)] = &[
    // Numeric
    (ScalarKind::Auto, "int32"),
    (ScalarKind::SmallInteger, "int32"),
    (ScalarKind::Integer, "int32"),
    (ScalarKind::BigInteger, "int64"),
    (ScalarKind::PositiveSmallInteger, "int32"),
    (ScalarKind::PositiveInteger, "int32"),
    (ScalarKind::Float, "float"),
    (ScalarKind::Decimal, "string"),
    // Boolean
    (ScalarKind::Boolean, "bool"),
    (ScalarKind::NullBoolean, "bool"),
    // Date and time
    (ScalarKind::Date, "string"),
    (ScalarKind::Time, "string"),
    (ScalarKind::DateTime, "string"),
    (ScalarKind::Duration, "string"),
    // String
    (ScalarKind::Char, "string"),
    (ScalarKind::Text, "string"),
    (ScalarKind::Email, "string"),
    (ScalarKind::Slug, "string"),
    (ScalarKind::Url, "string"),
    (ScalarKind::Uuid, "string"),
    (ScalarKind::IpAddress, "string"),
    (ScalarKind::FilePath, "string"),
];

/// Maps scalar kinds to IDL scalar type names
#[derive(Debug, Clone, Default)]
pub struct ScalarTypeMapper {
    overrides: BTreeMap<ScalarKind, String>,
}

impl ScalarTypeMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_overrides(overrides: BTreeMap<ScalarKind, String>) -> Self {
        Self { overrides }
    }

    pub fn map(&self, kind: ScalarKind) -> &str {
        if let Some(name) = self.overrides.get(&kind) {
            return name;
        }
        SCALAR_TABLE
            .iter()
            .find(|(k, _)| *k == kind)
            .map_or(DEFAULT_SCALAR, |(_, name)| *name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table() {
        let mapper = ScalarTypeMapper::new();
        assert_eq!(mapper.map(ScalarKind::Auto), "int32");
        assert_eq!(mapper.map(ScalarKind::BigInteger), "int64");
        assert_eq!(mapper.map(ScalarKind::Float), "float");
        assert_eq!(mapper.map(ScalarKind::NullBoolean), "bool");
        assert_eq!(mapper.map(ScalarKind::Decimal), "string");
        assert_eq!(mapper.map(ScalarKind::Email), "string");
    }

    #[test]
    fn test_every_kind_maps() {
        let mapper = ScalarTypeMapper::new();
        for kind in ScalarKind::ALL {
            assert!(!mapper.map(kind).is_empty());
            if kind.is_temporal() {
                assert_eq!(mapper.map(kind), "string");
            }
        }
        assert_eq!(mapper.map(ScalarKind::Other), DEFAULT_SCALAR);
    }

    #[test]
    fn test_override_wins() {
        let mut overrides = BTreeMap::new();
        overrides.insert(ScalarKind::Decimal, "double".to_string());
        overrides.insert(ScalarKind::Other, "bytes".to_string());
        let mapper = ScalarTypeMapper::with_overrides(overrides);
        assert_eq!(mapper.map(ScalarKind::Decimal), "double");
        assert_eq!(mapper.map(ScalarKind::Other), "bytes");
        assert_eq!(mapper.map(ScalarKind::Integer), "int32");
    }
}
