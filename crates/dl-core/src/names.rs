//! Declaration names: SQL tables and the DDlog relations/types derived from them.

use crate::newtype_string::define_newtype_string;

define_newtype_string! {
    /// A SQL table or view name as written in the statement (unquoted).
    pub struct TableName;
}

define_newtype_string! {
    /// Name of a DDlog relation, e.g. `Rt1`.
    pub struct RelationName;
}

define_newtype_string! {
    /// Name of a DDlog record type, e.g. `Tt1`.
    pub struct TypeName;
}

impl TableName {
    /// Key used for catalog lookups; unquoted SQL identifiers are case-insensitive.
    pub fn lookup_key(&self) -> String {
        self.0.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_new_rejects_empty() {
        assert!(TableName::try_new("").is_none());
        assert!(RelationName::try_new("").is_none());
        assert_eq!(TypeName::try_new("Tt1").unwrap(), "Tt1");
    }

    #[test]
    fn test_lookup_key_is_lowercase() {
        assert_eq!(TableName::new("Orders").lookup_key(), "orders");
    }

    #[test]
    fn test_deserialize_rejects_empty() {
        let result: Result<RelationName, _> = serde_yaml::from_str("''");
        assert!(result.is_err());
        let name: RelationName = serde_yaml::from_str("Rt1").unwrap();
        assert_eq!(name.as_str(), "Rt1");
    }
}
