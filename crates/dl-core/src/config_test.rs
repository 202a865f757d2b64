use super::*;

#[test]
fn test_parse_empty_config_uses_defaults() {
    let config = Config::from_yaml("{}").unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.dialect, Dialect::DuckDb);
    assert_eq!(config.naming.relation_prefix, "R");
    assert_eq!(config.naming.type_prefix, "T");
    assert_eq!(config.library_path, "lib/sqlop.dl");
}

#[test]
fn test_parse_full_config() {
    let yaml = r#"
dialect: generic
naming:
  relation_prefix: Rel
  type_prefix: Ty
  query_prefix: q
library_path: out/sqlop.dl
"#;
    let config = Config::from_yaml(yaml).unwrap();
    assert_eq!(config.dialect, Dialect::Generic);
    assert_eq!(config.naming.relation_prefix, "Rel");
    assert_eq!(config.naming.query_prefix, "q");
    assert_eq!(config.library_path, "out/sqlop.dl");
}

#[test]
fn test_unknown_field_rejected() {
    let result = Config::from_yaml("dialect: duckdb\noptimize: true\n");
    assert!(matches!(result, Err(CoreError::ConfigParse(_))));
}

#[test]
fn test_unknown_dialect_rejected() {
    let result = Config::from_yaml("dialect: oracle\n");
    assert!(matches!(result, Err(CoreError::ConfigParse(_))));
}

#[test]
fn test_lowercase_prefix_rejected() {
    let yaml = "naming:\n  relation_prefix: r\n";
    let result = Config::from_yaml(yaml);
    assert!(matches!(result, Err(CoreError::ConfigInvalid { .. })));
}

#[test]
fn test_empty_query_prefix_rejected() {
    let yaml = "naming:\n  query_prefix: ''\n";
    let result = Config::from_yaml(yaml);
    assert!(matches!(result, Err(CoreError::ConfigInvalid { .. })));
}

#[test]
fn test_naming_derivation() {
    let naming = NamingConfig::default();
    let table = TableName::new("t1");
    assert_eq!(naming.relation_name(&table), "Rt1");
    assert_eq!(naming.type_name(&table), "Tt1");
    assert_eq!(naming.query_name(3), "query3");
}

#[test]
fn test_load_from_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("sql2dl.yml"), "dialect: generic\n").unwrap();
    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.dialect, Dialect::Generic);
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = Config::load(&dir.path().join("missing.yml"));
    assert!(matches!(result, Err(CoreError::ConfigNotFound { .. })));
}

#[test]
fn test_library_path_absolute() {
    let config = Config::default();
    let root = std::path::PathBuf::from("/tmp/project");
    assert_eq!(
        config.library_path_absolute(&root),
        root.join("lib/sqlop.dl")
    );
}
