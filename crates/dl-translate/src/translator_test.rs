use super::*;

fn session() -> Translator {
    let mut t = Translator::default();
    t.translate_sql("CREATE TABLE t1 (id INTEGER NOT NULL, name VARCHAR(10))")
        .unwrap();
    t
}

#[test]
fn test_new_session_has_preamble_only() {
    let t = Translator::default();
    assert_eq!(
        t.program().to_string(),
        "import fp\nimport time\nimport sql\nimport sqlop\n"
    );
    assert!(t.catalog().is_empty());
}

#[test]
fn test_statement_log() {
    let mut t = session();
    assert!(t.statement_text(NodeId(0)).unwrap().starts_with("CREATE TABLE t1"));
    assert!(t.statement_text(NodeId(1)).is_none());

    // Failed statements are not logged
    assert!(t.translate_sql("CREATE TABLE t1 (x INTEGER)").is_err());
    assert!(t.statement_text(NodeId(1)).is_none());

    t.translate_sql("CREATE VIEW v AS SELECT id FROM t1").unwrap();
    assert!(t.statement_text(NodeId(1)).unwrap().starts_with("CREATE VIEW v"));
    assert_eq!(t.catalog().get("v").unwrap().origin, NodeId(1));
}

#[test]
fn test_bare_selects_get_query_names() {
    let mut t = session();
    let first = t.translate_sql("SELECT id FROM t1").unwrap();
    assert_eq!(first.relation().name, "Rquery0");
    let second = t.translate_sql("SELECT name FROM t1").unwrap();
    assert_eq!(second.relation().name, "Rquery1");
    assert_eq!(t.catalog().get("query1").unwrap().kind, EntryKind::View);
}

#[test]
fn test_explicit_query_name_is_skipped() {
    let mut t = session();
    t.translate_sql("CREATE VIEW query0 AS SELECT id FROM t1")
        .unwrap();
    let node = t.translate_sql("SELECT id FROM t1").unwrap();
    assert_eq!(node.relation().name, "Rquery1");
}

#[test]
fn test_errors_carry_statement_text() {
    let mut t = session();
    let err = t
        .translate_sql("CREATE VIEW v AS SELECT id FROM nowhere")
        .unwrap_err();
    let source = err.source_ref().unwrap();
    assert!(source.text.contains("nowhere"));
    assert!(err.to_string().starts_with("[T003] Unknown relation 'nowhere'"));
}

#[test]
fn test_unsupported_statement() {
    let mut t = session();
    let err = t.translate_sql("DROP TABLE t1").unwrap_err();
    assert!(matches!(err, TranslateError::UnsupportedConstruct { .. }));
    assert_eq!(t.catalog().len(), 1);
}

#[test]
fn test_parse_errors_are_sql_errors() {
    let mut t = Translator::default();
    let err = t.translate_sql("CREATE TABLE (").unwrap_err();
    assert!(matches!(err, TranslateError::Sql(_)));
    assert!(err.source_ref().is_none());
}

#[test]
fn test_redeclared_view_is_duplicate() {
    let mut t = session();
    t.translate_sql("CREATE VIEW v AS SELECT id FROM t1").unwrap();
    let before = t.snapshot();
    let err = t
        .translate_sql("CREATE VIEW v AS SELECT name FROM t1")
        .unwrap_err();
    assert!(matches!(err, TranslateError::DuplicateDeclaration { .. }));
    assert_eq!(t.program().to_string(), before.to_string());
}

#[test]
fn test_custom_naming() {
    let config = Config::from_yaml(
        "naming:\n  relation_prefix: Rel_\n  type_prefix: Row_\n",
    )
    .unwrap();
    let mut t = Translator::new(config);
    let node = t.translate_sql("CREATE TABLE t (a BOOLEAN NOT NULL)").unwrap();
    assert_eq!(node.to_string(), "input relation Rel_t[Row_t]");
}

#[test]
fn test_ir_node_display() {
    let mut t = session();
    let node = t
        .translate_sql("CREATE VIEW v AS SELECT id FROM t1 WHERE id > 0")
        .unwrap();
    assert_eq!(
        node.to_string(),
        "output relation Rv[Tv]\nRv[v1] :- Rt1[v0], (v0.id > 64'sd0), var v1 = Tv{.id = v0.id}."
    );
}
