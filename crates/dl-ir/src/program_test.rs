use super::*;
use crate::expr::{BinOp, Literal};
use num_bigint::BigInt;

fn tn(name: &str) -> TypeName {
    TypeName::new(name)
}

fn rn(name: &str) -> RelationName {
    RelationName::new(name)
}

fn t1_record(nullable: bool) -> RecordType {
    RecordType::new(
        tn("Tt1"),
        vec![
            Field::new("column1", Type::signed64(nullable)),
            Field::new("column2", Type::string(nullable)),
        ],
    )
    .unwrap()
}

#[test]
fn test_record_rendering() {
    assert_eq!(
        t1_record(false).to_string(),
        "typedef Tt1 = Tt1{column1:signed<64>, column2:string}"
    );
    assert_eq!(
        t1_record(true).to_string(),
        "typedef Tt1 = Tt1{column1:Option<signed<64>>, column2:Option<string>}"
    );
}

#[test]
fn test_record_rejects_duplicate_field() {
    let err = RecordType::new(
        tn("Tx"),
        vec![
            Field::new("a", Type::boolean(false)),
            Field::new("a", Type::string(false)),
        ],
    )
    .unwrap_err();
    assert!(matches!(err, IrError::DuplicateField { .. }));
}

#[test]
fn test_relation_rendering() {
    assert_eq!(
        Relation::input(rn("Rt1"), tn("Tt1")).to_string(),
        "input relation Rt1[Tt1]"
    );
    assert_eq!(
        Relation::output(rn("Rv"), tn("Tv")).to_string(),
        "output relation Rv[Tv]"
    );
}

#[test]
fn test_identical_record_is_deduplicated() {
    let mut program = Program::default();
    program.add_record(t1_record(false)).unwrap();
    assert!(program.check_record(&t1_record(false)).unwrap());
    program.add_record(t1_record(false)).unwrap();
    assert_eq!(program.records().len(), 1);
}

#[test]
fn test_conflicting_record_rejected() {
    let mut program = Program::default();
    program.add_record(t1_record(false)).unwrap();
    let other = RecordType::new(tn("Tt1"), vec![Field::new("x", Type::double(false))]).unwrap();
    assert!(matches!(
        program.add_record(other),
        Err(IrError::ConflictingRecord { .. })
    ));
    assert_eq!(program.records().len(), 1);
}

#[test]
fn test_relation_requires_record_and_unique_name() {
    let mut program = Program::default();
    assert!(matches!(
        program.add_relation(Relation::input(rn("Rt1"), tn("Tt1"))),
        Err(IrError::UnknownRecord { .. })
    ));

    program.add_record(t1_record(false)).unwrap();
    program
        .add_relation(Relation::input(rn("Rt1"), tn("Tt1")))
        .unwrap();
    assert!(matches!(
        program.add_relation(Relation::input(rn("Rt1"), tn("Tt1"))),
        Err(IrError::DuplicateRelation { .. })
    ));
    assert_eq!(program.relations().len(), 1);
}

#[test]
fn test_rule_rendering_and_validation() {
    let mut program = Program::default();
    program.add_record(t1_record(false)).unwrap();
    program
        .add_relation(Relation::input(rn("Rt1"), tn("Tt1")))
        .unwrap();
    let view = RecordType::new(tn("Tv"), vec![Field::new("column1", Type::signed64(false))])
        .unwrap();
    program.add_record(view).unwrap();

    let rule = Rule {
        head: Atom::new(rn("Rv"), "v1"),
        body: vec![
            BodyTerm::Atom(Atom::new(rn("Rt1"), "v0")),
            BodyTerm::Condition(Expr::binary(
                BinOp::Gt,
                Expr::field("v0", "column1", Type::signed64(false)),
                Literal::int(Type::signed64(false), BigInt::from(5))
                    .unwrap()
                    .into(),
                Type::boolean(false),
            )),
            BodyTerm::Construct {
                var: "v1".into(),
                record: tn("Tv"),
                fields: vec![(
                    "column1".into(),
                    Expr::field("v0", "column1", Type::signed64(false)),
                )],
            },
        ],
    };

    // Head relation not declared yet
    assert!(matches!(
        program.add_rule(rule.clone()),
        Err(IrError::UnknownRelation { .. })
    ));
    program
        .add_relation(Relation::output(rn("Rv"), tn("Tv")))
        .unwrap();
    program.add_rule(rule.clone()).unwrap();

    assert_eq!(
        rule.to_string(),
        "Rv[v1] :- Rt1[v0], (v0.column1 > 64'sd5), var v1 = Tv{.column1 = v0.column1}."
    );
}

fn copy_rule(head: &str, from: &str, record: &str) -> Rule {
    Rule {
        head: Atom::new(rn(head), "v1"),
        body: vec![
            BodyTerm::Atom(Atom::new(rn(from), "v0")),
            BodyTerm::Construct {
                var: "v1".into(),
                record: tn(record),
                fields: vec![(
                    "column1".into(),
                    Expr::field("v0", "column1", Type::signed64(false)),
                )],
            },
        ],
    }
}

#[test]
fn test_declare_view_with_its_rules() {
    let mut program = Program::default();
    program.add_record(t1_record(false)).unwrap();
    program
        .add_relation(Relation::input(rn("Rt1"), tn("Tt1")))
        .unwrap();
    let view = RecordType::new(tn("Tv"), vec![Field::new("column1", Type::signed64(false))])
        .unwrap();

    program
        .declare(
            view,
            Relation::output(rn("Rv"), tn("Tv")),
            vec![copy_rule("Rv", "Rt1", "Tv")],
        )
        .unwrap();
    assert_eq!(program.records().len(), 2);
    assert_eq!(program.relations().len(), 2);
    assert_eq!(program.rules().len(), 1);
}

#[test]
fn test_declare_failure_leaves_program_unchanged() {
    let mut program = Program::default();
    program.add_record(t1_record(false)).unwrap();
    program
        .add_relation(Relation::input(rn("Rt1"), tn("Tt1")))
        .unwrap();
    let before = program.clone();
    let view = RecordType::new(tn("Tv"), vec![Field::new("column1", Type::signed64(false))])
        .unwrap();

    let err = program
        .declare(
            view.clone(),
            Relation::output(rn("Rv"), tn("Tv")),
            vec![
                copy_rule("Rv", "Rt1", "Tv"),
                copy_rule("Rv", "Rmissing", "Tv"),
            ],
        )
        .unwrap_err();
    assert!(matches!(err, IrError::UnknownRelation { ref name } if name == "Rmissing"));
    assert_eq!(program, before);

    let err = program
        .declare(view, Relation::output(rn("Rt1"), tn("Tv")), vec![])
        .unwrap_err();
    assert!(matches!(err, IrError::DuplicateRelation { .. }));
    assert_eq!(program, before);
}

#[test]
fn test_function_rendering() {
    let function = Function {
        name: "unwrap_bool".into(),
        params: vec![("x".into(), Type::boolean(true))],
        ret: Type::boolean(false),
        body: "match (x) { Some{b} -> b, None -> false }".into(),
    };
    assert_eq!(
        function.to_string(),
        "function unwrap_bool(x: Option<bool>): bool { match (x) { Some{b} -> b, None -> false } }"
    );

    let mut program = Program::default();
    program.add_function(function.clone()).unwrap();
    assert!(matches!(
        program.add_function(function),
        Err(IrError::DuplicateFunction { .. })
    ));
}

#[test]
fn test_program_section_layout() {
    let mut program = Program::with_imports(["fp", "time"]);
    assert_eq!(program.to_string(), "import fp\nimport time\n");

    program.add_record(t1_record(false)).unwrap();
    program
        .add_relation(Relation::input(rn("Rt1"), tn("Tt1")))
        .unwrap();
    assert_eq!(
        program.to_string(),
        "import fp\nimport time\n\n\
         typedef Tt1 = Tt1{column1:signed<64>, column2:string}\n\n\
         input relation Rt1[Tt1]\n"
    );
}

#[test]
fn test_empty_program_renders_empty() {
    assert_eq!(Program::default().to_string(), "");
}

#[test]
fn test_rendering_is_repeatable() {
    let mut program = Program::with_imports(["fp"]);
    program.add_record(t1_record(true)).unwrap();
    assert_eq!(program.to_string(), program.to_string());
}

#[test]
fn test_write_to_file_creates_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lib").join("sqlop.dl");
    let program = Program::with_imports(["fp", "time"]);
    program.write_to_file(&path).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, program.to_string());
}
