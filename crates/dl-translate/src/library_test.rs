use super::*;

#[test]
fn test_library_is_deterministic() {
    assert_eq!(generate_library().to_string(), generate_library().to_string());
    assert_eq!(sql_library().to_string(), generate_library().to_string());
}

#[test]
fn test_library_is_memoized() {
    assert!(std::ptr::eq(sql_library(), sql_library()));
}

#[test]
fn test_library_preamble_and_contents() {
    let lib = generate_library();
    assert_eq!(lib.imports(), ["fp", "time"]);
    assert!(lib.records().is_empty());
    assert!(lib.relations().is_empty());
    assert!(lib.rules().is_empty());

    let text = lib.to_string();
    assert!(text.starts_with("import fp\nimport time\n\nfunction unwrap_bool(x: Option<bool>): bool"));
}

#[test]
fn test_unwrap_bool_maps_none_to_false() {
    let lib = generate_library();
    let unwrap = lib.function(UNWRAP_BOOL).unwrap();
    assert_eq!(
        unwrap.body,
        "match (x) { Some{b} -> b, None -> false }"
    );
}

#[test]
fn test_helper_names() {
    let i64_ty = Type::signed64(false);
    assert_eq!(
        binary_helper(BinOp::Eq, &i64_ty, true, false).as_deref(),
        Some("eq_i64_NR")
    );
    assert_eq!(
        binary_helper(BinOp::Lt, &Type::string(false), false, true).as_deref(),
        Some("lt_str_RN")
    );
    assert_eq!(
        binary_helper(BinOp::And, &Type::boolean(false), true, true).as_deref(),
        Some("and_bool_NN")
    );
    // Both operands present: native operator
    assert_eq!(binary_helper(BinOp::Eq, &i64_ty, false, false), None);
    // No helper for modulo on doubles
    assert_eq!(binary_helper(BinOp::Mod, &Type::double(false), true, true), None);
    assert_eq!(
        unary_helper(UnOp::Not, &Type::boolean(true)).as_deref(),
        Some("not_bool_N")
    );
    assert_eq!(unary_helper(UnOp::Neg, &Type::signed64(false)), None);
}

#[test]
fn test_every_helper_name_is_defined() {
    let lib = generate_library();
    let bases = [
        Type::boolean(false),
        Type::signed64(false),
        Type::double(false),
        Type::string(false),
        Type::date(false),
        Type::time(false),
        Type::date_time(false),
    ];
    for op in BinOp::ALL {
        for base in &bases {
            for (ln, rn) in SHAPES {
                if let Some(name) = binary_helper(op, base, ln, rn) {
                    let function = lib
                        .function(&name)
                        .unwrap_or_else(|| panic!("{name} missing from library"));
                    assert_eq!(function.params.len(), 2);
                    assert_eq!(function.params[0].1.is_nullable(), ln);
                    assert_eq!(function.params[1].1.is_nullable(), rn);
                    assert!(function.ret.is_nullable());
                }
            }
        }
        for base in &bases {
            if let Some(name) = unary_helper(UnOp::Neg, &base.with_nullable(true)) {
                assert!(lib.function(&name).is_some(), "{name} missing");
            }
        }
    }
}

#[test]
fn test_library_function_names_are_unique() {
    let functions = library_functions();
    let mut seen = std::collections::HashSet::new();
    for function in &functions {
        assert!(seen.insert(function.name.as_str()), "{} defined twice", function.name);
    }
    assert_eq!(generate_library().functions().len(), functions.len());
}

#[test]
fn test_comparison_helpers_cover_all_types() {
    let lib = generate_library();
    for token in TOKENS {
        for suffix in ["NN", "NR", "RN"] {
            let name = format!("gte_{token}_{suffix}");
            assert!(lib.function(&name).is_some(), "{name} missing");
        }
    }
}

#[test]
fn test_three_valued_and() {
    let lib = generate_library();
    let and_nr = lib.function("and_bool_NR").unwrap();
    assert_eq!(and_nr.body, "if (r) { l } else { Some{false} }");
    assert_eq!(
        and_nr.to_string(),
        "function and_bool_NR(l: Option<bool>, r: bool): Option<bool> { if (r) { l } else { Some{false} } }"
    );
}

#[test]
fn test_comparison_helper_rendering() {
    let lib = generate_library();
    assert_eq!(
        lib.function("eq_i64_NR").unwrap().to_string(),
        "function eq_i64_NR(l: Option<signed<64>>, r: signed<64>): Option<bool> \
         { match (l) { Some{a} -> Some{a == r}, None -> None } }"
    );
    assert_eq!(
        lib.function("plus_f64_NN").unwrap().to_string(),
        "function plus_f64_NN(l: Option<double>, r: Option<double>): Option<double> \
         { match ((l, r)) { (Some{a}, Some{b}) -> Some{a + b}, _ -> None } }"
    );
}

#[test]
fn test_write_library() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::default();
    let path = write_library(&config, dir.path()).unwrap();
    assert_eq!(path, dir.path().join("lib").join("sqlop.dl"));
    let text = std::fs::read_to_string(path).unwrap();
    assert_eq!(text, sql_library().to_string());
}
