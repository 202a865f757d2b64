//! The `sqlop` operator library
//!
//! SQL operators over nullable operands propagate `NULL`; DDlog's native
//! operators are two-valued. Every operator the translator applies to an
//! `Option` operand is routed through a helper defined here. Helpers are
//! named `<stem>_<type>_<NN|NR|RN>`: `N` marks a nullable operand and `R` a
//! required (non-null) one, left then right.

use crate::error::TranslateResult;
use dl_core::Config;
use dl_ir::{BinOp, Function, Program, Type, TypeKind, UnOp, SIGNED_ALIAS_WIDTH};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Modules imported by the library itself
pub const LIBRARY_IMPORTS: [&str; 2] = ["fp", "time"];

/// Collapses a nullable boolean filter to two-valued logic
pub const UNWRAP_BOOL: &str = "unwrap_bool";

/// Operand type tokens, in generation order
const TOKENS: [&str; 7] = ["bool", "i64", "f64", "str", "date", "time", "datetime"];

/// Operand shapes that need a helper
const SHAPES: [(bool, bool); 3] = [(true, true), (true, false), (false, true)];

/// Helper name token for a base type
pub(crate) fn type_token(ty: &Type) -> Option<&'static str> {
    match ty.kind() {
        TypeKind::Boolean => Some("bool"),
        TypeKind::Signed { width } if width == SIGNED_ALIAS_WIDTH => Some("i64"),
        TypeKind::Double => Some("f64"),
        TypeKind::String => Some("str"),
        TypeKind::Date => Some("date"),
        TypeKind::Time => Some("time"),
        TypeKind::DateTime => Some("datetime"),
        TypeKind::Signed { .. } | TypeKind::Bit { .. } => None,
    }
}

fn token_type(token: &str) -> Option<Type> {
    match token {
        "bool" => Some(Type::boolean(false)),
        "i64" => Some(Type::signed64(false)),
        "f64" => Some(Type::double(false)),
        "str" => Some(Type::string(false)),
        "date" => Some(Type::date(false)),
        "time" => Some(Type::time(false)),
        "datetime" => Some(Type::date_time(false)),
        _ => None,
    }
}

/// Whether the library defines `op` over operands of `token`
fn defines_binary(op: BinOp, token: &str) -> bool {
    match op {
        op if op.is_comparison() => true,
        BinOp::And | BinOp::Or => token == "bool",
        BinOp::Plus | BinOp::Minus | BinOp::Times | BinOp::Div => {
            matches!(token, "i64" | "f64")
        }
        BinOp::Mod => token == "i64",
        BinOp::Concat => token == "str",
        _ => false,
    }
}

fn defines_unary(op: UnOp, token: &str) -> bool {
    match op {
        UnOp::Not => token == "bool",
        UnOp::Neg => matches!(token, "i64" | "f64"),
    }
}

fn shape_suffix(left_nullable: bool, right_nullable: bool) -> Option<&'static str> {
    match (left_nullable, right_nullable) {
        (true, true) => Some("NN"),
        (true, false) => Some("NR"),
        (false, true) => Some("RN"),
        (false, false) => None,
    }
}

/// Name of the helper implementing `op` on operands of type `operand`.
///
/// `None` when neither operand is nullable (the native operator applies) or
/// when the library has no helper for this operator and type.
pub fn binary_helper(
    op: BinOp,
    operand: &Type,
    left_nullable: bool,
    right_nullable: bool,
) -> Option<String> {
    let suffix = shape_suffix(left_nullable, right_nullable)?;
    let token = type_token(operand)?;
    defines_binary(op, token).then(|| format!("{}_{token}_{suffix}", op.helper_stem()))
}

/// Name of the helper implementing `op` on a nullable operand
pub fn unary_helper(op: UnOp, operand: &Type) -> Option<String> {
    if !operand.is_nullable() {
        return None;
    }
    let token = type_token(operand)?;
    defines_unary(op, token).then(|| format!("{}_{token}_N", op.helper_stem()))
}

fn binary_result(op: BinOp, operand: &Type) -> Type {
    if op.is_comparison() {
        Type::boolean(false)
    } else {
        operand.with_nullable(false)
    }
}

/// Body of a binary helper: pattern match out the present values, apply
/// the native operator
fn binary_body(op: BinOp, left_nullable: bool, right_nullable: bool) -> String {
    let sym = op.symbol();
    match (op, left_nullable, right_nullable) {
        (BinOp::And, true, true) => "match ((l, r)) { (Some{false}, _) -> Some{false}, \
             (_, Some{false}) -> Some{false}, (Some{true}, Some{true}) -> Some{true}, \
             _ -> None }"
            .to_string(),
        (BinOp::And, true, false) => "if (r) { l } else { Some{false} }".to_string(),
        (BinOp::And, false, true) => "if (l) { r } else { Some{false} }".to_string(),
        (BinOp::Or, true, true) => "match ((l, r)) { (Some{true}, _) -> Some{true}, \
             (_, Some{true}) -> Some{true}, (Some{false}, Some{false}) -> Some{false}, \
             _ -> None }"
            .to_string(),
        (BinOp::Or, true, false) => "if (r) { Some{true} } else { l }".to_string(),
        (BinOp::Or, false, true) => "if (l) { Some{true} } else { r }".to_string(),
        (_, true, true) => {
            format!("match ((l, r)) {{ (Some{{a}}, Some{{b}}) -> Some{{a {sym} b}}, _ -> None }}")
        }
        (_, true, false) => {
            format!("match (l) {{ Some{{a}} -> Some{{a {sym} r}}, None -> None }}")
        }
        _ => format!("match (r) {{ Some{{b}} -> Some{{l {sym} b}}, None -> None }}"),
    }
}

fn unary_body(op: UnOp) -> String {
    format!(
        "match (x) {{ Some{{a}} -> Some{{{} a}}, None -> None }}",
        op.symbol()
    )
}

/// Build the operator library.
///
/// Schema independent and deterministic: every call returns the same
/// program. Prefer [`sql_library`] to reuse one instance per process.
pub fn generate_library() -> Program {
    let mut program = Program::with_imports(LIBRARY_IMPORTS);
    for function in library_functions() {
        let added = program.add_function(function);
        debug_assert!(added.is_ok(), "operator library helper defined twice: {added:?}");
    }
    log::debug!(
        "Generated operator library with {} functions",
        program.functions().len()
    );
    program
}

/// Every library function, in rendering order
fn library_functions() -> Vec<Function> {
    let mut functions = vec![Function {
        name: UNWRAP_BOOL.to_string(),
        params: vec![("x".to_string(), Type::boolean(true))],
        ret: Type::boolean(false),
        body: "match (x) { Some{b} -> b, None -> false }".to_string(),
    }];

    for op in BinOp::ALL {
        for token in TOKENS {
            let Some(base) = token_type(token) else {
                continue;
            };
            if !defines_binary(op, token) {
                continue;
            }
            for (ln, rn) in SHAPES {
                let Some(name) = binary_helper(op, &base, ln, rn) else {
                    continue;
                };
                functions.push(Function {
                    name,
                    params: vec![
                        ("l".to_string(), base.with_nullable(ln)),
                        ("r".to_string(), base.with_nullable(rn)),
                    ],
                    ret: binary_result(op, &base).with_nullable(true),
                    body: binary_body(op, ln, rn),
                });
            }
        }
    }

    for op in [UnOp::Not, UnOp::Neg] {
        for token in TOKENS {
            let Some(base) = token_type(token) else {
                continue;
            };
            let nullable = base.with_nullable(true);
            let Some(name) = unary_helper(op, &nullable) else {
                continue;
            };
            functions.push(Function {
                name,
                params: vec![("x".to_string(), nullable.clone())],
                ret: nullable,
                body: unary_body(op),
            });
        }
    }

    functions
}

/// Process-wide operator library, generated on first use
pub fn sql_library() -> &'static Program {
    static LIBRARY: OnceLock<Program> = OnceLock::new();
    LIBRARY.get_or_init(generate_library)
}

/// Write the operator library to `config.library_path` under `root`
pub fn write_library(config: &Config, root: &Path) -> TranslateResult<PathBuf> {
    let path = config.library_path_absolute(root);
    sql_library().write_to_file(&path)?;
    Ok(path)
}

#[cfg(test)]
#[path = "library_test.rs"]
mod tests;
