//! Expression lowering: sqlparser Expr → typed IR Expr
//!
//! Operators on non-nullable operands render as native DDlog operators.
//! As soon as one operand is nullable the operator is replaced by a call to
//! the matching `sqlop` helper, which propagates `None`.

use crate::error::{TranslateError, TranslateResult};
use crate::library::{binary_helper, unary_helper, UNWRAP_BOOL};
use dl_ir::{widest, BinOp, Expr, Literal, RecordType, Type, TypeKind, UnOp};
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use sqlparser::ast::{self, BinaryOperator, UnaryOperator, Value};

/// One `FROM` item visible to expressions: its label and row variable
#[derive(Debug, Clone)]
pub(crate) struct ScopeEntry {
    /// Alias, or the table name when there is no alias
    pub label: String,
    pub var: String,
    pub record: RecordType,
}

/// Column resolution over the `FROM` items in scope
#[derive(Debug, Clone, Copy)]
pub(crate) struct Scope<'a> {
    entries: &'a [ScopeEntry],
}

impl<'a> Scope<'a> {
    pub(crate) fn new(entries: &'a [ScopeEntry]) -> Self {
        Self { entries }
    }

    pub(crate) fn entry(&self, label: &str) -> Option<&'a ScopeEntry> {
        self.entries
            .iter()
            .find(|e| e.label.eq_ignore_ascii_case(label))
    }

    /// Resolve `[table.]column` to a field access on the owning row variable
    pub(crate) fn resolve(&self, table: Option<&str>, column: &str) -> TranslateResult<Expr> {
        let display = match table {
            Some(t) => format!("{t}.{column}"),
            None => column.to_string(),
        };
        let candidates: Vec<&ScopeEntry> = match table {
            Some(t) => self.entry(t).into_iter().collect(),
            None => self.entries.iter().collect(),
        };
        let mut found = None;
        for entry in candidates {
            let Some(field) = entry
                .record
                .fields()
                .iter()
                .find(|f| f.name.eq_ignore_ascii_case(column))
            else {
                continue;
            };
            if found.is_some() {
                return Err(TranslateError::ambiguous_column(display));
            }
            found = Some(Expr::field(&entry.var, &field.name, field.ty.clone()));
        }
        found.ok_or_else(|| TranslateError::unknown_column(display))
    }
}

/// Lower a scalar SQL expression
pub(crate) fn lower_expr(expr: &ast::Expr, scope: &Scope<'_>) -> TranslateResult<Expr> {
    match expr {
        ast::Expr::Identifier(ident) => scope.resolve(None, &ident.value),

        ast::Expr::CompoundIdentifier(idents) => match idents.as_slice() {
            [column] => scope.resolve(None, &column.value),
            [.., table, column] => scope.resolve(Some(&table.value), &column.value),
            [] => Err(TranslateError::unsupported("empty identifier")),
        },

        ast::Expr::Value(val) => lower_value(&val.value),

        ast::Expr::Nested(inner) => lower_expr(inner, scope),

        ast::Expr::BinaryOp { left, op, right } => {
            let op = map_binary_operator(op)?;
            let left = lower_expr(left, scope)?;
            let right = lower_expr(right, scope)?;
            binary(op, left, right)
        }

        ast::Expr::UnaryOp { op, expr: inner } => match op {
            UnaryOperator::Plus => lower_expr(inner, scope),
            UnaryOperator::Minus => {
                // Fold `-5` into a literal so it renders as `-64'sd5`
                if let ast::Expr::Value(val) = inner.as_ref() {
                    if let Value::Number(n, _) = &val.value {
                        return lower_number(&format!("-{n}"));
                    }
                }
                unary(UnOp::Neg, lower_expr(inner, scope)?)
            }
            UnaryOperator::Not => unary(UnOp::Not, lower_expr(inner, scope)?),
            other => Err(TranslateError::unsupported(format!("unary operator {other}"))),
        },

        ast::Expr::IsNull(inner) => is_null(lower_expr(inner, scope)?, false),
        ast::Expr::IsNotNull(inner) => is_null(lower_expr(inner, scope)?, true),

        ast::Expr::Between {
            expr: inner,
            negated,
            low,
            high,
        } => {
            let value = lower_expr(inner, scope)?;
            let low = lower_expr(low, scope)?;
            let high = lower_expr(high, scope)?;
            // NOT BETWEEN: value < low OR value > high
            let (low_op, high_op, combine) = if *negated {
                (BinOp::Lt, BinOp::Gt, BinOp::Or)
            } else {
                (BinOp::Gte, BinOp::Lte, BinOp::And)
            };
            let lower_cmp = binary(low_op, value.clone(), low)?;
            let upper_cmp = binary(high_op, value, high)?;
            binary(combine, lower_cmp, upper_cmp)
        }

        ast::Expr::InList {
            expr: lhs,
            list,
            negated,
        } => {
            let value = lower_expr(lhs, scope)?;
            let (cmp_op, combine) = if *negated {
                (BinOp::Neq, BinOp::And)
            } else {
                (BinOp::Eq, BinOp::Or)
            };
            let mut result: Option<Expr> = None;
            for item in list {
                let cmp = binary(cmp_op, value.clone(), lower_expr(item, scope)?)?;
                result = Some(match result {
                    Some(acc) => binary(combine, acc, cmp)?,
                    None => cmp,
                });
            }
            // Empty list: IN is false, NOT IN is true
            Ok(result.unwrap_or_else(|| Literal::boolean(*negated).into()))
        }

        ast::Expr::Function(func) => Err(TranslateError::unsupported(format!(
            "function call {}",
            func.name
        ))),
        ast::Expr::Cast { .. } => Err(TranslateError::unsupported("CAST")),
        ast::Expr::Case { .. } => Err(TranslateError::unsupported("CASE")),
        ast::Expr::Subquery(_) | ast::Expr::InSubquery { .. } | ast::Expr::Exists { .. } => {
            Err(TranslateError::unsupported("subquery"))
        }
        other => Err(TranslateError::unsupported(format!("expression {other}"))),
    }
}

/// Lower a filter: must be boolean, nullable results are collapsed with
/// `unwrap_bool` so that an unknown outcome rejects the row
pub(crate) fn lower_condition(expr: &ast::Expr, scope: &Scope<'_>) -> TranslateResult<Expr> {
    let lowered = lower_expr(expr, scope)?;
    if !lowered.ty().is_boolean() {
        return Err(TranslateError::type_mismatch(format!(
            "condition {expr} has type {}, expected bool",
            lowered.ty()
        )));
    }
    Ok(collapse_nullable_bool(lowered))
}

pub(crate) fn collapse_nullable_bool(expr: Expr) -> Expr {
    if expr.ty().is_nullable() {
        Expr::call(UNWRAP_BOOL, vec![expr], Type::boolean(false))
    } else {
        expr
    }
}

/// Split a predicate into its top-level `AND` conjuncts
pub(crate) fn conjuncts(expr: &ast::Expr) -> Vec<&ast::Expr> {
    match expr {
        ast::Expr::BinaryOp {
            left,
            op: BinaryOperator::And,
            right,
        } => {
            let mut out = conjuncts(left);
            out.extend(conjuncts(right));
            out
        }
        ast::Expr::Nested(inner) => conjuncts(inner),
        other => vec![other],
    }
}

fn map_binary_operator(op: &BinaryOperator) -> TranslateResult<BinOp> {
    Ok(match op {
        BinaryOperator::Eq => BinOp::Eq,
        BinaryOperator::NotEq => BinOp::Neq,
        BinaryOperator::Lt => BinOp::Lt,
        BinaryOperator::LtEq => BinOp::Lte,
        BinaryOperator::Gt => BinOp::Gt,
        BinaryOperator::GtEq => BinOp::Gte,
        BinaryOperator::And => BinOp::And,
        BinaryOperator::Or => BinOp::Or,
        BinaryOperator::Plus => BinOp::Plus,
        BinaryOperator::Minus => BinOp::Minus,
        BinaryOperator::Multiply => BinOp::Times,
        BinaryOperator::Divide => BinOp::Div,
        BinaryOperator::Modulo => BinOp::Mod,
        BinaryOperator::StringConcat => BinOp::Concat,
        other => {
            return Err(TranslateError::unsupported(format!(
                "binary operator {other}"
            )))
        }
    })
}

fn lower_value(value: &Value) -> TranslateResult<Expr> {
    match value {
        Value::Number(n, _) => lower_number(n),
        Value::SingleQuotedString(s) => Ok(Literal::string(s.clone()).into()),
        Value::Boolean(b) => Ok(Literal::boolean(*b).into()),
        Value::Null => Err(TranslateError::unsupported("NULL literal")),
        other => Err(TranslateError::unsupported(format!("literal {other}"))),
    }
}

/// Integers become `signed<64>` literals, anything with a fraction or
/// exponent a `double`
fn lower_number(text: &str) -> TranslateResult<Expr> {
    if let Ok(value) = text.parse::<BigInt>() {
        return Literal::int(Type::signed64(false), value)
            .map(Expr::from)
            .map_err(|e| TranslateError::type_mismatch(e.to_string()));
    }
    text.parse::<f64>()
        .map(|v| Literal::double(v).into())
        .map_err(|_| TranslateError::unsupported(format!("numeric literal {text}")))
}

/// Bring two bit-vectors of the same signedness to a common width
fn widen(left: Expr, right: Expr) -> (Expr, Expr) {
    let Some(target) = widest(left.ty(), right.ty()) else {
        return (left, right);
    };
    let fit = |e: Expr| match target.width() {
        Some(w) if e.ty().width() != Some(w) => {
            let ty = target.with_nullable(e.ty().is_nullable());
            Expr::cast(e, ty)
        }
        _ => e,
    };
    (fit(left), fit(right))
}

/// Re-type an integer literal facing a `double` operand as a double literal
fn promote_int_literal(left: Expr, right: Expr) -> (Expr, Expr) {
    let to_double = |e: Expr| {
        let value = match &e {
            Expr::Literal(lit) => lit.as_bigint().and_then(|v| v.to_f64()),
            _ => None,
        };
        match value {
            Some(v) => Literal::double(v).into(),
            None => e,
        }
    };
    let is_double = |e: &Expr| e.ty().kind() == TypeKind::Double;
    if is_double(&left) && !is_double(&right) {
        (left, to_double(right))
    } else if is_double(&right) && !is_double(&left) {
        (to_double(left), right)
    } else {
        (left, right)
    }
}

/// Build a typed binary operation, routing nullable operands through the
/// operator library
pub(crate) fn binary(op: BinOp, left: Expr, right: Expr) -> TranslateResult<Expr> {
    let (left, right) = promote_int_literal(left, right);
    let (left, right) = widen(left, right);
    let (lt, rt) = (left.ty().clone(), right.ty().clone());
    let mismatch = || {
        TranslateError::type_mismatch(format!(
            "operator {} cannot combine {lt} and {rt}",
            op.symbol()
        ))
    };

    let ok = if op.is_comparison() {
        lt == rt
    } else if op.is_logical() {
        lt.is_boolean() && rt.is_boolean()
    } else if op == BinOp::Concat {
        lt.is_string() && rt.is_string()
    } else if op == BinOp::Mod {
        lt == rt && lt.is_bit_vector()
    } else {
        lt == rt && lt.is_numeric()
    };
    if !ok {
        return Err(mismatch());
    }

    let nullable = lt.is_nullable() || rt.is_nullable();
    let result = if op.is_comparison() {
        Type::boolean(nullable)
    } else {
        lt.with_nullable(nullable)
    };

    if !nullable {
        return Ok(Expr::binary(op, left, right, result));
    }
    match binary_helper(op, &lt, lt.is_nullable(), rt.is_nullable()) {
        Some(helper) => Ok(Expr::call(helper, vec![left, right], result)),
        None => Err(TranslateError::unsupported(format!(
            "operator {} on nullable {}",
            op.symbol(),
            lt.canonical_name()
        ))),
    }
}

pub(crate) fn unary(op: UnOp, operand: Expr) -> TranslateResult<Expr> {
    let ty = operand.ty().clone();
    let ok = match op {
        UnOp::Not => ty.is_boolean(),
        UnOp::Neg => ty.is_numeric(),
    };
    if !ok {
        return Err(TranslateError::type_mismatch(format!(
            "operator {} cannot apply to {ty}",
            op.symbol()
        )));
    }
    if !ty.is_nullable() {
        return Ok(Expr::unary(op, operand, ty));
    }
    match unary_helper(op, &ty) {
        Some(helper) => Ok(Expr::call(helper, vec![operand], ty)),
        None => Err(TranslateError::unsupported(format!(
            "operator {} on nullable {}",
            op.symbol(),
            ty.canonical_name()
        ))),
    }
}

/// `IS [NOT] NULL`; constant for non-nullable operands
fn is_null(operand: Expr, negated: bool) -> TranslateResult<Expr> {
    if !operand.ty().is_nullable() {
        return Ok(Literal::boolean(negated).into());
    }
    let function = if negated { "is_some" } else { "is_none" };
    Ok(Expr::call(function, vec![operand], Type::boolean(false)))
}

#[cfg(test)]
#[path = "expr_test.rs"]
mod tests;
