//! Typed expression tree for the DDlog IR

use crate::error::{IrError, IrResult};
use crate::types::{Type, TypeKind};
use num_bigint::{BigInt, Sign};

/// A literal value
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Bool(bool),
    /// Bit-vector value, arbitrary precision
    Int(BigInt),
    Float(f64),
    String(String),
}

/// A literal paired with its type
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    ty: Type,
    value: LiteralValue,
}

impl Literal {
    pub(crate) fn typed(ty: Type, value: LiteralValue) -> Self {
        Self { ty, value }
    }

    pub fn boolean(value: bool) -> Self {
        Self::typed(Type::boolean(false), LiteralValue::Bool(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::typed(Type::string(false), LiteralValue::String(value.into()))
    }

    pub fn double(value: f64) -> Self {
        Self::typed(Type::double(false), LiteralValue::Float(value))
    }

    /// Integer literal of a bit-vector type; the value must fit the width
    pub fn int(ty: Type, value: BigInt) -> IrResult<Self> {
        let Some((lo, hi)) = ty.bounds() else {
            return Err(IrError::NotBitVector { ty: ty.to_string() });
        };
        if value < lo || value > hi {
            return Err(IrError::LiteralOutOfRange {
                value: value.to_string(),
                ty: ty.to_string(),
            });
        }
        Ok(Self::typed(ty, LiteralValue::Int(value)))
    }

    pub fn ty(&self) -> &Type {
        &self.ty
    }

    pub fn value(&self) -> &LiteralValue {
        &self.value
    }

    pub fn as_bigint(&self) -> Option<&BigInt> {
        match &self.value {
            LiteralValue::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self.value {
            LiteralValue::Float(v) => Some(v),
            _ => None,
        }
    }

    fn fmt_value(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            LiteralValue::Bool(b) => write!(f, "{b}"),
            LiteralValue::Int(v) => match self.ty.kind() {
                TypeKind::Signed { width } if v.sign() == Sign::Minus => {
                    write!(f, "-{width}'sd{}", v.magnitude())
                }
                TypeKind::Signed { width } => write!(f, "{width}'sd{v}"),
                TypeKind::Bit { width } => write!(f, "{width}'d{v}"),
                _ => write!(f, "{v}"),
            },
            LiteralValue::Float(v) => write!(f, "64'f{v:?}"),
            LiteralValue::String(s) => write!(f, "\"{}\"", escape_string(s)),
        }
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.ty.is_nullable() {
            f.write_str("Some{")?;
            self.fmt_value(f)?;
            f.write_str("}")
        } else {
            self.fmt_value(f)
        }
    }
}

fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    And,
    Or,
    Plus,
    Minus,
    Times,
    Div,
    Mod,
    /// String concatenation
    Concat,
}

impl BinOp {
    pub const ALL: [BinOp; 14] = [
        BinOp::Eq,
        BinOp::Neq,
        BinOp::Lt,
        BinOp::Lte,
        BinOp::Gt,
        BinOp::Gte,
        BinOp::And,
        BinOp::Or,
        BinOp::Plus,
        BinOp::Minus,
        BinOp::Times,
        BinOp::Div,
        BinOp::Mod,
        BinOp::Concat,
    ];

    /// DDlog spelling of the operator
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Eq => "==",
            BinOp::Neq => "!=",
            BinOp::Lt => "<",
            BinOp::Lte => "<=",
            BinOp::Gt => ">",
            BinOp::Gte => ">=",
            BinOp::And => "and",
            BinOp::Or => "or",
            BinOp::Plus => "+",
            BinOp::Minus => "-",
            BinOp::Times => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Concat => "++",
        }
    }

    /// Prefix of the library helper implementing this operator on nullable operands
    pub fn helper_stem(self) -> &'static str {
        match self {
            BinOp::Eq => "eq",
            BinOp::Neq => "neq",
            BinOp::Lt => "lt",
            BinOp::Lte => "lte",
            BinOp::Gt => "gt",
            BinOp::Gte => "gte",
            BinOp::And => "and",
            BinOp::Or => "or",
            BinOp::Plus => "plus",
            BinOp::Minus => "minus",
            BinOp::Times => "times",
            BinOp::Div => "div",
            BinOp::Mod => "mod",
            BinOp::Concat => "concat",
        }
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinOp::Eq | BinOp::Neq | BinOp::Lt | BinOp::Lte | BinOp::Gt | BinOp::Gte
        )
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinOp::And | BinOp::Or)
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinOp::Plus | BinOp::Minus | BinOp::Times | BinOp::Div | BinOp::Mod
        )
    }
}

impl std::fmt::Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnOp {
    Not,
    Neg,
}

impl UnOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnOp::Not => "not",
            UnOp::Neg => "-",
        }
    }

    pub fn helper_stem(self) -> &'static str {
        match self {
            UnOp::Not => "not",
            UnOp::Neg => "neg",
        }
    }
}

/// Typed expression. Every node carries its type from construction on.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),

    /// Field of a rule variable, `v0.column1`
    Field { var: String, field: String, ty: Type },

    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
        ty: Type,
    },

    Unary {
        op: UnOp,
        operand: Box<Expr>,
        ty: Type,
    },

    /// Function call, used for library helpers and `std` predicates
    Call {
        function: String,
        args: Vec<Expr>,
        ty: Type,
    },

    /// Bit-vector width conversion, `(e as signed<64>)`
    Cast { operand: Box<Expr>, ty: Type },

    /// Lift a non-null value into `Option`, `Some{e}`
    Wrap { operand: Box<Expr>, ty: Type },
}

impl Expr {
    pub fn field(var: impl Into<String>, field: impl Into<String>, ty: Type) -> Self {
        Expr::Field {
            var: var.into(),
            field: field.into(),
            ty,
        }
    }

    pub fn binary(op: BinOp, left: Expr, right: Expr, ty: Type) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
            ty,
        }
    }

    pub fn unary(op: UnOp, operand: Expr, ty: Type) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
            ty,
        }
    }

    pub fn call(function: impl Into<String>, args: Vec<Expr>, ty: Type) -> Self {
        Expr::Call {
            function: function.into(),
            args,
            ty,
        }
    }

    /// Convert a bit-vector expression to another width of the same signedness
    pub fn cast(operand: Expr, ty: Type) -> Self {
        Expr::Cast {
            operand: Box::new(operand),
            ty,
        }
    }

    /// Wrap a value in `Some{}`; already-nullable expressions are returned as is
    pub fn wrap(operand: Expr) -> Self {
        if operand.ty().is_nullable() {
            return operand;
        }
        let ty = operand.ty().with_nullable(true);
        Expr::Wrap {
            operand: Box::new(operand),
            ty,
        }
    }

    pub fn ty(&self) -> &Type {
        match self {
            Expr::Literal(lit) => lit.ty(),
            Expr::Field { ty, .. }
            | Expr::Binary { ty, .. }
            | Expr::Unary { ty, .. }
            | Expr::Call { ty, .. }
            | Expr::Cast { ty, .. }
            | Expr::Wrap { ty, .. } => ty,
        }
    }
}

impl From<Literal> for Expr {
    fn from(lit: Literal) -> Self {
        Expr::Literal(lit)
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Literal(lit) => write!(f, "{lit}"),
            Expr::Field { var, field, .. } => write!(f, "{var}.{field}"),
            Expr::Binary {
                op, left, right, ..
            } => write!(f, "({left} {op} {right})"),
            Expr::Unary { op, operand, .. } => write!(f, "({} {operand})", op.symbol()),
            Expr::Call { function, args, .. } => {
                write!(f, "{function}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
            Expr::Cast { operand, ty } => write!(f, "({operand} as {})", ty.canonical_name()),
            Expr::Wrap { operand, .. } => write!(f, "Some{{{operand}}}"),
        }
    }
}

#[cfg(test)]
#[path = "expr_test.rs"]
mod tests;
