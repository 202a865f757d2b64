//! dl-ir: intermediate representation of a DDlog program
//!
//! Scalar types with a nullability attribute, typed expressions, and the
//! append-only program model that renders to canonical DDlog text.

pub mod error;
pub mod expr;
pub mod program;
pub mod types;

pub use error::{IrError, IrResult};
pub use expr::{BinOp, Expr, Literal, LiteralValue, UnOp};
pub use program::{
    Atom, BodyTerm, Field, Function, Program, RecordType, Relation, RelationRole, Rule,
};
pub use types::{widest, NodeId, Type, TypeKind, SIGNED_ALIAS_WIDTH};
