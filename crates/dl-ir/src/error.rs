//! Error types for dl-ir

use thiserror::Error;

/// IR construction error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IrError {
    /// IR001: Bit-vector width must be positive
    #[error("[IR001] Invalid bit-vector width: {width}")]
    InvalidWidth { width: u32 },

    /// IR002: Width operations on a type without a width
    #[error("[IR002] Type '{ty}' is not a bit-vector")]
    NotBitVector { ty: String },

    /// IR003: Identity elements requested for a non-numeric type
    #[error("[IR003] Type '{ty}' is not numeric")]
    NotNumeric { ty: String },

    /// IR004: Integer literal does not fit its bit-vector type
    #[error("[IR004] Literal {value} does not fit in type '{ty}'")]
    LiteralOutOfRange { value: String, ty: String },

    /// IR005: Two fields of one record share a name
    #[error("[IR005] Field '{field}' is declared twice in type '{record}'")]
    DuplicateField { record: String, field: String },

    /// IR006: A record type name is already used by a different structure
    #[error("[IR006] Type '{name}' is already declared with a different structure")]
    ConflictingRecord { name: String },

    /// IR007: A relation name is already declared
    #[error("[IR007] Relation '{name}' is already declared")]
    DuplicateRelation { name: String },

    /// IR008: A function name is already declared
    #[error("[IR008] Function '{name}' is already declared")]
    DuplicateFunction { name: String },

    /// IR009: A declaration refers to a record type that is not in the program
    #[error("[IR009] Unknown type '{name}'")]
    UnknownRecord { name: String },

    /// IR010: A rule refers to a relation that is not in the program
    #[error("[IR010] Unknown relation '{name}'")]
    UnknownRelation { name: String },

    /// IR011: Failed to write a rendered program
    #[error("[IR011] Failed to write '{path}': {message}")]
    Write { path: String, message: String },
}

/// Result type alias for IrError
pub type IrResult<T> = Result<T, IrError>;
