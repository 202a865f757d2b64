//! Error types for dl-translate

use sqlparser::ast::{Spanned, Statement};
use std::fmt;
use thiserror::Error;

/// Where a failing statement came from.
///
/// Line and column are 1-based; zero means the parser recorded no position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceRef {
    pub text: String,
    pub line: u64,
    pub column: u64,
}

impl SourceRef {
    pub fn from_statement(statement: &Statement) -> Self {
        let start = statement.span().start;
        Self {
            text: statement.to_string(),
            line: start.line,
            column: start.column,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.text.is_empty() {
            return Ok(());
        }
        if self.line > 0 {
            write!(
                f,
                " (at line {}, column {}: {})",
                self.line, self.column, self.text
            )
        } else {
            write!(f, " (in: {})", self.text)
        }
    }
}

/// Translation error
#[derive(Error, Debug)]
pub enum TranslateError {
    /// T001: Statement or expression has no translation rule
    #[error("[T001] Unsupported construct: {construct}{at}")]
    UnsupportedConstruct { construct: String, at: SourceRef },

    /// T002: Operand or column types do not fit together
    #[error("[T002] Type mismatch: {message}{at}")]
    TypeMismatch { message: String, at: SourceRef },

    /// T003: Query reads from a table or view the session does not know
    #[error("[T003] Unknown relation '{name}'{at}")]
    UnknownRelation { name: String, at: SourceRef },

    /// T004: Name is already declared
    #[error("[T004] Duplicate declaration of '{name}'{at}")]
    DuplicateDeclaration { name: String, at: SourceRef },

    /// T005: Column reference matches no column in scope
    #[error("[T005] Unknown column '{column}'{at}")]
    UnknownColumn { column: String, at: SourceRef },

    /// T006: Unqualified column reference matches several tables
    #[error("[T006] Ambiguous column '{column}'{at}")]
    AmbiguousColumn { column: String, at: SourceRef },

    /// T007: IR construction failure not covered by a more specific kind
    #[error("[T007] IR error: {0}")]
    Ir(#[from] dl_ir::IrError),

    /// T008: SQL text could not be parsed
    #[error("[T008] SQL error: {0}")]
    Sql(#[from] dl_sql::SqlError),
}

impl TranslateError {
    pub(crate) fn unsupported(construct: impl Into<String>) -> Self {
        Self::UnsupportedConstruct {
            construct: construct.into(),
            at: SourceRef::default(),
        }
    }

    pub(crate) fn type_mismatch(message: impl Into<String>) -> Self {
        Self::TypeMismatch {
            message: message.into(),
            at: SourceRef::default(),
        }
    }

    pub(crate) fn unknown_relation(name: impl Into<String>) -> Self {
        Self::UnknownRelation {
            name: name.into(),
            at: SourceRef::default(),
        }
    }

    pub(crate) fn duplicate(name: impl Into<String>) -> Self {
        Self::DuplicateDeclaration {
            name: name.into(),
            at: SourceRef::default(),
        }
    }

    pub(crate) fn unknown_column(column: impl Into<String>) -> Self {
        Self::UnknownColumn {
            column: column.into(),
            at: SourceRef::default(),
        }
    }

    pub(crate) fn ambiguous_column(column: impl Into<String>) -> Self {
        Self::AmbiguousColumn {
            column: column.into(),
            at: SourceRef::default(),
        }
    }

    /// Attach the offending statement unless a location is already recorded
    pub(crate) fn with_source(mut self, source: SourceRef) -> Self {
        if let Some(at) = self.source_ref_mut() {
            if at.is_empty() {
                *at = source;
            }
        }
        self
    }

    /// The statement that caused the error, when known
    pub fn source_ref(&self) -> Option<&SourceRef> {
        match self {
            Self::UnsupportedConstruct { at, .. }
            | Self::TypeMismatch { at, .. }
            | Self::UnknownRelation { at, .. }
            | Self::DuplicateDeclaration { at, .. }
            | Self::UnknownColumn { at, .. }
            | Self::AmbiguousColumn { at, .. } => Some(at).filter(|at| !at.is_empty()),
            Self::Ir(_) | Self::Sql(_) => None,
        }
    }

    fn source_ref_mut(&mut self) -> Option<&mut SourceRef> {
        match self {
            Self::UnsupportedConstruct { at, .. }
            | Self::TypeMismatch { at, .. }
            | Self::UnknownRelation { at, .. }
            | Self::DuplicateDeclaration { at, .. }
            | Self::UnknownColumn { at, .. }
            | Self::AmbiguousColumn { at, .. } => Some(at),
            Self::Ir(_) | Self::Sql(_) => None,
        }
    }
}

/// Result type alias for TranslateError
pub type TranslateResult<T> = Result<T, TranslateError>;
