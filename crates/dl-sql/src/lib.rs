//! dl-sql - SQL parsing layer for sql2dl
//!
//! Wraps sqlparser-rs with the dialects the translator accepts, selected by
//! `dl_core::Dialect`. The translator consumes the resulting
//! `sqlparser::ast::Statement` values.

pub mod error;
pub mod parser;

pub use error::{SqlError, SqlResult};
pub use parser::SqlParser;
