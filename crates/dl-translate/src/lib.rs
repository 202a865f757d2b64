//! dl-translate: SQL to DDlog translation
//!
//! A [`Translator`] is one translation session. It lowers `CREATE TABLE`,
//! `CREATE VIEW` and `SELECT` statements into record types, relations and
//! rules, accumulating them into a [`dl_ir::Program`]. The schema independent
//! operator library that generated programs import is produced by
//! [`generate_library`].

pub mod catalog;
pub mod error;
pub mod library;
pub(crate) mod lowering;
pub mod translator;

pub use catalog::{Catalog, CatalogEntry, EntryKind};
pub use error::{SourceRef, TranslateError, TranslateResult};
pub use library::{generate_library, sql_library, write_library};
pub use translator::{IrNode, Translator};
