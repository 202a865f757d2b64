//! AST-to-IR lowering: sqlparser statements into DDlog declarations and rules

pub(crate) mod create_table;
pub(crate) mod expr;
pub(crate) mod types;
pub(crate) mod view;

use crate::error::{TranslateError, TranslateResult};
use dl_core::TableName;
use sqlparser::ast::{ObjectName, Statement};

/// Unquoted last part of a possibly schema-qualified name
pub(crate) fn table_name(name: &ObjectName) -> TranslateResult<TableName> {
    name.0
        .last()
        .and_then(|part| part.as_ident())
        .and_then(|ident| TableName::try_new(ident.value.clone()))
        .ok_or_else(|| TranslateError::unsupported(format!("table name {name}")))
}

/// Human-readable name for a statement variant
pub(crate) fn statement_kind(stmt: &Statement) -> &'static str {
    match stmt {
        Statement::Query(_) => "SELECT",
        Statement::Insert(_) => "INSERT",
        Statement::Update { .. } => "UPDATE",
        Statement::Delete(_) => "DELETE",
        Statement::CreateTable(_) => "CREATE TABLE",
        Statement::CreateView { .. } => "CREATE VIEW",
        Statement::CreateIndex { .. } => "CREATE INDEX",
        Statement::AlterTable { .. } => "ALTER TABLE",
        Statement::Drop { .. } => "DROP",
        _ => "statement",
    }
}
