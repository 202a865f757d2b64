//! `CREATE TABLE` → record type + input relation

use crate::error::{TranslateError, TranslateResult};
use crate::lowering::table_name;
use crate::lowering::types::lower_data_type;
use dl_core::{NamingConfig, TableName};
use dl_ir::{Field, IrError, NodeId, RecordType, Relation};
use sqlparser::ast::{ColumnOption, CreateTable};
use std::collections::HashSet;

/// Declarations produced by one `CREATE TABLE`
#[derive(Debug, Clone)]
pub(crate) struct TableDecl {
    pub table: TableName,
    pub record: RecordType,
    pub relation: Relation,
}

pub(crate) fn lower_create_table(
    create: &CreateTable,
    naming: &NamingConfig,
    origin: NodeId,
) -> TranslateResult<TableDecl> {
    let table = table_name(&create.name)?;

    if create.query.is_some() {
        return Err(TranslateError::unsupported("CREATE TABLE ... AS SELECT"));
    }
    if create.columns.is_empty() {
        return Err(TranslateError::unsupported(format!(
            "table '{table}' without columns"
        )));
    }
    if !create.constraints.is_empty() {
        log::debug!(
            "Ignoring {} table constraint(s) on '{table}'",
            create.constraints.len()
        );
    }

    let mut seen = HashSet::new();
    let mut fields = Vec::with_capacity(create.columns.len());
    for column in &create.columns {
        let name = column.name.value.clone();
        if !seen.insert(name.to_lowercase()) {
            return Err(TranslateError::duplicate(format!("{table}.{name}")));
        }
        // Only an explicit NOT NULL makes a column non-nullable
        let not_null = column
            .options
            .iter()
            .any(|def| matches!(def.option, ColumnOption::NotNull));
        let ty = lower_data_type(&column.data_type, !not_null)?.with_origin(origin);
        fields.push(Field::new(name, ty));
    }

    let type_name = naming.type_name(&table);
    let record = RecordType::new(type_name.clone(), fields).map_err(|e| match e {
        IrError::DuplicateField { record, field } => {
            TranslateError::duplicate(format!("{record}.{field}"))
        }
        other => TranslateError::Ir(other),
    })?;
    let relation = Relation::input(naming.relation_name(&table), type_name);

    Ok(TableDecl {
        table,
        record,
        relation,
    })
}
