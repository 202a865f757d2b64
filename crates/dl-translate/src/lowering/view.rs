//! Query lowering: `CREATE VIEW` / bare `SELECT` → record, output relation, rules
//!
//! Each `SELECT` becomes one rule. `FROM` items bind row variables `v0, v1,
//! ...` in order; the constructed output row takes the next free variable.

use crate::catalog::Catalog;
use crate::error::{TranslateError, TranslateResult};
use crate::lowering::expr::{
    binary, collapse_nullable_bool, conjuncts, lower_condition, lower_expr, Scope, ScopeEntry,
};
use crate::lowering::table_name;
use dl_core::{NamingConfig, TableName};
use dl_ir::{Atom, BinOp, BodyTerm, Expr, Field, NodeId, RecordType, Relation, Rule};
use sqlparser::ast::{
    Distinct, GroupByExpr, JoinConstraint, JoinOperator, Query, Select, SelectItem,
    SelectItemQualifiedWildcardKind, SetExpr, SetOperator, SetQuantifier, TableFactor,
};
use std::collections::HashSet;

/// Declarations produced by one view or query
#[derive(Debug, Clone)]
pub(crate) struct ViewDecl {
    pub table: TableName,
    pub record: RecordType,
    pub relation: Relation,
    pub rules: Vec<Rule>,
}

/// One lowered `SELECT`
#[derive(Debug)]
struct Branch {
    atoms: Vec<Atom>,
    conditions: Vec<Expr>,
    columns: Vec<(String, Expr)>,
}

/// Lower the query defining `table`; `column_names` renames the output
/// columns when non-empty
pub(crate) fn lower_view(
    table: TableName,
    column_names: &[String],
    query: &Query,
    catalog: &Catalog,
    naming: &NamingConfig,
    origin: NodeId,
) -> TranslateResult<ViewDecl> {
    let mut selects = Vec::new();
    collect_selects(query, &mut selects)?;
    let branches = selects
        .into_iter()
        .map(|select| lower_select(select, catalog))
        .collect::<TranslateResult<Vec<_>>>()?;

    let mut fields = unify_columns(&branches)?;
    if !column_names.is_empty() {
        if column_names.len() != fields.len() {
            return Err(TranslateError::type_mismatch(format!(
                "view '{table}' names {} columns but its query produces {}",
                column_names.len(),
                fields.len()
            )));
        }
        for (field, name) in fields.iter_mut().zip(column_names) {
            field.name = name.clone();
        }
    }

    let mut seen = HashSet::new();
    for field in &mut fields {
        if !seen.insert(field.name.to_lowercase()) {
            return Err(TranslateError::duplicate(format!("{table}.{}", field.name)));
        }
        field.ty = field.ty.with_origin(origin);
    }

    let type_name = naming.type_name(&table);
    let relation = Relation::output(naming.relation_name(&table), type_name.clone());

    let rules = branches
        .into_iter()
        .map(|branch| {
            let out = format!("v{}", branch.atoms.len());
            let values = fields
                .iter()
                .zip(branch.columns)
                .map(|(field, (_, value))| {
                    let value = if field.ty.is_nullable() {
                        Expr::wrap(value)
                    } else {
                        value
                    };
                    (field.name.clone(), value)
                })
                .collect();
            let mut body: Vec<BodyTerm> = branch.atoms.into_iter().map(BodyTerm::Atom).collect();
            body.extend(branch.conditions.into_iter().map(BodyTerm::Condition));
            body.push(BodyTerm::Construct {
                var: out.clone(),
                record: type_name.clone(),
                fields: values,
            });
            Rule {
                head: Atom::new(relation.name.clone(), out),
                body,
            }
        })
        .collect();

    let record = RecordType::new(type_name, fields)?;
    Ok(ViewDecl {
        table,
        record,
        relation,
        rules,
    })
}

/// Flatten a query into the `SELECT`s of its `UNION` branches
fn collect_selects<'q>(query: &'q Query, out: &mut Vec<&'q Select>) -> TranslateResult<()> {
    if query.with.is_some() {
        return Err(TranslateError::unsupported("WITH"));
    }
    if query.order_by.is_some() {
        return Err(TranslateError::unsupported("ORDER BY"));
    }
    if query.limit_clause.is_some() {
        return Err(TranslateError::unsupported("LIMIT"));
    }
    if query.fetch.is_some() {
        return Err(TranslateError::unsupported("FETCH"));
    }
    collect_set_expr(&query.body, out)
}

fn collect_set_expr<'q>(body: &'q SetExpr, out: &mut Vec<&'q Select>) -> TranslateResult<()> {
    match body {
        SetExpr::Select(select) => {
            out.push(select.as_ref());
            Ok(())
        }
        SetExpr::Query(query) => collect_selects(query, out),
        SetExpr::SetOperation {
            op,
            set_quantifier,
            left,
            right,
        } => match (op, set_quantifier) {
            (SetOperator::Union, SetQuantifier::None | SetQuantifier::Distinct) => {
                collect_set_expr(left, out)?;
                collect_set_expr(right, out)
            }
            (SetOperator::Union, SetQuantifier::All) => {
                Err(TranslateError::unsupported("UNION ALL"))
            }
            (SetOperator::Union, other) => {
                Err(TranslateError::unsupported(format!("UNION {other}")))
            }
            (other, _) => Err(TranslateError::unsupported(other.to_string())),
        },
        other => Err(TranslateError::unsupported(format!("query body {other}"))),
    }
}

fn lower_select(select: &Select, catalog: &Catalog) -> TranslateResult<Branch> {
    if let Some(Distinct::On(_)) = &select.distinct {
        return Err(TranslateError::unsupported("DISTINCT ON"));
    }
    match &select.group_by {
        GroupByExpr::Expressions(exprs, _) if exprs.is_empty() => {}
        _ => return Err(TranslateError::unsupported("GROUP BY")),
    }
    if select.having.is_some() {
        return Err(TranslateError::unsupported("HAVING"));
    }
    if select.from.is_empty() {
        return Err(TranslateError::unsupported("SELECT without FROM"));
    }

    let mut entries = Vec::new();
    let mut atoms = Vec::new();
    let mut conditions = Vec::new();
    for item in &select.from {
        bind_table(&item.relation, catalog, &mut entries, &mut atoms)?;
        for join in &item.joins {
            bind_table(&join.relation, catalog, &mut entries, &mut atoms)?;
            lower_join_constraint(&join.join_operator, &entries, &mut conditions)?;
        }
    }

    let scope = Scope::new(&entries);
    if let Some(selection) = &select.selection {
        for conjunct in conjuncts(selection) {
            conditions.push(lower_condition(conjunct, &scope)?);
        }
    }

    let columns = lower_projection(&select.projection, &entries)?;
    Ok(Branch {
        atoms,
        conditions,
        columns,
    })
}

/// Resolve a `FROM` item in the catalog and bind the next row variable to it
fn bind_table(
    factor: &TableFactor,
    catalog: &Catalog,
    entries: &mut Vec<ScopeEntry>,
    atoms: &mut Vec<Atom>,
) -> TranslateResult<()> {
    let (name, alias) = match factor {
        TableFactor::Table { name, alias, .. } => (name, alias),
        TableFactor::Derived { .. } => return Err(TranslateError::unsupported("derived table")),
        TableFactor::NestedJoin { .. } => {
            return Err(TranslateError::unsupported("parenthesized join"))
        }
        other => return Err(TranslateError::unsupported(format!("FROM item {other}"))),
    };
    let table = table_name(name)?;
    let entry = catalog
        .get(&table)
        .ok_or_else(|| TranslateError::unknown_relation(table.as_str()))?;

    let label = alias
        .as_ref()
        .map(|a| a.name.value.clone())
        .unwrap_or_else(|| table.to_string());
    if entries.iter().any(|e| e.label.eq_ignore_ascii_case(&label)) {
        return Err(TranslateError::duplicate(label));
    }

    let var = format!("v{}", entries.len());
    atoms.push(Atom::new(entry.relation.clone(), var.clone()));
    entries.push(ScopeEntry {
        label,
        var,
        record: entry.record.clone(),
    });
    Ok(())
}

/// Conditions contributed by the join that bound the last entry
fn lower_join_constraint(
    operator: &JoinOperator,
    entries: &[ScopeEntry],
    conditions: &mut Vec<Expr>,
) -> TranslateResult<()> {
    let constraint = match operator {
        JoinOperator::Join(constraint) | JoinOperator::Inner(constraint) => constraint,
        JoinOperator::CrossJoin(_) => return Ok(()),
        JoinOperator::Left(_)
        | JoinOperator::LeftOuter(_)
        | JoinOperator::Right(_)
        | JoinOperator::RightOuter(_)
        | JoinOperator::FullOuter(_) => return Err(TranslateError::unsupported("outer join")),
        other => return Err(TranslateError::unsupported(format!("join {other:?}"))),
    };

    match constraint {
        JoinConstraint::On(expr) => {
            let scope = Scope::new(entries);
            for conjunct in conjuncts(expr) {
                conditions.push(lower_condition(conjunct, &scope)?);
            }
        }
        JoinConstraint::Using(columns) => {
            for column in columns {
                let Some(ident) = column.0.last().and_then(|part| part.as_ident()) else {
                    return Err(TranslateError::unsupported(format!("USING column {column}")));
                };
                conditions.push(equate_column(entries, &ident.value)?);
            }
        }
        JoinConstraint::Natural => {
            let Some((right, left)) = entries.split_last() else {
                return Ok(());
            };
            let left_scope = Scope::new(left);
            for field in right.record.fields() {
                match left_scope.resolve(None, &field.name) {
                    Ok(_) => conditions.push(equate_column(entries, &field.name)?),
                    Err(TranslateError::UnknownColumn { .. }) => {}
                    Err(e) => return Err(e),
                }
            }
        }
        JoinConstraint::None => {}
    }
    Ok(())
}

/// `left.column == right.column` between the joined entry and those before it
fn equate_column(entries: &[ScopeEntry], column: &str) -> TranslateResult<Expr> {
    let Some((right, left)) = entries.split_last() else {
        return Err(TranslateError::unknown_column(column));
    };
    let lhs = Scope::new(left).resolve(None, column)?;
    let rhs = Scope::new(std::slice::from_ref(right)).resolve(None, column)?;
    Ok(collapse_nullable_bool(binary(BinOp::Eq, lhs, rhs)?))
}

fn lower_projection(
    items: &[SelectItem],
    entries: &[ScopeEntry],
) -> TranslateResult<Vec<(String, Expr)>> {
    let scope = Scope::new(entries);
    let mut columns = Vec::new();
    for item in items {
        match item {
            SelectItem::UnnamedExpr(expr) => {
                let value = lower_expr(expr, &scope)?;
                let name = match &value {
                    Expr::Field { field, .. } => field.clone(),
                    _ => format!("col{}", columns.len()),
                };
                columns.push((name, value));
            }
            SelectItem::ExprWithAlias { expr, alias } => {
                columns.push((alias.value.clone(), lower_expr(expr, &scope)?));
            }
            SelectItem::Wildcard(_) => {
                for entry in entries {
                    push_all_fields(entry, &mut columns);
                }
            }
            SelectItem::QualifiedWildcard(kind, _) => {
                let name = match kind {
                    SelectItemQualifiedWildcardKind::ObjectName(name) => name,
                    SelectItemQualifiedWildcardKind::Expr(expr) => {
                        return Err(TranslateError::unsupported(format!("wildcard on {expr}")))
                    }
                };
                let label = table_name(name)?;
                let entry = scope
                    .entry(label.as_str())
                    .ok_or_else(|| TranslateError::unknown_relation(label.as_str()))?;
                push_all_fields(entry, &mut columns);
            }
        }
    }
    Ok(columns)
}

fn push_all_fields(entry: &ScopeEntry, columns: &mut Vec<(String, Expr)>) {
    for field in entry.record.fields() {
        columns.push((
            field.name.clone(),
            Expr::field(&entry.var, &field.name, field.ty.clone()),
        ));
    }
}

/// Output fields of a `UNION`: named after the first branch, nullable where
/// any branch is
fn unify_columns(branches: &[Branch]) -> TranslateResult<Vec<Field>> {
    let Some((first, rest)) = branches.split_first() else {
        return Err(TranslateError::unsupported("empty query"));
    };
    let mut fields: Vec<Field> = first
        .columns
        .iter()
        .map(|(name, value)| Field::new(name.clone(), value.ty().clone()))
        .collect();

    for branch in rest {
        if branch.columns.len() != fields.len() {
            return Err(TranslateError::type_mismatch(format!(
                "UNION branches produce {} and {} columns",
                fields.len(),
                branch.columns.len()
            )));
        }
        for (field, (_, value)) in fields.iter_mut().zip(&branch.columns) {
            if field.ty != *value.ty() {
                return Err(TranslateError::type_mismatch(format!(
                    "UNION column '{}' is {} in one branch and {} in another",
                    field.name,
                    field.ty.canonical_name(),
                    value.ty().canonical_name()
                )));
            }
            if value.ty().is_nullable() {
                field.ty = field.ty.with_nullable(true);
            }
        }
    }
    Ok(fields)
}

#[cfg(test)]
#[path = "view_test.rs"]
mod tests;
