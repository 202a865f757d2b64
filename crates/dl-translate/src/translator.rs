//! Translation session: catalog, statement log and the accumulated program

use crate::catalog::{Catalog, CatalogEntry, EntryKind};
use crate::error::{SourceRef, TranslateError, TranslateResult};
use crate::lowering::create_table::lower_create_table;
use crate::lowering::view::lower_view;
use crate::lowering::{statement_kind, table_name};
use dl_core::{Config, TableName};
use dl_ir::{IrError, NodeId, Program, RecordType, Relation, Rule};
use dl_sql::SqlParser;
use sqlparser::ast::{Query, Statement};
use std::fmt;

/// Modules every generated program imports
pub const SESSION_IMPORTS: [&str; 4] = ["fp", "time", "sql", "sqlop"];

/// Declarations added to the program by one statement
#[derive(Debug, Clone, PartialEq)]
pub enum IrNode {
    /// Input relation declared by `CREATE TABLE`
    Relation(Relation),
    /// Output relation and the rules deriving it
    View { relation: Relation, rules: Vec<Rule> },
}

impl IrNode {
    pub fn relation(&self) -> &Relation {
        match self {
            IrNode::Relation(relation) | IrNode::View { relation, .. } => relation,
        }
    }

    pub fn rules(&self) -> &[Rule] {
        match self {
            IrNode::Relation(_) => &[],
            IrNode::View { rules, .. } => rules,
        }
    }
}

impl fmt::Display for IrNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.relation())?;
        for rule in self.rules() {
            write!(f, "\n{rule}")?;
        }
        Ok(())
    }
}

/// A SQL to DDlog translation session.
///
/// Statements are translated in order against the tables and views declared
/// by earlier statements. Each statement is atomic: when `translate` fails
/// the catalog and program are exactly as they were before the call.
#[derive(Debug, Clone)]
pub struct Translator {
    config: Config,
    catalog: Catalog,
    program: Program,
    statements: Vec<String>,
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Translator {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            catalog: Catalog::new(),
            program: Program::with_imports(SESSION_IMPORTS),
            statements: Vec::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Translate one parsed statement and append its declarations
    pub fn translate(&mut self, statement: &Statement) -> TranslateResult<IrNode> {
        let origin = u32::try_from(self.statements.len())
            .map(NodeId)
            .map_err(|_| TranslateError::unsupported("statement log past u32::MAX entries"))?;
        log::debug!("Translating statement {origin}: {}", statement_kind(statement));

        let result = match statement {
            Statement::CreateTable(create) => self.translate_table(create, origin),
            Statement::CreateView(view) => {
                let columns: Vec<String> =
                    view.columns.iter().map(|c| c.name.value.clone()).collect();
                table_name(&view.name)
                    .and_then(|name| self.translate_query(name, &columns, &view.query, origin))
            }
            Statement::Query(query) => {
                let name = self.next_query_name();
                self.translate_query(name, &[], query, origin)
            }
            other => Err(TranslateError::unsupported(statement_kind(other))),
        };

        match result {
            Ok(node) => {
                self.statements.push(statement.to_string());
                Ok(node)
            }
            Err(e) => {
                log::debug!("Statement {origin} rejected: {e}");
                Err(e.with_source(SourceRef::from_statement(statement)))
            }
        }
    }

    /// Parse a single statement with the configured dialect and translate it
    pub fn translate_sql(&mut self, sql: &str) -> TranslateResult<IrNode> {
        let statement = SqlParser::from_dialect(self.config.dialect).parse_single(sql)?;
        self.translate(&statement)
    }

    /// Translate a `;`-separated script in order.
    ///
    /// Stops at the first failing statement; statements before it stay
    /// translated.
    pub fn translate_script(&mut self, sql: &str) -> TranslateResult<Vec<IrNode>> {
        let statements = SqlParser::from_dialect(self.config.dialect).parse(sql)?;
        statements
            .iter()
            .map(|statement| self.translate(statement))
            .collect()
    }

    /// The program accumulated so far
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Owned copy of the program accumulated so far
    pub fn snapshot(&self) -> Program {
        self.program.clone()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Text of a successfully translated statement
    pub fn statement_text(&self, id: NodeId) -> Option<&str> {
        self.statements.get(id.0 as usize).map(String::as_str)
    }

    fn translate_table(
        &mut self,
        create: &sqlparser::ast::CreateTable,
        origin: NodeId,
    ) -> TranslateResult<IrNode> {
        let decl = lower_create_table(create, &self.config.naming, origin)?;
        self.commit(
            decl.table,
            EntryKind::Table,
            decl.record,
            decl.relation.clone(),
            &[],
            origin,
        )?;
        Ok(IrNode::Relation(decl.relation))
    }

    fn translate_query(
        &mut self,
        table: TableName,
        columns: &[String],
        query: &Query,
        origin: NodeId,
    ) -> TranslateResult<IrNode> {
        // Report a redeclared view before looking at its query
        self.catalog.check_new(&table)?;
        let decl = lower_view(
            table,
            columns,
            query,
            &self.catalog,
            &self.config.naming,
            origin,
        )?;
        self.commit(
            decl.table,
            EntryKind::View,
            decl.record,
            decl.relation.clone(),
            &decl.rules,
            origin,
        )?;
        Ok(IrNode::View {
            relation: decl.relation,
            rules: decl.rules,
        })
    }

    /// Validate every declaration before recording any of them
    fn commit(
        &mut self,
        table: TableName,
        kind: EntryKind,
        record: RecordType,
        relation: Relation,
        rules: &[Rule],
        origin: NodeId,
    ) -> TranslateResult<()> {
        self.catalog.check_new(&table)?;
        self.program
            .declare(record.clone(), relation.clone(), rules.to_vec())
            .map_err(declaration_error)?;
        self.catalog.insert(CatalogEntry {
            table,
            kind,
            relation: relation.name,
            record,
            origin,
        })
    }

    /// First `query<N>` name not yet in the catalog
    fn next_query_name(&self) -> TableName {
        let naming = &self.config.naming;
        let mut index = 0;
        loop {
            let name = naming.query_name(index);
            if !self.catalog.contains(&name) {
                return name;
            }
            index += 1;
        }
    }
}

fn declaration_error(error: IrError) -> TranslateError {
    match error {
        IrError::ConflictingRecord { name } | IrError::DuplicateRelation { name } => {
            TranslateError::duplicate(name)
        }
        other => TranslateError::Ir(other),
    }
}

#[cfg(test)]
#[path = "translator_test.rs"]
mod tests;
