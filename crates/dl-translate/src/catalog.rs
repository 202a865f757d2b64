//! Session symbol table: every table and view translated so far

use crate::error::{TranslateError, TranslateResult};
use dl_core::{RelationName, TableName};
use dl_ir::{NodeId, RecordType};
use std::collections::HashMap;

/// Whether an entry came from `CREATE TABLE` or from a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Table,
    View,
}

/// A declared table or view and the DDlog declarations backing it
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub table: TableName,
    pub kind: EntryKind,
    pub relation: RelationName,
    pub record: RecordType,
    /// Statement that declared this entry
    pub origin: NodeId,
}

/// Table/view names in declaration order, looked up case-insensitively
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    index: HashMap<String, usize>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.index
            .get(&name.to_lowercase())
            .map(|&i| &self.entries[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(&name.to_lowercase())
    }

    /// Fail with `DuplicateDeclaration` if `table` is already declared
    pub fn check_new(&self, table: &TableName) -> TranslateResult<()> {
        if self.index.contains_key(&table.lookup_key()) {
            return Err(TranslateError::duplicate(table.as_str()));
        }
        Ok(())
    }

    pub fn insert(&mut self, entry: CatalogEntry) -> TranslateResult<()> {
        self.check_new(&entry.table)?;
        self.index
            .insert(entry.table.lookup_key(), self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
