//! Program model and its canonical text rendering
//!
//! A [`Program`] is append-only: declarations are validated as they are
//! added and rendered in first-declared order. Rendering is a pure function
//! of the accumulated declarations.

use crate::error::{IrError, IrResult};
use crate::expr::Expr;
use crate::types::Type;
use dl_core::{RelationName, TypeName};
use std::collections::HashSet;
use std::fmt::{self, Display, Formatter, Write as _};
use std::path::Path;

/// Named, typed field of a record
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub ty: Type,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Record type: the row shape of a relation
#[derive(Debug, Clone, PartialEq)]
pub struct RecordType {
    name: TypeName,
    fields: Vec<Field>,
}

impl RecordType {
    /// Build a record, rejecting repeated field names
    pub fn new(name: TypeName, fields: Vec<Field>) -> IrResult<Self> {
        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                return Err(IrError::DuplicateField {
                    record: name.to_string(),
                    field: field.name.clone(),
                });
            }
        }
        Ok(Self { name, fields })
    }

    pub fn name(&self) -> &TypeName {
        &self.name
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

impl Display for RecordType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "typedef {} = {}{{", self.name, self.name)?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}:{}", field.name, field.ty)?;
        }
        f.write_str("}")
    }
}

/// Whether a relation is fed by the application or derived by rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationRole {
    Input,
    Output,
}

impl Display for RelationRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RelationRole::Input => f.write_str("input"),
            RelationRole::Output => f.write_str("output"),
        }
    }
}

/// Relation declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    pub name: RelationName,
    pub role: RelationRole,
    pub record: TypeName,
}

impl Relation {
    pub fn input(name: RelationName, record: TypeName) -> Self {
        Self {
            name,
            role: RelationRole::Input,
            record,
        }
    }

    pub fn output(name: RelationName, record: TypeName) -> Self {
        Self {
            name,
            role: RelationRole::Output,
            record,
        }
    }
}

impl Display for Relation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} relation {}[{}]", self.role, self.name, self.record)
    }
}

/// Relation application binding a row variable, `Rt1[v0]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    pub relation: RelationName,
    pub var: String,
}

impl Atom {
    pub fn new(relation: RelationName, var: impl Into<String>) -> Self {
        Self {
            relation,
            var: var.into(),
        }
    }
}

impl Display for Atom {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.relation, self.var)
    }
}

/// One conjunct of a rule body
#[derive(Debug, Clone, PartialEq)]
pub enum BodyTerm {
    /// Relation lookup
    Atom(Atom),
    /// Boolean filter; must be non-nullable `bool`
    Condition(Expr),
    /// Record construction, `var v2 = Tv{.a = v0.a}`
    Construct {
        var: String,
        record: TypeName,
        fields: Vec<(String, Expr)>,
    },
}

impl Display for BodyTerm {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            BodyTerm::Atom(atom) => write!(f, "{atom}"),
            BodyTerm::Condition(expr) => write!(f, "{expr}"),
            BodyTerm::Construct {
                var,
                record,
                fields,
            } => {
                write!(f, "var {var} = {record}{{")?;
                for (i, (name, expr)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, ".{name} = {expr}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Datalog clause `head :- body.`
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub head: Atom,
    pub body: Vec<BodyTerm>,
}

impl Display for Rule {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} :- ", self.head)?;
        for (i, term) in self.body.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{term}")?;
        }
        f.write_str(".")
    }
}

/// Helper function definition
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub params: Vec<(String, Type)>,
    pub ret: Type,
    /// Body expression text, rendered between braces
    pub body: String,
}

impl Display for Function {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "function {}(", self.name)?;
        for (i, (name, ty)) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}: {ty}")?;
        }
        write!(f, "): {} {{ {} }}", self.ret, self.body)
    }
}

/// A complete DDlog program
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    imports: Vec<String>,
    records: Vec<RecordType>,
    functions: Vec<Function>,
    relations: Vec<Relation>,
    rules: Vec<Rule>,
}

impl Program {
    /// Empty program with the given import preamble
    pub fn with_imports<I, S>(imports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            imports: imports.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn imports(&self) -> &[String] {
        &self.imports
    }

    pub fn records(&self) -> &[RecordType] {
        &self.records
    }

    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn record(&self, name: &str) -> Option<&RecordType> {
        self.records.iter().find(|r| r.name == name)
    }

    pub fn relation(&self, name: &str) -> Option<&Relation> {
        self.relations.iter().find(|r| r.name == name)
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|func| func.name == name)
    }

    /// Check whether `record` can be added.
    ///
    /// Returns `Ok(true)` if a structurally identical record is already
    /// declared (adding it is a no-op), `Ok(false)` if the name is free.
    pub fn check_record(&self, record: &RecordType) -> IrResult<bool> {
        match self.record(&record.name) {
            Some(existing) if existing == record => Ok(true),
            Some(_) => Err(IrError::ConflictingRecord {
                name: record.name.to_string(),
            }),
            None => Ok(false),
        }
    }

    /// Declare a record type; identical redeclarations are deduplicated
    pub fn add_record(&mut self, record: RecordType) -> IrResult<()> {
        if !self.check_record(&record)? {
            self.records.push(record);
        }
        Ok(())
    }

    /// Check that a relation name is still free
    pub fn check_relation(&self, name: &RelationName) -> IrResult<()> {
        if self.relation(name).is_some() {
            return Err(IrError::DuplicateRelation {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Declare a relation over an already declared record type
    pub fn add_relation(&mut self, relation: Relation) -> IrResult<()> {
        self.check_relation(&relation.name)?;
        if self.record(&relation.record).is_none() {
            return Err(IrError::UnknownRecord {
                name: relation.record.to_string(),
            });
        }
        self.relations.push(relation);
        Ok(())
    }

    pub fn add_function(&mut self, function: Function) -> IrResult<()> {
        if self.function(&function.name).is_some() {
            return Err(IrError::DuplicateFunction {
                name: function.name,
            });
        }
        self.functions.push(function);
        Ok(())
    }

    /// Append a rule; every relation and record it mentions must be declared
    pub fn add_rule(&mut self, rule: Rule) -> IrResult<()> {
        self.check_rule(&rule, None)?;
        self.rules.push(rule);
        Ok(())
    }

    /// Declare a record, a relation over it and the rules defining it.
    ///
    /// Everything is validated before anything is appended, so on error the
    /// program is unchanged.
    pub fn declare(
        &mut self,
        record: RecordType,
        relation: Relation,
        rules: Vec<Rule>,
    ) -> IrResult<()> {
        let known_record = self.check_record(&record)?;
        self.check_relation(&relation.name)?;
        if relation.record != record.name && self.record(&relation.record).is_none() {
            return Err(IrError::UnknownRecord {
                name: relation.record.to_string(),
            });
        }
        for rule in &rules {
            self.check_rule(rule, Some((&relation, &record)))?;
        }

        if !known_record {
            self.records.push(record);
        }
        self.relations.push(relation);
        self.rules.extend(rules);
        Ok(())
    }

    /// Validate a rule; `pending` names a relation and record about to be
    /// declared alongside it
    fn check_rule(
        &self,
        rule: &Rule,
        pending: Option<(&Relation, &RecordType)>,
    ) -> IrResult<()> {
        let relation_known = |name: &RelationName| {
            pending.is_some_and(|(r, _)| &r.name == name) || self.relation(name).is_some()
        };
        let record_known = |name: &TypeName| {
            pending.is_some_and(|(_, r)| &r.name == name) || self.record(name).is_some()
        };
        let atoms = std::iter::once(&rule.head.relation).chain(rule.body.iter().filter_map(
            |term| match term {
                BodyTerm::Atom(atom) => Some(&atom.relation),
                _ => None,
            },
        ));
        for name in atoms {
            if !relation_known(name) {
                return Err(IrError::UnknownRelation {
                    name: name.to_string(),
                });
            }
        }
        for term in &rule.body {
            if let BodyTerm::Construct { record, .. } = term {
                if !record_known(record) {
                    return Err(IrError::UnknownRecord {
                        name: record.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Render the program and write it to `path`, creating parent directories
    pub fn write_to_file(&self, path: &Path) -> IrResult<()> {
        let write_err = |e: std::io::Error| IrError::Write {
            path: path.display().to_string(),
            message: e.to_string(),
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(write_err)?;
            }
        }
        std::fs::write(path, self.to_string()).map_err(write_err)?;
        log::debug!(
            "Wrote program ({} records, {} functions, {} relations, {} rules) to {}",
            self.records.len(),
            self.functions.len(),
            self.relations.len(),
            self.rules.len(),
            path.display()
        );
        Ok(())
    }
}

fn render_section<T: Display>(out: &mut String, items: &[T]) {
    if items.is_empty() {
        return;
    }
    if !out.is_empty() {
        out.push('\n');
    }
    for item in items {
        // Writing to a String cannot fail
        let _ = writeln!(out, "{item}");
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        let imports: Vec<String> = self.imports.iter().map(|m| format!("import {m}")).collect();
        render_section(&mut out, &imports);
        render_section(&mut out, &self.records);
        render_section(&mut out, &self.functions);
        render_section(&mut out, &self.relations);
        render_section(&mut out, &self.rules);
        f.write_str(&out)
    }
}

#[cfg(test)]
#[path = "program_test.rs"]
mod tests;
