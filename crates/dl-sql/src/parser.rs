//! SQL parser wrapper

use crate::error::{SqlError, SqlResult};
use dl_core::Dialect;
use sqlparser::ast::Statement;
use sqlparser::dialect::{DuckDbDialect, GenericDialect};
use sqlparser::parser::{Parser, ParserError};

/// Parses translator input with the configured sqlparser dialect
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlParser {
    dialect: Dialect,
}

impl SqlParser {
    /// Parser for the DuckDB dialect
    pub fn duckdb() -> Self {
        Self::from_dialect(Dialect::DuckDb)
    }

    /// Parser for sqlparser's generic dialect
    pub fn generic() -> Self {
        Self::from_dialect(Dialect::Generic)
    }

    /// Parser for a configured dialect
    pub fn from_dialect(dialect: Dialect) -> Self {
        Self { dialect }
    }

    /// Parser from a dialect name, case-insensitive
    pub fn from_dialect_name(name: &str) -> SqlResult<Self> {
        match name.to_ascii_lowercase().as_str() {
            "duckdb" => Ok(Self::duckdb()),
            "generic" => Ok(Self::generic()),
            _ => Err(SqlError::UnknownDialect(name.to_string())),
        }
    }

    /// Parse SQL into AST statements.
    ///
    /// Accepts a script: statements separated by `;`, with `--` comments.
    pub fn parse(&self, sql: &str) -> SqlResult<Vec<Statement>> {
        let sql = sql.trim();
        if sql.is_empty() {
            return Err(SqlError::EmptySql);
        }
        let parsed = match self.dialect {
            Dialect::DuckDb => Parser::parse_sql(&DuckDbDialect {}, sql),
            Dialect::Generic => Parser::parse_sql(&GenericDialect {}, sql),
        };
        parsed.map_err(parse_error)
    }

    /// Parse SQL that must contain exactly one statement
    pub fn parse_single(&self, sql: &str) -> SqlResult<Statement> {
        let mut stmts = self.parse(sql)?;
        match stmts.len() {
            0 => Err(SqlError::EmptySql),
            1 => Ok(stmts.remove(0)),
            n => Err(SqlError::MultipleStatements(n)),
        }
    }

    /// The configured dialect
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }
}

fn parse_error(err: ParserError) -> SqlError {
    let message = err.to_string();
    let (line, column) = error_location(&message).unwrap_or((0, 0));
    SqlError::ParseError {
        message,
        line,
        column,
    }
}

/// `(line, column)` from the "at Line: N, Column: M" suffix that sqlparser
/// appends to tokenizer and parser messages
fn error_location(message: &str) -> Option<(usize, usize)> {
    let (_, tail) = message.rsplit_once("Line: ")?;
    let (line, rest) = tail.split_once(',')?;
    let rest = rest.trim_start().strip_prefix("Column: ")?;
    let digits = rest
        .find(|c: char| !c.is_ascii_digit())
        .map_or(rest, |end| &rest[..end]);
    Some((line.trim().parse().ok()?, digits.parse().ok()?))
}

#[cfg(test)]
#[path = "parser_test.rs"]
mod tests;
