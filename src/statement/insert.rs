use std::fmt;

use super::blocks::{AssignmentBlock, InsertFromQueryBlock, InsertValuesBlock, KeywordBlock, TableBlock};
use super::clauses::{Assignable, InsertQuery};
use super::{ClauseRenderer, SqlParam, Statement, StatementOptions};
use crate::error::SqlMiddlewareDbError;

/// An `INSERT` statement: `INSERT INTO t (fields) VALUES (...)`, or
/// `INSERT INTO t (fields) (SELECT ...)`, optionally followed by
/// `ON DUPLICATE KEY UPDATE`.
#[derive(Debug, Clone)]
pub struct Insert {
    options: StatementOptions,
    keyword: KeywordBlock,
    pub(crate) table: TableBlock,
    pub(crate) values: InsertValuesBlock,
    pub(crate) from_query: InsertFromQueryBlock,
    pub(crate) on_duplicate: AssignmentBlock,
}

impl Insert {
    #[must_use]
    pub fn new(options: StatementOptions) -> Self {
        Self {
            options,
            keyword: KeywordBlock("INSERT"),
            table: TableBlock::single(Some("INTO")),
            values: InsertValuesBlock::default(),
            from_query: InsertFromQueryBlock::default(),
            on_duplicate: AssignmentBlock::on_duplicate_key_update(),
        }
    }
}

impl Default for Insert {
    fn default() -> Self {
        Self::new(StatementOptions::default())
    }
}

impl Statement for Insert {
    fn options(&self) -> &StatementOptions {
        &self.options
    }

    fn blocks(&self) -> Vec<&dyn ClauseRenderer> {
        vec![
            &self.keyword,
            &self.table,
            &self.values,
            &self.from_query,
            &self.on_duplicate,
        ]
    }

    fn validate(&self) -> Result<(), SqlMiddlewareDbError> {
        if !self.table.has_table() {
            return Err(SqlMiddlewareDbError::BuildError(
                "INSERT requires a table; call into_table()".to_string(),
            ));
        }
        match (self.values.is_empty(), self.from_query.is_empty()) {
            (true, true) => Err(SqlMiddlewareDbError::BuildError(
                "INSERT requires values or a source query; call set() or from_query()".to_string(),
            )),
            (false, false) => Err(SqlMiddlewareDbError::BuildError(
                "INSERT cannot combine set() values with from_query()".to_string(),
            )),
            _ => self.values.validate(),
        }
    }
}

impl fmt::Display for Insert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_sql() {
            Ok(sql) => f.write_str(&sql),
            Err(err) => write!(f, "{err}"),
        }
    }
}

impl Assignable for Insert {
    fn assign(&mut self, field: String, value: SqlParam) {
        self.values.set(field, value);
    }
}

impl InsertQuery for Insert {
    fn insert_mut(&mut self) -> &mut Insert {
        self
    }
}
