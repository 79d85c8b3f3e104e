use std::fmt;

use super::blocks::{
    AssignmentBlock, ConditionBlock, CountBlock, KeywordBlock, OrderByBlock, TableBlock,
};
use super::clauses::{Assignable, Filterable, Limitable, Sortable, UpdateQuery};
use super::{ClauseRenderer, SqlParam, Statement, StatementOptions};
use crate::error::SqlMiddlewareDbError;

/// An `UPDATE` statement: `UPDATE`, tables, `SET`, `WHERE`, `ORDER BY`, `LIMIT`.
#[derive(Debug, Clone)]
pub struct Update {
    options: StatementOptions,
    keyword: KeywordBlock,
    pub(crate) tables: TableBlock,
    pub(crate) set: AssignmentBlock,
    where_: ConditionBlock,
    order_by: OrderByBlock,
    limit: CountBlock,
}

impl Update {
    #[must_use]
    pub fn new(options: StatementOptions) -> Self {
        Self {
            options,
            keyword: KeywordBlock("UPDATE"),
            tables: TableBlock::new(None),
            set: AssignmentBlock::set(),
            where_: ConditionBlock::where_(),
            order_by: OrderByBlock::default(),
            limit: CountBlock::limit(),
        }
    }
}

impl Default for Update {
    fn default() -> Self {
        Self::new(StatementOptions::default())
    }
}

impl Statement for Update {
    fn options(&self) -> &StatementOptions {
        &self.options
    }

    fn blocks(&self) -> Vec<&dyn ClauseRenderer> {
        vec![
            &self.keyword,
            &self.tables,
            &self.set,
            &self.where_,
            &self.order_by,
            &self.limit,
        ]
    }

    fn validate(&self) -> Result<(), SqlMiddlewareDbError> {
        if !self.tables.has_table() {
            return Err(SqlMiddlewareDbError::BuildError(
                "UPDATE requires a table; call table()".to_string(),
            ));
        }
        if self.set.is_empty() {
            return Err(SqlMiddlewareDbError::BuildError(
                "UPDATE requires at least one assignment; call set()".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Update {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_sql() {
            Ok(sql) => f.write_str(&sql),
            Err(err) => write!(f, "{err}"),
        }
    }
}

impl Assignable for Update {
    fn assign(&mut self, field: String, value: SqlParam) {
        self.set.assign(field, value);
    }
}

impl Filterable for Update {
    fn where_block(&mut self) -> &mut ConditionBlock {
        &mut self.where_
    }
}

impl Sortable for Update {
    fn order_block(&mut self) -> &mut OrderByBlock {
        &mut self.order_by
    }
}

impl Limitable for Update {
    fn limit_block(&mut self) -> &mut CountBlock {
        &mut self.limit
    }
}

impl UpdateQuery for Update {
    fn update_mut(&mut self) -> &mut Update {
        self
    }
}
