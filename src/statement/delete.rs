use std::fmt;

use super::blocks::{
    ConditionBlock, CountBlock, JoinBlock, KeywordBlock, OrderByBlock, TableBlock,
    TargetTableBlock,
};
use super::clauses::{DeleteQuery, Filterable, FromTables, Joinable, Limitable, Sortable};
use super::{ClauseRenderer, Statement, StatementOptions};
use crate::error::SqlMiddlewareDbError;

/// A `DELETE` statement: `DELETE`, optional targets, `FROM`, joins, `WHERE`,
/// `ORDER BY`, `LIMIT`.
#[derive(Debug, Clone)]
pub struct Delete {
    options: StatementOptions,
    keyword: KeywordBlock,
    pub(crate) targets: TargetTableBlock,
    from: TableBlock,
    joins: JoinBlock,
    where_: ConditionBlock,
    order_by: OrderByBlock,
    limit: CountBlock,
}

impl Delete {
    #[must_use]
    pub fn new(options: StatementOptions) -> Self {
        Self {
            options,
            keyword: KeywordBlock("DELETE"),
            targets: TargetTableBlock::default(),
            from: TableBlock::new(Some("FROM")),
            joins: JoinBlock::default(),
            where_: ConditionBlock::where_(),
            order_by: OrderByBlock::default(),
            limit: CountBlock::limit(),
        }
    }
}

impl Default for Delete {
    fn default() -> Self {
        Self::new(StatementOptions::default())
    }
}

impl Statement for Delete {
    fn options(&self) -> &StatementOptions {
        &self.options
    }

    fn blocks(&self) -> Vec<&dyn ClauseRenderer> {
        vec![
            &self.keyword,
            &self.targets,
            &self.from,
            &self.joins,
            &self.where_,
            &self.order_by,
            &self.limit,
        ]
    }

    fn validate(&self) -> Result<(), SqlMiddlewareDbError> {
        if self.from.has_table() {
            Ok(())
        } else {
            Err(SqlMiddlewareDbError::BuildError(
                "DELETE requires a table; call from()".to_string(),
            ))
        }
    }

    fn has_source(&self) -> bool {
        self.from.has_table()
    }
}

impl fmt::Display for Delete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_sql() {
            Ok(sql) => f.write_str(&sql),
            Err(err) => write!(f, "{err}"),
        }
    }
}

impl Filterable for Delete {
    fn where_block(&mut self) -> &mut ConditionBlock {
        &mut self.where_
    }
}

impl Sortable for Delete {
    fn order_block(&mut self) -> &mut OrderByBlock {
        &mut self.order_by
    }
}

impl Limitable for Delete {
    fn limit_block(&mut self) -> &mut CountBlock {
        &mut self.limit
    }
}

impl FromTables for Delete {
    fn from_block(&mut self) -> &mut TableBlock {
        &mut self.from
    }
}

impl Joinable for Delete {
    fn join_block(&mut self) -> &mut JoinBlock {
        &mut self.joins
    }
}

impl DeleteQuery for Delete {
    fn delete_mut(&mut self) -> &mut Delete {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_delete() {
        let sql = Delete::default()
            .from("sessions")
            .where_clause("expires_at < ?", "2024-01-01")
            .limit(100)
            .to_sql()
            .unwrap();
        assert_eq!(
            sql,
            "DELETE FROM sessions WHERE (expires_at < '2024-01-01') LIMIT 100"
        );
    }

    #[test]
    fn multi_table_delete_with_join() {
        let sql = Delete::default()
            .target("o")
            .from_as("orders", "o")
            .join("users u", "u.id = o.user_id")
            .where_clause("u.banned = ?", true)
            .to_sql()
            .unwrap();
        assert_eq!(
            sql,
            "DELETE o FROM orders `o` INNER JOIN users u ON (u.id = o.user_id) \
             WHERE (u.banned = TRUE)"
        );
    }

    #[test]
    fn requires_from() {
        assert!(matches!(
            Delete::default().where_clause("a = ?", 1).to_sql(),
            Err(SqlMiddlewareDbError::BuildError(_))
        ));
    }
}
