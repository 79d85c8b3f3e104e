use std::fmt;

use super::blocks::{
    ConditionBlock, CountBlock, DistinctBlock, FieldBlock, FunctionBlock, GroupByBlock, JoinBlock,
    KeywordBlock, OrderByBlock, TableBlock, UnionBlock,
};
use super::clauses::{Filterable, FromTables, Joinable, Limitable, SelectQuery, Sortable};
use super::lock::ForUpdateBlock;
use super::{ClauseRenderer, Statement, StatementOptions};

/// A `SELECT` statement.
///
/// Blocks render in this order: `SELECT`, functions, `DISTINCT`, fields, `FROM`,
/// joins, `WHERE`, `GROUP BY`, `HAVING`, `ORDER BY`, `LIMIT`, `OFFSET`, `UNION`,
/// `FOR UPDATE`.
#[derive(Debug, Clone)]
pub struct Select {
    options: StatementOptions,
    keyword: KeywordBlock,
    pub(crate) functions: FunctionBlock,
    pub(crate) distinct: DistinctBlock,
    pub(crate) fields: FieldBlock,
    from: TableBlock,
    joins: JoinBlock,
    where_: ConditionBlock,
    pub(crate) group_by: GroupByBlock,
    pub(crate) having: ConditionBlock,
    order_by: OrderByBlock,
    limit: CountBlock,
    pub(crate) offset: CountBlock,
    pub(crate) unions: UnionBlock,
    pub(crate) lock: ForUpdateBlock,
}

impl Select {
    #[must_use]
    pub fn new(options: StatementOptions) -> Self {
        Self {
            options,
            keyword: KeywordBlock("SELECT"),
            functions: FunctionBlock::default(),
            distinct: DistinctBlock::default(),
            fields: FieldBlock::default(),
            from: TableBlock::new(Some("FROM")),
            joins: JoinBlock::default(),
            where_: ConditionBlock::where_(),
            group_by: GroupByBlock::default(),
            having: ConditionBlock::having(),
            order_by: OrderByBlock::default(),
            limit: CountBlock::limit(),
            offset: CountBlock::offset(),
            unions: UnionBlock::default(),
            lock: ForUpdateBlock::default(),
        }
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.lock.is_active()
    }
}

impl Default for Select {
    fn default() -> Self {
        Self::new(StatementOptions::default())
    }
}

impl Statement for Select {
    fn options(&self) -> &StatementOptions {
        &self.options
    }

    fn blocks(&self) -> Vec<&dyn ClauseRenderer> {
        vec![
            &self.keyword,
            &self.functions,
            &self.distinct,
            &self.fields,
            &self.from,
            &self.joins,
            &self.where_,
            &self.group_by,
            &self.having,
            &self.order_by,
            &self.limit,
            &self.offset,
            &self.unions,
            &self.lock,
        ]
    }

    fn has_source(&self) -> bool {
        self.from.has_table()
    }
}

impl fmt::Display for Select {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_sql() {
            Ok(sql) => f.write_str(&sql),
            Err(err) => write!(f, "{err}"),
        }
    }
}

impl Filterable for Select {
    fn where_block(&mut self) -> &mut ConditionBlock {
        &mut self.where_
    }
}

impl Sortable for Select {
    fn order_block(&mut self) -> &mut OrderByBlock {
        &mut self.order_by
    }
}

impl Limitable for Select {
    fn limit_block(&mut self) -> &mut CountBlock {
        &mut self.limit
    }
}

impl FromTables for Select {
    fn from_block(&mut self) -> &mut TableBlock {
        &mut self.from
    }
}

impl Joinable for Select {
    fn join_block(&mut self) -> &mut JoinBlock {
        &mut self.joins
    }
}

impl SelectQuery for Select {
    fn select_mut(&mut self) -> &mut Select {
        self
    }
}
