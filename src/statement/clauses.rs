//! Chainable clause methods.
//!
//! Each trait gives access to one clause block through a single accessor and
//! provides the builder methods on top of it. The statements implement the traits
//! for the blocks they own, and [`Bound`](crate::connection::Bound) forwards them,
//! so a statement bound to a connection chains exactly like a bare one.

use super::blocks::{
    ConditionBlock, CountBlock, JoinBlock, JoinKind, OrderByBlock, SortOrder, TableBlock,
    TableRef, UnionKind,
};
use super::{Delete, Expression, Insert, IntoParams, Select, SqlParam, Update};

/// `WHERE` conditions.
pub trait Filterable: Sized {
    #[doc(hidden)]
    fn where_block(&mut self) -> &mut ConditionBlock;

    /// Add a condition; each `?` consumes one parameter. Conditions are joined with
    /// `AND`.
    #[must_use]
    fn where_clause(mut self, condition: impl Into<String>, params: impl IntoParams) -> Self {
        self.where_block().push(Expression::new(condition, params));
        self
    }
}

/// `ORDER BY`.
pub trait Sortable: Sized {
    #[doc(hidden)]
    fn order_block(&mut self) -> &mut OrderByBlock;

    #[must_use]
    fn order_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.order_block().push(field, Some(order));
        self
    }

    /// Order by `field` without an explicit direction.
    #[must_use]
    fn order_by_field(mut self, field: impl Into<String>) -> Self {
        self.order_block().push(field, None);
        self
    }
}

/// `LIMIT`.
pub trait Limitable: Sized {
    #[doc(hidden)]
    fn limit_block(&mut self) -> &mut CountBlock;

    #[must_use]
    fn limit(mut self, count: u64) -> Self {
        self.limit_block().set(Some(count));
        self
    }

    #[must_use]
    fn clear_limit(mut self) -> Self {
        self.limit_block().set(None);
        self
    }
}

/// `FROM` table list.
pub trait FromTables: Sized {
    #[doc(hidden)]
    fn from_block(&mut self) -> &mut TableBlock;

    #[must_use]
    fn from(mut self, table: impl Into<String>) -> Self {
        self.from_block().push(TableRef::named(table, None));
        self
    }

    #[must_use]
    fn from_as(mut self, table: impl Into<String>, alias: impl Into<String>) -> Self {
        self.from_block()
            .push(TableRef::named(table, Some(alias.into())));
        self
    }

    /// Select from a derived table.
    #[must_use]
    fn from_query(mut self, select: Select, alias: impl Into<String>) -> Self {
        self.from_block()
            .push(TableRef::query(select, Some(alias.into())));
        self
    }
}

/// `JOIN` clauses.
pub trait Joinable: Sized {
    #[doc(hidden)]
    fn join_block(&mut self) -> &mut JoinBlock;

    /// General form: any join kind, optional alias, optional `ON` expression.
    #[must_use]
    fn join_with(
        mut self,
        kind: JoinKind,
        table: impl Into<String>,
        alias: Option<&str>,
        on: Option<Expression>,
    ) -> Self {
        let table = TableRef::named(table, alias.map(str::to_string));
        self.join_block().push(kind, table, on);
        self
    }

    #[must_use]
    fn join(self, table: impl Into<String>, on: impl Into<String>) -> Self {
        self.join_with(JoinKind::Inner, table, None, Some(Expression::raw(on)))
    }

    #[must_use]
    fn left_join(self, table: impl Into<String>, on: impl Into<String>) -> Self {
        self.join_with(JoinKind::Left, table, None, Some(Expression::raw(on)))
    }

    #[must_use]
    fn right_join(self, table: impl Into<String>, on: impl Into<String>) -> Self {
        self.join_with(JoinKind::Right, table, None, Some(Expression::raw(on)))
    }

    #[must_use]
    fn cross_join(self, table: impl Into<String>) -> Self {
        self.join_with(JoinKind::Cross, table, None, None)
    }

    /// Join a derived table.
    #[must_use]
    fn join_query(
        mut self,
        kind: JoinKind,
        select: Select,
        alias: impl Into<String>,
        on: impl Into<String>,
    ) -> Self {
        let table = TableRef::query(select, Some(alias.into()));
        self.join_block()
            .push(kind, table, Some(Expression::raw(on)));
        self
    }
}

/// `field = value` assignments (INSERT values, UPDATE `SET`).
pub trait Assignable: Sized {
    #[doc(hidden)]
    fn assign(&mut self, field: String, value: SqlParam);

    /// Set `field` to `value`; setting the same field again replaces the value.
    #[must_use]
    fn set(mut self, field: impl Into<String>, value: impl Into<SqlParam>) -> Self {
        self.assign(field.into(), value.into());
        self
    }

    #[must_use]
    fn set_fields<I, K, V>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<SqlParam>,
    {
        for (field, value) in fields {
            self.assign(field.into(), value.into());
        }
        self
    }
}

/// SELECT-only clauses.
pub trait SelectQuery: Sized {
    #[doc(hidden)]
    fn select_mut(&mut self) -> &mut Select;

    /// Raw function call rendered right after `SELECT`, e.g. `NOW()`.
    #[must_use]
    fn function(mut self, expr: impl Into<String>, params: impl IntoParams) -> Self {
        self.select_mut()
            .functions
            .push(Expression::new(expr, params));
        self
    }

    #[must_use]
    fn distinct(mut self) -> Self {
        self.select_mut().distinct.activate();
        self
    }

    #[must_use]
    fn field(mut self, name: impl Into<String>) -> Self {
        self.select_mut().fields.push_name(name, None);
        self
    }

    #[must_use]
    fn field_as(mut self, name: impl Into<String>, alias: impl Into<String>) -> Self {
        self.select_mut()
            .fields
            .push_name(name, Some(alias.into()));
        self
    }

    /// A computed field; never name-quoted.
    #[must_use]
    fn field_expr(
        mut self,
        expr: impl Into<String>,
        params: impl IntoParams,
        alias: Option<&str>,
    ) -> Self {
        self.select_mut()
            .fields
            .push_expr(Expression::new(expr, params), alias.map(str::to_string));
        self
    }

    #[must_use]
    fn fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.select_mut().fields.push_name(name, None);
        }
        self
    }

    #[must_use]
    fn group_by(mut self, field: impl Into<String>) -> Self {
        self.select_mut().group_by.push(field);
        self
    }

    #[must_use]
    fn having(mut self, condition: impl Into<String>, params: impl IntoParams) -> Self {
        self.select_mut()
            .having
            .push(Expression::new(condition, params));
        self
    }

    #[must_use]
    fn offset(mut self, count: u64) -> Self {
        self.select_mut().offset.set(Some(count));
        self
    }

    #[must_use]
    fn union(mut self, other: Select) -> Self {
        self.select_mut().unions.push(UnionKind::Distinct, other);
        self
    }

    #[must_use]
    fn union_all(mut self, other: Select) -> Self {
        self.select_mut().unions.push(UnionKind::All, other);
        self
    }

    /// Lock the selected rows until the surrounding transaction ends.
    #[must_use]
    fn for_update(mut self) -> Self {
        self.select_mut().lock.activate();
        self
    }
}

/// INSERT-only clauses.
pub trait InsertQuery: Sized {
    #[doc(hidden)]
    fn insert_mut(&mut self) -> &mut Insert;

    /// Target table (`INTO table`). Named `into_table` so it does not collide with
    /// [`Into::into`].
    #[must_use]
    fn into_table(mut self, table: impl Into<String>) -> Self {
        self.insert_mut()
            .table
            .push(TableRef::named(table, None));
        self
    }

    /// Replace all rows; each row lists `(field, value)` pairs in the same order.
    #[must_use]
    fn set_fields_rows<R, I, K, V>(mut self, rows: R) -> Self
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<SqlParam>,
    {
        let rows = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect()
            })
            .collect();
        self.insert_mut().values.set_rows(rows);
        self
    }

    /// `INSERT INTO t (fields) (SELECT ...)`.
    #[must_use]
    fn from_query<I, S>(mut self, fields: I, select: Select) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields = fields.into_iter().map(Into::into).collect();
        self.insert_mut().from_query.set(fields, select);
        self
    }

    /// Add an `ON DUPLICATE KEY UPDATE field = value` assignment.
    #[must_use]
    fn on_dup_update(mut self, field: impl Into<String>, value: impl Into<SqlParam>) -> Self {
        self.insert_mut()
            .on_duplicate
            .assign(field.into(), value.into());
        self
    }
}

/// UPDATE-only clauses.
pub trait UpdateQuery: Sized {
    #[doc(hidden)]
    fn update_mut(&mut self) -> &mut Update;

    #[must_use]
    fn table(mut self, table: impl Into<String>) -> Self {
        self.update_mut()
            .tables
            .push(TableRef::named(table, None));
        self
    }

    #[must_use]
    fn table_as(mut self, table: impl Into<String>, alias: impl Into<String>) -> Self {
        self.update_mut()
            .tables
            .push(TableRef::named(table, Some(alias.into())));
        self
    }

    /// Raw assignment such as `count = count + ?`.
    #[must_use]
    fn set_raw(mut self, expr: impl Into<String>, params: impl IntoParams) -> Self {
        self.update_mut()
            .set
            .push_raw(Expression::new(expr, params));
        self
    }
}

/// DELETE-only clauses.
pub trait DeleteQuery: Sized {
    #[doc(hidden)]
    fn delete_mut(&mut self) -> &mut Delete;

    /// Name a table to delete from in a multi-table delete
    /// (`DELETE target FROM ...`).
    #[must_use]
    fn target(mut self, table: impl Into<String>) -> Self {
        self.delete_mut().targets.push(table);
        self
    }
}
