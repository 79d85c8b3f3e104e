//! The execution surface shared by [`MysqlPool`](crate::pool::MysqlPool) and
//! [`Transaction`](crate::transaction::Transaction).

use async_trait::async_trait;

use crate::error::SqlMiddlewareDbError;
use crate::results::ExecOutcome;
use crate::statement::blocks::{
    ConditionBlock, CountBlock, JoinBlock, OrderByBlock, TableBlock,
};
use crate::statement::{
    Assignable, Delete, DeleteQuery, Filterable, FromTables, Insert, InsertQuery, Joinable,
    Limitable, Select, SelectQuery, Sortable, SqlParam, Statement, StatementOptions, Update,
    UpdateQuery,
};
use crate::types::{Bindings, NamedBindings, RowValues};

/// Something that can run SQL: a pool, or a transaction's single link.
///
/// Implementors supply the two execution paths and the batch runner; [`exec`]
/// and the statement factories come for free.
///
/// [`exec`]: Connection::exec
#[async_trait]
pub trait Connection: Send {
    /// Run `query` with `:name` placeholders bound from `params`.
    ///
    /// Returns the first element of the driver response.
    async fn execute(
        &mut self,
        query: &str,
        params: &NamedBindings,
    ) -> Result<ExecOutcome, SqlMiddlewareDbError>;

    /// Run `query` with `?` placeholders bound from `params`, in order.
    ///
    /// Returns the first element of the driver response.
    async fn query(
        &mut self,
        query: &str,
        params: &[RowValues],
    ) -> Result<ExecOutcome, SqlMiddlewareDbError>;

    /// Run `;`-separated statements without parameters, discarding results.
    async fn execute_batch(&mut self, query: &str) -> Result<(), SqlMiddlewareDbError>;

    /// Run `query`, picking the path from the shape of `bindings`: named bindings
    /// go to [`execute`](Connection::execute), positional ones to
    /// [`query`](Connection::query).
    async fn exec(
        &mut self,
        query: &str,
        bindings: Bindings,
    ) -> Result<ExecOutcome, SqlMiddlewareDbError> {
        match bindings {
            Bindings::Named(params) => self.execute(query, &params).await,
            Bindings::Positional(values) => self.query(query, &values).await,
        }
    }

    /// Start a SELECT bound to this connection.
    fn select(&mut self, options: StatementOptions) -> Bound<'_, Self, Select>
    where
        Self: Sized,
    {
        Bound::new(self, Select::new(options))
    }

    /// Start an INSERT bound to this connection.
    fn insert(&mut self, options: StatementOptions) -> Bound<'_, Self, Insert>
    where
        Self: Sized,
    {
        Bound::new(self, Insert::new(options))
    }

    /// Start an UPDATE bound to this connection.
    fn update(&mut self, options: StatementOptions) -> Bound<'_, Self, Update>
    where
        Self: Sized,
    {
        Bound::new(self, Update::new(options))
    }

    /// Start a DELETE bound to this connection.
    fn delete(&mut self, options: StatementOptions) -> Bound<'_, Self, Delete>
    where
        Self: Sized,
    {
        Bound::new(self, Delete::new(options))
    }
}

/// A statement paired with the connection that will run it.
///
/// Every clause method of the wrapped statement is available directly, so a bound
/// statement chains exactly like a bare one and finishes with [`exec`](Bound::exec):
///
/// ```rust,no_run
/// # use mysql_middleware::prelude::*;
/// # async fn run(pool: &mut MysqlPool) -> Result<(), SqlMiddlewareDbError> {
/// let rows = pool
///     .select(StatementOptions::default())
///     .from("users")
///     .where_clause("id = ?", 1)
///     .exec(Bindings::default())
///     .await?
///     .into_rows();
/// # let _ = rows;
/// # Ok(())
/// # }
/// ```
pub struct Bound<'c, C, S> {
    conn: &'c mut C,
    statement: S,
}

impl<'c, C, S> Bound<'c, C, S>
where
    C: Connection,
    S: Statement,
{
    pub fn new(conn: &'c mut C, statement: S) -> Self {
        Self { conn, statement }
    }

    #[must_use]
    pub fn statement(&self) -> &S {
        &self.statement
    }

    /// Detach the statement from the connection.
    #[must_use]
    pub fn into_statement(self) -> S {
        self.statement
    }

    /// Render the statement with inlined values.
    ///
    /// # Errors
    /// Returns `BuildError` if the statement is incomplete.
    pub fn to_sql(&self) -> Result<String, SqlMiddlewareDbError> {
        self.statement.to_sql()
    }

    /// Render the statement with inlined values and run it through
    /// [`Connection::exec`] with `bindings`.
    ///
    /// # Errors
    /// Returns `BuildError` if the statement is incomplete, or the driver error
    /// unchanged if execution fails.
    pub async fn exec(
        self,
        bindings: impl Into<Bindings>,
    ) -> Result<ExecOutcome, SqlMiddlewareDbError> {
        let sql = self.statement.to_sql()?;
        self.conn.exec(&sql, bindings.into()).await
    }

    /// Render the statement with `?` placeholders and run it on the positional
    /// path with the builder's own values.
    ///
    /// # Errors
    /// Returns `BuildError` if the statement is incomplete, or the driver error
    /// unchanged if execution fails.
    pub async fn exec_param(self) -> Result<ExecOutcome, SqlMiddlewareDbError> {
        let (sql, values) = self.statement.to_param()?;
        self.conn.query(&sql, &values).await
    }
}

impl<C, S: Filterable> Filterable for Bound<'_, C, S> {
    fn where_block(&mut self) -> &mut ConditionBlock {
        self.statement.where_block()
    }
}

impl<C, S: Sortable> Sortable for Bound<'_, C, S> {
    fn order_block(&mut self) -> &mut OrderByBlock {
        self.statement.order_block()
    }
}

impl<C, S: Limitable> Limitable for Bound<'_, C, S> {
    fn limit_block(&mut self) -> &mut CountBlock {
        self.statement.limit_block()
    }
}

impl<C, S: FromTables> FromTables for Bound<'_, C, S> {
    fn from_block(&mut self) -> &mut TableBlock {
        self.statement.from_block()
    }
}

impl<C, S: Joinable> Joinable for Bound<'_, C, S> {
    fn join_block(&mut self) -> &mut JoinBlock {
        self.statement.join_block()
    }
}

impl<C, S: Assignable> Assignable for Bound<'_, C, S> {
    fn assign(&mut self, field: String, value: SqlParam) {
        self.statement.assign(field, value);
    }
}

impl<C, S: SelectQuery> SelectQuery for Bound<'_, C, S> {
    fn select_mut(&mut self) -> &mut Select {
        self.statement.select_mut()
    }
}

impl<C, S: InsertQuery> InsertQuery for Bound<'_, C, S> {
    fn insert_mut(&mut self) -> &mut Insert {
        self.statement.insert_mut()
    }
}

impl<C, S: UpdateQuery> UpdateQuery for Bound<'_, C, S> {
    fn update_mut(&mut self) -> &mut Update {
        self.statement.update_mut()
    }
}

impl<C, S: DeleteQuery> DeleteQuery for Bound<'_, C, S> {
    fn delete_mut(&mut self) -> &mut Delete {
        self.statement.delete_mut()
    }
}
