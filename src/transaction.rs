use async_trait::async_trait;
use deadpool::managed::Object;
use mysql_async::Conn;
use mysql_async::prelude::Queryable;
use tracing::{debug, warn};

use crate::connection::Connection;
use crate::error::SqlMiddlewareDbError;
use crate::mysql::{MysqlManager, execute_batch, execute_named, execute_positional};
use crate::results::ExecOutcome;
use crate::types::{NamedBindings, RowValues};

/// A transaction pinned to one pooled link.
///
/// Created by [`MysqlPool::begin_transaction`](crate::pool::MysqlPool::begin_transaction)
/// and finished by [`commit`](Transaction::commit) or
/// [`rollback`](Transaction::rollback), which consume it. Both return the link to
/// the pool whatever the outcome.
///
/// Dropping an unfinished `Transaction` logs a warning and closes its link
/// instead of returning it, so no other caller inherits the open transaction; the
/// server rolls it back when the link closes.
pub struct Transaction {
    conn: Option<Object<MysqlManager>>,
}

impl Transaction {
    /// Run `START TRANSACTION` on a checked-out link.
    ///
    /// The link sits inside the `Transaction` while the statement is in flight,
    /// so a cancelled begin detaches it through `Drop`. On a server error the link
    /// is clean and goes straight back to the pool.
    pub(crate) async fn begin(conn: Object<MysqlManager>) -> Result<Self, SqlMiddlewareDbError> {
        let mut tx = Self { conn: Some(conn) };
        let started = tx.link()?.query_drop("START TRANSACTION").await;
        if let Err(err) = started {
            warn!(error = %err, "START TRANSACTION failed, releasing link");
            drop(tx.conn.take());
            return Err(err.into());
        }
        debug!("transaction started");
        Ok(tx)
    }

    fn link(&mut self) -> Result<&mut Conn, SqlMiddlewareDbError> {
        self.conn.as_deref_mut().ok_or_else(|| {
            SqlMiddlewareDbError::ExecutionError("transaction already finished".to_string())
        })
    }

    /// Commit the transaction and release the link.
    ///
    /// # Errors
    ///
    /// Returns `SqlMiddlewareDbError::MysqlError` if `COMMIT` fails; the link is
    /// released first.
    pub async fn commit(mut self) -> Result<(), SqlMiddlewareDbError> {
        self.finish("COMMIT").await
    }

    /// Roll back the transaction and release the link.
    ///
    /// # Errors
    ///
    /// Returns `SqlMiddlewareDbError::MysqlError` if `ROLLBACK` fails; the link is
    /// released first.
    pub async fn rollback(mut self) -> Result<(), SqlMiddlewareDbError> {
        self.finish("ROLLBACK").await
    }

    // The link stays in `self.conn` until the statement completes; a future
    // dropped mid-statement leaves it to `Drop`, which detaches it.
    async fn finish(&mut self, statement: &'static str) -> Result<(), SqlMiddlewareDbError> {
        let result = self.link()?.query_drop(statement).await;
        drop(self.conn.take());
        debug!(statement, ok = result.is_ok(), "transaction finished");
        Ok(result?)
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            warn!("transaction dropped without commit or rollback, closing its link");
            drop(Object::take(conn));
        }
    }
}

#[async_trait]
impl Connection for Transaction {
    async fn execute(
        &mut self,
        query: &str,
        params: &NamedBindings,
    ) -> Result<ExecOutcome, SqlMiddlewareDbError> {
        execute_named(self.link()?, query, params).await
    }

    async fn query(
        &mut self,
        query: &str,
        params: &[RowValues],
    ) -> Result<ExecOutcome, SqlMiddlewareDbError> {
        execute_positional(self.link()?, query, params).await
    }

    async fn execute_batch(&mut self, query: &str) -> Result<(), SqlMiddlewareDbError> {
        execute_batch(self.link()?, query).await
    }
}
