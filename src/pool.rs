use std::fmt;

use async_trait::async_trait;
use deadpool::managed::{Object, Pool};
use tracing::debug;

use crate::connection::Connection;
use crate::error::SqlMiddlewareDbError;
use crate::mysql::{
    MysqlManager, MysqlOptions, MysqlOptionsBuilder, execute_batch, execute_named,
    execute_positional,
};
use crate::results::ExecOutcome;
use crate::transaction::Transaction;
use crate::types::{NamedBindings, RowValues};

/// Snapshot of pool usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStatus {
    pub max_size: usize,
    /// Links currently open, idle or checked out.
    pub size: usize,
    /// Idle links ready for checkout.
    pub available: usize,
    /// Callers waiting for a link.
    pub waiting: usize,
}

impl From<deadpool::Status> for PoolStatus {
    fn from(status: deadpool::Status) -> Self {
        Self {
            max_size: status.max_size,
            size: status.size,
            available: status.available,
            waiting: status.waiting,
        }
    }
}

/// Pool of MySQL links.
///
/// Cloning is cheap and every clone shares the same links. Running statements
/// directly on the pool checks a link out per call; [`begin_transaction`] pins
/// one link for the life of a [`Transaction`].
///
/// [`begin_transaction`]: MysqlPool::begin_transaction
#[derive(Clone)]
pub struct MysqlPool {
    pool: Pool<MysqlManager>,
}

impl fmt::Debug for MysqlPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MysqlPool")
            .field("status", &self.status())
            .finish()
    }
}

impl MysqlPool {
    /// Build a pool from `options`. No link is opened until the first checkout.
    ///
    /// # Errors
    /// Returns `SqlMiddlewareDbError::ConfigError` if the options are invalid.
    pub fn new(options: &MysqlOptions) -> Result<Self, SqlMiddlewareDbError> {
        let pool = options.build_pool()?;
        debug!(?options, "mysql pool created");
        Ok(Self { pool })
    }

    /// Build a pool from a `mysql://` URL with default pool sizing.
    ///
    /// # Errors
    /// Returns `SqlMiddlewareDbError::ConfigError` if the URL or options are invalid.
    pub fn from_url(url: &str) -> Result<Self, SqlMiddlewareDbError> {
        Self::new(&MysqlOptions::from_url(url)?)
    }

    #[must_use]
    pub fn builder(host: impl Into<String>, user: impl Into<String>) -> MysqlOptionsBuilder {
        MysqlOptionsBuilder::new(host, user)
    }

    /// Check out a link. It returns to the pool when the object is dropped.
    ///
    /// # Errors
    /// Returns `SqlMiddlewareDbError::PoolError` if no link can be obtained.
    pub async fn get(&self) -> Result<Object<MysqlManager>, SqlMiddlewareDbError> {
        Ok(self.pool.get().await?)
    }

    /// Check out a link and start a transaction on it.
    ///
    /// If `START TRANSACTION` fails the link goes straight back to the pool and
    /// the driver error is returned.
    ///
    /// # Errors
    /// Returns `SqlMiddlewareDbError::PoolError` if checkout fails, or
    /// `SqlMiddlewareDbError::MysqlError` if the transaction cannot be started.
    pub async fn begin_transaction(&self) -> Result<Transaction, SqlMiddlewareDbError> {
        let conn = self.get().await?;
        Transaction::begin(conn).await
    }

    #[must_use]
    pub fn status(&self) -> PoolStatus {
        self.pool.status().into()
    }

    /// Close the pool. Idle links are dropped and later checkouts fail.
    pub fn close(&self) {
        self.pool.close();
    }
}

#[async_trait]
impl Connection for MysqlPool {
    async fn execute(
        &mut self,
        query: &str,
        params: &NamedBindings,
    ) -> Result<ExecOutcome, SqlMiddlewareDbError> {
        let mut conn = self.get().await?;
        execute_named(&mut conn, query, params).await
    }

    async fn query(
        &mut self,
        query: &str,
        params: &[RowValues],
    ) -> Result<ExecOutcome, SqlMiddlewareDbError> {
        let mut conn = self.get().await?;
        execute_positional(&mut conn, query, params).await
    }

    async fn execute_batch(&mut self, query: &str) -> Result<(), SqlMiddlewareDbError> {
        let mut conn = self.get().await?;
        execute_batch(&mut conn, query).await
    }
}
