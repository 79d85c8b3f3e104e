use thiserror::Error;

use deadpool::managed::PoolError;

#[derive(Debug, Error)]
pub enum SqlMiddlewareDbError {
    #[error(transparent)]
    MysqlError(#[from] mysql_async::Error),

    #[error(transparent)]
    PoolError(#[from] PoolError<mysql_async::Error>),

    #[error("Statement build error: {0}")]
    BuildError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Parameter conversion error: {0}")]
    ParameterError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    #[error("Other database error: {0}")]
    Other(String),
}

