//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and traits
//! to make it easier to get started with the library.

pub use crate::connection::{Bound, Connection};
pub use crate::error::SqlMiddlewareDbError;
pub use crate::mysql::{MysqlOptions, MysqlOptionsBuilder};
pub use crate::pool::{MysqlPool, PoolStatus};
pub use crate::results::{CustomDbRow, ExecOutcome, ResultSet, WriteSummary};
pub use crate::statement::blocks::{JoinKind, SortOrder};
pub use crate::statement::{
    Assignable, Delete, DeleteQuery, Expression, Filterable, FromTables, Insert, InsertQuery,
    IntoParams, Joinable, Limitable, Select, SelectQuery, Sortable, SqlParam, Statement,
    StatementOptions, Update, UpdateQuery,
};
pub use crate::transaction::Transaction;
pub use crate::types::{Bindings, NamedBindings, RowValues};
