use mysql_async::prelude::Queryable;
use mysql_async::{Conn, Params};
use tracing::debug;

use super::params::{convert_named, convert_positional};
use super::query::collect_outcome;
use crate::error::SqlMiddlewareDbError;
use crate::results::ExecOutcome;
use crate::types::{NamedBindings, RowValues};

/// How a statement is sent to the server.
#[derive(Debug, PartialEq)]
pub(crate) enum Dispatch<'q> {
    /// Text protocol, SQL sent byte for byte.
    Text(&'q str),
    /// Prepared statement. The driver rewrites `:name` placeholders to `?`.
    Prepared(&'q str, Params),
}

pub(crate) fn dispatch_named<'q>(
    query: &'q str,
    bindings: &NamedBindings,
) -> Result<Dispatch<'q>, SqlMiddlewareDbError> {
    if bindings.is_empty() {
        return Ok(Dispatch::Text(query));
    }
    Ok(Dispatch::Prepared(query, convert_named(bindings)?))
}

pub(crate) fn dispatch_positional<'q>(
    query: &'q str,
    values: &[RowValues],
) -> Result<Dispatch<'q>, SqlMiddlewareDbError> {
    if values.is_empty() {
        return Ok(Dispatch::Text(query));
    }
    Ok(Dispatch::Prepared(query, convert_positional(values)?))
}

async fn run(conn: &mut Conn, dispatch: Dispatch<'_>) -> Result<ExecOutcome, SqlMiddlewareDbError> {
    match dispatch {
        Dispatch::Text(query) => {
            let result = conn.query_iter(query).await?;
            collect_outcome(result).await
        }
        Dispatch::Prepared(query, params) => {
            let result = conn.exec_iter(query, params).await?;
            collect_outcome(result).await
        }
    }
}

/// Run a batch of `;`-separated statements over the text protocol, discarding
/// every result.
///
/// # Errors
///
/// Returns `SqlMiddlewareDbError::MysqlError` if any statement fails.
pub async fn execute_batch(conn: &mut Conn, query: &str) -> Result<(), SqlMiddlewareDbError> {
    debug!(sql = query, "mysql execute_batch");
    conn.query_drop(query).await?;
    Ok(())
}

/// Run a statement with `:name` placeholders as a prepared statement.
///
/// An empty map sends the SQL over the text protocol untouched, so inlined
/// literals containing `:word` or a trailing backslash reach the server as
/// written. With a non-empty map the driver scans the whole text for `:name`
/// placeholders, inlined literals included.
///
/// # Errors
///
/// Returns `SqlMiddlewareDbError::MysqlError` if preparing or running the statement
/// fails, including a placeholder with no matching binding.
pub async fn execute_named(
    conn: &mut Conn,
    query: &str,
    bindings: &NamedBindings,
) -> Result<ExecOutcome, SqlMiddlewareDbError> {
    debug!(sql = query, params = bindings.len(), "mysql execute (named)");
    run(conn, dispatch_named(query, bindings)?).await
}

/// Run a statement with `?` placeholders.
///
/// With values it runs as a prepared statement; without values it goes over the
/// text protocol, so statements the server cannot prepare still work.
///
/// # Errors
///
/// Returns `SqlMiddlewareDbError::MysqlError` if the statement fails.
pub async fn execute_positional(
    conn: &mut Conn,
    query: &str,
    values: &[RowValues],
) -> Result<ExecOutcome, SqlMiddlewareDbError> {
    debug!(sql = query, params = values.len(), "mysql query (positional)");
    run(conn, dispatch_positional(query, values)?).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::{Assignable, Insert, InsertQuery, Statement, StatementOptions};

    fn notes_insert() -> String {
        Insert::new(StatementOptions::default())
            .into_table("notes")
            .set("path", "C:\\temp\\")
            .set("body", "meet at:noon")
            .to_sql()
            .unwrap()
    }

    #[test]
    fn empty_named_map_sends_inlined_sql_verbatim() {
        let sql = notes_insert();
        assert_eq!(
            sql,
            "INSERT INTO notes (path, body) VALUES ('C:\\\\temp\\\\', 'meet at:noon')"
        );
        assert_eq!(
            dispatch_named(&sql, &NamedBindings::new()).unwrap(),
            Dispatch::Text(sql.as_str())
        );
    }

    #[test]
    fn named_values_are_prepared() {
        let mut bindings = NamedBindings::new();
        bindings.insert("id".to_string(), RowValues::Int(3));
        let Dispatch::Prepared(sql, Params::Named(params)) =
            dispatch_named("SELECT * FROM t WHERE id = :id", &bindings).unwrap()
        else {
            panic!("expected a prepared statement with named params");
        };
        assert_eq!(sql, "SELECT * FROM t WHERE id = :id");
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn empty_positional_list_uses_text_protocol() {
        let sql = notes_insert();
        assert_eq!(
            dispatch_positional(&sql, &[]).unwrap(),
            Dispatch::Text(sql.as_str())
        );
        assert!(matches!(
            dispatch_positional("SELECT ?", &[RowValues::Int(1)]).unwrap(),
            Dispatch::Prepared("SELECT ?", Params::Positional(_))
        ));
    }
}
