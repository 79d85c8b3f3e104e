use async_trait::async_trait;
use mysql_middleware::prelude::*;
use tokio::runtime::Runtime;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Named(String, NamedBindings),
    Positional(String, Vec<RowValues>),
    Batch(String),
}

/// Records every call instead of talking to a server.
#[derive(Default)]
struct Recorder {
    calls: Vec<Call>,
}

#[async_trait]
impl Connection for Recorder {
    async fn execute(
        &mut self,
        query: &str,
        params: &NamedBindings,
    ) -> Result<ExecOutcome, SqlMiddlewareDbError> {
        self.calls.push(Call::Named(query.to_string(), params.clone()));
        Ok(ExecOutcome::Write(WriteSummary {
            affected_rows: 1,
            ..WriteSummary::default()
        }))
    }

    async fn query(
        &mut self,
        query: &str,
        params: &[RowValues],
    ) -> Result<ExecOutcome, SqlMiddlewareDbError> {
        self.calls
            .push(Call::Positional(query.to_string(), params.to_vec()));
        Ok(ExecOutcome::Rows(ResultSet::default()))
    }

    async fn execute_batch(&mut self, query: &str) -> Result<(), SqlMiddlewareDbError> {
        self.calls.push(Call::Batch(query.to_string()));
        Ok(())
    }
}

#[test]
fn named_bindings_take_the_named_path() -> Result<(), SqlMiddlewareDbError> {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let mut conn = Recorder::default();
        let bindings = Bindings::named().bind("id", 7);
        let outcome = conn
            .exec("SELECT * FROM users WHERE id = :id", bindings)
            .await?;
        assert_eq!(outcome.affected_rows(), 1);

        let mut expected = NamedBindings::new();
        expected.insert("id".to_string(), RowValues::Int(7));
        assert_eq!(
            conn.calls,
            vec![Call::Named(
                "SELECT * FROM users WHERE id = :id".to_string(),
                expected
            )]
        );
        Ok(())
    })
}

#[test]
fn empty_named_map_still_takes_the_named_path() -> Result<(), SqlMiddlewareDbError> {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let mut conn = Recorder::default();
        conn.exec("SELECT 1", Bindings::named()).await?;
        assert_eq!(
            conn.calls,
            vec![Call::Named("SELECT 1".to_string(), NamedBindings::new())]
        );
        Ok(())
    })
}

#[test]
fn empty_named_bindings_keep_inlined_literals_intact() -> Result<(), SqlMiddlewareDbError> {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let mut conn = Recorder::default();
        conn.insert(StatementOptions::default())
            .into_table("notes")
            .set("path", "C:\\temp\\")
            .set("body", "meet at:noon")
            .exec(Bindings::named())
            .await?;
        assert_eq!(
            conn.calls,
            vec![Call::Named(
                "INSERT INTO notes (path, body) VALUES ('C:\\\\temp\\\\', 'meet at:noon')"
                    .to_string(),
                NamedBindings::new()
            )]
        );
        Ok(())
    })
}

#[test]
fn positional_and_default_bindings_take_the_positional_path() -> Result<(), SqlMiddlewareDbError>
{
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let mut conn = Recorder::default();
        conn.exec(
            "SELECT * FROM users WHERE id = ? AND name = ?",
            Bindings::positional([RowValues::Int(1), RowValues::Text("a".into())]),
        )
        .await?;
        conn.exec("SELECT 1", Bindings::default()).await?;
        assert_eq!(
            conn.calls,
            vec![
                Call::Positional(
                    "SELECT * FROM users WHERE id = ? AND name = ?".to_string(),
                    vec![RowValues::Int(1), RowValues::Text("a".into())]
                ),
                Call::Positional("SELECT 1".to_string(), Vec::new()),
            ]
        );
        Ok(())
    })
}

#[test]
fn bound_select_runs_inlined_sql() -> Result<(), SqlMiddlewareDbError> {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let mut conn = Recorder::default();
        let rows = conn
            .select(StatementOptions::default())
            .from("users")
            .where_clause("name = ?", "O'Brien")
            .order_by("id", SortOrder::Desc)
            .limit(5)
            .exec(Bindings::default())
            .await?
            .into_rows();
        assert!(rows.is_empty());
        assert_eq!(
            conn.calls,
            vec![Call::Positional(
                "SELECT * FROM users WHERE (name = 'O\\'Brien') ORDER BY id DESC LIMIT 5"
                    .to_string(),
                Vec::new()
            )]
        );
        Ok(())
    })
}

#[test]
fn bound_exec_forwards_caller_bindings() -> Result<(), SqlMiddlewareDbError> {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let mut conn = Recorder::default();
        conn.update(StatementOptions::default())
            .table("users")
            .set_raw("name = :name", ())
            .where_clause("id = ?", 3)
            .exec(Bindings::named().bind("name", "Ada"))
            .await?;
        let mut expected = NamedBindings::new();
        expected.insert("name".to_string(), RowValues::Text("Ada".into()));
        assert_eq!(
            conn.calls,
            vec![Call::Named(
                "UPDATE users SET name = :name WHERE (id = 3)".to_string(),
                expected
            )]
        );
        Ok(())
    })
}

#[test]
fn exec_param_sends_builder_values() -> Result<(), SqlMiddlewareDbError> {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let mut conn = Recorder::default();
        conn.insert(StatementOptions::default())
            .into_table("people")
            .set("name", "O'Brien")
            .set("age", 41)
            .exec_param()
            .await?;
        assert_eq!(
            conn.calls,
            vec![Call::Positional(
                "INSERT INTO people (name, age) VALUES (?, ?)".to_string(),
                vec![RowValues::Text("O'Brien".into()), RowValues::Int(41)]
            )]
        );
        Ok(())
    })
}

#[test]
fn for_update_through_a_bound_select() {
    let mut conn = Recorder::default();
    let sql = conn
        .select(StatementOptions::default())
        .from("accounts")
        .where_clause("id = ?", 9)
        .for_update()
        .to_sql()
        .unwrap();
    assert_eq!(sql, "SELECT * FROM accounts WHERE (id = 9) FOR UPDATE");
}

#[test]
fn incomplete_statement_never_reaches_the_connection() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let mut conn = Recorder::default();
        let err = conn
            .delete(StatementOptions::default())
            .where_clause("id = ?", 1)
            .exec(Bindings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SqlMiddlewareDbError::BuildError(_)));

        let err = conn
            .insert(StatementOptions::default())
            .set("a", 1)
            .exec_param()
            .await
            .unwrap_err();
        assert!(matches!(err, SqlMiddlewareDbError::BuildError(_)));
        assert!(conn.calls.is_empty());
    });
}

#[test]
fn execute_batch_passes_text_through() -> Result<(), SqlMiddlewareDbError> {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let mut conn = Recorder::default();
        conn.execute_batch("CREATE TABLE t (id INT); INSERT INTO t VALUES (1);")
            .await?;
        assert_eq!(
            conn.calls,
            vec![Call::Batch(
                "CREATE TABLE t (id INT); INSERT INTO t VALUES (1);".to_string()
            )]
        );
        Ok(())
    })
}

#[test]
fn into_statement_detaches_the_builder() {
    let mut conn = Recorder::default();
    let select = conn
        .select(StatementOptions::default())
        .field("id")
        .from("users")
        .into_statement();
    assert_eq!(select.to_sql().unwrap(), "SELECT id FROM users");
}
