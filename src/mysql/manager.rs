use std::fmt;

use deadpool::managed::{Manager, Metrics, RecycleError, RecycleResult};
use mysql_async::prelude::Queryable;
use mysql_async::{Conn, Opts};

/// deadpool manager for `mysql_async` links.
#[derive(Clone)]
pub struct MysqlManager {
    opts: Opts,
}

impl MysqlManager {
    #[must_use]
    pub fn new(opts: Opts) -> Self {
        Self { opts }
    }
}

impl fmt::Debug for MysqlManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MysqlManager")
            .field("host", &self.opts.ip_or_hostname())
            .field("port", &self.opts.tcp_port())
            .field("database", &self.opts.db_name())
            .finish_non_exhaustive()
    }
}

impl Manager for MysqlManager {
    type Type = Conn;
    type Error = mysql_async::Error;

    async fn create(&self) -> Result<Self::Type, Self::Error> {
        Conn::new(self.opts.clone()).await
    }

    async fn recycle(&self, conn: &mut Self::Type, _metrics: &Metrics) -> RecycleResult<Self::Error> {
        // A link that fails a ping is discarded instead of being handed out again.
        conn.ping().await.map_err(RecycleError::Backend)
    }
}
