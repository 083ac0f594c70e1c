use async_trait::async_trait;
use mysql_async::prelude::Queryable;
use mysql_async::{Conn, Row};
use tokio::sync::Mutex;
use tracing::debug;

use super::config::MysqlOptions;
use super::escape::{escape_identifier, escape_literal};
use super::query::build_statement_result;
use crate::connection::{Connection, Connector};
use crate::results::StatementResult;
use crate::types::RowValue;

/// Opens [`MysqlConnection`]s from [`MysqlOptions`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlConnector;

#[async_trait]
impl Connector for MysqlConnector {
    type Config = MysqlOptions;
    type Connection = MysqlConnection;

    async fn connect(&self, config: &MysqlOptions) -> Result<MysqlConnection, mysql_async::Error> {
        debug!(host = %config.host, port = config.port, "connecting to MySQL");
        let conn = Conn::new(config.to_opts()).await?;
        Ok(MysqlConnection::new(conn))
    }
}

/// One MySQL session shared by every operation of an adapter.
///
/// The driver needs exclusive access per statement, so statements issued concurrently
/// through the same connection run one after the other.
#[derive(Debug)]
pub struct MysqlConnection {
    conn: Mutex<Conn>,
}

impl MysqlConnection {
    #[must_use]
    pub fn new(conn: Conn) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Server-assigned connection id.
    pub async fn id(&self) -> u32 {
        self.conn.lock().await.id()
    }
}

#[async_trait]
impl Connection for MysqlConnection {
    type Error = mysql_async::Error;

    fn escape_id(&self, name: &str) -> String {
        escape_identifier(name)
    }

    fn escape(&self, value: &RowValue) -> String {
        escape_literal(value)
    }

    async fn query(&self, statement: &str) -> Result<StatementResult, mysql_async::Error> {
        let mut conn = self.conn.lock().await;
        let rows: Vec<Row> = conn.query(statement).await?;
        Ok(build_statement_result(
            rows,
            conn.affected_rows(),
            conn.last_insert_id(),
        ))
    }
}
