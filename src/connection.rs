use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::error::DatastoreError;
use crate::results::StatementResult;
use crate::types::RowValue;

/// A live backend connection.
///
/// Implementations own the wire protocol and the escaping rules of their backend. One
/// connection is shared by every operation of an adapter, so `query` takes `&self`.
#[async_trait]
pub trait Connection: Send + Sync + 'static {
    /// Error type reported by the backend. Surfaced to callers unchanged.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Render an identifier (table or column name) safe for inclusion in a statement.
    fn escape_id(&self, name: &str) -> String;

    /// Render a literal value safe for inclusion in a statement.
    fn escape(&self, value: &RowValue) -> String;

    /// Run one statement and return the backend's raw result.
    ///
    /// # Errors
    ///
    /// Returns the backend's error when the statement is rejected or fails.
    async fn query(&self, statement: &str) -> Result<StatementResult, Self::Error>;
}

/// Opens connections from an opaque configuration value.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    /// Connection parameters, handed to the backend verbatim.
    type Config: Send + Sync + 'static;
    type Connection: Connection;

    /// Create a connection and complete the handshake.
    ///
    /// # Errors
    ///
    /// Returns the backend's error when the handshake, authentication or network fails.
    async fn connect(
        &self,
        config: &Self::Config,
    ) -> Result<Self::Connection, <Self::Connection as Connection>::Error>;
}

/// Error type of the connections produced by connector `C`.
pub type BackendError<C> = <<C as Connector>::Connection as Connection>::Error;

/// Lazily established, cached, single backend connection.
///
/// The first `acquire` connects; later calls reuse the cached handle. Concurrent first
/// callers wait on the same in-flight attempt. A failed attempt leaves the slot empty so
/// the next call tries again from scratch.
pub struct ConnectionManager<C: Connector> {
    connector: C,
    config: C::Config,
    slot: OnceCell<Arc<C::Connection>>,
}

impl<C: Connector> ConnectionManager<C> {
    pub fn new(connector: C, config: C::Config) -> Self {
        Self {
            connector,
            config,
            slot: OnceCell::new(),
        }
    }

    /// Return the cached connection, establishing it first if needed.
    ///
    /// # Errors
    ///
    /// Returns `DatastoreError::Connection` carrying the backend's error when the
    /// connection cannot be established.
    pub async fn acquire(&self) -> Result<Arc<C::Connection>, DatastoreError<BackendError<C>>> {
        if let Some(conn) = self.slot.get() {
            return Ok(Arc::clone(conn));
        }

        let conn = self
            .slot
            .get_or_try_init(|| async {
                debug!("establishing backend connection");
                match self.connector.connect(&self.config).await {
                    Ok(conn) => Ok(Arc::new(conn)),
                    Err(err) => {
                        warn!(error = %err, "backend connection failed");
                        Err(DatastoreError::Connection(err))
                    }
                }
            })
            .await?;
        Ok(Arc::clone(conn))
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.slot.initialized()
    }

    /// Forget the cached connection; the next `acquire` reconnects.
    ///
    /// Outstanding handles stay usable until their holders drop them.
    pub fn reset(&mut self) -> Option<Arc<C::Connection>> {
        self.slot.take()
    }

    #[must_use]
    pub fn config(&self) -> &C::Config {
        &self.config
    }

    #[must_use]
    pub fn connector(&self) -> &C {
        &self.connector
    }
}

impl<C> std::fmt::Debug for ConnectionManager<C>
where
    C: Connector,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("connected", &self.is_connected())
            .finish_non_exhaustive()
    }
}
