use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::trace;

use crate::connection::{BackendError, ConnectionManager, Connector};
use crate::error::DatastoreError;
use crate::executor::run_statement;
use crate::query_builder::{ID_FIELD, insert_statement, select_statement, update_statement};
use crate::results::Record;
use crate::types::{FieldMap, FindOptions, ProjectionMode, RowValue};

/// The datastore capability contract consumed by a generic façade.
///
/// `table` names the target table / collection.
#[async_trait]
pub trait Datastore: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// The record whose `id` equals `id`, or `None` when nothing matched.
    async fn get(&self, table: &str, id: RowValue) -> Result<Option<Record>, Self::Error>;

    /// Records matching `options`; possibly empty.
    async fn find(&self, table: &str, options: &FindOptions) -> Result<Vec<Record>, Self::Error>;

    /// Update the row with the given `id`; returns the affected row count.
    async fn update(
        &self,
        table: &str,
        id: RowValue,
        data: Option<&FieldMap>,
    ) -> Result<u64, Self::Error>;

    /// Insert a row; returns the identifier the backend assigned to it.
    async fn insert(&self, table: &str, data: Option<&FieldMap>) -> Result<u64, Self::Error>;
}

/// Adapter-level settings (the backend configuration is separate and opaque).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AdapterOptions {
    /// Rendering of requested field names in SELECT projections.
    pub projection: ProjectionMode,
}

impl AdapterOptions {
    #[must_use]
    pub fn with_projection(mut self, projection: ProjectionMode) -> Self {
        self.projection = projection;
        self
    }
}

/// [`Datastore`] over a single lazily established backend connection.
///
/// ```rust,no_run
/// # #[cfg(feature = "mysql")]
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// use datastore_mysql::prelude::*;
///
/// let opts = MysqlOptions::new("localhost", "me", "secret", "my_db");
/// let store = DatastoreAdapter::new(MysqlConnector, opts);
/// let article = store.get("articles", RowValue::Int(42)).await?;
/// # let _ = article;
/// # Ok(())
/// # }
/// ```
pub struct DatastoreAdapter<C: Connector> {
    connections: ConnectionManager<C>,
    options: AdapterOptions,
}

impl<C: Connector> DatastoreAdapter<C> {
    /// Build an adapter; `config` is handed verbatim to `connector` on first use.
    pub fn new(connector: C, config: C::Config) -> Self {
        Self::with_options(connector, config, AdapterOptions::default())
    }

    pub fn with_options(connector: C, config: C::Config, options: AdapterOptions) -> Self {
        Self {
            connections: ConnectionManager::new(connector, config),
            options,
        }
    }

    #[must_use]
    pub fn options(&self) -> &AdapterOptions {
        &self.options
    }

    /// The cached connection, established on first call.
    ///
    /// # Errors
    ///
    /// Returns `DatastoreError::Connection` when the connection cannot be established.
    pub async fn connection(&self) -> Result<Arc<C::Connection>, DatastoreError<BackendError<C>>> {
        self.connections.acquire().await
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connections.is_connected()
    }

    /// Drop the cached connection so the next operation reconnects.
    pub fn reset_connection(&mut self) {
        self.connections.reset();
    }

    /// See [`Datastore::find`].
    ///
    /// # Errors
    ///
    /// Connection or query failures from the backend, or `InvalidField` when projection
    /// validation is enabled and a field name is refused.
    pub async fn find(
        &self,
        table: &str,
        options: &FindOptions,
    ) -> Result<Vec<Record>, DatastoreError<BackendError<C>>> {
        let conn = self.connections.acquire().await?;
        let statement = select_statement(conn.as_ref(), table, options, self.options.projection)
            .map_err(|err| DatastoreError::InvalidField(err.0))?;
        let result = run_statement(conn.as_ref(), &statement).await?;
        Ok(result.into_rows())
    }

    /// See [`Datastore::get`].
    ///
    /// # Errors
    ///
    /// Connection or query failures from the backend. No match is `Ok(None)`.
    pub async fn get(
        &self,
        table: &str,
        id: RowValue,
    ) -> Result<Option<Record>, DatastoreError<BackendError<C>>> {
        let options = FindOptions::new()
            .filter(FieldMap::new().with(ID_FIELD, id))
            .limit(1);
        let rows = self.find(table, &options).await?;
        Ok(rows.into_iter().next())
    }

    /// See [`Datastore::update`]. Missing or empty `data` resolves `0` without I/O.
    ///
    /// # Errors
    ///
    /// Connection or query failures from the backend.
    pub async fn update(
        &self,
        table: &str,
        id: RowValue,
        data: Option<&FieldMap>,
    ) -> Result<u64, DatastoreError<BackendError<C>>> {
        let Some(data) = data.filter(|data| !data.is_empty()) else {
            trace!(table, "nothing to update");
            return Ok(0);
        };
        let conn = self.connections.acquire().await?;
        let Some(statement) = update_statement(conn.as_ref(), table, &id, data) else {
            return Ok(0);
        };
        let result = run_statement(conn.as_ref(), &statement).await?;
        Ok(result.affected_rows)
    }

    /// See [`Datastore::insert`]. Missing or empty `data` resolves `0` without I/O.
    ///
    /// # Errors
    ///
    /// Connection or query failures from the backend.
    pub async fn insert(
        &self,
        table: &str,
        data: Option<&FieldMap>,
    ) -> Result<u64, DatastoreError<BackendError<C>>> {
        let Some(data) = data.filter(|data| !data.is_empty()) else {
            trace!(table, "nothing to insert");
            return Ok(0);
        };
        let conn = self.connections.acquire().await?;
        let Some(statement) = insert_statement(conn.as_ref(), table, data) else {
            return Ok(0);
        };
        let result = run_statement(conn.as_ref(), &statement).await?;
        Ok(result.insert_id.unwrap_or(0))
    }
}

#[async_trait]
impl<C: Connector> Datastore for DatastoreAdapter<C> {
    type Error = DatastoreError<BackendError<C>>;

    async fn get(&self, table: &str, id: RowValue) -> Result<Option<Record>, Self::Error> {
        DatastoreAdapter::get(self, table, id).await
    }

    async fn find(&self, table: &str, options: &FindOptions) -> Result<Vec<Record>, Self::Error> {
        DatastoreAdapter::find(self, table, options).await
    }

    async fn update(
        &self,
        table: &str,
        id: RowValue,
        data: Option<&FieldMap>,
    ) -> Result<u64, Self::Error> {
        DatastoreAdapter::update(self, table, id, data).await
    }

    async fn insert(&self, table: &str, data: Option<&FieldMap>) -> Result<u64, Self::Error> {
        DatastoreAdapter::insert(self, table, data).await
    }
}

impl<C: Connector> std::fmt::Debug for DatastoreAdapter<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatastoreAdapter")
            .field("connections", &self.connections)
            .field("options", &self.options)
            .finish()
    }
}
