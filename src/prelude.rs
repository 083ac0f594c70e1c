//! Convenient imports for common functionality.
//!
//! Re-exports the types most callers need to build an adapter and run operations.

pub use crate::adapter::{AdapterOptions, Datastore, DatastoreAdapter};
pub use crate::callback::{
    Callback, CallbackClient, CallbackConnection, CallbackConnector, CallbackDriver,
    CallbackError,
};
pub use crate::connection::{BackendError, Connection, ConnectionManager, Connector};
pub use crate::error::DatastoreError;
pub use crate::executor::run_statement;
pub use crate::query_builder::InvalidFieldName;
pub use crate::results::{Record, StatementResult};
pub use crate::types::{FieldMap, FindOptions, ProjectionMode, RowValue};

#[cfg(feature = "mysql")]
pub use crate::mysql::{MysqlConnection, MysqlConnector, MysqlError, MysqlOptions};
