//! Datastore adapter over a relational backend.
//!
//! Implements the `get` / `find` / `update` / `insert` capability contract by building
//! escaped SQL statements and running them on one lazily established, cached connection.
//!
//! ```rust,no_run
//! # #[cfg(feature = "mysql")]
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! use datastore_mysql::prelude::*;
//!
//! let store = DatastoreAdapter::new(
//!     MysqlConnector,
//!     MysqlOptions::new("localhost", "me", "secret", "my_db"),
//! );
//! let articles = store
//!     .find("articles", &FindOptions::new().fields(["title", "abstract"]).limit(10))
//!     .await?;
//! let id = store
//!     .insert("articles", Some(&FieldMap::new().with("title", "new title")))
//!     .await?;
//! # let _ = (articles, id);
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod callback;
pub mod connection;
pub mod error;
pub mod executor;
pub mod prelude;
pub mod query_builder;
pub mod results;
pub mod types;

#[cfg(feature = "mysql")]
pub mod mysql;

pub use adapter::{AdapterOptions, Datastore, DatastoreAdapter};
pub use connection::{BackendError, Connection, ConnectionManager, Connector};
pub use error::DatastoreError;
pub use results::{Record, StatementResult};
pub use types::{FieldMap, FindOptions, ProjectionMode, RowValue};
