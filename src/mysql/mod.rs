// MySQL module - the concrete backend over `mysql_async`
//
// This module is split into several sub-modules:
// - config: Connection parameters and conversion into driver options
// - escape: Identifier and literal escaping rules
// - query: Row extraction into records
// - connection: Connector / Connection implementations

pub mod config;
pub mod connection;
pub mod escape;
pub mod query;

// Re-export the public API
pub use config::{MysqlConfigError, MysqlOptions};
pub use connection::{MysqlConnection, MysqlConnector};
pub use escape::{escape_identifier, escape_literal};
pub use query::build_statement_result;

/// Error type reported by the MySQL backend.
pub type MysqlError = mysql_async::Error;
