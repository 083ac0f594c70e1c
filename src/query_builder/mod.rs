//! Statement construction.
//!
//! Pure string assembly: every table name, filter/set field name and literal value goes
//! through the connection's `escape_id` / `escape`. Nothing here touches the network.
//!
//! ```rust
//! use datastore_mysql::prelude::*;
//! use datastore_mysql::query_builder::select_statement;
//!
//! # fn demo<C: Connection>(conn: &C) -> Result<(), InvalidFieldName> {
//! let opts = FindOptions::new().fields(["title", "abstract"]).offset(10).limit(42);
//! let sql = select_statement(conn, "articles", &opts, ProjectionMode::Raw)?;
//! # let _ = sql;
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

use crate::connection::Connection;
use crate::types::FieldMap;

mod dml;
mod select;

pub use dml::{ID_FIELD, insert_statement, set_clause, update_statement};
pub use select::{limit_clause, projection, select_statement, where_clause};

/// A projected field name rejected by `ProjectionMode::Validated`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid field name: {0:?}")]
pub struct InvalidFieldName(pub String);

/// `escaped_field=escaped_value` for every entry, joined by `separator`, in map order.
pub(crate) fn join_assignments<C>(conn: &C, fields: &FieldMap, separator: &str) -> String
where
    C: Connection + ?Sized,
{
    fields
        .iter()
        .map(|(name, value)| format!("{}={}", conn.escape_id(name), conn.escape(value)))
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
pub(crate) mod test_support {
    use async_trait::async_trait;

    use crate::connection::Connection;
    use crate::results::StatementResult;
    use crate::types::RowValue;

    #[derive(Debug, thiserror::Error)]
    #[error("statement execution is not available in builder tests")]
    pub(crate) struct NoExecution;

    /// Escapes nothing, so built statements can be compared verbatim.
    pub(crate) struct Identity;

    #[async_trait]
    impl Connection for Identity {
        type Error = NoExecution;

        fn escape_id(&self, name: &str) -> String {
            name.to_string()
        }

        fn escape(&self, value: &RowValue) -> String {
            value.to_string()
        }

        async fn query(&self, _statement: &str) -> Result<StatementResult, NoExecution> {
            Err(NoExecution)
        }
    }

    /// Brackets identifiers and quotes every value, to make escaping visible.
    pub(crate) struct Marking;

    #[async_trait]
    impl Connection for Marking {
        type Error = NoExecution;

        fn escape_id(&self, name: &str) -> String {
            format!("[{name}]")
        }

        fn escape(&self, value: &RowValue) -> String {
            format!("'{value}'")
        }

        async fn query(&self, _statement: &str) -> Result<StatementResult, NoExecution> {
            Err(NoExecution)
        }
    }
}
