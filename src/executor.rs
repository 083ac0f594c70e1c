use tracing::debug;

use crate::connection::Connection;
use crate::error::DatastoreError;
use crate::results::StatementResult;

/// Run a built statement on `conn`.
///
/// # Errors
///
/// Returns `DatastoreError::Query` carrying the backend's error unchanged. Nothing is
/// retried.
pub async fn run_statement<C>(
    conn: &C,
    statement: &str,
) -> Result<StatementResult, DatastoreError<C::Error>>
where
    C: Connection + ?Sized,
{
    debug!(statement, "running statement");
    let result = conn.query(statement).await.map_err(DatastoreError::Query)?;
    debug!(
        rows = result.rows.len(),
        affected_rows = result.affected_rows,
        "statement completed"
    );
    Ok(result)
}
