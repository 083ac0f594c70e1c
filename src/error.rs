use thiserror::Error;

/// Errors surfaced by the datastore operations.
///
/// `E` is the backend's own error type. It is carried unchanged so callers can match on
/// whatever the driver reported; [`DatastoreError::into_inner`] hands it back.
#[derive(Debug, Error)]
pub enum DatastoreError<E>
where
    E: std::error::Error + 'static,
{
    /// Establishing the connection failed. Nothing is cached; the next call reconnects.
    #[error("Connection error: {0}")]
    Connection(#[source] E),

    /// The backend rejected or failed a statement.
    #[error("Query error: {0}")]
    Query(#[source] E),

    /// A projected field name was refused by `ProjectionMode::Validated`.
    #[error("Invalid field name: {0}")]
    InvalidField(String),
}

impl<E> DatastoreError<E>
where
    E: std::error::Error + 'static,
{
    /// The backend error, if this error came from the backend.
    #[must_use]
    pub fn backend_error(&self) -> Option<&E> {
        match self {
            Self::Connection(err) | Self::Query(err) => Some(err),
            Self::InvalidField(_) => None,
        }
    }

    /// Consume the error and return the backend's original value.
    ///
    /// # Errors
    ///
    /// Returns `self` back when the error did not originate in the backend.
    pub fn into_inner(self) -> Result<E, Self> {
        match self {
            Self::Connection(err) | Self::Query(err) => Ok(err),
            other @ Self::InvalidField(_) => Err(other),
        }
    }

    #[must_use]
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    #[must_use]
    pub fn is_query(&self) -> bool {
        matches!(self, Self::Query(_))
    }
}
