//! Bridge for drivers that report completion through callbacks.
//!
//! A [`CallbackClient`] creates [`CallbackDriver`] handles whose `connect` and `query`
//! deliver their outcome by invoking a boxed callback, possibly from another thread.
//! [`CallbackConnector`] lifts such a driver into the async [`Connector`] /
//! [`Connection`] contract: each call parks on a oneshot channel that the callback fills.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::oneshot;

use crate::connection::{Connection, Connector};
use crate::results::StatementResult;
use crate::types::RowValue;

/// Completion callback handed to a driver.
pub type Callback<T, E> = Box<dyn FnOnce(Result<T, E>) + Send + 'static>;

/// Connection handle of a callback-style driver.
pub trait CallbackDriver: Send + Sync + 'static {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Start the handshake; `done` receives its outcome.
    fn connect(&self, done: Callback<(), Self::Error>);

    /// Start a statement; `done` receives its outcome.
    fn query(&self, statement: &str, done: Callback<StatementResult, Self::Error>);

    fn escape_id(&self, name: &str) -> String;

    fn escape(&self, value: &RowValue) -> String;
}

/// Factory for callback-style driver handles.
pub trait CallbackClient: Send + Sync + 'static {
    type Config: Send + Sync + 'static;
    type Driver: CallbackDriver;

    /// Build an unconnected handle from the configuration.
    fn create_connection(&self, config: &Self::Config) -> Self::Driver;
}

/// Error produced through the callback bridge.
#[derive(Debug, Error)]
pub enum CallbackError<E>
where
    E: std::error::Error + 'static,
{
    /// The driver reported an error through the callback.
    #[error(transparent)]
    Driver(E),

    /// The driver dropped the callback without ever calling it.
    #[error("driver dropped the {0} callback without completing it")]
    Dropped(&'static str),
}

impl<E> CallbackError<E>
where
    E: std::error::Error + 'static,
{
    /// The driver's own error, if it reported one.
    #[must_use]
    pub fn driver_error(&self) -> Option<&E> {
        match self {
            Self::Driver(err) => Some(err),
            Self::Dropped(_) => None,
        }
    }
}

async fn complete<T, E>(
    start: impl FnOnce(Callback<T, E>),
    what: &'static str,
) -> Result<T, CallbackError<E>>
where
    T: Send + 'static,
    E: std::error::Error + Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    start(Box::new(move |outcome| {
        // receiver gone means the caller stopped waiting
        let _ = tx.send(outcome);
    }));
    match rx.await {
        Ok(outcome) => outcome.map_err(CallbackError::Driver),
        Err(_) => Err(CallbackError::Dropped(what)),
    }
}

/// [`Connector`] over a [`CallbackClient`].
#[derive(Debug, Clone, Default)]
pub struct CallbackConnector<K> {
    client: K,
}

impl<K: CallbackClient> CallbackConnector<K> {
    pub fn new(client: K) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &K {
        &self.client
    }
}

#[async_trait]
impl<K: CallbackClient> Connector for CallbackConnector<K> {
    type Config = K::Config;
    type Connection = CallbackConnection<K::Driver>;

    async fn connect(
        &self,
        config: &Self::Config,
    ) -> Result<Self::Connection, <Self::Connection as Connection>::Error> {
        let driver = self.client.create_connection(config);
        complete(|done| driver.connect(done), "connect").await?;
        Ok(CallbackConnection { driver })
    }
}

/// [`Connection`] over a connected [`CallbackDriver`].
#[derive(Debug)]
pub struct CallbackConnection<D> {
    driver: D,
}

impl<D> CallbackConnection<D> {
    pub fn driver(&self) -> &D {
        &self.driver
    }
}

#[async_trait]
impl<D: CallbackDriver> Connection for CallbackConnection<D> {
    type Error = CallbackError<D::Error>;

    fn escape_id(&self, name: &str) -> String {
        self.driver.escape_id(name)
    }

    fn escape(&self, value: &RowValue) -> String {
        self.driver.escape(value)
    }

    async fn query(&self, statement: &str) -> Result<StatementResult, Self::Error> {
        complete(|done| self.driver.query(statement, done), "query").await
    }
}
