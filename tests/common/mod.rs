#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use datastore_mysql::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct MockError(pub String);

/// Configuration blob handed to the mock connector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            user: "me".into(),
            password: "secret".into(),
            database: "my_db".into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct MockState {
    pub connect_attempts: usize,
    pub configs_seen: Vec<MockConfig>,
    pub failing_connects: usize,
    pub connect_delay: Option<Duration>,
    pub statements: Vec<String>,
    pub escaped_ids: Vec<String>,
    pub escaped_values: Vec<RowValue>,
    pub responses: VecDeque<Result<StatementResult, MockError>>,
}

/// Connector whose connections escape nothing and answer from a queue of canned results.
#[derive(Debug, Clone, Default)]
pub struct MockConnector {
    pub state: Arc<Mutex<MockState>>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, response: Result<StatementResult, MockError>) {
        self.state.lock().unwrap().responses.push_back(response);
    }

    pub fn respond_rows(&self, rows: Vec<Record>) {
        self.respond(Ok(StatementResult::from_rows(rows)));
    }

    pub fn fail_next_connects(&self, count: usize) {
        self.state.lock().unwrap().failing_connects = count;
    }

    pub fn delay_connects(&self, delay: Duration) {
        self.state.lock().unwrap().connect_delay = Some(delay);
    }

    pub fn connect_attempts(&self) -> usize {
        self.state.lock().unwrap().connect_attempts
    }

    pub fn statements(&self) -> Vec<String> {
        self.state.lock().unwrap().statements.clone()
    }

    pub fn escaped_ids(&self) -> Vec<String> {
        self.state.lock().unwrap().escaped_ids.clone()
    }

    pub fn escaped_values(&self) -> Vec<RowValue> {
        self.state.lock().unwrap().escaped_values.clone()
    }
}

#[async_trait]
impl Connector for MockConnector {
    type Config = MockConfig;
    type Connection = MockConnection;

    async fn connect(&self, config: &MockConfig) -> Result<MockConnection, MockError> {
        let delay = {
            let mut state = self.state.lock().unwrap();
            state.connect_attempts += 1;
            state.configs_seen.push(config.clone());
            state.connect_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let mut state = self.state.lock().unwrap();
        if state.failing_connects > 0 {
            state.failing_connects -= 1;
            return Err(MockError("ECONNREFUSED".into()));
        }
        Ok(MockConnection {
            state: Arc::clone(&self.state),
        })
    }
}

#[derive(Debug)]
pub struct MockConnection {
    state: Arc<Mutex<MockState>>,
}

#[async_trait]
impl Connection for MockConnection {
    type Error = MockError;

    fn escape_id(&self, name: &str) -> String {
        self.state.lock().unwrap().escaped_ids.push(name.to_string());
        name.to_string()
    }

    fn escape(&self, value: &RowValue) -> String {
        self.state.lock().unwrap().escaped_values.push(value.clone());
        value.to_string()
    }

    async fn query(&self, statement: &str) -> Result<StatementResult, MockError> {
        let mut state = self.state.lock().unwrap();
        state.statements.push(statement.to_string());
        state
            .responses
            .pop_front()
            .unwrap_or_else(|| Ok(StatementResult::default()))
    }
}

pub fn adapter(connector: &MockConnector) -> DatastoreAdapter<MockConnector> {
    DatastoreAdapter::new(connector.clone(), MockConfig::default())
}

pub fn article() -> FieldMap {
    FieldMap::new()
        .with("title", "new title")
        .with("abstract", "new abstract")
}
