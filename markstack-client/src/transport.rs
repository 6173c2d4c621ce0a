//! Transport layer abstraction.
//!
//! The executor only needs "send this operation, give me `data`". The HTTP
//! implementation talks GraphQL-over-HTTP with reqwest; [`mock`] answers
//! from a queue for tests.

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::operation::Operation;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Something that can carry a GraphQL operation to the backend.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `operation` and returns the response's `data` object.
    async fn send(&self, operation: &Operation) -> ClientResult<Value>;
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphQlErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorEntry {
    message: String,
}

/// GraphQL over HTTP POST.
pub struct HttpTransport {
    config: ClientConfig,
    client: Client,
    token: RwLock<Option<String>>,
}

impl HttpTransport {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ClientError::Config(format!("failed to create HTTP client: {e}")))?;
        let token = RwLock::new(config.auth_token.clone());
        Ok(Self {
            config,
            client,
            token,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Replaces the bearer token sent with subsequent requests.
    pub async fn set_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, operation: &Operation) -> ClientResult<Value> {
        debug!(operation = operation.name, endpoint = %self.config.endpoint, "sending request");
        let mut request = self
            .client
            .post(&self.config.endpoint)
            .json(&operation.body());
        if let Some(token) = self.token.read().await.as_deref() {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(operation = operation.name, status = status.as_u16(), "request failed");
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GraphQlResponse = response.json().await?;
        if !parsed.errors.is_empty() {
            let messages: Vec<String> = parsed.errors.into_iter().map(|e| e.message).collect();
            return Err(ClientError::GraphQl(messages.join("; ")));
        }
        match parsed.data {
            Some(data @ Value::Object(_)) => Ok(data),
            _ => Err(ClientError::MissingData("data".into())),
        }
    }
}

pub mod mock {
    //! Queue-backed transport for tests.

    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Mutex, PoisonError};
    use std::time::Duration;

    /// Answers operations from a FIFO of canned responses and records
    /// every operation it was asked to send.
    #[derive(Default)]
    pub struct MockTransport {
        responses: Mutex<VecDeque<ClientResult<Value>>>,
        sent: Mutex<Vec<Operation>>,
        calls: AtomicUsize,
        latency: Option<Duration>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Delays every answer, leaving room for concurrent callers.
        pub fn with_latency(mut self, latency: Duration) -> Self {
            self.latency = Some(latency);
            self
        }

        /// Queues a `data` object.
        pub fn respond(&self, data: Value) -> &Self {
            self.push(Ok(data));
            self
        }

        /// Queues a transport failure.
        pub fn fail(&self, error: ClientError) -> &Self {
            self.push(Err(error));
            self
        }

        fn push(&self, response: ClientResult<Value>) {
            self.responses
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push_back(response);
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        /// Operations sent so far, in order.
        pub fn sent(&self) -> Vec<Operation> {
            self.sent
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn send(&self, operation: &Operation) -> ClientResult<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.sent
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(operation.clone());
            if let Some(latency) = self.latency {
                tokio::time::sleep(latency).await;
            }
            self.responses
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pop_front()
                .unwrap_or_else(|| Err(ClientError::Network("no response queued".into())))
        }
    }
}
