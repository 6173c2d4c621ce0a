//! Error types for the client layer.
//!
//! Only failures to obtain an answer live here. A backend that answers with
//! `InputValidationError` or `BaseError` has answered; those arrive as
//! [`Outcome`](markstack_model::Outcome) variants instead.

use markstack_cache::CacheError;
use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur while talking to the backend.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection refused, DNS failure, reset, ...
    #[error("network error: {0}")]
    Network(String),

    /// No answer within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Non-success HTTP status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Top-level GraphQL `errors` (schema mismatch, resolver crash).
    #[error("GraphQL error: {0}")]
    GraphQl(String),

    /// The response lacks the expected root field.
    #[error("missing `{0}` in response")]
    MissingData(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The answer could not be stored in the entity cache.
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    /// IO error (config file).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// True when resending the same request may succeed; false when the
    /// request itself has to change.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Network(_) | ClientError::Timeout => true,
            ClientError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if let Some(status) = err.status() {
            ClientError::Status {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else if err.is_decode() {
            ClientError::GraphQl(format!("undecodable response: {err}"))
        } else {
            ClientError::Network(err.to_string())
        }
    }
}
