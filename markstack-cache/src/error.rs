//! Error types for the entity cache.

use thiserror::Error;

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Errors that can occur while writing to or reading from the cache.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Payload was expected to be a JSON object.
    #[error("expected an object for {0}")]
    NotAnObject(String),

    /// A record selected with `id` arrived without one.
    #[error("missing id on {typename} payload")]
    MissingId { typename: String },

    /// The `id` field is not an integer.
    #[error("invalid id on {typename} payload: {value}")]
    InvalidId { typename: String, value: String },

    /// Payload typename disagrees with the fragment's type condition.
    #[error("typename mismatch: fragment on {expected}, payload is {actual}")]
    TypenameMismatch { expected: String, actual: String },

    /// Denormalized data did not match the requested type.
    #[error("deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),
}
