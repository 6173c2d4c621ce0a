//! Core type definitions for markstack.
//!
//! This crate defines the identifiers every other markstack crate agrees on:
//! - [`EntityId`]: the backend's integer primary key
//! - [`Typename`]: the GraphQL `__typename` discriminator
//! - [`EntityKey`]: the `(typename, id)` pair that uniquely addresses an entity
//!
//! Domain payloads (bookmarks, folders) live in `markstack-model`.

mod ids;

pub use ids::{EntityId, EntityKey, Typename};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when parsing identifiers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid entity id: {0}")]
    InvalidId(#[from] std::num::ParseIntError),

    #[error("invalid entity key: {0}")]
    InvalidKey(String),
}
