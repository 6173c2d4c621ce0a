//! GraphQL client for markstack.
//!
//! Layers, bottom-up:
//! - [`Transport`]: carries an [`Operation`] to the backend and returns
//!   `data`. [`HttpTransport`] speaks GraphQL over HTTP; [`mock`] answers
//!   from a queue.
//! - [`MutationExecutor`]: decodes the root field into a result union.
//!   Backend-reported failures stay values; only transport failures are
//!   [`ClientError`]s.
//! - [`BookmarkClient`]: one method per operation, each keeping the shared
//!   [`EntityCache`](markstack_cache::EntityCache) consistent with the
//!   answer.
//! - [`FormSubmitter`]: validates a form, suppresses duplicate submits and
//!   routes the answer back into the form.

mod client;
mod config;
mod error;
mod executor;
pub mod operation;
mod submit;
mod transport;

pub use client::{BookmarkClient, BOOKMARKS_FIELD, CHILDREN_FIELD, VIEWER_FIELD};
pub use config::{ClientConfig, ENV_ENDPOINT, ENV_TIMEOUT_MS, ENV_TOKEN};
pub use error::{ClientError, ClientResult};
pub use executor::MutationExecutor;
pub use operation::{Operation, OperationKind};
pub use submit::{FormSubmitter, SubmitOutcome};
pub use transport::{mock, HttpTransport, Transport};
