//! Form state and validation for markstack.
//!
//! - [`SchemaValidator`] maps field values to per-field error messages. The
//!   stock implementation is [`ObjectSchema`], a small builder of string
//!   rules (required, email, url, min/max length, pattern).
//! - [`FormState`] binds input values to a validator. Its error mapping is
//!   always recomputed from the current values, never edited directly.
//! - [`SubmissionGuard`] suppresses resubmission of an identical snapshot
//!   while the previous one is still in flight.
//!
//! Nothing in this crate touches the network or the entity cache.

mod error;
mod guard;
mod schema;
pub mod schemas;
mod state;
mod values;

pub use error::{FormError, FormResult};
pub use guard::{Completion, SubmissionGuard, SubmissionTicket};
pub use schema::{ObjectSchema, SchemaValidator, StringRule, StringSchema};
pub use state::FormState;
pub use values::{FieldValues, ValidationErrors};
