//! Error types for form handling.

use thiserror::Error;

/// Result type for form operations.
pub type FormResult<T> = Result<T, FormError>;

/// Errors raised by misuse of a form, not by user input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    /// The field is not part of the form's defaults.
    #[error("unknown form field: {0}")]
    UnknownField(String),
}
