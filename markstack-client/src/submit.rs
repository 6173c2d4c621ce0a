//! Form submission: validation gate, duplicate guard, answer routing.

use crate::error::{ClientError, ClientResult};
use markstack_form::{Completion, FieldValues, FormState, SchemaValidator, SubmissionGuard, ValidationErrors};
use markstack_model::Outcome;
use std::future::Future;
use tracing::debug;

/// What happened to one submit attempt.
#[derive(Debug)]
pub enum SubmitOutcome<T> {
    /// Local validation failed; nothing was sent.
    Invalid(ValidationErrors),
    /// Every field still holds its default; nothing was sent.
    Empty,
    /// The same values are already in flight or were already answered.
    Suppressed,
    /// The backend answered.
    Completed(Outcome<T>),
    /// No answer could be obtained.
    Failed(ClientError),
}

impl<T> SubmitOutcome<T> {
    pub fn is_suppressed(&self) -> bool {
        matches!(self, SubmitOutcome::Suppressed)
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, SubmitOutcome::Completed(Outcome::Ok(_)))
    }
}

/// Submits a form's values at most once per distinct snapshot.
///
/// One submitter belongs to one form. Concurrent submits of equal values
/// send a single request; the rest come back [`SubmitOutcome::Suppressed`].
#[derive(Debug, Default)]
pub struct FormSubmitter {
    guard: SubmissionGuard,
    reset_on_success: bool,
}

impl FormSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A submitter that resets the form after a successful answer, for
    /// forms that stay on screen (add-bookmark, new-folder).
    pub fn resetting() -> Self {
        Self {
            guard: SubmissionGuard::new(),
            reset_on_success: true,
        }
    }

    pub fn guard(&self) -> &SubmissionGuard {
        &self.guard
    }

    /// Sends `snapshot` through `send` unless an equal snapshot is already
    /// in flight or settled.
    pub async fn send<T, F, Fut>(&self, snapshot: FieldValues, send: F) -> SubmitOutcome<T>
    where
        F: FnOnce(FieldValues) -> Fut,
        Fut: Future<Output = ClientResult<Outcome<T>>>,
    {
        let Some(ticket) = self.guard.try_begin(&snapshot) else {
            return SubmitOutcome::Suppressed;
        };
        match send(snapshot).await {
            Ok(outcome) => {
                self.guard.finish(ticket, Completion::Settled);
                SubmitOutcome::Completed(outcome)
            }
            Err(error) => {
                debug!(error = %error, retryable = error.is_retryable(), "submission failed");
                let completion = if error.is_retryable() {
                    Completion::Retryable
                } else {
                    Completion::Settled
                };
                self.guard.finish(ticket, completion);
                SubmitOutcome::Failed(error)
            }
        }
    }

    /// Validates `form`, sends its values, and routes the answer back into
    /// the form. An untouched form is never sent.
    pub async fn submit<S, T, F, Fut>(&self, form: &mut FormState<S>, send: F) -> SubmitOutcome<T>
    where
        S: SchemaValidator,
        F: FnOnce(FieldValues) -> Fut,
        Fut: Future<Output = ClientResult<Outcome<T>>>,
    {
        form.mark_submitted();
        if form.is_error() {
            return SubmitOutcome::Invalid(form.errors().clone());
        }
        if form.is_empty() {
            debug!("form untouched, not submitting");
            return SubmitOutcome::Empty;
        }
        let outcome = self.send(form.values().clone(), send).await;
        self.apply(form, &outcome);
        outcome
    }

    /// Routes an answer into the form's error state.
    pub fn apply<S: SchemaValidator, T>(&self, form: &mut FormState<S>, outcome: &SubmitOutcome<T>) {
        match outcome {
            SubmitOutcome::Completed(Outcome::Ok(_)) => {
                if self.reset_on_success {
                    form.reset();
                    self.guard.clear();
                }
            }
            SubmitOutcome::Completed(Outcome::Invalid(error)) => form.set_server_error(error),
            SubmitOutcome::Completed(Outcome::Failed(error)) => form.set_form_error(error.message.clone()),
            SubmitOutcome::Failed(error) => form.set_form_error(error.to_string()),
            SubmitOutcome::Invalid(_) | SubmitOutcome::Empty | SubmitOutcome::Suppressed => {}
        }
    }
}
