use crate::values::FieldValues;
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// How a guarded submission ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The backend answered. Submitting the same inputs again stays
    /// suppressed until they change.
    Settled,
    /// The request never got an answer (network, timeout). The snapshot is
    /// forgotten so the same inputs may be retried.
    Retryable,
}

/// Proof that a snapshot was admitted by [`SubmissionGuard::try_begin`].
#[derive(Debug)]
#[must_use = "a ticket must be passed back to `SubmissionGuard::finish`"]
pub struct SubmissionTicket {
    snapshot: FieldValues,
}

impl SubmissionTicket {
    pub fn snapshot(&self) -> &FieldValues {
        &self.snapshot
    }
}

/// Suppresses duplicate submissions by comparing input snapshots.
///
/// The guard does not cancel anything: a second submit of identical inputs
/// is simply refused while the first is in flight (and after it settles).
#[derive(Debug, Default)]
pub struct SubmissionGuard {
    last: Mutex<Option<FieldValues>>,
}

impl SubmissionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admits `snapshot` unless it equals the last admitted one.
    pub fn try_begin(&self, snapshot: &FieldValues) -> Option<SubmissionTicket> {
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        if last.as_ref() == Some(snapshot) {
            debug!("suppressing duplicate submission");
            return None;
        }
        *last = Some(snapshot.clone());
        Some(SubmissionTicket {
            snapshot: snapshot.clone(),
        })
    }

    /// Records how an admitted submission ended.
    pub fn finish(&self, ticket: SubmissionTicket, completion: Completion) {
        if completion == Completion::Retryable {
            let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
            // A newer snapshot may have been admitted meanwhile.
            if last.as_ref() == Some(&ticket.snapshot) {
                *last = None;
            }
        }
    }

    /// Forgets the last snapshot, e.g. after the form was reset.
    pub fn clear(&self) {
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// The last admitted snapshot.
    pub fn last_submitted(&self) -> Option<FieldValues> {
        self.last
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
