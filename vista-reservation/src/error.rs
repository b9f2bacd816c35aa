use uuid::Uuid;

use crate::changes::ChangeError;
use crate::models::{ReservationKind, ValidationError};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Reference {0} is already in use")]
    Duplicate(Uuid),

    #[error("Reservation {0} not found")]
    NotFound(Uuid),

    #[error("Version mismatch: expected {expected}, found {actual}")]
    VersionMismatch { expected: u64, actual: u64 },

    #[error("Reservation store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ReservationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Change(#[from] ChangeError),

    #[error("{kind} {reference} not found")]
    NotFound { kind: ReservationKind, reference: Uuid },

    /// Another writer got there first; re-read and retry.
    #[error("Reservation {reference} was modified concurrently (expected version {expected}, current {actual})")]
    Conflict { reference: Uuid, expected: u64, actual: u64 },

    #[error("Duplicate reference {0}: integrity violation")]
    DuplicateReference(Uuid),

    #[error("{0} reservations cannot be deleted")]
    DeleteNotSupported(ReservationKind),

    #[error("Reservation storage failure: {0}")]
    Storage(String),
}

impl ReservationError {
    pub fn is_retriable(&self) -> bool {
        matches!(self, ReservationError::Conflict { .. })
    }
}
