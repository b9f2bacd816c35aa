use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::{RepositoryError, ReservationError};
use crate::models::{Reservation, ReservationKind, Submission};

/// Storage contract for reservations. Implementations must make
/// `compare_and_swap` atomic per reference.
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    async fn insert(&self, reservation: Reservation) -> Result<(), RepositoryError>;

    /// `None` when the reference is unknown or belongs to another kind.
    async fn get(&self, kind: ReservationKind, reference: Uuid) -> Result<Option<Reservation>, RepositoryError>;

    /// Case-insensitive email match, newest first.
    async fn list_by_email(
        &self,
        email: &str,
        kind: Option<ReservationKind>,
    ) -> Result<Vec<Reservation>, RepositoryError>;

    /// Stores `reservation` only if the stored copy is still at `expected_version`.
    async fn compare_and_swap(&self, reservation: Reservation, expected_version: u64) -> Result<(), RepositoryError>;

    /// Returns whether anything was removed.
    async fn delete(&self, kind: ReservationKind, reference: Uuid) -> Result<bool, RepositoryError>;
}

pub struct ReservationRegistry {
    repository: Arc<dyn ReservationRepository>,
}

impl ReservationRegistry {
    pub fn new(repository: Arc<dyn ReservationRepository>) -> Self {
        Self { repository }
    }

    pub async fn create(&self, submission: Submission) -> Result<Reservation, ReservationError> {
        submission.validate()?;

        let reservation = Reservation::new(Uuid::new_v4(), submission, Utc::now());
        let reference = reservation.reference;

        match self.repository.insert(reservation.clone()).await {
            Ok(()) => {
                info!(%reference, kind = %reservation.kind(), "Reservation created");
                Ok(reservation)
            }
            Err(RepositoryError::Duplicate(reference)) => {
                error!(%reference, "Duplicate reservation reference generated");
                Err(ReservationError::DuplicateReference(reference))
            }
            Err(e) => Err(storage(e)),
        }
    }

    pub async fn get_by_reference(&self, kind: ReservationKind, reference: Uuid) -> Result<Reservation, ReservationError> {
        self.repository
            .get(kind, reference)
            .await
            .map_err(storage)?
            .ok_or(ReservationError::NotFound { kind, reference })
    }

    pub async fn list_by_email(
        &self,
        email: &str,
        kind: Option<ReservationKind>,
    ) -> Result<Vec<Reservation>, ReservationError> {
        self.repository.list_by_email(email.trim(), kind).await.map_err(storage)
    }

    /// Read, mutate, compare-and-swap. The closure sees a private copy, so a
    /// rejected mutation leaves storage untouched. When `expected_version` is
    /// given, the caller's view must still be current.
    pub async fn update<T, F>(
        &self,
        kind: ReservationKind,
        reference: Uuid,
        expected_version: Option<u64>,
        mutate: F,
    ) -> Result<(Reservation, T), ReservationError>
    where
        F: FnOnce(&mut Reservation) -> Result<T, ReservationError> + Send,
        T: Send,
    {
        let current = self.get_by_reference(kind, reference).await?;

        if let Some(expected) = expected_version {
            if expected != current.version {
                return Err(ReservationError::Conflict {
                    reference,
                    expected,
                    actual: current.version,
                });
            }
        }

        let read_version = current.version;
        let mut next = current;
        let outcome = mutate(&mut next)?;
        next.version = read_version + 1;

        match self.repository.compare_and_swap(next.clone(), read_version).await {
            Ok(()) => Ok((next, outcome)),
            Err(RepositoryError::VersionMismatch { expected, actual }) => {
                warn!(%reference, expected, actual, "Concurrent reservation update rejected");
                Err(ReservationError::Conflict { reference, expected, actual })
            }
            Err(RepositoryError::NotFound(_)) => Err(ReservationError::NotFound { kind, reference }),
            Err(e) => Err(storage(e)),
        }
    }

    pub async fn delete(&self, kind: ReservationKind, reference: Uuid) -> Result<(), ReservationError> {
        if !kind.supports_delete() {
            return Err(ReservationError::DeleteNotSupported(kind));
        }

        if self.repository.delete(kind, reference).await.map_err(storage)? {
            info!(%reference, %kind, "Reservation deleted");
            Ok(())
        } else {
            Err(ReservationError::NotFound { kind, reference })
        }
    }
}

fn storage(e: RepositoryError) -> ReservationError {
    ReservationError::Storage(e.to_string())
}
