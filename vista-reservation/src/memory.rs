use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::models::{Reservation, ReservationKind};
use crate::registry::ReservationRepository;

#[derive(Default)]
struct Tables {
    reservations: HashMap<Uuid, Reservation>,
    /// Deleted references stay reserved so they are never issued again.
    retired: HashSet<Uuid>,
}

/// Process-local reservation store.
#[derive(Default)]
pub struct InMemoryReservationRepository {
    tables: RwLock<Tables>,
}

impl InMemoryReservationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReservationRepository for InMemoryReservationRepository {
    async fn insert(&self, reservation: Reservation) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        let reference = reservation.reference;

        if tables.reservations.contains_key(&reference) || tables.retired.contains(&reference) {
            return Err(RepositoryError::Duplicate(reference));
        }
        tables.reservations.insert(reference, reservation);
        Ok(())
    }

    async fn get(&self, kind: ReservationKind, reference: Uuid) -> Result<Option<Reservation>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .reservations
            .get(&reference)
            .filter(|r| r.kind() == kind)
            .cloned())
    }

    async fn list_by_email(
        &self,
        email: &str,
        kind: Option<ReservationKind>,
    ) -> Result<Vec<Reservation>, RepositoryError> {
        let tables = self.tables.read().await;
        let mut found: Vec<Reservation> = tables
            .reservations
            .values()
            .filter(|r| r.email().eq_ignore_ascii_case(email))
            .filter(|r| kind.map_or(true, |k| r.kind() == k))
            .cloned()
            .collect();

        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn compare_and_swap(&self, reservation: Reservation, expected_version: u64) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .reservations
            .get_mut(&reservation.reference)
            .ok_or(RepositoryError::NotFound(reservation.reference))?;

        if stored.version != expected_version {
            return Err(RepositoryError::VersionMismatch {
                expected: expected_version,
                actual: stored.version,
            });
        }
        *stored = reservation;
        Ok(())
    }

    async fn delete(&self, kind: ReservationKind, reference: Uuid) -> Result<bool, RepositoryError> {
        let mut tables = self.tables.write().await;
        let matches = tables
            .reservations
            .get(&reference)
            .is_some_and(|r| r.kind() == kind);

        if matches {
            tables.reservations.remove(&reference);
            tables.retired.insert(reference);
        }
        Ok(matches)
    }
}
