use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::desk::ReservationDesk;
use crate::models::{Reservation, ReservationDetails, ReservationKind, ReservationStatus, StaffNote, StatusChange};

/// Public error for customer lookups: nothing about the cause leaks out.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrackingError {
    #[error("Reservation not found.")]
    NotFound,
}

/// What a requester can see about their own reservation.
#[derive(Debug, Clone, Serialize)]
pub struct TrackingView {
    pub reference: Uuid,
    pub kind: ReservationKind,
    pub status: ReservationStatus,
    pub status_label: &'static str,
    pub quoted_price_cents: Option<i64>,
    pub details: ReservationDetails,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub timeline: Vec<StatusChange>,
    pub messages: Vec<StaffNote>,
}

impl From<Reservation> for TrackingView {
    fn from(reservation: Reservation) -> Self {
        Self {
            reference: reservation.reference,
            kind: reservation.kind(),
            status: reservation.status,
            status_label: reservation.status.label(),
            quoted_price_cents: reservation.quoted_price_cents,
            details: reservation.details,
            created_at: reservation.created_at,
            updated_at: reservation.updated_at,
            timeline: reservation.timeline,
            messages: reservation.notes,
        }
    }
}

pub struct Tracker {
    desk: Arc<ReservationDesk>,
}

impl Tracker {
    pub fn new(desk: Arc<ReservationDesk>) -> Self {
        Self { desk }
    }

    pub async fn by_reference(&self, kind: ReservationKind, reference: Uuid) -> Result<TrackingView, TrackingError> {
        self.desk
            .registry()
            .get_by_reference(kind, reference)
            .await
            .map(TrackingView::from)
            .map_err(|e| {
                debug!(%reference, %kind, "Tracking lookup failed: {}", e);
                TrackingError::NotFound
            })
    }

    pub async fn by_email(&self, kind: ReservationKind, email: &str) -> Result<Vec<TrackingView>, TrackingError> {
        if email.trim().is_empty() {
            return Err(TrackingError::NotFound);
        }

        self.desk
            .registry()
            .list_by_email(email, Some(kind))
            .await
            .map(|found| found.into_iter().map(TrackingView::from).collect())
            .map_err(|e| {
                debug!(%kind, "Tracking lookup by email failed: {}", e);
                TrackingError::NotFound
            })
    }
}
