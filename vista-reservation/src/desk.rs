use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use vista_shared::models::events::{
    NotificationDispatchedEvent, QuoteAttachedEvent, ReservationCreatedEvent, ReservationStatusChangedEvent,
};
use vista_shared::pii::redact_email;
use vista_shared::DomainEvent;
use vista_store::EventPublisher;

use crate::changes::{AppliedChange, ChangeError, ChangeHandler, StaffUpdate};
use crate::dispatch::GuardedDispatcher;
use crate::error::ReservationError;
use crate::lifecycle::ReservationLifecycle;
use crate::models::{Reservation, ReservationKind, Submission};
use crate::notify::compose_status_notification;
use crate::registry::ReservationRegistry;

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReceipt {
    pub reference: Uuid,
    pub kind: ReservationKind,
    pub message: String,
    pub reservation: Reservation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NotificationOutcome {
    NotRequested,
    Sent { notification_id: Uuid },
    Failed { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct StaffUpdateOutcome {
    pub reservation: Reservation,
    pub change: AppliedChange,
    pub notification: NotificationOutcome,
}

/// Front office for reservations: intake, staff updates, notifications and events.
pub struct ReservationDesk {
    registry: ReservationRegistry,
    lifecycle: ReservationLifecycle,
    dispatcher: Arc<GuardedDispatcher>,
    events: EventPublisher,
}

impl ReservationDesk {
    pub fn new(
        registry: ReservationRegistry,
        lifecycle: ReservationLifecycle,
        dispatcher: Arc<GuardedDispatcher>,
        events: EventPublisher,
    ) -> Self {
        Self {
            registry,
            lifecycle,
            dispatcher,
            events,
        }
    }

    pub fn registry(&self) -> &ReservationRegistry {
        &self.registry
    }

    pub fn lifecycle(&self) -> &ReservationLifecycle {
        &self.lifecycle
    }

    pub fn dispatcher(&self) -> &GuardedDispatcher {
        &self.dispatcher
    }

    pub async fn submit(&self, submission: Submission) -> Result<SubmissionReceipt, ReservationError> {
        let reservation = self.registry.create(submission).await?;
        let kind = reservation.kind();

        self.events.publish(DomainEvent::ReservationCreated(ReservationCreatedEvent {
            reference: reservation.reference,
            kind: kind.to_string(),
            requester_email: redact_email(reservation.email()),
            timestamp: Utc::now().timestamp(),
        }));

        Ok(SubmissionReceipt {
            reference: reservation.reference,
            kind,
            message: kind.confirmation_message().to_string(),
            reservation,
        })
    }

    /// Validates and stores the update first; the notification is sent only
    /// afterwards, and its failure is reported rather than rolled back.
    pub async fn apply_staff_update(
        &self,
        kind: ReservationKind,
        reference: Uuid,
        update: StaffUpdate,
    ) -> Result<StaffUpdateOutcome, ReservationError> {
        let lifecycle = self.lifecycle;
        let applied = self
            .registry
            .update(kind, reference, update.expected_version, |reservation| {
                ChangeHandler::apply(&lifecycle, reservation, &update, Utc::now()).map_err(ReservationError::from)
            })
            .await;

        let (reservation, change) = match applied {
            Ok(applied) => applied,
            Err(ReservationError::Change(ChangeError::NoChange)) => {
                debug!(%reference, %kind, "Staff update changes nothing; not stored");
                return Ok(StaffUpdateOutcome {
                    reservation: self.registry.get_by_reference(kind, reference).await?,
                    change: AppliedChange::default(),
                    notification: NotificationOutcome::NotRequested,
                });
            }
            Err(e) => return Err(e),
        };

        info!(
            %reference,
            %kind,
            status = %reservation.status,
            version = reservation.version,
            "Staff update applied"
        );
        self.publish_change(&reservation, &change, &update.actor);

        let notification = if update.notify {
            self.notify(&reservation, &change).await
        } else {
            NotificationOutcome::NotRequested
        };

        Ok(StaffUpdateOutcome {
            reservation,
            change,
            notification,
        })
    }

    pub async fn delete(&self, kind: ReservationKind, reference: Uuid) -> Result<(), ReservationError> {
        self.registry.delete(kind, reference).await
    }

    async fn notify(&self, reservation: &Reservation, change: &AppliedChange) -> NotificationOutcome {
        let notification = compose_status_notification(reservation, change);
        let result = self.dispatcher.dispatch(&notification).await;

        let (outcome, delivered, detail) = match result {
            Ok(receipt) => (
                NotificationOutcome::Sent {
                    notification_id: receipt.notification_id,
                },
                true,
                receipt.provider_id,
            ),
            Err(e) => {
                warn!(reference = %reservation.reference, "Update stored but notification failed: {}", e);
                (NotificationOutcome::Failed { reason: e.to_string() }, false, Some(e.to_string()))
            }
        };

        self.events.publish(DomainEvent::NotificationDispatched(NotificationDispatchedEvent {
            reference: reservation.reference,
            recipient: redact_email(notification.recipient_email.expose()),
            delivered,
            detail,
            timestamp: Utc::now().timestamp(),
        }));

        outcome
    }

    fn publish_change(&self, reservation: &Reservation, change: &AppliedChange, actor: &str) {
        let kind = reservation.kind().to_string();
        let timestamp = reservation.updated_at.timestamp();

        if let Some((from, to)) = change.status_change {
            self.events.publish(DomainEvent::ReservationStatusChanged(ReservationStatusChangedEvent {
                reference: reservation.reference,
                kind: kind.clone(),
                from_status: from.to_string(),
                to_status: to.to_string(),
                changed_by: if actor.is_empty() { "staff".to_string() } else { actor.to_string() },
                timestamp,
            }));
        }

        if let Some((previous, price)) = change.price_change {
            self.events.publish(DomainEvent::QuoteAttached(QuoteAttachedEvent {
                reference: reservation.reference,
                kind,
                quoted_price_cents: price,
                previous_price_cents: previous,
                timestamp,
            }));
        }
    }
}
