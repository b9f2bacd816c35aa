use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vista_catalog::PriceBreakdown;

use crate::lifecycle::{LifecycleError, ReservationLifecycle};
use crate::models::{Reservation, ReservationStatus, StaffNote, StatusChange};

/// A staff mutation: any combination of status, price and message.
///
/// A price can be given directly or as a full quote breakdown, in which case
/// the breakdown's grand total is the price.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaffUpdate {
    pub status: Option<ReservationStatus>,
    pub quoted_price_cents: Option<i64>,
    #[serde(default)]
    pub quote_breakdown: Option<PriceBreakdown>,
    pub message: Option<String>,
    #[serde(default)]
    pub notify: bool,
    pub expected_version: Option<u64>,
    #[serde(default)]
    pub actor: String,
}

/// What actually changed, for events and notification content.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppliedChange {
    pub status_change: Option<(ReservationStatus, ReservationStatus)>,
    pub price_change: Option<(Option<i64>, i64)>,
    pub message: Option<String>,
}

impl AppliedChange {
    pub fn is_empty(&self) -> bool {
        self.status_change.is_none() && self.price_change.is_none() && self.message.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChangeError {
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error("Update must carry a status, a price or a message")]
    EmptyUpdate,

    #[error("Quoted price {price} does not match the breakdown total {grand_total}")]
    BreakdownMismatch { price: i64, grand_total: i64 },

    /// Everything requested already holds; nothing to store or announce.
    #[error("Update changes nothing")]
    NoChange,
}

/// Applies staff updates to a reservation held in memory. Storage is the caller's concern.
pub struct ChangeHandler;

impl ChangeHandler {
    pub fn apply(
        lifecycle: &ReservationLifecycle,
        reservation: &mut Reservation,
        update: &StaffUpdate,
        now: DateTime<Utc>,
    ) -> Result<AppliedChange, ChangeError> {
        let message = update
            .message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string);

        let price = match (&update.quote_breakdown, update.quoted_price_cents) {
            (Some(breakdown), Some(price)) if price != breakdown.grand_total_cents => {
                return Err(ChangeError::BreakdownMismatch {
                    price,
                    grand_total: breakdown.grand_total_cents,
                });
            }
            (Some(breakdown), _) => Some(breakdown.grand_total_cents),
            (None, price) => price,
        };

        if update.status.is_none() && price.is_none() && message.is_none() {
            return Err(ChangeError::EmptyUpdate);
        }

        // Re-sending the current status alone is not a change.
        if price.is_none() && message.is_none() && update.status == Some(reservation.status) {
            return Err(ChangeError::NoChange);
        }

        lifecycle.validate_update(reservation, update.status, price)?;

        let actor = if update.actor.is_empty() { "staff" } else { update.actor.as_str() };

        let price_change = price.map(|price| {
            let previous = reservation.quoted_price_cents.replace(price);
            // A hand-entered price supersedes any earlier breakdown.
            reservation.quote_breakdown = update.quote_breakdown.clone();
            (previous, price)
        });

        let status_change = match update.status {
            Some(to) if to != reservation.status => {
                let from = reservation.status;
                reservation.status = to;
                reservation.timeline.push(StatusChange {
                    from: Some(from),
                    to,
                    at: now,
                    by: actor.to_string(),
                });
                Some((from, to))
            }
            _ => None,
        };

        if let Some(text) = &message {
            reservation.notes.push(StaffNote {
                author: actor.to_string(),
                message: text.clone(),
                created_at: now,
            });
        }

        reservation.touch(now);

        Ok(AppliedChange {
            status_change,
            price_change,
            message,
        })
    }
}
