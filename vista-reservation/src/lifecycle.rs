use serde::{Deserialize, Serialize};

use crate::models::{Reservation, ReservationKind, ReservationStatus};

/// How far staff may move a reservation along its path in one update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPolicy {
    /// Any status ahead of the current one, or `cancelled`.
    #[default]
    Permissive,
    /// Only the next status on the path, or `cancelled`.
    Strict,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LifecycleError {
    #[error("Invalid state transition from {from} to {to}: {reason}")]
    InvalidTransition {
        from: ReservationStatus,
        to: ReservationStatus,
        reason: &'static str,
    },

    #[error("Status {status} is not valid for {kind}")]
    StatusNotAllowed {
        kind: ReservationKind,
        status: ReservationStatus,
    },

    #[error("Invalid quoted price: {0} cents (must be greater than zero)")]
    InvalidPrice(i64),

    #[error("{0}")]
    PriceRule(&'static str),
}

/// Governs status transitions and price attachment for every reservation kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReservationLifecycle {
    policy: TransitionPolicy,
}

impl ReservationLifecycle {
    pub fn new(policy: TransitionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    /// Status-only check: `from -> to` for a kind under the current policy.
    pub fn check_transition(
        &self,
        kind: ReservationKind,
        from: ReservationStatus,
        to: ReservationStatus,
    ) -> Result<(), LifecycleError> {
        if !kind.allows_status(to) {
            return Err(LifecycleError::StatusNotAllowed { kind, status: to });
        }
        if from.is_terminal() {
            return Err(LifecycleError::InvalidTransition {
                from,
                to,
                reason: "reservation is closed",
            });
        }
        if from == to || to == ReservationStatus::Cancelled {
            return Ok(());
        }

        let path = kind.lifecycle_path();
        let (Some(current), Some(target)) = (
            path.iter().position(|s| *s == from),
            path.iter().position(|s| *s == to),
        ) else {
            return Err(LifecycleError::StatusNotAllowed { kind, status: from });
        };

        if target < current {
            return Err(LifecycleError::InvalidTransition {
                from,
                to,
                reason: "status cannot move backwards",
            });
        }
        if self.policy == TransitionPolicy::Strict && target != current + 1 {
            return Err(LifecycleError::InvalidTransition {
                from,
                to,
                reason: "strict ordering only allows the next status",
            });
        }

        Ok(())
    }

    /// Full check for one staff update: the requested status and price are
    /// validated together so they land atomically or not at all.
    pub fn validate_update(
        &self,
        reservation: &Reservation,
        status: Option<ReservationStatus>,
        quoted_price_cents: Option<i64>,
    ) -> Result<(), LifecycleError> {
        let kind = reservation.kind();
        let from = reservation.status;

        if let Some(price) = quoted_price_cents {
            if price <= 0 {
                return Err(LifecycleError::InvalidPrice(price));
            }
            if from.is_terminal() {
                return Err(LifecycleError::InvalidTransition {
                    from,
                    to: status.unwrap_or(from),
                    reason: "price cannot change on a closed reservation",
                });
            }
        }

        if let Some(to) = status {
            self.check_transition(kind, from, to)?;

            if to == ReservationStatus::Quoted && from != ReservationStatus::Quoted && quoted_price_cents.is_none() {
                return Err(LifecycleError::InvalidTransition {
                    from,
                    to,
                    reason: "entering quoted requires a price in the same update",
                });
            }
            if to == ReservationStatus::Cancelled && quoted_price_cents.is_some() {
                return Err(LifecycleError::PriceRule("A price cannot be attached while cancelling"));
            }
        }

        let leaves_inquiry = matches!(status, Some(to) if to != ReservationStatus::Inquiry);
        if from == ReservationStatus::Inquiry && quoted_price_cents.is_some() && !leaves_inquiry {
            return Err(LifecycleError::PriceRule(
                "A price set on an inquiry must move it out of inquiry in the same update",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::*;
    use ReservationKind::*;
    use ReservationStatus::*;

    #[test]
    fn test_flight_lifecycle_forward() {
        let lifecycle = ReservationLifecycle::default();

        lifecycle.check_transition(FlightBooking, Quoted, Confirmed).unwrap();
        lifecycle.check_transition(FlightBooking, Confirmed, InFlight).unwrap();
        lifecycle.check_transition(FlightBooking, InFlight, Completed).unwrap();
        // Permissive allows jumps
        lifecycle.check_transition(FlightBooking, Inquiry, Confirmed).unwrap();
        lifecycle.check_transition(YachtCharter, Quoted, Active).unwrap();
    }

    #[test]
    fn test_backward_moves_rejected() {
        let lifecycle = ReservationLifecycle::default();
        let result = lifecycle.check_transition(FlightBooking, Confirmed, Quoted);
        assert!(matches!(result, Err(LifecycleError::InvalidTransition { .. })));

        let result = lifecycle.check_transition(AirCargo, Active, Pending);
        assert!(matches!(result, Err(LifecycleError::InvalidTransition { .. })));
    }

    #[test]
    fn test_strict_policy_requires_next_status() {
        let lifecycle = ReservationLifecycle::new(TransitionPolicy::Strict);

        assert!(lifecycle.check_transition(FlightBooking, Inquiry, Confirmed).is_err());
        lifecycle.check_transition(FlightBooking, Inquiry, Quoted).unwrap();
        lifecycle.check_transition(GroupCharter, Pending, Active).unwrap();
        lifecycle.check_transition(GroupCharter, Pending, Cancelled).unwrap();
        assert!(lifecycle.check_transition(GroupCharter, Pending, Completed).is_err());
    }

    #[test]
    fn test_status_outside_kind_set() {
        let lifecycle = ReservationLifecycle::default();
        assert!(matches!(
            lifecycle.check_transition(YachtCharter, Confirmed, InFlight),
            Err(LifecycleError::StatusNotAllowed { .. })
        ));
        assert!(matches!(
            lifecycle.check_transition(LeaseInquiry, Pending, Quoted),
            Err(LifecycleError::StatusNotAllowed { .. })
        ));
    }

    #[test]
    fn test_cancelled_is_absorbing() {
        let lifecycle = ReservationLifecycle::default();
        for kind in ReservationKind::ALL {
            for to in kind.lifecycle_path().iter().copied().chain([Cancelled]) {
                let result = lifecycle.check_transition(kind, Cancelled, to);
                assert!(matches!(result, Err(LifecycleError::InvalidTransition { .. })));
            }
        }
    }

    #[test]
    fn test_quoting_requires_price() {
        let lifecycle = ReservationLifecycle::default();
        let reservation = reservation(flight_submission("jane@example.com"));

        assert!(lifecycle.validate_update(&reservation, Some(Quoted), None).is_err());
        lifecycle.validate_update(&reservation, Some(Quoted), Some(1_597_500)).unwrap();
    }

    #[test]
    fn test_price_on_inquiry_must_move_status() {
        let lifecycle = ReservationLifecycle::default();
        let reservation = reservation(flight_submission("jane@example.com"));

        assert!(matches!(
            lifecycle.validate_update(&reservation, None, Some(500_000)),
            Err(LifecycleError::PriceRule(_))
        ));
        assert!(lifecycle.validate_update(&reservation, Some(Inquiry), Some(500_000)).is_err());
    }

    #[test]
    fn test_requote_after_quoted() {
        let lifecycle = ReservationLifecycle::default();
        let mut reservation = reservation(flight_submission("jane@example.com"));
        reservation.status = Quoted;
        reservation.quoted_price_cents = Some(1_000_000);

        lifecycle.validate_update(&reservation, None, Some(900_000)).unwrap();
        lifecycle.validate_update(&reservation, Some(Quoted), None).unwrap();
    }

    #[test]
    fn test_terminal_rejects_price_and_status() {
        let lifecycle = ReservationLifecycle::default();
        let mut reservation = reservation(charter_submission("jane@example.com"));
        reservation.status = Completed;

        assert!(lifecycle.validate_update(&reservation, None, Some(100)).is_err());
        assert!(lifecycle.validate_update(&reservation, Some(Completed), None).is_err());
        // Message-only updates carry neither
        lifecycle.validate_update(&reservation, None, None).unwrap();
    }

    #[test]
    fn test_simple_path_accepts_price_anywhere_open() {
        let lifecycle = ReservationLifecycle::default();
        let reservation = reservation(lease_submission("jane@example.com"));

        lifecycle.validate_update(&reservation, None, Some(250_000_000)).unwrap();
        assert!(matches!(
            lifecycle.validate_update(&reservation, None, Some(0)),
            Err(LifecycleError::InvalidPrice(0))
        ));
    }
}
