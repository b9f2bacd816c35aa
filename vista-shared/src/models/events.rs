use uuid::Uuid;

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct ReservationCreatedEvent {
    pub reference: Uuid,
    pub kind: String,
    /// Redacted form only (`j***@example.com`); events are logged verbatim.
    pub requester_email: String,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct ReservationStatusChangedEvent {
    pub reference: Uuid,
    pub kind: String,
    pub from_status: String,
    pub to_status: String,
    pub changed_by: String,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct QuoteAttachedEvent {
    pub reference: Uuid,
    pub kind: String,
    pub quoted_price_cents: i64,
    pub previous_price_cents: Option<i64>,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct CommissionRateChangedEvent {
    pub version: u64,
    pub rate_pct: f64,
    pub set_by: String,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct NotificationDispatchedEvent {
    pub reference: Uuid,
    /// Redacted form only.
    pub recipient: String,
    pub delivered: bool,
    pub detail: Option<String>,
    pub timestamp: i64,
}

/// Envelope published on the in-process event bus.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainEvent {
    ReservationCreated(ReservationCreatedEvent),
    ReservationStatusChanged(ReservationStatusChangedEvent),
    QuoteAttached(QuoteAttachedEvent),
    CommissionRateChanged(CommissionRateChangedEvent),
    NotificationDispatched(NotificationDispatchedEvent),
}

impl DomainEvent {
    /// Topic name used when the event is logged or forwarded.
    pub fn topic(&self) -> &'static str {
        match self {
            DomainEvent::ReservationCreated(_) => "reservation.created",
            DomainEvent::ReservationStatusChanged(_) => "reservation.status_changed",
            DomainEvent::QuoteAttached(_) => "reservation.quote_attached",
            DomainEvent::CommissionRateChanged(_) => "commission.rate_changed",
            DomainEvent::NotificationDispatched(_) => "notification.dispatched",
        }
    }

    /// Partition key: the reservation reference, or the policy version for commission changes.
    pub fn key(&self) -> String {
        match self {
            DomainEvent::ReservationCreated(e) => e.reference.to_string(),
            DomainEvent::ReservationStatusChanged(e) => e.reference.to_string(),
            DomainEvent::QuoteAttached(e) => e.reference.to_string(),
            DomainEvent::CommissionRateChanged(e) => format!("commission-v{}", e.version),
            DomainEvent::NotificationDispatched(e) => e.reference.to_string(),
        }
    }
}
