use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use vista_shared::Masked;

/// What the engine hands to the transport: who, what, and which reservation it concerns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub reservation_reference: Uuid,
    pub recipient_name: String,
    pub recipient_email: Masked<String>,
    pub subject: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        reservation_reference: Uuid,
        recipient_name: String,
        recipient_email: String,
        subject: String,
        body: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            reservation_reference,
            recipient_name,
            recipient_email: Masked(recipient_email),
            subject,
            body,
            created_at: Utc::now(),
        }
    }
}

/// Transport acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationReceipt {
    pub notification_id: Uuid,
    pub provider_id: Option<String>,
    pub accepted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DispatchError {
    #[error("Notification transport rejected the message: {0}")]
    Rejected(String),

    #[error("Notification dispatch timed out after {0} ms")]
    Timeout(u64),

    #[error("Notification transport unavailable: {0}")]
    Unavailable(String),
}

/// Outbound transport for requester notifications (email, SMS, ...).
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn dispatch(&self, notification: &Notification) -> Result<NotificationReceipt, DispatchError>;
}
