use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use vista_core::{DispatchError, Notification, NotificationDispatcher, NotificationReceipt};
use vista_shared::pii::redact_email;

/// Development transport: writes the notification to the log instead of sending it.
#[derive(Debug, Default, Clone)]
pub struct LogNotificationDispatcher;

#[async_trait]
impl NotificationDispatcher for LogNotificationDispatcher {
    async fn dispatch(&self, notification: &Notification) -> Result<NotificationReceipt, DispatchError> {
        info!(
            notification_id = %notification.id,
            reference = %notification.reservation_reference,
            recipient = %redact_email(notification.recipient_email.expose()),
            subject = %notification.subject,
            "Notification delivered to log transport"
        );

        Ok(NotificationReceipt {
            notification_id: notification.id,
            provider_id: Some(format!("log-{}", notification.id)),
            accepted_at: Utc::now(),
        })
    }
}
