use vista_core::Notification;

use crate::changes::AppliedChange;
use crate::models::Reservation;

/// Builds the requester-facing message for a staff update.
pub fn compose_status_notification(reservation: &Reservation, change: &AppliedChange) -> Notification {
    let kind = reservation.kind();
    let short_ref = reservation.reference.simple().to_string()[..8].to_uppercase();
    let subject = format!("Your {} {} has been updated", kind.label().to_lowercase(), short_ref);

    let mut body = format!(
        "Dear {},\n\nThere is an update on your {} (reference {}).\n\nStatus: {}\n",
        reservation.requester.name,
        kind.label().to_lowercase(),
        reservation.reference,
        reservation.status.label(),
    );

    if let Some(price) = reservation.quoted_price_cents {
        body.push_str(&format!("Quoted price: {}\n", format_usd(price)));
    }
    if let Some(message) = &change.message {
        body.push_str(&format!("\nMessage from our team:\n{}\n", message));
    }
    body.push_str("\nYou can track your request at any time with your reference number.\n");

    Notification::new(
        reservation.reference,
        reservation.requester.name.clone(),
        reservation.email().to_string(),
        subject,
        body,
    )
}

/// `1597500` -> `$15,975.00`
pub fn format_usd(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let dollars = (cents / 100).to_string();

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, ch) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}${}.{:02}", sign, grouped, cents % 100)
}
