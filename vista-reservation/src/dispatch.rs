use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{error, info, warn};
use uuid::Uuid;

use vista_core::{DispatchError, Notification, NotificationDispatcher, NotificationReceipt};
use vista_shared::pii::redact_email;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug, Clone, Copy)]
enum Breaker {
    Closed { consecutive_failures: usize },
    Open { since: Instant },
    /// Exactly one trial call is out; everything else fails fast until it reports back.
    HalfOpen,
}

/// Consecutive-failure circuit breaker for one outbound transport.
///
/// After `failure_threshold` failures in a row the circuit opens. Once
/// `reset_timeout` has passed, a single trial call is admitted; its outcome
/// closes the circuit or re-opens it for another full timeout.
pub struct CircuitBreaker {
    name: String,
    failure_threshold: usize,
    reset_timeout: Duration,
    inner: Mutex<Breaker>,
}

impl CircuitBreaker {
    pub fn new(name: &str, failure_threshold: usize, reset_timeout: Duration) -> Self {
        Self {
            name: name.to_string(),
            failure_threshold: failure_threshold.max(1),
            reset_timeout,
            inner: Mutex::new(Breaker::Closed { consecutive_failures: 0 }),
        }
    }

    pub fn state(&self) -> CircuitState {
        match *self.lock() {
            Breaker::Closed { .. } => CircuitState::Closed,
            Breaker::Open { .. } => CircuitState::Open,
            Breaker::HalfOpen => CircuitState::HalfOpen,
        }
    }

    /// Asks to place a call. `true` means go ahead and report the outcome;
    /// while half-open only the caller that claimed the trial gets `true`.
    pub fn try_acquire(&self) -> bool {
        let mut breaker = self.lock();
        match *breaker {
            Breaker::Closed { .. } => true,
            Breaker::Open { since } if since.elapsed() >= self.reset_timeout => {
                *breaker = Breaker::HalfOpen;
                info!(breaker = %self.name, "Circuit half-open, admitting one trial call");
                true
            }
            Breaker::Open { .. } | Breaker::HalfOpen => false,
        }
    }

    pub fn record_success(&self) {
        let mut breaker = self.lock();
        if matches!(*breaker, Breaker::HalfOpen) {
            info!(breaker = %self.name, "Circuit closed after successful trial");
        }
        *breaker = Breaker::Closed { consecutive_failures: 0 };
    }

    pub fn record_failure(&self) {
        let mut breaker = self.lock();
        let next = match *breaker {
            Breaker::Closed { consecutive_failures } if consecutive_failures + 1 < self.failure_threshold => {
                Breaker::Closed {
                    consecutive_failures: consecutive_failures + 1,
                }
            }
            Breaker::Closed { .. } | Breaker::HalfOpen => {
                error!(breaker = %self.name, threshold = self.failure_threshold, "Circuit opened");
                Breaker::Open { since: Instant::now() }
            }
            // A straggler from before the trip; keep the original open window.
            open @ Breaker::Open { .. } => open,
        };
        *breaker = next;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Breaker> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum DispatchOutcome {
    Delivered,
    Failed(String),
    Skipped(String),
}

/// One line of the notification audit trail. The recipient is redacted.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationAudit {
    pub notification_id: Uuid,
    pub reservation_reference: Uuid,
    pub recipient: String,
    pub subject: String,
    pub outcome: DispatchOutcome,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct DispatchSettings {
    pub timeout: Duration,
    pub failure_threshold: usize,
    pub reset_timeout: Duration,
    /// Most recent audit entries kept; older ones are dropped.
    pub audit_capacity: usize,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(3),
            failure_threshold: 5,
            reset_timeout: Duration::from_secs(30),
            audit_capacity: 500,
        }
    }
}

/// Wraps a transport with a timeout and a circuit breaker, and audits every attempt.
pub struct GuardedDispatcher {
    inner: Arc<dyn NotificationDispatcher>,
    breaker: CircuitBreaker,
    timeout: Duration,
    audit_capacity: usize,
    /// Newest first.
    audit: RwLock<VecDeque<NotificationAudit>>,
}

impl GuardedDispatcher {
    pub fn new(inner: Arc<dyn NotificationDispatcher>, settings: DispatchSettings) -> Self {
        Self {
            inner,
            breaker: CircuitBreaker::new("notifications", settings.failure_threshold, settings.reset_timeout),
            timeout: settings.timeout,
            audit_capacity: settings.audit_capacity.max(1),
            audit: RwLock::new(VecDeque::new()),
        }
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    pub async fn dispatch(&self, notification: &Notification) -> Result<NotificationReceipt, DispatchError> {
        if !self.breaker.try_acquire() {
            let err = DispatchError::Unavailable("circuit open".to_string());
            warn!(reference = %notification.reservation_reference, "Notification skipped: circuit open");
            self.record(notification, DispatchOutcome::Skipped(err.to_string())).await;
            return Err(err);
        }

        let result = match tokio::time::timeout(self.timeout, self.inner.dispatch(notification)).await {
            Ok(result) => result,
            Err(_) => Err(DispatchError::Timeout(self.timeout.as_millis() as u64)),
        };

        match &result {
            Ok(_) => {
                self.breaker.record_success();
                self.record(notification, DispatchOutcome::Delivered).await;
            }
            Err(e) => {
                self.breaker.record_failure();
                warn!(reference = %notification.reservation_reference, "Notification dispatch failed: {}", e);
                self.record(notification, DispatchOutcome::Failed(e.to_string())).await;
            }
        }

        result
    }

    /// Audit trail, newest first, bounded by `audit_capacity`.
    pub async fn audit_log(&self) -> Vec<NotificationAudit> {
        self.audit.read().await.iter().cloned().collect()
    }

    async fn record(&self, notification: &Notification, outcome: DispatchOutcome) {
        let mut audit = self.audit.write().await;
        audit.push_front(NotificationAudit {
            notification_id: notification.id,
            reservation_reference: notification.reservation_reference,
            recipient: redact_email(notification.recipient_email.expose()),
            subject: notification.subject.clone(),
            outcome,
            recorded_at: Utc::now(),
        });
        audit.truncate(self.audit_capacity);
    }
}
