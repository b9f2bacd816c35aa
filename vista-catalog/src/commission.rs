use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{PoisonError, RwLock};

use crate::pricing::PricingError;

/// One entry in the append-only commission history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommissionSetting {
    pub version: u64,
    pub rate_pct: f64,
    pub effective_from: DateTime<Utc>,
    pub set_by: String,
    pub note: Option<String>,
}

/// Rate and version read together under one lock.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CommissionSnapshot {
    pub version: u64,
    pub rate_pct: f64,
}

/// Platform commission rate with its audit history.
///
/// History is append-only: changing the rate pushes a new entry, and past
/// entries are never edited.
pub struct CommissionPolicy {
    history: RwLock<Vec<CommissionSetting>>,
}

impl CommissionPolicy {
    pub fn new(initial_rate_pct: f64, set_by: &str) -> Result<Self, PricingError> {
        validate_rate(initial_rate_pct)?;

        let initial = CommissionSetting {
            version: 1,
            rate_pct: initial_rate_pct,
            effective_from: Utc::now(),
            set_by: set_by.to_string(),
            note: Some("Initial platform rate".to_string()),
        };

        Ok(Self {
            history: RwLock::new(vec![initial]),
        })
    }

    pub fn snapshot(&self) -> CommissionSnapshot {
        let history = self.history.read().unwrap_or_else(PoisonError::into_inner);
        let current = current_of(&history);
        CommissionSnapshot {
            version: current.version,
            rate_pct: current.rate_pct,
        }
    }

    pub fn current(&self) -> CommissionSetting {
        let history = self.history.read().unwrap_or_else(PoisonError::into_inner);
        current_of(&history).clone()
    }

    /// Share of each booking retained by the asset owner, in percent.
    pub fn owner_share_pct(&self) -> f64 {
        100.0 - self.snapshot().rate_pct
    }

    pub fn set_rate(&self, rate_pct: f64, set_by: &str, note: Option<String>) -> Result<CommissionSetting, PricingError> {
        validate_rate(rate_pct)?;

        let mut history = self.history.write().unwrap_or_else(PoisonError::into_inner);
        let setting = CommissionSetting {
            version: current_of(&history).version + 1,
            rate_pct,
            effective_from: Utc::now(),
            set_by: set_by.to_string(),
            note,
        };
        history.push(setting.clone());

        tracing::info!(
            "Commission rate set to {}% (v{}) by {}",
            setting.rate_pct,
            setting.version,
            setting.set_by
        );

        Ok(setting)
    }

    /// Full history, newest first.
    pub fn history(&self) -> Vec<CommissionSetting> {
        let history = self.history.read().unwrap_or_else(PoisonError::into_inner);
        history.iter().rev().cloned().collect()
    }
}

// History always holds the initial entry.
fn current_of(history: &[CommissionSetting]) -> &CommissionSetting {
    &history[history.len() - 1]
}

fn validate_rate(rate_pct: f64) -> Result<(), PricingError> {
    if !rate_pct.is_finite() || !(0.0..=100.0).contains(&rate_pct) {
        return Err(PricingError::InvalidPercentage {
            field: "commission",
            value: rate_pct,
        });
    }
    Ok(())
}
