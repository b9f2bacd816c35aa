use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("End date {end} is before start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
}

/// Inclusive start / exclusive end date span, e.g. a yacht charter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ScheduleError> {
        if end < start {
            return Err(ScheduleError::EndBeforeStart { start, end });
        }
        Ok(Self { start, end })
    }

    /// Number of nights between start and end. Never negative.
    pub fn nights(&self) -> u32 {
        (self.end - self.start).num_days().max(0) as u32
    }
}

/// Nights for a charter window, rejecting an inverted range.
pub fn charter_nights(start: NaiveDate, end: NaiveDate) -> Result<u32, ScheduleError> {
    DateRange::new(start, end).map(|range| range.nights())
}
