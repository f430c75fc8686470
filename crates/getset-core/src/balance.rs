//! Daily balance score.
//!
//! Combines last night's sleep, the number of events and the hours they
//! take up into a 0-100 score:
//!
//! - sleep: `min(hours / 8 * 100, 100)`, weight 0.5
//! - event count: `max(100 - |count - ideal| * 25, 0)`, weight 0.25
//! - schedule: `max(100 - |hours - 4| * 15, 0)`, weight 0.25
//!
//! The weighted sum is rounded half-up. 80 and above is good, 50 and above
//! is normal, anything lower is tired.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_IDEAL_EVENT_COUNT: u32 = 3;

const FULL_SLEEP_HOURS: f64 = 8.0;
const IDEAL_SCHEDULE_HOURS: f64 = 4.0;
const EVENT_COUNT_PENALTY: f64 = 25.0;
const SCHEDULE_PENALTY: f64 = 15.0;

/// Three-level label for a balance score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceLevel {
    Good,
    Normal,
    Tired,
}

impl BalanceLevel {
    pub fn from_score(score: u8) -> Self {
        if score >= 80 {
            Self::Good
        } else if score >= 50 {
            Self::Normal
        } else {
            Self::Tired
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Normal => "normal",
            Self::Tired => "tired",
        }
    }
}

impl fmt::Display for BalanceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score with its component parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceStatus {
    pub score: u8,
    pub status: BalanceLevel,
    pub sleep_score: f64,
    pub event_count_score: f64,
    pub schedule_score: f64,
}

#[derive(Debug, Clone)]
pub struct BalanceCalculator {
    ideal_event_count: u32,
}

impl BalanceCalculator {
    pub fn new(ideal_event_count: u32) -> Self {
        Self { ideal_event_count }
    }

    pub fn calculate(&self, sleep_hours: f64, event_count: u32, total_event_hours: f64) -> BalanceStatus {
        let sleep_score = (sleep_hours / FULL_SLEEP_HOURS * 100.0).min(100.0);

        let count_delta = (f64::from(event_count) - f64::from(self.ideal_event_count)).abs();
        let event_count_score = (100.0 - count_delta * EVENT_COUNT_PENALTY).max(0.0);

        let hours_delta = (total_event_hours - IDEAL_SCHEDULE_HOURS).abs();
        let schedule_score = (100.0 - hours_delta * SCHEDULE_PENALTY).max(0.0);

        let weighted = sleep_score * 0.5 + event_count_score * 0.25 + schedule_score * 0.25;
        // Half-up rounding; NaN casts to 0.
        let score = (weighted + 0.5).floor().clamp(0.0, 100.0) as u8;

        BalanceStatus {
            score,
            status: BalanceLevel::from_score(score),
            sleep_score,
            event_count_score,
            schedule_score,
        }
    }
}

impl Default for BalanceCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_IDEAL_EVENT_COUNT)
    }
}

/// Balance score with the default ideal event count of 3.
pub fn calculate_balance_status(sleep_hours: f64, event_count: u32, total_event_hours: f64) -> BalanceStatus {
    BalanceCalculator::default().calculate(sleep_hours, event_count, total_event_hours)
}
