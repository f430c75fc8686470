//! # GETSET Core Library
//!
//! This library provides the scheduling logic behind GETSET, a calendar
//! companion that suggests short "recharge" activities for the free time
//! in a busy day. The `getset` CLI is a thin layer over the same library.
//!
//! ## Architecture
//!
//! - **Recharge**: Admin-maintained rules pick which recharges are on offer
//!   for the current day type and time of day
//! - **Timeline**: Calendar events, gap detection and per-day load
//! - **Balance**: A 0-100 score combining sleep, event count and busy hours
//! - **Planner**: Suggests recharges for the gaps and keeps placed ones
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`RuleSelector`]: Active rule selection
//! - [`filter_recharges`]: Candidate filtering and ordering
//! - [`TimeGapDetector`]: Free-time detection inside the daily window
//! - [`BalanceCalculator`]: Balance score
//! - [`Catalog`]: Validated rules and recharges
//! - [`Config`]: Application configuration management

pub mod balance;
pub mod catalog;
pub mod error;
pub mod planner;
pub mod recharge;
pub mod records;
pub mod storage;
pub mod timeline;

pub use balance::{calculate_balance_status, BalanceCalculator, BalanceLevel, BalanceStatus};
pub use catalog::Catalog;
pub use error::{ConfigError, CoreError, RecordError, RecordKind, Result, ValidationError};
pub use planner::{RechargePlanner, RechargeSlot, RechargeSuggestion, SlotBook};
pub use recharge::{
    filter_recharges, select_active_rule, DayPhase, DayType, RechargeAction, RechargeRule,
    RuleSelector,
};
pub use storage::Config;
pub use timeline::{
    find_recharge_gaps, CalendarEvent, DayLoad, EventBook, EventSource, IntensityLevel, TimeGap,
    TimeGapDetector, TimelineEvent,
};
