//! Recharge content and rule evaluation.
//!
//! This module provides:
//! - Admin-maintained selection rules and recharge activities
//! - Day type / time-of-day bucketing and active rule selection
//! - Candidate filtering and ordering for the active rule

mod action;
mod filter;
mod rule;
mod selector;

pub use action::{parse_minutes_lenient, RechargeAction};
pub use filter::filter_recharges;
pub use rule::{DayPhase, DayType, RechargeRule, SortKey, SortOrder};
pub use selector::{select_active_rule, DayClassifier, RuleSelector};
