//! Active rule selection.
//!
//! The current moment maps to a (day type, phase) bucket; the active rule is
//! the highest-priority active rule for that bucket. Equal priorities are
//! resolved by the smallest rule id so the result never depends on the
//! order the store returned the rules in.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};
use std::collections::BTreeSet;

use super::rule::{DayPhase, DayType, RechargeRule};

/// Maps wall-clock time onto rule buckets.
#[derive(Debug, Clone, Default)]
pub struct DayClassifier {
    holidays: BTreeSet<NaiveDate>,
}

impl DayClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat these dates as holidays regardless of weekday.
    pub fn with_holidays<I: IntoIterator<Item = NaiveDate>>(mut self, dates: I) -> Self {
        self.holidays.extend(dates);
        self
    }

    pub fn day_type(&self, now: NaiveDateTime) -> DayType {
        let date = now.date();
        let weekend = matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
        if weekend || self.holidays.contains(&date) {
            DayType::Holiday
        } else {
            DayType::Workday
        }
    }

    pub fn phase(&self, now: NaiveDateTime) -> DayPhase {
        DayPhase::from_hour(now.hour())
    }

    pub fn bucket(&self, now: NaiveDateTime) -> (DayType, DayPhase) {
        (self.day_type(now), self.phase(now))
    }
}

/// Picks the active rule for a moment in time.
#[derive(Debug, Clone, Default)]
pub struct RuleSelector {
    classifier: DayClassifier,
}

impl RuleSelector {
    pub fn new(classifier: DayClassifier) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &DayClassifier {
        &self.classifier
    }

    pub fn select<'a>(&self, now: NaiveDateTime, rules: &'a [RechargeRule]) -> Option<&'a RechargeRule> {
        let (day_type, phase) = self.classifier.bucket(now);
        let selected = Self::select_for_bucket(day_type, phase, rules);
        match selected {
            Some(rule) => tracing::debug!(
                %day_type,
                %phase,
                rule = %rule.id,
                priority = rule.priority,
                "active rule selected"
            ),
            None => tracing::debug!(%day_type, %phase, rules = rules.len(), "no rule matches"),
        }
        selected
    }

    pub fn select_for_bucket(
        day_type: DayType,
        phase: DayPhase,
        rules: &[RechargeRule],
    ) -> Option<&RechargeRule> {
        rules
            .iter()
            .filter(|r| r.active && r.matches(day_type, phase))
            .max_by(|a, b| {
                a.priority
                    .cmp(&b.priority)
                    .then_with(|| b.id.cmp(&a.id))
            })
    }
}

/// Select the active rule for `now` with weekend-only holidays.
pub fn select_active_rule(now: NaiveDateTime, rules: &[RechargeRule]) -> Option<&RechargeRule> {
    RuleSelector::default().select(now, rules)
}
