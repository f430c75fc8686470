//! Recharge suggestion engine.
//!
//! Suggests recharges for the free time left in a day:
//! - the active rule decides which recharges are on offer and in what order
//! - gaps come from the day's events plus recharges already placed
//! - each candidate takes the first gap that still has room for it

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::slot::{RechargeSlot, SlotBook};
use crate::catalog::Catalog;
use crate::error::Result;
use crate::recharge::{filter_recharges, RechargeAction, RuleSelector};
use crate::storage::Config;
use crate::timeline::{TimeGap, TimeGapDetector, TimelineEvent};

/// A recharge proposed for a specific stretch of free time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RechargeSuggestion {
    pub rule_id: String,
    pub action: RechargeAction,
    pub gap: TimeGap,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl RechargeSuggestion {
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// Suggestion engine
#[derive(Debug, Clone)]
pub struct RechargePlanner {
    selector: RuleSelector,
    detector: TimeGapDetector,
    max_suggestions: usize,
}

impl RechargePlanner {
    pub fn new(selector: RuleSelector, detector: TimeGapDetector) -> Self {
        Self {
            selector,
            detector,
            max_suggestions: 3,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.rule_selector(), config.gap_detector())
    }

    pub fn with_max_suggestions(mut self, max: usize) -> Self {
        self.max_suggestions = max;
        self
    }

    /// Suggest recharges for the rest of `now`'s day.
    ///
    /// `events` are the day's busy intervals; recharges already in `slots`
    /// on the same date count as busy too. Time before `now` is never
    /// offered.
    pub fn suggest(
        &self,
        now: NaiveDateTime,
        catalog: &Catalog,
        events: &[TimelineEvent],
        slots: &SlotBook,
    ) -> Vec<RechargeSuggestion> {
        let rule = match self.selector.select(now, &catalog.rules) {
            Some(rule) => rule,
            None => return Vec::new(),
        };
        let candidates = filter_recharges(&catalog.recharges, Some(rule));
        if candidates.is_empty() {
            return Vec::new();
        }

        let today = now.date();
        let mut busy = events_on(events, today);
        busy.extend(slots.timeline_on(today));
        let gaps = self.detector.find_gaps(&busy, today);
        let (window_start, window_end) = self.detector.window(today);

        // Next free minute in each gap, never before `now` or the window.
        let mut cursors: Vec<NaiveDateTime> = gaps
            .iter()
            .map(|g| g.start.max(now).max(window_start))
            .collect();
        let mut suggestions = Vec::new();

        for action in candidates {
            if suggestions.len() >= self.max_suggestions {
                break;
            }
            let minutes = self.required_minutes(&action);
            let length = Duration::minutes(minutes);

            let fit = gaps
                .iter()
                .zip(cursors.iter_mut())
                .find(|(gap, cursor)| **cursor + length <= gap.end.min(window_end));

            if let Some((gap, cursor)) = fit {
                let start = *cursor;
                let end = start + length;
                *cursor = end;
                suggestions.push(RechargeSuggestion {
                    rule_id: rule.id.clone(),
                    action,
                    gap: gap.clone(),
                    start,
                    end,
                });
            } else {
                tracing::debug!(label = %action.label, minutes, "no gap left for recharge");
            }
        }

        tracing::info!(
            rule = %rule.id,
            gaps = gaps.len(),
            suggestions = suggestions.len(),
            "recharge suggestions ready"
        );
        suggestions
    }

    /// Put a suggestion on the calendar.
    ///
    /// # Errors
    /// Returns an error if the suggestion has an empty time range.
    pub fn place(&self, suggestion: &RechargeSuggestion, slots: &mut SlotBook) -> Result<RechargeSlot> {
        let slot = RechargeSlot::new(
            suggestion.start,
            suggestion.end,
            suggestion.action.category.clone(),
            Some(suggestion.action.label.clone()),
        )?;
        Ok(slots.add(slot).clone())
    }

    // Recharges without a usable duration take the minimum gap length.
    fn required_minutes(&self, action: &RechargeAction) -> i64 {
        let minutes = action.duration_minutes();
        if minutes > 0 {
            minutes
        } else {
            self.detector.min_gap_minutes().max(1)
        }
    }
}

/// The part of each event that falls on `date`.
///
/// Events spilling over midnight are clipped to the day. An event with one
/// unreadable bound is kept when its readable bound is on `date`, so it still
/// blocks the gaps next to it; events with no readable bound are dropped.
fn events_on(events: &[TimelineEvent], date: NaiveDate) -> Vec<TimelineEvent> {
    let day_start = date.and_time(NaiveTime::MIN);
    let day_end = day_start + Duration::days(1);

    events
        .iter()
        .filter_map(|event| match (event.start, event.end) {
            (Some(start), Some(end)) => (start < day_end && end > day_start)
                .then(|| TimelineEvent::new(start.max(day_start), end.min(day_end))),
            (Some(bound), None) | (None, Some(bound)) => (bound.date() == date).then_some(*event),
            (None, None) => None,
        })
        .collect()
}

impl Default for RechargePlanner {
    fn default() -> Self {
        Self::new(RuleSelector::default(), TimeGapDetector::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recharge::{DayPhase, DayType, RechargeRule, SortKey, SortOrder};
    use crate::timeline::parse_timestamp;

    fn t(s: &str) -> NaiveDateTime {
        parse_timestamp(s).unwrap()
    }

    fn catalog_for(phase: DayPhase) -> Catalog {
        Catalog {
            rules: vec![RechargeRule::new("wd-rule", DayType::Workday, phase)
                .with_priority(1)
                .with_sort(SortKey::Recovery, SortOrder::Desc)],
            recharges: vec![
                RechargeAction::new("Walk", "body", "20", 3),
                RechargeAction::new("Nap", "rest", "30", 5),
                RechargeAction::new("Breathe", "mind", "5", 2),
            ],
        }
    }

    fn catalog() -> Catalog {
        catalog_for(DayPhase::During)
    }

    #[test]
    fn no_rule_no_suggestions() {
        let planner = RechargePlanner::default();
        // Monday evening has no rule in the catalog.
        let out = planner.suggest(t("2024-01-01T19:00"), &catalog(), &[], &SlotBook::new());
        assert!(out.is_empty());
    }

    #[test]
    fn fills_gaps_in_rule_order() {
        let planner = RechargePlanner::default();
        let events = vec![
            TimelineEvent::new(t("2024-01-01T10:20"), t("2024-01-01T11:00")),
            TimelineEvent::new(t("2024-01-01T11:20"), t("2024-01-01T23:00")),
        ];
        let out = planner.suggest(t("2024-01-01T10:00"), &catalog(), &events, &SlotBook::new());

        let labels: Vec<_> = out.iter().map(|s| s.action.label.as_str()).collect();
        // Nap needs 30 minutes and finds no room; Walk fills what is left of
        // the morning gap, Breathe moves on to 11:00-11:20.
        assert_eq!(labels, vec!["Walk", "Breathe"]);
        assert_eq!(out[0].start, t("2024-01-01T10:00"));
        assert_eq!(out[0].end, t("2024-01-01T10:20"));
        assert_eq!(out[1].start, t("2024-01-01T11:00"));
        assert_eq!(out[1].end, t("2024-01-01T11:05"));
        assert!(out.iter().all(|s| s.rule_id == "wd-rule"));
    }

    #[test]
    fn never_suggests_the_past() {
        let planner = RechargePlanner::default();
        let out = planner.suggest(
            t("2024-01-01T22:50"),
            &catalog_for(DayPhase::After),
            &[],
            &SlotBook::new(),
        );
        // Only 10 minutes remain before the window closes.
        let labels: Vec<_> = out.iter().map(|s| s.action.label.as_str()).collect();
        assert_eq!(labels, vec!["Breathe"]);
        assert_eq!(out[0].start, t("2024-01-01T22:50"));
    }

    #[test]
    fn other_days_do_not_shape_todays_gaps() {
        let planner = RechargePlanner::default();
        let yesterday = TimelineEvent::new(t("2024-01-01T09:00"), t("2024-01-01T10:00"));
        let today = TimelineEvent::new(t("2024-01-02T09:00"), t("2024-01-02T10:00"));
        let catalog = Catalog {
            rules: catalog().rules,
            recharges: vec![RechargeAction::new("Walk", "body", "20", 3)],
        };
        let now = t("2024-01-02T13:00");

        let alone = planner.suggest(now, &catalog, &[today], &SlotBook::new());
        let with_history = planner.suggest(now, &catalog, &[yesterday, today], &SlotBook::new());
        assert_eq!(alone.len(), 1);
        assert_eq!(alone, with_history);
        assert_eq!(with_history[0].start, t("2024-01-02T13:00"));
        assert_eq!(with_history[0].end, t("2024-01-02T13:20"));
    }

    #[test]
    fn early_morning_waits_for_the_window() {
        let planner = RechargePlanner::default();
        let events = vec![
            TimelineEvent::new(t("2024-01-01T09:00"), t("2024-01-01T10:00")),
            TimelineEvent::new(t("2024-01-02T09:00"), t("2024-01-02T10:00")),
            // Tuesday's early event leaves an unclipped gap from 05:30.
            TimelineEvent::new(t("2024-01-02T05:00"), t("2024-01-02T05:30")),
        ];
        let out = planner.suggest(
            t("2024-01-02T05:00"),
            &catalog_for(DayPhase::Morning),
            &events,
            &SlotBook::new(),
        );
        assert!(!out.is_empty());
        assert!(out.iter().all(|s| s.start >= t("2024-01-02T07:00")));
        assert_eq!(out[0].start, t("2024-01-02T07:00"));
    }

    #[test]
    fn overnight_event_blocks_the_morning() {
        let planner = RechargePlanner::default().with_max_suggestions(1);
        let events = vec![TimelineEvent::new(t("2024-01-01T22:00"), t("2024-01-02T08:00"))];
        let out = planner.suggest(
            t("2024-01-02T06:00"),
            &catalog_for(DayPhase::Morning),
            &events,
            &SlotBook::new(),
        );
        assert_eq!(out[0].start, t("2024-01-02T08:00"));
    }

    #[test]
    fn placed_slots_block_time() {
        let planner = RechargePlanner::default().with_max_suggestions(1);
        let mut slots = SlotBook::new();
        let now = t("2024-01-01T09:00");

        let first = planner.suggest(now, &catalog(), &[], &slots);
        assert_eq!(first[0].action.label, "Nap");
        let placed = planner.place(&first[0], &mut slots).unwrap();
        assert_eq!(placed.start, now);
        assert_eq!(placed.label.as_deref(), Some("Nap"));

        let second = planner.suggest(now, &catalog(), &[], &slots);
        assert_eq!(second[0].start, placed.end);
    }
}
