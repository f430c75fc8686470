//! Candidate filtering and ordering against the active rule.

use std::cmp::Ordering;

use super::action::RechargeAction;
use super::rule::{RechargeRule, SortKey, SortOrder};

/// Recharges allowed by `rule`, in the rule's preferred order.
///
/// Returns nothing without a rule. When the rule does not specify both a
/// sort key and a direction the input order is kept; otherwise the sort is
/// stable, so equal keys also keep their input order.
pub fn filter_recharges(actions: &[RechargeAction], rule: Option<&RechargeRule>) -> Vec<RechargeAction> {
    let rule = match rule {
        Some(rule) if !actions.is_empty() => rule,
        _ => return Vec::new(),
    };

    let durations = rule.duration_range();
    let recoveries = rule.recovery_range();

    let mut candidates: Vec<RechargeAction> = actions
        .iter()
        .filter(|a| rule.accepts_category(&a.category))
        .filter(|a| durations.contains(&a.duration_minutes()))
        .filter(|a| recoveries.contains(&a.recovery))
        .cloned()
        .collect();

    if let Some((key, order)) = rule.sorting() {
        candidates.sort_by(|a, b| compare(a, b, key, order));
    }

    tracing::debug!(
        rule = %rule.id,
        offered = actions.len(),
        kept = candidates.len(),
        "filtered recharge candidates"
    );
    candidates
}

fn sort_value(action: &RechargeAction, key: SortKey) -> i64 {
    match key {
        SortKey::Duration => action.duration_minutes(),
        SortKey::Recovery => action.recovery,
    }
}

fn compare(a: &RechargeAction, b: &RechargeAction, key: SortKey, order: SortOrder) -> Ordering {
    let (x, y) = (sort_value(a, key), sort_value(b, key));
    match order {
        SortOrder::Asc => x.cmp(&y),
        SortOrder::Desc => y.cmp(&x),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recharge::{DayPhase, DayType};

    fn rule() -> RechargeRule {
        RechargeRule::new("r", DayType::Workday, DayPhase::During)
    }

    fn actions() -> Vec<RechargeAction> {
        vec![
            RechargeAction::new("Walk", "body", "20", 3),
            RechargeAction::new("Nap", "rest", "30", 5),
            RechargeAction::new("Breathe", "mind", "5", 2),
            RechargeAction::new("Stretch", "body", "10", 4),
            RechargeAction::new("Mystery", "body", "soon", 1),
        ]
    }

    fn labels(list: &[RechargeAction]) -> Vec<&str> {
        list.iter().map(|a| a.label.as_str()).collect()
    }

    #[test]
    fn no_rule_or_no_actions_is_empty() {
        assert!(filter_recharges(&actions(), None).is_empty());
        assert!(filter_recharges(&[], Some(&rule())).is_empty());
    }

    #[test]
    fn unconstrained_rule_keeps_everything_in_order() {
        let out = filter_recharges(&actions(), Some(&rule()));
        assert_eq!(labels(&out), vec!["Walk", "Nap", "Breathe", "Stretch", "Mystery"]);
    }

    #[test]
    fn category_and_ranges() {
        let r = rule()
            .with_categories(["body"])
            .with_duration(Some(5), Some(60))
            .with_recovery(Some(1), Some(5));
        let out = filter_recharges(&actions(), Some(&r));
        // "soon" parses as 0 and falls below the 5 minute floor.
        assert_eq!(labels(&out), vec!["Walk", "Stretch"]);
    }

    #[test]
    fn non_numeric_duration_passes_without_floor() {
        let r = rule().with_duration(None, Some(10));
        let out = filter_recharges(&actions(), Some(&r));
        assert_eq!(labels(&out), vec!["Breathe", "Stretch", "Mystery"]);
    }

    #[test]
    fn sorts_by_recovery_desc() {
        let r = rule().with_sort(SortKey::Recovery, SortOrder::Desc);
        let out = filter_recharges(&actions(), Some(&r));
        assert_eq!(labels(&out), vec!["Nap", "Stretch", "Walk", "Breathe", "Mystery"]);
    }

    #[test]
    fn sorts_by_duration_asc_stably() {
        let mut list = actions();
        list.push(RechargeAction::new("Walk again", "body", "20", 1));
        let r = rule().with_sort(SortKey::Duration, SortOrder::Asc);
        let out = filter_recharges(&list, Some(&r));
        assert_eq!(
            labels(&out),
            vec!["Mystery", "Breathe", "Stretch", "Walk", "Walk again", "Nap"]
        );
    }

    #[test]
    fn sort_key_without_order_keeps_input_order() {
        let mut r = rule();
        r.sort_by = Some(SortKey::Duration);
        let out = filter_recharges(&actions(), Some(&r));
        assert_eq!(labels(&out)[0], "Walk");
    }
}
