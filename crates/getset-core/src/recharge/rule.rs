//! Recharge rules maintained by administrators.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

use crate::records::RuleDocument;

/// Workday or holiday, derived from the calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayType {
    Workday,
    Holiday,
}

impl DayType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Workday => "workday",
            Self::Holiday => "holiday",
        }
    }
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Time-of-day bucket a rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayPhase {
    /// Before 09:00
    Morning,
    /// 09:00 to 17:59
    During,
    /// 18:00 onwards
    After,
}

impl DayPhase {
    pub fn from_hour(hour: u32) -> Self {
        if hour < 9 {
            Self::Morning
        } else if hour < 18 {
            Self::During
        } else {
            Self::After
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::During => "during",
            Self::After => "after",
        }
    }
}

impl fmt::Display for DayPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Duration,
    Recovery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Selection rule for one (day type, phase) bucket.
///
/// Missing lower bounds mean 0 and missing upper bounds mean unbounded. An
/// absent or empty category list accepts every category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RuleDocument")]
pub struct RechargeRule {
    pub id: String,
    pub day_type: DayType,
    #[serde(rename = "timeZone")]
    pub phase: DayPhase,
    pub priority: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_duration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_duration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_recovery: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_recovery: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
    pub active: bool,
}

impl RechargeRule {
    pub fn new(id: impl Into<String>, day_type: DayType, phase: DayPhase) -> Self {
        Self {
            id: id.into(),
            day_type,
            phase,
            priority: 0,
            categories: None,
            min_duration: None,
            max_duration: None,
            min_recovery: None,
            max_recovery: None,
            sort_by: None,
            sort_order: None,
            active: true,
        }
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = Some(categories.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_duration(mut self, min: Option<i64>, max: Option<i64>) -> Self {
        self.min_duration = min;
        self.max_duration = max;
        self
    }

    pub fn with_recovery(mut self, min: Option<i64>, max: Option<i64>) -> Self {
        self.min_recovery = min;
        self.max_recovery = max;
        self
    }

    pub fn with_sort(mut self, key: SortKey, order: SortOrder) -> Self {
        self.sort_by = Some(key);
        self.sort_order = Some(order);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn matches(&self, day_type: DayType, phase: DayPhase) -> bool {
        self.day_type == day_type && self.phase == phase
    }

    pub fn accepts_category(&self, category: &str) -> bool {
        match &self.categories {
            Some(list) if !list.is_empty() => list.iter().any(|c| c == category),
            _ => true,
        }
    }

    pub fn duration_range(&self) -> RangeInclusive<i64> {
        self.min_duration.unwrap_or(0)..=self.max_duration.unwrap_or(i64::MAX)
    }

    pub fn recovery_range(&self) -> RangeInclusive<i64> {
        self.min_recovery.unwrap_or(0)..=self.max_recovery.unwrap_or(i64::MAX)
    }

    /// Sort instruction, only when both key and direction are set.
    pub fn sorting(&self) -> Option<(SortKey, SortOrder)> {
        self.sort_by.zip(self.sort_order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_boundaries() {
        assert_eq!(DayPhase::from_hour(0), DayPhase::Morning);
        assert_eq!(DayPhase::from_hour(8), DayPhase::Morning);
        assert_eq!(DayPhase::from_hour(9), DayPhase::During);
        assert_eq!(DayPhase::from_hour(17), DayPhase::During);
        assert_eq!(DayPhase::from_hour(18), DayPhase::After);
        assert_eq!(DayPhase::from_hour(23), DayPhase::After);
    }

    #[test]
    fn empty_category_list_accepts_all() {
        let rule = RechargeRule::new("r", DayType::Workday, DayPhase::During);
        assert!(rule.accepts_category("anything"));

        let empty = rule.clone().with_categories(Vec::<String>::new());
        assert!(empty.accepts_category("anything"));

        let narrow = rule.with_categories(["walk"]);
        assert!(narrow.accepts_category("walk"));
        assert!(!narrow.accepts_category("nap"));
    }

    #[test]
    fn default_ranges() {
        let rule = RechargeRule::new("r", DayType::Holiday, DayPhase::After);
        assert!(rule.duration_range().contains(&0));
        assert!(!rule.duration_range().contains(&-1));
        assert!(rule.duration_range().contains(&100_000));
        assert_eq!(rule.sorting(), None);

        let half = rule.clone().with_duration(Some(10), None);
        assert!(!half.duration_range().contains(&9));
        assert!(half.duration_range().contains(&1_000));
    }

    #[test]
    fn sorting_needs_both_fields() {
        let mut rule = RechargeRule::new("r", DayType::Workday, DayPhase::Morning);
        rule.sort_by = Some(SortKey::Recovery);
        assert_eq!(rule.sorting(), None);
        rule.sort_order = Some(SortOrder::Desc);
        assert_eq!(rule.sorting(), Some((SortKey::Recovery, SortOrder::Desc)));
    }

    #[test]
    fn serializes_with_document_field_names() {
        let rule = RechargeRule::new("r1", DayType::Workday, DayPhase::After)
            .with_priority(2)
            .with_sort(SortKey::Duration, SortOrder::Asc);
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["dayType"], "workday");
        assert_eq!(json["timeZone"], "after");
        assert_eq!(json["sortBy"], "duration");
        assert!(json.get("categories").is_none());

        let back: RechargeRule = serde_json::from_value(json).unwrap();
        assert_eq!(back, rule);
    }
}
