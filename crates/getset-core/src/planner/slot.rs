//! Placed recharges, kept for the current session only.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::timeline::TimelineEvent;

/// A recharge the user put on their calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RechargeSlot {
    pub id: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl RechargeSlot {
    /// Create a slot with a fresh id.
    ///
    /// # Errors
    /// Returns an error if `end` is not after `start`.
    pub fn new(
        start: NaiveDateTime,
        end: NaiveDateTime,
        category: impl Into<String>,
        label: Option<String>,
    ) -> Result<Self, ValidationError> {
        if end <= start {
            return Err(ValidationError::InvalidTimeRange { start, end });
        }
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            start,
            end,
            category: category.into(),
            label,
        })
    }

    /// Get duration in minutes
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    pub fn timeline_event(&self) -> TimelineEvent {
        TimelineEvent::new(self.start, self.end)
    }
}

/// In-memory list of placed recharges.
#[derive(Debug, Clone, Default)]
pub struct SlotBook {
    slots: Vec<RechargeSlot>,
}

impl SlotBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, slot: RechargeSlot) -> &RechargeSlot {
        tracing::debug!(id = %slot.id, category = %slot.category, start = %slot.start, "recharge slot added");
        self.slots.push(slot);
        &self.slots[self.slots.len() - 1]
    }

    /// Remove a slot by id; returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.slots.len();
        self.slots.retain(|s| s.id != id);
        let removed = self.slots.len() != before;
        if removed {
            tracing::debug!(id, "recharge slot removed");
        }
        removed
    }

    pub fn get(&self, id: &str) -> Option<&RechargeSlot> {
        self.slots.iter().find(|s| s.id == id)
    }

    /// All slots sorted by start.
    pub fn list(&self) -> Vec<&RechargeSlot> {
        let mut slots: Vec<_> = self.slots.iter().collect();
        slots.sort_by_key(|s| s.start);
        slots
    }

    pub fn on_date(&self, date: NaiveDate) -> Vec<&RechargeSlot> {
        self.list()
            .into_iter()
            .filter(|s| s.start.date() == date)
            .collect()
    }

    pub fn timeline_on(&self, date: NaiveDate) -> Vec<TimelineEvent> {
        self.on_date(date)
            .into_iter()
            .map(RechargeSlot::timeline_event)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::parse_timestamp;

    fn slot(start: &str, end: &str) -> RechargeSlot {
        RechargeSlot::new(
            parse_timestamp(start).unwrap(),
            parse_timestamp(end).unwrap(),
            "body",
            Some("Walk".into()),
        )
        .unwrap()
    }

    #[test]
    fn rejects_empty_range() {
        let t = parse_timestamp("2024-01-01T10:00").unwrap();
        assert!(RechargeSlot::new(t, t, "body", None).is_err());
    }

    #[test]
    fn add_list_remove() {
        let mut book = SlotBook::new();
        let late = book.add(slot("2024-01-01T15:00", "2024-01-01T15:20")).id.clone();
        let early = book.add(slot("2024-01-01T08:00", "2024-01-01T08:10")).id.clone();
        book.add(slot("2024-01-02T08:00", "2024-01-02T08:10"));

        let ids: Vec<_> = book.list().iter().map(|s| s.id.clone()).collect();
        assert_eq!(&ids[..2], &[early.clone(), late.clone()]);

        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(book.on_date(day).len(), 2);

        assert!(book.remove(&late));
        assert!(!book.remove(&late));
        assert!(book.get(&early).is_some());
        assert_eq!(book.len(), 2);
    }

    #[test]
    fn ids_are_unique() {
        let a = slot("2024-01-01T08:00", "2024-01-01T08:10");
        let b = slot("2024-01-01T08:00", "2024-01-01T08:10");
        assert_ne!(a.id, b.id);
        assert_eq!(a.duration_minutes(), 10);
    }
}
