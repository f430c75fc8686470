//! Calendar events and the per-source event book.
//!
//! Events reach the app from several places (Google Calendar, the document
//! store, events the user typed in). Each source owns a partition of the
//! book; refreshing a source replaces its partition wholesale.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::gap::TimelineEvent;
use super::load::IntensityLevel;
use crate::records::EventDocument;

/// Where an event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSource {
    #[default]
    Google,
    Firestore,
    User,
}

impl EventSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Firestore => "firestore",
            Self::User => "user",
        }
    }
}

impl fmt::Display for EventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated calendar event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EventDocument")]
pub struct CalendarEvent {
    pub id: String,
    pub summary: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub intensity: Option<IntensityLevel>,
    pub source: EventSource,
}

impl CalendarEvent {
    pub fn new(
        id: impl Into<String>,
        summary: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            summary: summary.into(),
            start,
            end,
            intensity: None,
            source: EventSource::default(),
        }
    }

    pub fn with_intensity(mut self, level: IntensityLevel) -> Self {
        self.intensity = Some(level);
        self
    }

    pub fn with_source(mut self, source: EventSource) -> Self {
        self.source = source;
        self
    }

    /// Get duration in minutes
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Check if this event overlaps with a time range
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.start < end && self.end > start
    }

    pub fn timeline_event(&self) -> TimelineEvent {
        TimelineEvent::new(self.start, self.end)
    }
}

/// Events grouped by source, last write wins per source.
#[derive(Debug, Clone, Default)]
pub struct EventBook {
    partitions: BTreeMap<EventSource, Vec<CalendarEvent>>,
}

impl EventBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every event of `source` with `events`.
    ///
    /// The incoming events are re-tagged with `source`.
    pub fn replace_source(&mut self, source: EventSource, events: Vec<CalendarEvent>) {
        let events: Vec<_> = events
            .into_iter()
            .map(|e| e.with_source(source))
            .collect();
        tracing::debug!(%source, count = events.len(), "replacing event partition");
        self.partitions.insert(source, events);
    }

    /// Drop a source's partition; returns how many events were removed.
    pub fn clear_source(&mut self, source: EventSource) -> usize {
        self.partitions.remove(&source).map_or(0, |v| v.len())
    }

    pub fn source(&self, source: EventSource) -> &[CalendarEvent] {
        self.partitions.get(&source).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All events sorted by start time, then id.
    pub fn all(&self) -> Vec<&CalendarEvent> {
        let mut events: Vec<_> = self.partitions.values().flatten().collect();
        events.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));
        events
    }

    /// Events starting on `date`, sorted by start time.
    pub fn on_date(&self, date: NaiveDate) -> Vec<&CalendarEvent> {
        self.all()
            .into_iter()
            .filter(|e| e.start.date() == date)
            .collect()
    }

    pub fn timeline_on(&self, date: NaiveDate) -> Vec<TimelineEvent> {
        self.on_date(date)
            .into_iter()
            .map(CalendarEvent::timeline_event)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.partitions.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
