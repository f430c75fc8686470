//! Intensity levels and the per-day load summary.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::event::CalendarEvent;
use crate::balance::{BalanceCalculator, BalanceStatus};

/// 1-5 load rating attached to a calendar event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct IntensityLevel(u8);

impl IntensityLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn label(self) -> &'static str {
        match self.0 {
            1 => "very light",
            2 => "light",
            3 => "moderate",
            4 => "heavy",
            _ => "very heavy",
        }
    }

    /// Hex colour used when rendering the calendar.
    pub fn color(self) -> &'static str {
        match self.0 {
            1 => "#4ade80",
            2 => "#a3e635",
            3 => "#facc15",
            4 => "#fb923c",
            _ => "#ef4444",
        }
    }
}

impl Default for IntensityLevel {
    fn default() -> Self {
        Self(3)
    }
}

impl TryFrom<u8> for IntensityLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("intensity must be 1-5, got {value}"))
    }
}

impl From<IntensityLevel> for u8 {
    fn from(level: IntensityLevel) -> u8 {
        level.0
    }
}

impl fmt::Display for IntensityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, self.label())
    }
}

/// Summary of one day's schedule load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayLoad {
    pub date: NaiveDate,
    pub event_count: u32,
    pub total_minutes: i64,
    pub peak_intensity: Option<IntensityLevel>,
    pub mean_intensity: f64,
}

impl DayLoad {
    /// Summarise the events that start on `date`.
    ///
    /// Events without a rating count at the neutral level.
    pub fn from_events<'a, I>(date: NaiveDate, events: I) -> Self
    where
        I: IntoIterator<Item = &'a CalendarEvent>,
    {
        let mut event_count = 0u32;
        let mut total_minutes = 0i64;
        let mut intensity_sum = 0u32;
        let mut peak: Option<IntensityLevel> = None;

        for event in events.into_iter().filter(|e| e.start.date() == date) {
            let level = event.intensity.unwrap_or_default();
            event_count += 1;
            total_minutes += event.duration_minutes().max(0);
            intensity_sum += u32::from(level.value());
            peak = Some(peak.map_or(level, |p| p.max(level)));
        }

        let mean_intensity = if event_count == 0 {
            0.0
        } else {
            f64::from(intensity_sum) / f64::from(event_count)
        };

        Self {
            date,
            event_count,
            total_minutes,
            peak_intensity: peak,
            mean_intensity,
        }
    }

    pub fn total_hours(&self) -> f64 {
        self.total_minutes as f64 / 60.0
    }

    /// Balance score for this day given last night's sleep.
    pub fn balance(&self, sleep_hours: f64, calculator: &BalanceCalculator) -> BalanceStatus {
        calculator.calculate(sleep_hours, self.event_count, self.total_hours())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::{parse_timestamp, EventSource};

    fn event(id: &str, start: &str, end: &str, intensity: Option<u8>) -> CalendarEvent {
        CalendarEvent {
            id: id.into(),
            summary: id.into(),
            start: parse_timestamp(start).unwrap(),
            end: parse_timestamp(end).unwrap(),
            intensity: intensity.and_then(IntensityLevel::new),
            source: EventSource::Google,
        }
    }

    #[test]
    fn intensity_bounds() {
        assert!(IntensityLevel::new(0).is_none());
        assert!(IntensityLevel::new(6).is_none());
        assert_eq!(IntensityLevel::new(5).unwrap().label(), "very heavy");
        assert_eq!(IntensityLevel::default().value(), 3);
        assert!(serde_json::from_str::<IntensityLevel>("9").is_err());
        assert_eq!(serde_json::from_str::<IntensityLevel>("2").unwrap().color(), "#a3e635");
    }

    #[test]
    fn day_load_summary() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let events = vec![
            event("a", "2024-01-01T09:00", "2024-01-01T11:00", Some(5)),
            event("b", "2024-01-01T13:00", "2024-01-01T14:00", None),
            event("c", "2024-01-01T15:00", "2024-01-01T16:00", Some(1)),
            event("other-day", "2024-01-02T09:00", "2024-01-02T10:00", Some(5)),
        ];

        let load = DayLoad::from_events(date, &events);
        assert_eq!(load.event_count, 3);
        assert_eq!(load.total_minutes, 240);
        assert_eq!(load.total_hours(), 4.0);
        assert_eq!(load.peak_intensity.map(IntensityLevel::value), Some(5));
        assert!((load.mean_intensity - 3.0).abs() < f64::EPSILON);

        let status = load.balance(8.0, &BalanceCalculator::default());
        assert_eq!(status.score, 100);
    }

    #[test]
    fn empty_day() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let none: Vec<CalendarEvent> = Vec::new();
        let load = DayLoad::from_events(date, &none);
        assert_eq!(load.event_count, 0);
        assert_eq!(load.peak_intensity, None);
        assert_eq!(load.mean_intensity, 0.0);
    }
}
