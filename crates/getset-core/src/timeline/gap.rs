//! Free-time detection inside the daily recharge window.
//!
//! Finds the intervals before, between and after a day's events that are
//! long enough to hold a recharge. The window is anchored to the date of the
//! earliest event (or a fallback date when there are none) and runs from
//! 07:00 to 23:00 unless configured otherwise.

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::timestamp::parse_timestamp;

pub const DEFAULT_WINDOW_START_HOUR: u32 = 7;
pub const DEFAULT_WINDOW_END_HOUR: u32 = 23;
pub const DEFAULT_MIN_GAP_MINUTES: i64 = 15;

/// Size category of a time gap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GapSize {
    Small,  // under 30 minutes
    Medium, // 30-59 minutes
    Large,  // 60+ minutes
}

impl GapSize {
    /// Categorize a gap by its duration in minutes
    pub fn from_minutes(minutes: i64) -> Self {
        if minutes < 30 {
            Self::Small
        } else if minutes < 60 {
            Self::Medium
        } else {
            Self::Large
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

/// A free interval between events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeGap {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub size: GapSize,
}

impl TimeGap {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            start,
            end,
            size: GapSize::from_minutes((end - start).num_minutes()),
        }
    }

    /// Get duration in minutes
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Check if this gap can fit an activity of given duration
    pub fn can_fit(&self, minutes: i64) -> bool {
        self.duration_minutes() >= minutes
    }
}

/// Busy interval as seen by the gap detector.
///
/// Either bound may be missing when the source timestamp could not be read.
/// A gap touching a missing bound is never reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineEvent {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl TimelineEvent {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Build from raw timestamp strings without rejecting bad input.
    pub fn from_raw(start: &str, end: &str) -> Self {
        Self {
            start: parse_timestamp(start),
            end: parse_timestamp(end),
        }
    }
}

// Unreadable starts sort after every readable one. Equal starts order by
// end so the result does not depend on input order.
fn by_start(a: &TimelineEvent, b: &TimelineEvent) -> Ordering {
    let starts = match (a.start, b.start) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    starts.then_with(|| a.end.cmp(&b.end))
}

/// Detector for finding recharge gaps in a day
#[derive(Debug, Clone)]
pub struct TimeGapDetector {
    /// Minimum gap duration to report (in minutes)
    min_gap_minutes: i64,
    window_start_hour: u32,
    window_end_hour: u32,
    /// Merge overlapping events into one busy block first
    coalesce: bool,
}

impl TimeGapDetector {
    /// Create a new detector with default settings (15 min minimum, 07:00-23:00)
    pub fn new() -> Self {
        Self {
            min_gap_minutes: DEFAULT_MIN_GAP_MINUTES,
            window_start_hour: DEFAULT_WINDOW_START_HOUR,
            window_end_hour: DEFAULT_WINDOW_END_HOUR,
            coalesce: false,
        }
    }

    /// Set the minimum gap duration
    pub fn with_min_gap(mut self, minutes: i64) -> Self {
        self.min_gap_minutes = minutes;
        self
    }

    /// Set the daily search window. `end_hour` may be 24 (midnight).
    pub fn with_window(mut self, start_hour: u32, end_hour: u32) -> Self {
        self.window_start_hour = start_hour;
        self.window_end_hour = end_hour;
        self
    }

    pub fn with_coalescing(mut self, coalesce: bool) -> Self {
        self.coalesce = coalesce;
        self
    }

    pub fn min_gap_minutes(&self) -> i64 {
        self.min_gap_minutes
    }

    /// Window bounds for the given date.
    pub fn window(&self, date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
        let midnight = date.and_time(NaiveTime::MIN);
        (
            midnight + Duration::hours(i64::from(self.window_start_hour)),
            midnight + Duration::hours(i64::from(self.window_end_hour)),
        )
    }

    /// Find gaps around `events`.
    ///
    /// The window is anchored to the earliest event's date, or to
    /// `fallback_date` when `events` is empty.
    ///
    /// # Returns
    /// Vector of time gaps in temporal order
    pub fn find_gaps(&self, events: &[TimelineEvent], fallback_date: NaiveDate) -> Vec<TimeGap> {
        let mut sorted: Vec<_> = events.to_vec();
        sorted.sort_by(by_start);

        let anchor = match sorted.first() {
            None => fallback_date,
            Some(first) => match first.start {
                Some(start) => start.date(),
                None => {
                    tracing::debug!(
                        count = sorted.len(),
                        "no readable event start, cannot anchor the window"
                    );
                    return Vec::new();
                }
            },
        };
        let (window_start, window_end) = self.window(anchor);

        let gaps = if self.coalesce {
            self.find_gaps_coalesced(&sorted, window_start, window_end)
        } else {
            self.find_gaps_sequential(&sorted, window_start, window_end)
        };

        tracing::debug!(
            events = sorted.len(),
            gaps = gaps.len(),
            min_gap = self.min_gap_minutes,
            %anchor,
            "gap search finished"
        );
        gaps
    }

    // Each consecutive pair is compared as-is, overlapping events included.
    fn find_gaps_sequential(
        &self,
        sorted: &[TimelineEvent],
        window_start: NaiveDateTime,
        window_end: NaiveDateTime,
    ) -> Vec<TimeGap> {
        let mut gaps = Vec::new();

        let (first, last) = match (sorted.first(), sorted.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                self.push_gap(&mut gaps, Some(window_start), Some(window_end));
                return gaps;
            }
        };

        self.push_gap(&mut gaps, Some(window_start), first.start);
        for pair in sorted.windows(2) {
            self.push_gap(&mut gaps, pair[0].end, pair[1].start);
        }
        self.push_gap(&mut gaps, last.end, Some(window_end));

        gaps
    }

    fn find_gaps_coalesced(
        &self,
        sorted: &[TimelineEvent],
        window_start: NaiveDateTime,
        window_end: NaiveDateTime,
    ) -> Vec<TimeGap> {
        let mut gaps = Vec::new();
        let mut last_end = window_start;

        for event in sorted {
            let (start, end) = match (event.start, event.end) {
                (Some(start), Some(end)) => (start, end),
                _ => continue,
            };

            // Skip events that end before our current position
            if end <= last_end {
                continue;
            }

            // Skip events that start after window end
            if start >= window_end {
                break;
            }

            if start > last_end {
                self.push_gap(&mut gaps, Some(last_end), Some(start.min(window_end)));
            }

            last_end = end.min(window_end);
        }

        if last_end < window_end {
            self.push_gap(&mut gaps, Some(last_end), Some(window_end));
        }

        gaps
    }

    fn push_gap(
        &self,
        gaps: &mut Vec<TimeGap>,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) {
        let (start, end) = match (start, end) {
            (Some(start), Some(end)) => (start, end),
            _ => return,
        };
        if end <= start {
            return;
        }
        if (end - start) >= Duration::minutes(self.min_gap_minutes) {
            gaps.push(TimeGap::new(start, end));
        }
    }
}

impl Default for TimeGapDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Find recharge gaps of at least `min_minutes` with the default window.
///
/// An empty event list searches today's window.
pub fn find_recharge_gaps(events: &[TimelineEvent], min_minutes: i64) -> Vec<TimeGap> {
    TimeGapDetector::new()
        .with_min_gap(min_minutes)
        .find_gaps(events, Local::now().date_naive())
}
