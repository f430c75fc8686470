//! Calendar timeline: events, free-time gaps and daily load.
//!
//! This module provides:
//! - Timestamp normalisation to the local wall clock
//! - Calendar events grouped by source
//! - Gap detection inside the daily recharge window
//! - Intensity levels and the per-day load summary

mod event;
mod gap;
mod load;
mod timestamp;

pub use event::{CalendarEvent, EventBook, EventSource};
pub use gap::{
    find_recharge_gaps, GapSize, TimeGap, TimeGapDetector, TimelineEvent,
    DEFAULT_MIN_GAP_MINUTES, DEFAULT_WINDOW_END_HOUR, DEFAULT_WINDOW_START_HOUR,
};
pub use load::{DayLoad, IntensityLevel};
pub use timestamp::parse_timestamp;
