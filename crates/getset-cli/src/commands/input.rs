//! File and argument readers shared by the commands.

use std::path::Path;

use chrono::{Local, NaiveDate, NaiveDateTime};
use getset_core::records::EventDocument;
use getset_core::timeline::parse_timestamp;
use getset_core::{CalendarEvent, TimelineEvent};

type BoxResult<T> = Result<T, Box<dyn std::error::Error>>;

/// `--at` value, or the local wall clock when absent.
pub fn at_or_now(at: Option<&str>) -> BoxResult<NaiveDateTime> {
    match at {
        None => Ok(Local::now().naive_local()),
        Some(raw) => parse_timestamp(raw).ok_or_else(|| format!("invalid datetime: {raw}").into()),
    }
}

pub fn date_or_today(date: Option<&str>) -> BoxResult<NaiveDate> {
    match date {
        None => Ok(Local::now().date_naive()),
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map_err(|e| format!("invalid date '{raw}': {e}").into()),
    }
}

fn read_documents(path: &Path) -> BoxResult<Vec<EventDocument>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    Ok(serde_json::from_str(&content)?)
}

/// Busy intervals for gap search. Unreadable times are kept as unknown
/// rather than rejected.
pub fn read_timeline(path: &Path) -> BoxResult<Vec<TimelineEvent>> {
    Ok(read_documents(path)?
        .iter()
        .map(EventDocument::timeline_event)
        .collect())
}

/// Validated calendar events; the first malformed one fails the read.
pub fn read_events(path: &Path) -> BoxResult<Vec<CalendarEvent>> {
    read_documents(path)?
        .into_iter()
        .enumerate()
        .map(|(index, doc)| {
            CalendarEvent::try_from(doc).map_err(|e| -> Box<dyn std::error::Error> {
                format!("invalid event at index {index}: {e}").into()
            })
        })
        .collect()
}
