//! Loosely typed documents as handed out by the stores.
//!
//! The content store and the calendar sources produce JSON whose shape is
//! only loosely enforced: numbers arrive as strings, enumerations are free
//! text, Google nests timestamps in `{ "dateTime": ... }` objects. The
//! documents below accept all of that and are validated into records with
//! `TryFrom`; a document that cannot be turned into a record yields
//! [`RecordError::Malformed`].
//!
//! Validation is deliberately stricter than the scheduling functions: a
//! non-numeric `duration` string is still accepted (it filters as 0), but a
//! missing label or an unknown `dayType` is rejected here.

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{RecordError, RecordKind};
use crate::recharge::{DayPhase, DayType, RechargeAction, RechargeRule, SortKey, SortOrder};
use crate::timeline::{
    parse_timestamp, CalendarEvent, EventSource, IntensityLevel, TimelineEvent,
};

/// Rule document from the content store.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDocument {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub day_type: Option<String>,
    #[serde(default)]
    pub time_zone: Option<String>,
    #[serde(default)]
    pub priority: Value,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    #[serde(default)]
    pub min_duration: Value,
    #[serde(default)]
    pub max_duration: Value,
    #[serde(default)]
    pub min_recovery: Value,
    #[serde(default)]
    pub max_recovery: Value,
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub sort_order: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
}

/// Recharge document from the content store.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionDocument {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub duration: Value,
    #[serde(default)]
    pub recovery: Value,
}

/// Timestamp field: a plain string, or Google's `{dateTime | date}` object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TimeField {
    Text(String),
    Google {
        #[serde(default, rename = "dateTime")]
        date_time: Option<String>,
        #[serde(default)]
        date: Option<String>,
    },
}

impl TimeField {
    pub fn raw(&self) -> Option<&str> {
        match self {
            TimeField::Text(s) => Some(s.as_str()),
            TimeField::Google { date_time, date } => date_time.as_deref().or(date.as_deref()),
        }
    }
}

/// Calendar event document (Google export or document store).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventDocument {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub start: Option<TimeField>,
    #[serde(default)]
    pub end: Option<TimeField>,
    #[serde(default)]
    pub intensity: Value,
    #[serde(default)]
    pub source: Option<String>,
}

impl EventDocument {
    /// Busy interval without validation; unreadable times stay unknown.
    pub fn timeline_event(&self) -> TimelineEvent {
        let raw = |f: &Option<TimeField>| f.as_ref().and_then(TimeField::raw).unwrap_or("").to_string();
        TimelineEvent::from_raw(&raw(&self.start), &raw(&self.end))
    }
}

fn loose_int(value: &Value, field: &str) -> Result<Option<i64>, String> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .map(Some)
            .ok_or_else(|| format!("{field} is out of range: {n}")),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| format!("{field} is not a number: '{s}'")),
        other => Err(format!("{field} must be a number, got {other}")),
    }
}

fn parse_enum<T: DeserializeOwned>(raw: &str) -> Option<T> {
    serde_json::from_value(Value::String(raw.trim().to_lowercase())).ok()
}

fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, String> {
    match value.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(format!("missing {field}")),
    }
}

fn optional_enum<T: DeserializeOwned>(value: &Option<String>, field: &str) -> Result<Option<T>, String> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => parse_enum(raw)
            .map(Some)
            .ok_or_else(|| format!("unknown {field} '{raw}'")),
    }
}

fn check_range(min: Option<i64>, max: Option<i64>, what: &str) -> Result<(), String> {
    match (min, max) {
        (Some(lo), Some(hi)) if lo > hi => Err(format!("{what} range is empty ({lo} > {hi})")),
        _ => Ok(()),
    }
}

impl TryFrom<RuleDocument> for RechargeRule {
    type Error = RecordError;

    fn try_from(doc: RuleDocument) -> Result<Self, Self::Error> {
        let id = doc.id.clone();
        let fail = |reason: String| RecordError::malformed(RecordKind::Rule, id.as_deref(), reason);

        let rule_id = required(&doc.id, "id").map_err(&fail)?.to_string();
        let day_type_raw = required(&doc.day_type, "dayType").map_err(&fail)?;
        let day_type: DayType = parse_enum(day_type_raw)
            .ok_or_else(|| fail(format!("unknown dayType '{day_type_raw}'")))?;
        let phase_raw = required(&doc.time_zone, "timeZone").map_err(&fail)?;
        let phase: DayPhase = parse_enum(phase_raw)
            .ok_or_else(|| fail(format!("unknown timeZone '{phase_raw}'")))?;

        let priority = loose_int(&doc.priority, "priority").map_err(&fail)?.unwrap_or(0);
        let min_duration = loose_int(&doc.min_duration, "minDuration").map_err(&fail)?;
        let max_duration = loose_int(&doc.max_duration, "maxDuration").map_err(&fail)?;
        let min_recovery = loose_int(&doc.min_recovery, "minRecovery").map_err(&fail)?;
        let max_recovery = loose_int(&doc.max_recovery, "maxRecovery").map_err(&fail)?;
        check_range(min_duration, max_duration, "duration").map_err(&fail)?;
        check_range(min_recovery, max_recovery, "recovery").map_err(&fail)?;

        let sort_by: Option<SortKey> = optional_enum(&doc.sort_by, "sortBy").map_err(&fail)?;
        let sort_order: Option<SortOrder> =
            optional_enum(&doc.sort_order, "sortOrder").map_err(&fail)?;

        Ok(RechargeRule {
            id: rule_id,
            day_type,
            phase,
            priority,
            categories: doc.categories,
            min_duration,
            max_duration,
            min_recovery,
            max_recovery,
            sort_by,
            sort_order,
            active: doc.active.unwrap_or(true),
        })
    }
}

impl TryFrom<ActionDocument> for RechargeAction {
    type Error = RecordError;

    fn try_from(doc: ActionDocument) -> Result<Self, Self::Error> {
        let id = doc.id.clone();
        let fail = |reason: String| RecordError::malformed(RecordKind::Action, id.as_deref(), reason);

        let label = required(&doc.label, "label").map_err(&fail)?.to_string();
        let category = required(&doc.category, "category").map_err(&fail)?.to_string();

        // Kept as text; numeric parsing happens leniently at filter time.
        let duration = match &doc.duration {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Null => return Err(fail("missing duration".into())),
            other => return Err(fail(format!("duration must be text or a number, got {other}"))),
        };

        let recovery = loose_int(&doc.recovery, "recovery")
            .map_err(&fail)?
            .ok_or_else(|| fail("missing recovery".into()))?;
        if !(1..=5).contains(&recovery) {
            return Err(fail(format!("recovery must be 1-5, got {recovery}")));
        }

        Ok(RechargeAction {
            id: doc.id,
            label,
            category,
            duration,
            recovery,
        })
    }
}

impl TryFrom<EventDocument> for CalendarEvent {
    type Error = RecordError;

    fn try_from(doc: EventDocument) -> Result<Self, Self::Error> {
        let id = doc.id.clone();
        let fail = |reason: String| RecordError::malformed(RecordKind::Event, id.as_deref(), reason);

        let event_id = required(&doc.id, "id").map_err(&fail)?.to_string();
        let summary = doc.summary.or(doc.title).unwrap_or_default();

        let time = |field: &Option<TimeField>, name: &str| -> Result<NaiveDateTime, RecordError> {
            let raw = field
                .as_ref()
                .and_then(TimeField::raw)
                .ok_or_else(|| fail(format!("missing {name}")))?;
            parse_timestamp(raw).ok_or_else(|| fail(format!("unreadable {name} '{raw}'")))
        };
        let start = time(&doc.start, "start")?;
        let end = time(&doc.end, "end")?;
        if end < start {
            return Err(fail(format!("ends ({end}) before it starts ({start})")));
        }

        let intensity = match loose_int(&doc.intensity, "intensity").map_err(&fail)? {
            None => None,
            Some(v) => Some(
                u8::try_from(v)
                    .ok()
                    .and_then(IntensityLevel::new)
                    .ok_or_else(|| fail(format!("intensity must be 1-5, got {v}")))?,
            ),
        };

        let source = optional_enum::<EventSource>(&doc.source, "source")
            .map_err(&fail)?
            .unwrap_or_default();

        Ok(CalendarEvent {
            id: event_id,
            summary,
            start,
            end,
            intensity,
            source,
        })
    }
}
