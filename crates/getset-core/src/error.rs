//! Core error types for getset-core.
//!
//! The four scheduling functions (rule selection, candidate filtering, gap
//! finding, balance scoring) never fail. Errors only arise at the edges:
//! loading configuration, validating documents handed out by the calendar
//! and content stores, and reading files.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Core error type for getset-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A catalog entry failed validation
    #[error("Invalid {section} entry at index {index}: {source}")]
    CatalogEntry {
        section: &'static str,
        index: usize,
        #[source]
        source: RecordError,
    },

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Kind of document a [`RecordError`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Rule,
    Action,
    Event,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Rule => "rule",
            Self::Action => "recharge",
            Self::Event => "event",
        };
        f.write_str(name)
    }
}

/// Errors raised while turning loosely typed documents into records.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    /// The document is present but cannot be turned into a record
    #[error("Malformed {kind} record{}: {reason}", id_suffix(.id))]
    Malformed {
        kind: RecordKind,
        id: Option<String>,
        reason: String,
    },
}

impl RecordError {
    pub fn malformed(kind: RecordKind, id: Option<&str>, reason: impl Into<String>) -> Self {
        RecordError::Malformed {
            kind,
            id: id.map(str::to_string),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> RecordKind {
        match self {
            RecordError::Malformed { kind, .. } => *kind,
        }
    }
}

fn id_suffix(id: &Option<String>) -> String {
    match id {
        Some(id) => format!(" '{id}'"),
        None => String::new(),
    }
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid time range
    #[error("Invalid time range: end ({end}) must be after start ({start})")]
    InvalidTimeRange {
        start: chrono::NaiveDateTime,
        end: chrono::NaiveDateTime,
    },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_message_includes_id_when_known() {
        let err = RecordError::malformed(RecordKind::Rule, Some("r1"), "unknown dayType 'weekend'");
        assert_eq!(
            err.to_string(),
            "Malformed rule record 'r1': unknown dayType 'weekend'"
        );

        let err = RecordError::malformed(RecordKind::Action, None, "missing label");
        assert_eq!(err.to_string(), "Malformed recharge record: missing label");
        assert_eq!(err.kind(), RecordKind::Action);
    }

    #[test]
    fn catalog_entry_wraps_record_error() {
        let err = CoreError::CatalogEntry {
            section: "rules",
            index: 2,
            source: RecordError::malformed(RecordKind::Rule, None, "missing id"),
        };
        assert_eq!(
            err.to_string(),
            "Invalid rules entry at index 2: Malformed rule record: missing id"
        );
    }

    #[test]
    fn sub_errors_convert_into_their_variants() {
        let at = |h| {
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(h, 0, 0)
                .unwrap()
        };
        let err: CoreError = ValidationError::InvalidTimeRange { start: at(10), end: at(9) }.into();
        assert!(matches!(err, CoreError::Validation(ValidationError::InvalidTimeRange { .. })));
        assert!(err.to_string().starts_with("Validation error: Invalid time range"));

        let err: CoreError = ConfigError::UnknownKey("gaps.nope".into()).into();
        assert!(matches!(err, CoreError::Config(ConfigError::UnknownKey(_))));
    }
}
