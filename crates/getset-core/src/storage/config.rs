//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Gap search window and minimum gap length
//! - Balance score tuning
//! - Extra holiday dates for rule bucketing
//!
//! Configuration is stored at `~/.config/getset/config.toml`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::balance::{BalanceCalculator, DEFAULT_IDEAL_EVENT_COUNT};
use crate::error::{ConfigError, Result};
use crate::recharge::{DayClassifier, RuleSelector};
use crate::timeline::{
    TimeGapDetector, DEFAULT_MIN_GAP_MINUTES, DEFAULT_WINDOW_END_HOUR, DEFAULT_WINDOW_START_HOUR,
};

/// Gap search configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapsConfig {
    #[serde(default = "default_min_gap_minutes")]
    pub min_gap_minutes: u32,
    #[serde(default = "default_window_start_hour")]
    pub window_start_hour: u32,
    #[serde(default = "default_window_end_hour")]
    pub window_end_hour: u32,
    /// Merge overlapping events before searching.
    #[serde(default)]
    pub coalesce_overlaps: bool,
}

/// Balance score configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceConfig {
    #[serde(default = "default_ideal_event_count")]
    pub ideal_event_count: u32,
    /// Used when no sleep figure is given.
    #[serde(default = "default_sleep_hours")]
    pub default_sleep_hours: f64,
}

/// Calendar configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Dates treated as holidays on top of weekends.
    #[serde(default)]
    pub holidays: Vec<NaiveDate>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/getset/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gaps: GapsConfig,
    #[serde(default)]
    pub balance: BalanceConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
}

// Default functions
fn default_min_gap_minutes() -> u32 {
    DEFAULT_MIN_GAP_MINUTES as u32
}
fn default_window_start_hour() -> u32 {
    DEFAULT_WINDOW_START_HOUR
}
fn default_window_end_hour() -> u32 {
    DEFAULT_WINDOW_END_HOUR
}
fn default_ideal_event_count() -> u32 {
    DEFAULT_IDEAL_EVENT_COUNT
}
fn default_sleep_hours() -> f64 {
    8.0
}

impl Default for GapsConfig {
    fn default() -> Self {
        Self {
            min_gap_minutes: default_min_gap_minutes(),
            window_start_hour: default_window_start_hour(),
            window_end_hour: default_window_end_hour(),
            coalesce_overlaps: false,
        }
    }
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            ideal_event_count: default_ideal_event_count(),
            default_sleep_hours: default_sleep_hours(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Where [`Config::load`] and [`Config::save`] read and write.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Render as the TOML written to disk.
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed or
    /// fails validation, or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save()?;
            Ok(cfg)
        }
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        cfg.validate()?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(cfg)
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = self.to_toml().map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let gaps = &self.gaps;
        if gaps.window_end_hour > 24 {
            return Err(ConfigError::InvalidValue {
                key: "gaps.window_end_hour".into(),
                message: format!("must be at most 24, got {}", gaps.window_end_hour),
            });
        }
        if gaps.window_start_hour >= gaps.window_end_hour {
            return Err(ConfigError::InvalidValue {
                key: "gaps.window_start_hour".into(),
                message: format!(
                    "must be before window_end_hour ({} >= {})",
                    gaps.window_start_hour, gaps.window_end_hour
                ),
            });
        }
        if !self.balance.default_sleep_hours.is_finite() || self.balance.default_sleep_hours < 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "balance.default_sleep_hours".into(),
                message: "must be a non-negative number".into(),
            });
        }
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the result fails validation. `self` is unchanged on error.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default configuration");
            Self::default()
        })
    }

    pub fn gap_detector(&self) -> TimeGapDetector {
        TimeGapDetector::new()
            .with_min_gap(i64::from(self.gaps.min_gap_minutes))
            .with_window(self.gaps.window_start_hour, self.gaps.window_end_hour)
            .with_coalescing(self.gaps.coalesce_overlaps)
    }

    pub fn balance_calculator(&self) -> BalanceCalculator {
        BalanceCalculator::new(self.balance.ideal_event_count)
    }

    pub fn rule_selector(&self) -> RuleSelector {
        RuleSelector::new(DayClassifier::new().with_holidays(self.calendar.holidays.iter().copied()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.gaps.window_start_hour, 7);
        assert_eq!(parsed.gaps.window_end_hour, 23);
        assert_eq!(parsed.balance.ideal_event_count, 3);
    }

    #[test]
    fn renders_sections_as_toml() {
        let mut cfg = Config::default();
        cfg.apply("calendar.holidays", r#"["2024-12-25"]"#).unwrap();
        let rendered = cfg.to_toml().unwrap();
        assert!(rendered.contains("[gaps]"), "{rendered}");
        assert!(rendered.contains("min_gap_minutes = 15"), "{rendered}");
        assert!(rendered.contains("[balance]"), "{rendered}");
        assert!(rendered.contains("2024-12-25"), "{rendered}");
        assert_eq!(toml::from_str::<Config>(&rendered).unwrap(), cfg);
    }

    #[test]
    fn partial_file_uses_defaults() {
        let parsed: Config = toml::from_str("[gaps]\nmin_gap_minutes = 30\n").unwrap();
        assert_eq!(parsed.gaps.min_gap_minutes, 30);
        assert_eq!(parsed.gaps.window_end_hour, 23);
        assert!(parsed.calendar.holidays.is_empty());
    }

    #[test]
    fn get_by_dotted_key() {
        let cfg = Config::default();
        assert_eq!(cfg.get("gaps.min_gap_minutes").as_deref(), Some("15"));
        assert_eq!(cfg.get("gaps.coalesce_overlaps").as_deref(), Some("false"));
        assert_eq!(cfg.get("nope"), None);
        assert_eq!(cfg.get(""), None);
    }

    #[test]
    fn apply_preserves_types() {
        let mut cfg = Config::default();
        cfg.apply("gaps.coalesce_overlaps", "true").unwrap();
        cfg.apply("balance.default_sleep_hours", "7.5").unwrap();
        cfg.apply("balance.ideal_event_count", "4").unwrap();
        cfg.apply("calendar.holidays", r#"["2024-12-25"]"#).unwrap();

        assert!(cfg.gaps.coalesce_overlaps);
        assert_eq!(cfg.balance.default_sleep_hours, 7.5);
        assert_eq!(cfg.balance.ideal_event_count, 4);
        assert_eq!(
            cfg.calendar.holidays,
            vec![NaiveDate::from_ymd_opt(2024, 12, 25).unwrap()]
        );
    }

    #[test]
    fn apply_rejects_unknown_and_invalid() {
        let mut cfg = Config::default();
        assert!(cfg.apply("gaps.unknown", "1").is_err());
        assert!(cfg.apply("gaps.min_gap_minutes", "many").is_err());
        assert!(cfg.apply("calendar.holidays", r#"["not-a-date"]"#).is_err());
        // start after end
        assert!(cfg.apply("gaps.window_start_hour", "23").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_and_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.gaps.min_gap_minutes = 45;
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.gaps.min_gap_minutes, 45);
    }

    #[test]
    fn load_rejects_invalid_window() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[gaps]\nwindow_start_hour = 10\nwindow_end_hour = 9\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn builds_components() {
        let mut cfg = Config::default();
        cfg.gaps.min_gap_minutes = 40;
        assert_eq!(cfg.gap_detector().min_gap_minutes(), 40);
        cfg.calendar.holidays.push(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let now = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        assert_eq!(
            cfg.rule_selector().classifier().day_type(now),
            crate::recharge::DayType::Holiday
        );
    }
}
