//! Recommendable recharge activities.

use serde::{Deserialize, Serialize};

use crate::records::ActionDocument;

/// A recharge activity from the content store.
///
/// `duration` keeps the store's string encoding; use
/// [`RechargeAction::duration_minutes`] for the numeric value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ActionDocument")]
pub struct RechargeAction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub label: String,
    pub category: String,
    pub duration: String,
    pub recovery: i64,
}

impl RechargeAction {
    pub fn new(
        label: impl Into<String>,
        category: impl Into<String>,
        duration: impl Into<String>,
        recovery: i64,
    ) -> Self {
        Self {
            id: None,
            label: label.into(),
            category: category.into(),
            duration: duration.into(),
            recovery,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Duration in minutes, parsed leniently.
    pub fn duration_minutes(&self) -> i64 {
        parse_minutes_lenient(&self.duration)
    }
}

/// Integer prefix of `raw`, or 0 when there is none.
///
/// Leading whitespace, an optional sign and the leading digits are read;
/// anything after them is ignored (`"15min"` is 15, `"abc"` is 0). Bad
/// durations therefore never raise an error; they simply fall outside most
/// duration ranges.
pub fn parse_minutes_lenient(raw: &str) -> i64 {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    let value = digits[..end]
        .bytes()
        .fold(0i64, |acc, b| acc.saturating_mul(10).saturating_add(i64::from(b - b'0')));

    if negative {
        -value
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lenient_parse() {
        assert_eq!(parse_minutes_lenient("15"), 15);
        assert_eq!(parse_minutes_lenient(" 20"), 20);
        assert_eq!(parse_minutes_lenient("15min"), 15);
        assert_eq!(parse_minutes_lenient("7.5"), 7);
        assert_eq!(parse_minutes_lenient("-5"), -5);
        assert_eq!(parse_minutes_lenient("+5"), 5);
        assert_eq!(parse_minutes_lenient("abc"), 0);
        assert_eq!(parse_minutes_lenient(""), 0);
        assert_eq!(parse_minutes_lenient("-"), 0);
    }

    #[test]
    fn duration_minutes_uses_lenient_parse() {
        let action = RechargeAction::new("Stretch", "body", "10 minutes", 3);
        assert_eq!(action.duration_minutes(), 10);
        let odd = RechargeAction::new("Mystery", "mind", "a while", 2);
        assert_eq!(odd.duration_minutes(), 0);
    }
}
