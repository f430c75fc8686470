//! Recharge catalog: the rules and recharges exported from the content store.
//!
//! The catalog is a single JSON document:
//!
//! ```json
//! { "rules": [ ... ], "recharges": [ ... ] }
//! ```
//!
//! Every entry is validated on load. One malformed entry fails the whole
//! load and the error names its section and index.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::error::{CoreError, RecordError, RecordKind, Result};
use crate::recharge::{filter_recharges, RechargeAction, RechargeRule, RuleSelector};
use crate::records::{ActionDocument, RuleDocument};

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    rules: Vec<Value>,
    #[serde(default, alias = "actions")]
    recharges: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Catalog {
    pub rules: Vec<RechargeRule>,
    pub recharges: Vec<RechargeAction>,
}

fn validate_entries<D, T>(
    section: &'static str,
    kind: RecordKind,
    values: Vec<Value>,
) -> Result<Vec<T>>
where
    D: serde::de::DeserializeOwned,
    T: TryFrom<D, Error = RecordError>,
{
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value::<D>(value)
                .map_err(|e| RecordError::malformed(kind, None, e.to_string()))
                .and_then(T::try_from)
                .map_err(|source| {
                    tracing::warn!(section, index, error = %source, "rejected catalog entry");
                    CoreError::CatalogEntry {
                        section,
                        index,
                        source,
                    }
                })
        })
        .collect()
}

impl Catalog {
    /// Parse and validate a catalog document.
    ///
    /// # Errors
    /// Returns an error if the JSON is not a catalog or an entry is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: CatalogDocument = serde_json::from_str(json)?;
        let rules = validate_entries::<RuleDocument, RechargeRule>("rules", RecordKind::Rule, doc.rules)?;
        let recharges =
            validate_entries::<ActionDocument, RechargeAction>("recharges", RecordKind::Action, doc.recharges)?;

        tracing::debug!(rules = rules.len(), recharges = recharges.len(), "catalog loaded");
        Ok(Self { rules, recharges })
    }

    /// Load a catalog file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn active_rule(&self, selector: &RuleSelector, now: NaiveDateTime) -> Option<&RechargeRule> {
        selector.select(now, &self.rules)
    }

    /// Recharges on offer at `now`, in the active rule's order.
    pub fn candidates(&self, selector: &RuleSelector, now: NaiveDateTime) -> Vec<RechargeAction> {
        filter_recharges(&self.recharges, self.active_rule(selector, now))
    }
}
