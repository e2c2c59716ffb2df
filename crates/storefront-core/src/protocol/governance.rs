//! Governance lane: per-tenant policy documents.
//!
//! Upstream shape: `{ "authorities": [...], "effective_policies": {...} }`.
//! Every field is optional; a missing or `null` field means "no restriction".
//! Authorities are audit metadata, so a malformed authority list degrades to
//! empty instead of failing the document.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{Result, StorefrontError};

/// Raw governance document as served by the governance source.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GovernanceDocument {
    #[serde(default, deserialize_with = "lenient_authorities")]
    pub authorities: Vec<GovernanceAuthority>,
    #[serde(default)]
    pub effective_policies: Option<EffectivePolicies>,
}

impl GovernanceDocument {
    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str(s)
            .map_err(|e| StorefrontError::Fetch(format!("invalid governance json: {e}")))
    }
}

/// Which policy source contributed to the effective policy (audit only).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GovernanceAuthority {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// e.g. "platform", "region", "tenant".
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub priority: i32,
}

/// Effective policy section; values are kept loose until normalized.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EffectivePolicies {
    /// `null` entries are dropped.
    #[serde(default, deserialize_with = "strings_skipping_nulls")]
    pub prohibited_verticals: Option<Vec<String>>,
    #[serde(default)]
    pub commerce_features: Option<HashMap<String, Value>>,
}

/// Normalized policy used for gating decisions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GovernancePolicy {
    /// Lowercased, trimmed vertical names.
    pub prohibited_verticals: BTreeSet<String>,
    /// Only boolean entries survive normalization.
    pub commerce_features: HashMap<String, bool>,
}

impl GovernancePolicy {
    pub fn from_effective(p: &EffectivePolicies) -> Self {
        let prohibited_verticals = p
            .prohibited_verticals
            .iter()
            .flatten()
            .filter_map(|v| normalize_vertical(v))
            .collect();

        let commerce_features = p
            .commerce_features
            .iter()
            .flatten()
            .filter_map(|(k, v)| v.as_bool().map(|b| (k.clone(), b)))
            .collect();

        Self {
            prohibited_verticals,
            commerce_features,
        }
    }

    /// `false` only when the vertical is explicitly prohibited.
    pub fn vertical_allowed(&self, category: &str) -> bool {
        match normalize_vertical(category) {
            Some(v) => !self.prohibited_verticals.contains(&v),
            None => true,
        }
    }

    /// `false` only on an explicit `false` entry.
    pub fn feature_allowed(&self, feature: &str) -> bool {
        self.commerce_features.get(feature).copied().unwrap_or(true)
    }
}

fn null_as_default<'de, D, T>(d: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

fn strings_skipping_nulls<'de, D>(d: D) -> std::result::Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Option<String>>>::deserialize(d)?;
    Ok(raw.map(|v| v.into_iter().flatten().collect()))
}

fn lenient_authorities<'de, D>(d: D) -> std::result::Result<Vec<GovernanceAuthority>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Value::deserialize(d)? {
        Value::Array(items) => items,
        Value::Null => return Ok(Vec::new()),
        other => {
            tracing::debug!(value=%other, "authorities is not a list; ignored");
            return Ok(Vec::new());
        }
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(a) => Some(a),
            Err(e) => {
                tracing::debug!(error=%e, "malformed governance authority dropped");
                None
            }
        })
        .collect())
}

/// Case-insensitive vertical key; blank input has no key.
pub fn normalize_vertical(raw: &str) -> Option<String> {
    let v = raw.trim();
    if v.is_empty() {
        None
    } else {
        Some(v.to_lowercase())
    }
}
