//! Page lane: declarative block configurations.
//!
//! `props` is kept as an untyped `serde_json::Value`; each block renderer
//! decodes it into its own typed schema. A `type` that is not a string decodes
//! to the empty string, which never resolves, so one malformed entry cannot
//! fail the whole page document.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, StorefrontError};

/// One block instance on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockConfig {
    /// Opaque block-type identifier (field name is `type` in JSON).
    #[serde(rename = "type", default, deserialize_with = "lenient_type")]
    pub block_type: String,
    /// Block-specific properties; `{}` when absent.
    #[serde(default = "empty_props")]
    pub props: Value,
}

impl BlockConfig {
    pub fn new(block_type: impl Into<String>, props: Value) -> Self {
        Self {
            block_type: block_type.into(),
            props,
        }
    }

    /// String-valued top-level prop, if present and non-blank.
    pub fn prop_str(&self, key: &str) -> Option<&str> {
        self.props
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Ordered sequence of blocks; order is render order, duplicates allowed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageDefinition {
    /// Route this page is served on (informational).
    #[serde(default)]
    pub route: Option<String>,
    #[serde(default)]
    pub blocks: Vec<BlockConfig>,
}

impl PageDefinition {
    pub fn new(blocks: Vec<BlockConfig>) -> Self {
        Self { route: None, blocks }
    }

    /// Decode a page document. Accepts either `{ "blocks": [...] }` or a bare
    /// array of blocks.
    pub fn from_json(s: &str) -> Result<Self> {
        let v: Value = serde_json::from_str(s)
            .map_err(|e| StorefrontError::BadRequest(format!("invalid page json: {e}")))?;
        let page = match v {
            Value::Array(_) => PageDefinition {
                route: None,
                blocks: serde_json::from_value(v).map_err(|e| {
                    StorefrontError::BadRequest(format!("invalid page blocks: {e}"))
                })?,
            },
            other => serde_json::from_value(other)
                .map_err(|e| StorefrontError::BadRequest(format!("invalid page document: {e}")))?,
        };
        Ok(page)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

fn empty_props() -> Value {
    Value::Object(Map::new())
}

fn lenient_type<'de, D>(d: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(d)?;
    Ok(match v {
        Value::String(s) => s,
        other => {
            tracing::debug!(value=%other, "non-string block type; block will be skipped");
            String::new()
        }
    })
}
