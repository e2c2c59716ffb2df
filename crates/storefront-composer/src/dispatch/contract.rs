//! Behavioral contract shared by every block renderer.
//!
//! - Variant dispatch: a `variant` prop picks one of a block's layouts;
//!   unknown names fall back to the block's default variant.
//! - Empty-content suppression: sufficiency is judged on the final,
//!   default-applied values; insufficient content renders as [`Rendered::Skip`].
//! - Locale-aware defaults: text, money and dates go through the realized
//!   locale first and the hard-coded default locale second.
//! - Side-effect isolation: renderers only get shared borrows.

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use storefront_core::error::{Result, StorefrontError};
use storefront_core::locale::{Direction, DEFAULT_LOCALE};

use crate::context::TenantContext;
use crate::i18n::{Formatter, Translator};
use crate::policy::PolicyView;

/// A block renderer registered under one or more block-type ids.
pub trait BlockRenderer: Send + Sync {
    /// Primary block-type id.
    fn block_type(&self) -> &'static str;

    /// Commerce feature that must not be explicitly disabled for this block.
    fn required_feature(&self) -> Option<&'static str> {
        None
    }

    fn render(&self, props: &Value, ctx: &RenderCtx<'_>) -> Result<Rendered>;
}

/// Everything a renderer may read during one render pass.
#[derive(Clone, Copy)]
pub struct RenderCtx<'a> {
    pub tenant: &'a TenantContext,
    pub policy: &'a PolicyView,
    pub i18n: &'a dyn Translator,
    pub fmt: &'a dyn Formatter,
    /// Render-pass clock; blocks never read the system clock themselves.
    pub now: DateTime<Utc>,
}

impl<'a> RenderCtx<'a> {
    pub fn new(
        tenant: &'a TenantContext,
        policy: &'a PolicyView,
        i18n: &'a dyn Translator,
        fmt: &'a dyn Formatter,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            tenant,
            policy,
            i18n,
            fmt,
            now,
        }
    }

    /// explicit prop > tenant locale > global fallback.
    pub fn locale_for<'b>(&'b self, explicit: Option<&'b str>) -> &'b str {
        self.tenant.locale_for(explicit)
    }

    /// Translated text, or `None` when neither the locale nor the default
    /// locale has the key (the store echoes unknown keys back).
    pub fn text(&self, locale: &str, key: &str) -> Option<String> {
        let hit = |loc: &str| {
            let s = self.i18n.translate(loc, key);
            (s != key && !s.trim().is_empty()).then_some(s)
        };
        hit(locale).or_else(|| hit(DEFAULT_LOCALE))
    }

    /// Currency amount; currency defaults to the tenant's.
    pub fn money(&self, amount: f64, currency: Option<&str>, locale: &str) -> String {
        let currency = non_blank(currency).unwrap_or(self.tenant.default_currency.as_str());
        self.fmt.format_currency(amount, currency, locale)
    }

    pub fn number(&self, value: f64, locale: &str) -> String {
        self.fmt.format_number(value, locale)
    }

    pub fn date(&self, date: NaiveDate, locale: &str) -> String {
        self.fmt.format_date(date, locale)
    }
}

/// Outcome of one block render.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Block(RenderOutput),
    /// Omit this slot: no placeholder, no layout gap, no error.
    Skip,
}

impl Rendered {
    pub fn is_skip(&self) -> bool {
        matches!(self, Rendered::Skip)
    }
}

/// View model for one rendered block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderOutput {
    #[serde(rename = "type")]
    pub block_type: String,
    pub variant: &'static str,
    pub locale: String,
    pub dir: Direction,
    pub content: Value,
}

impl RenderOutput {
    pub fn new(block_type: &str, variant: &'static str, locale: &str, content: Value) -> Self {
        Self {
            block_type: block_type.to_string(),
            variant,
            locale: locale.to_string(),
            dir: Direction::for_locale(locale),
            content,
        }
    }
}

/// Enumerated layouts of one block.
pub trait BlockVariant: Copy + Default + 'static {
    const ALL: &'static [Self];
    fn name(self) -> &'static str;
}

/// Parse a `variant` prop; unknown or missing names yield the default.
pub fn select_variant<V: BlockVariant>(block_type: &str, raw: Option<&str>) -> V {
    let Some(raw) = non_blank(raw) else {
        return V::default();
    };
    match V::ALL.iter().find(|v| v.name().eq_ignore_ascii_case(raw)) {
        Some(v) => *v,
        None => {
            let fallback = V::default();
            tracing::debug!(block_type=%block_type, variant=%raw, fallback=%fallback.name(), "unknown variant; using default");
            fallback
        }
    }
}

/// Decode untyped props into a block's schema. `null` decodes like `{}`.
pub fn decode_props<T: DeserializeOwned>(block_type: &str, props: &Value) -> Result<T> {
    let res = if props.is_null() {
        T::deserialize(&Value::Object(Map::new()))
    } else {
        T::deserialize(props)
    };
    res.map_err(|e| StorefrontError::invalid_props(block_type, e))
}

/// Trimmed, non-empty string or `None`.
pub fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// Shared sufficiency predicate: a non-empty primary collection, or any
/// non-blank heading/description.
pub fn has_content(items: usize, texts: &[Option<&str>]) -> bool {
    items > 0 || texts.iter().any(|t| non_blank(*t).is_some())
}
