use serde::Deserialize;
use serde_json::{json, Value};
use storefront_core::error::Result;

use crate::dispatch::{
    decode_props, has_content, non_blank, select_variant, BlockRenderer, BlockVariant,
    RenderCtx, RenderOutput, Rendered,
};

const BLOCK: &str = "stats";
const DEFAULT_REFRESH_SECS: u32 = 30;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StatsProps {
    stats: Vec<StatItem>,
    heading: Option<String>,
    description: Option<String>,
    variant: Option<String>,
    locale: Option<String>,
    /// Live variant polling interval.
    refresh_seconds: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StatItem {
    label: String,
    value: Option<StatValue>,
    suffix: Option<String>,
    /// Relative change, e.g. `0.12` for +12%.
    trend: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StatValue {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
enum StatsVariant {
    #[default]
    Full,
    Compact,
    Live,
}

impl BlockVariant for StatsVariant {
    const ALL: &'static [Self] = &[StatsVariant::Full, StatsVariant::Compact, StatsVariant::Live];
    fn name(self) -> &'static str {
        match self {
            StatsVariant::Full => "full",
            StatsVariant::Compact => "compact",
            StatsVariant::Live => "live",
        }
    }
}

/// Key figures ("12 orders", "4.9 rating").
#[derive(Debug, Default)]
pub struct StatsBlock;

impl StatsBlock {
    pub fn new() -> Self {
        Self
    }
}

impl BlockRenderer for StatsBlock {
    fn block_type(&self) -> &'static str {
        BLOCK
    }

    fn render(&self, props: &Value, ctx: &RenderCtx<'_>) -> Result<Rendered> {
        let p: StatsProps = decode_props(BLOCK, props)?;
        let locale = ctx.locale_for(p.locale.as_deref());
        let variant: StatsVariant = select_variant(BLOCK, p.variant.as_deref());

        let items: Vec<Value> = p
            .stats
            .iter()
            .filter_map(|s| {
                let label = non_blank(Some(s.label.as_str()))?;
                let value = match s.value.as_ref()? {
                    StatValue::Number(n) => ctx.number(*n, locale),
                    StatValue::Text(t) => non_blank(Some(t.as_str()))?.to_string(),
                };
                Some(json!({
                    "label": label,
                    "value": value,
                    "suffix": non_blank(s.suffix.as_deref()),
                    "trend": s.trend,
                }))
            })
            .collect();

        let heading = non_blank(p.heading.as_deref());
        let description = non_blank(p.description.as_deref());
        if !has_content(items.len(), &[heading, description]) {
            return Ok(Rendered::Skip);
        }

        let content = match variant {
            StatsVariant::Full => json!({
                "heading": heading,
                "description": description,
                "items": items,
            }),
            StatsVariant::Compact => {
                let items: Vec<Value> = items
                    .iter()
                    .map(|i| json!({ "label": i["label"], "value": i["value"] }))
                    .collect();
                json!({ "heading": heading, "description": description, "items": items })
            }
            StatsVariant::Live => json!({
                "heading": heading,
                "description": description,
                "items": items,
                "refresh_seconds": p.refresh_seconds.unwrap_or(DEFAULT_REFRESH_SECS).max(5),
            }),
        };

        Ok(Rendered::Block(RenderOutput::new(
            BLOCK,
            variant.name(),
            locale,
            content,
        )))
    }
}
