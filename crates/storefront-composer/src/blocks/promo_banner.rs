use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use storefront_core::error::Result;

use crate::dispatch::{
    decode_props, has_content, non_blank, select_variant, BlockRenderer, BlockVariant,
    RenderCtx, RenderOutput, Rendered,
};

const BLOCK: &str = "promo-banner";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PromoProps {
    message: Option<String>,
    code: Option<String>,
    href: Option<String>,
    starts_at: Option<DateTime<Utc>>,
    ends_at: Option<DateTime<Utc>>,
    variant: Option<String>,
    locale: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
enum PromoVariant {
    #[default]
    Bar,
    Card,
    Countdown,
}

impl BlockVariant for PromoVariant {
    const ALL: &'static [Self] = &[PromoVariant::Bar, PromoVariant::Card, PromoVariant::Countdown];
    fn name(self) -> &'static str {
        match self {
            PromoVariant::Bar => "bar",
            PromoVariant::Card => "card",
            PromoVariant::Countdown => "countdown",
        }
    }
}

/// Time-boxed promotion. Outside its `[starts_at, ends_at)` window the block
/// renders nothing. Gated by the `promotions` commerce feature.
#[derive(Debug, Default)]
pub struct PromoBannerBlock;

impl PromoBannerBlock {
    pub fn new() -> Self {
        Self
    }
}

impl BlockRenderer for PromoBannerBlock {
    fn block_type(&self) -> &'static str {
        BLOCK
    }

    fn required_feature(&self) -> Option<&'static str> {
        Some("promotions")
    }

    fn render(&self, props: &Value, ctx: &RenderCtx<'_>) -> Result<Rendered> {
        let p: PromoProps = decode_props(BLOCK, props)?;
        let locale = ctx.locale_for(p.locale.as_deref());

        if p.starts_at.is_some_and(|s| ctx.now < s) || p.ends_at.is_some_and(|e| ctx.now >= e) {
            return Ok(Rendered::Skip);
        }

        let message = non_blank(p.message.as_deref());
        if !has_content(0, &[message]) {
            return Ok(Rendered::Skip);
        }

        // Countdown needs an end date; without one it is a plain bar.
        let variant = match select_variant::<PromoVariant>(BLOCK, p.variant.as_deref()) {
            PromoVariant::Countdown if p.ends_at.is_none() => PromoVariant::Bar,
            v => v,
        };

        let ends_on = p.ends_at.map(|e| {
            let date = ctx.date(e.date_naive(), locale);
            match ctx.text(locale, "promo.ends_on") {
                Some(label) => format!("{label} {date}"),
                None => date,
            }
        });
        let code = non_blank(p.code.as_deref());
        let href = non_blank(p.href.as_deref());

        let content = match variant {
            PromoVariant::Bar => json!({
                "message": message,
                "code": code,
                "href": href,
            }),
            PromoVariant::Card => json!({
                "message": message,
                "code": code,
                "href": href,
                "ends_on": ends_on,
            }),
            PromoVariant::Countdown => {
                let remaining = p
                    .ends_at
                    .map(|e| (e - ctx.now).num_seconds().max(0))
                    .unwrap_or(0);
                json!({
                    "message": message,
                    "code": code,
                    "ends_on": ends_on,
                    "seconds_remaining": remaining,
                })
            }
        };

        Ok(Rendered::Block(RenderOutput::new(
            BLOCK,
            variant.name(),
            locale,
            content,
        )))
    }
}
