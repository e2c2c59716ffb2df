use serde::Deserialize;
use serde_json::{json, Value};
use storefront_core::error::Result;

use crate::dispatch::{
    decode_props, has_content, non_blank, select_variant, BlockRenderer, BlockVariant,
    RenderCtx, RenderOutput, Rendered,
};

const BLOCK: &str = "newsletter";
const BUTTON_FALLBACK: &str = "Subscribe";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NewsletterProps {
    heading: Option<String>,
    description: Option<String>,
    button_label: Option<String>,
    placeholder: Option<String>,
    variant: Option<String>,
    locale: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
enum NewsletterVariant {
    #[default]
    Inline,
    Card,
    Banner,
}

impl BlockVariant for NewsletterVariant {
    const ALL: &'static [Self] = &[
        NewsletterVariant::Inline,
        NewsletterVariant::Card,
        NewsletterVariant::Banner,
    ];
    fn name(self) -> &'static str {
        match self {
            NewsletterVariant::Inline => "inline",
            NewsletterVariant::Card => "card",
            NewsletterVariant::Banner => "banner",
        }
    }
}

/// Email signup. Heading and description default to the tenant's
/// translations, so an unconfigured block still renders when the catalog has
/// copy for it. Gated by the `newsletter` commerce feature.
#[derive(Debug, Default)]
pub struct NewsletterBlock;

impl NewsletterBlock {
    pub fn new() -> Self {
        Self
    }
}

impl BlockRenderer for NewsletterBlock {
    fn block_type(&self) -> &'static str {
        BLOCK
    }

    fn required_feature(&self) -> Option<&'static str> {
        Some("newsletter")
    }

    fn render(&self, props: &Value, ctx: &RenderCtx<'_>) -> Result<Rendered> {
        let p: NewsletterProps = decode_props(BLOCK, props)?;
        let locale = ctx.locale_for(p.locale.as_deref());
        let variant: NewsletterVariant = select_variant(BLOCK, p.variant.as_deref());

        let heading = non_blank(p.heading.as_deref())
            .map(str::to_string)
            .or_else(|| ctx.text(locale, "newsletter.heading"));
        let description = non_blank(p.description.as_deref())
            .map(str::to_string)
            .or_else(|| ctx.text(locale, "newsletter.description"));

        // Judged after defaults: translated copy counts as content.
        if !has_content(0, &[heading.as_deref(), description.as_deref()]) {
            return Ok(Rendered::Skip);
        }

        let button = non_blank(p.button_label.as_deref())
            .map(str::to_string)
            .or_else(|| ctx.text(locale, "newsletter.subscribe"))
            .unwrap_or_else(|| BUTTON_FALLBACK.to_string());
        let placeholder = non_blank(p.placeholder.as_deref())
            .map(str::to_string)
            .or_else(|| ctx.text(locale, "newsletter.placeholder"));

        let form = json!({
            "button_label": button,
            "placeholder": placeholder,
            "input": "email",
        });

        let content = match variant {
            NewsletterVariant::Inline => json!({
                "heading": heading,
                "description": description,
                "form": form,
            }),
            NewsletterVariant::Card => json!({
                "heading": heading,
                "description": description,
                "form": form,
            }),
            NewsletterVariant::Banner => json!({
                "message": heading.or(description),
                "form": form,
                "dismissible": true,
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
