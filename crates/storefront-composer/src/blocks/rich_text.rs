use serde::Deserialize;
use serde_json::{json, Value};
use storefront_core::error::Result;

use crate::dispatch::{
    decode_props, has_content, non_blank, select_variant, BlockRenderer, BlockVariant,
    RenderCtx, RenderOutput, Rendered,
};

const BLOCK: &str = "rich-text";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RichTextProps {
    heading: Option<String>,
    body: Option<String>,
    /// Callout only: info | warning | success.
    tone: Option<String>,
    variant: Option<String>,
    locale: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
enum RichTextVariant {
    #[default]
    Prose,
    Callout,
}

impl BlockVariant for RichTextVariant {
    const ALL: &'static [Self] = &[RichTextVariant::Prose, RichTextVariant::Callout];
    fn name(self) -> &'static str {
        match self {
            RichTextVariant::Prose => "prose",
            RichTextVariant::Callout => "callout",
        }
    }
}

#[derive(Debug, Default)]
pub struct RichTextBlock;

impl RichTextBlock {
    pub fn new() -> Self {
        Self
    }
}

impl BlockRenderer for RichTextBlock {
    fn block_type(&self) -> &'static str {
        BLOCK
    }

    fn render(&self, props: &Value, ctx: &RenderCtx<'_>) -> Result<Rendered> {
        let p: RichTextProps = decode_props(BLOCK, props)?;
        let locale = ctx.locale_for(p.locale.as_deref());
        let variant: RichTextVariant = select_variant(BLOCK, p.variant.as_deref());

        let heading = non_blank(p.heading.as_deref());
        let body = non_blank(p.body.as_deref());
        if !has_content(0, &[heading, body]) {
            return Ok(Rendered::Skip);
        }

        // Blank lines separate paragraphs.
        let paragraphs: Vec<&str> = body
            .map(|b| {
                b.split("\n\n")
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let content = match variant {
            RichTextVariant::Prose => json!({
                "heading": heading,
                "paragraphs": paragraphs,
            }),
            RichTextVariant::Callout => {
                let tone = match non_blank(p.tone.as_deref()) {
                    Some(t) if ["info", "warning", "success"].contains(&t) => t,
                    _ => "info",
                };
                json!({
                    "tone": tone,
                    "title": heading,
                    "text": paragraphs.join(" "),
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
