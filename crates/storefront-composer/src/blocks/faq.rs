use serde::Deserialize;
use serde_json::{json, Value};
use storefront_core::error::Result;

use crate::dispatch::{
    decode_props, has_content, non_blank, select_variant, BlockRenderer, BlockVariant,
    RenderCtx, RenderOutput, Rendered,
};

const BLOCK: &str = "faq";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FaqProps {
    heading: Option<String>,
    description: Option<String>,
    items: Vec<FaqItem>,
    /// Accordion only: index of the entry expanded on load.
    open_index: Option<usize>,
    variant: Option<String>,
    locale: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FaqItem {
    question: String,
    answer: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
enum FaqVariant {
    #[default]
    Accordion,
    List,
    TwoColumn,
}

impl BlockVariant for FaqVariant {
    const ALL: &'static [Self] = &[FaqVariant::Accordion, FaqVariant::List, FaqVariant::TwoColumn];
    fn name(self) -> &'static str {
        match self {
            FaqVariant::Accordion => "accordion",
            FaqVariant::List => "list",
            FaqVariant::TwoColumn => "two-column",
        }
    }
}

#[derive(Debug, Default)]
pub struct FaqBlock;

impl FaqBlock {
    pub fn new() -> Self {
        Self
    }
}

impl BlockRenderer for FaqBlock {
    fn block_type(&self) -> &'static str {
        BLOCK
    }

    fn render(&self, props: &Value, ctx: &RenderCtx<'_>) -> Result<Rendered> {
        let p: FaqProps = decode_props(BLOCK, props)?;
        let locale = ctx.locale_for(p.locale.as_deref());
        let variant: FaqVariant = select_variant(BLOCK, p.variant.as_deref());

        let items: Vec<Value> = p
            .items
            .iter()
            .filter_map(|i| {
                let q = non_blank(Some(i.question.as_str()))?;
                let a = non_blank(Some(i.answer.as_str()))?;
                Some(json!({ "question": q, "answer": a }))
            })
            .collect();

        let heading = non_blank(p.heading.as_deref());
        let description = non_blank(p.description.as_deref());
        if !has_content(items.len(), &[heading, description]) {
            return Ok(Rendered::Skip);
        }

        let content = match variant {
            FaqVariant::Accordion => json!({
                "heading": heading,
                "description": description,
                "items": items,
                "open_index": p.open_index.filter(|i| *i < items.len()),
            }),
            FaqVariant::List => json!({
                "heading": heading,
                "description": description,
                "items": items,
            }),
            FaqVariant::TwoColumn => {
                let split = items.len().div_ceil(2);
                let (left, right) = items.split_at(split);
                json!({
                    "heading": heading,
                    "description": description,
                    "columns": [left, right],
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
