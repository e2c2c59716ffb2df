use serde::Deserialize;
use serde_json::{json, Value};
use storefront_core::error::Result;

use crate::dispatch::{
    decode_props, non_blank, select_variant, BlockRenderer, BlockVariant, RenderCtx,
    RenderOutput, Rendered,
};

const BLOCK: &str = "testimonials";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TestimonialsProps {
    heading: Option<String>,
    items: Vec<Testimonial>,
    variant: Option<String>,
    locale: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Testimonial {
    quote: String,
    author: Option<String>,
    role: Option<String>,
    rating: Option<u8>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
enum TestimonialsVariant {
    #[default]
    Grid,
    Carousel,
    Spotlight,
}

impl BlockVariant for TestimonialsVariant {
    const ALL: &'static [Self] = &[
        TestimonialsVariant::Grid,
        TestimonialsVariant::Carousel,
        TestimonialsVariant::Spotlight,
    ];
    fn name(self) -> &'static str {
        match self {
            TestimonialsVariant::Grid => "grid",
            TestimonialsVariant::Carousel => "carousel",
            TestimonialsVariant::Spotlight => "spotlight",
        }
    }
}

/// Customer quotes. Gated by the `reviews` commerce feature.
#[derive(Debug, Default)]
pub struct TestimonialsBlock;

impl TestimonialsBlock {
    pub fn new() -> Self {
        Self
    }
}

impl BlockRenderer for TestimonialsBlock {
    fn block_type(&self) -> &'static str {
        BLOCK
    }

    fn required_feature(&self) -> Option<&'static str> {
        Some("reviews")
    }

    fn render(&self, props: &Value, ctx: &RenderCtx<'_>) -> Result<Rendered> {
        let p: TestimonialsProps = decode_props(BLOCK, props)?;
        let locale = ctx.locale_for(p.locale.as_deref());
        let variant: TestimonialsVariant = select_variant(BLOCK, p.variant.as_deref());

        let anonymous = ctx.text(locale, "testimonials.anonymous");
        let items: Vec<Value> = p
            .items
            .iter()
            .filter_map(|t| {
                let quote = non_blank(Some(t.quote.as_str()))?;
                let author = non_blank(t.author.as_deref())
                    .map(str::to_string)
                    .or_else(|| anonymous.clone());
                Some(json!({
                    "quote": quote,
                    "author": author,
                    "role": non_blank(t.role.as_deref()),
                    "rating": t.rating.map(|r| r.clamp(1, 5)),
                }))
            })
            .collect();

        // Quotes are the content; a heading over nothing is skipped.
        if items.is_empty() {
            return Ok(Rendered::Skip);
        }

        let heading = non_blank(p.heading.as_deref());
        let content = match variant {
            TestimonialsVariant::Grid => json!({ "heading": heading, "items": items }),
            TestimonialsVariant::Carousel => json!({
                "heading": heading,
                "slides": items,
                "autoplay": items.len() > 1,
            }),
            TestimonialsVariant::Spotlight => {
                let (featured, rest) = items.split_at(1);
                json!({ "heading": heading, "featured": featured.first(), "more": rest.len() })
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
