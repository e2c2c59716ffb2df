use serde::Deserialize;
use serde_json::{json, Value};
use storefront_core::error::Result;
use storefront_core::locale::Direction;

use crate::dispatch::{
    decode_props, has_content, non_blank, select_variant, BlockRenderer, BlockVariant,
    RenderCtx, RenderOutput, Rendered,
};

const BLOCK: &str = "hero";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HeroProps {
    heading: Option<String>,
    subheading: Option<String>,
    cta: Option<Cta>,
    image: Option<Image>,
    variant: Option<String>,
    locale: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Cta {
    label: Option<String>,
    href: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Image {
    src: Option<String>,
    alt: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
enum HeroVariant {
    #[default]
    Centered,
    Split,
    FullBleed,
}

impl BlockVariant for HeroVariant {
    const ALL: &'static [Self] = &[HeroVariant::Centered, HeroVariant::Split, HeroVariant::FullBleed];
    fn name(self) -> &'static str {
        match self {
            HeroVariant::Centered => "centered",
            HeroVariant::Split => "split",
            HeroVariant::FullBleed => "full-bleed",
        }
    }
}

/// Page-top banner with heading, optional image and call to action.
#[derive(Debug, Default)]
pub struct HeroBlock;

impl HeroBlock {
    pub fn new() -> Self {
        Self
    }
}

impl BlockRenderer for HeroBlock {
    fn block_type(&self) -> &'static str {
        BLOCK
    }

    fn render(&self, props: &Value, ctx: &RenderCtx<'_>) -> Result<Rendered> {
        let p: HeroProps = decode_props(BLOCK, props)?;
        let locale = ctx.locale_for(p.locale.as_deref());

        let heading = non_blank(p.heading.as_deref());
        let subheading = non_blank(p.subheading.as_deref());
        if !has_content(0, &[heading, subheading]) {
            return Ok(Rendered::Skip);
        }

        let image = p.image.as_ref().and_then(|i| {
            let src = non_blank(i.src.as_deref())?;
            Some(json!({ "src": src, "alt": non_blank(i.alt.as_deref()).or(heading) }))
        });

        // A CTA needs a target; its label defaults to the translated "hero.cta".
        let cta = p.cta.as_ref().and_then(|c| {
            let href = non_blank(c.href.as_deref())?;
            let label = non_blank(c.label.as_deref())
                .map(str::to_string)
                .or_else(|| ctx.text(locale, "hero.cta"))?;
            Some(json!({ "label": label, "href": href }))
        });

        // Image layouts without an image degrade to the centered layout.
        let variant = match select_variant::<HeroVariant>(BLOCK, p.variant.as_deref()) {
            HeroVariant::Split | HeroVariant::FullBleed if image.is_none() => HeroVariant::Centered,
            v => v,
        };

        let content = match variant {
            HeroVariant::Centered => json!({
                "heading": heading,
                "subheading": subheading,
                "cta": cta,
            }),
            HeroVariant::Split => json!({
                "text": { "heading": heading, "subheading": subheading, "cta": cta },
                "media": image,
                "media_side": trailing_side(Direction::for_locale(locale)),
            }),
            HeroVariant::FullBleed => json!({
                "background": image,
                "overlay": { "heading": heading, "subheading": subheading, "cta": cta },
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

/// Media sits on the trailing side in reading order.
fn trailing_side(dir: Direction) -> &'static str {
    match dir {
        Direction::Ltr => "right",
        Direction::Rtl => "left",
    }
}
