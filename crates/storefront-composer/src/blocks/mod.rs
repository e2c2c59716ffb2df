//! Built-in block renderers.
//!
//! Every block decodes its own typed props, picks a variant, and skips itself
//! when it has nothing to show (see `dispatch::contract`).

mod faq;
mod hero;
mod newsletter;
mod product_grid;
mod promo_banner;
mod rich_text;
mod stats;
mod testimonials;

use std::sync::Arc;

use storefront_core::error::Result;

use crate::dispatch::{BlockRegistry, RegistryBuilder};

pub use faq::FaqBlock;
pub use hero::HeroBlock;
pub use newsletter::NewsletterBlock;
pub use product_grid::ProductGridBlock;
pub use promo_banner::PromoBannerBlock;
pub use rich_text::RichTextBlock;
pub use stats::StatsBlock;
pub use testimonials::TestimonialsBlock;

/// Register every built-in block (plus aliases) on a builder.
pub fn register_builtin(builder: &mut RegistryBuilder) -> Result<()> {
    let stats = Arc::new(StatsBlock::new());
    builder
        .register(Arc::new(HeroBlock::new()))?
        .register(stats.clone())?
        .register_as("stats-bar", stats)?
        .register(Arc::new(ProductGridBlock::new()))?
        .register(Arc::new(TestimonialsBlock::new()))?
        .register(Arc::new(FaqBlock::new()))?
        .register(Arc::new(RichTextBlock::new()))?
        .register(Arc::new(NewsletterBlock::new()))?
        .register(Arc::new(PromoBannerBlock::new()))?;
    Ok(())
}

/// Frozen registry with the built-in blocks only.
pub fn builtin_registry() -> Result<BlockRegistry> {
    let mut builder = RegistryBuilder::new();
    register_builtin(&mut builder)?;
    Ok(builder.build())
}
