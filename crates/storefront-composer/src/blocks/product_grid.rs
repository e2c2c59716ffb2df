use serde::Deserialize;
use serde_json::{json, Value};
use storefront_core::error::Result;

use crate::dispatch::{
    decode_props, non_blank, select_variant, BlockRenderer, BlockVariant, RenderCtx,
    RenderOutput, Rendered,
};

const BLOCK: &str = "product-grid";
const DEFAULT_COLUMNS: i64 = 4;
/// Feature flag that controls the add-to-cart affordance.
const CART_FEATURE: &str = "cart";

#[derive(Debug, Deserialize)]
#[serde(default)]
struct ProductGridProps {
    heading: Option<String>,
    products: Vec<Product>,
    columns: Option<i64>,
    show_prices: bool,
    variant: Option<String>,
    locale: Option<String>,
}

impl Default for ProductGridProps {
    fn default() -> Self {
        Self {
            heading: None,
            products: Vec::new(),
            columns: None,
            show_prices: true,
            variant: None,
            locale: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Product {
    id: Option<String>,
    name: String,
    price: Option<f64>,
    compare_at_price: Option<f64>,
    currency: Option<String>,
    image: Option<String>,
    href: Option<String>,
    category: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
enum GridVariant {
    #[default]
    Grid,
    Carousel,
    Compact,
}

impl BlockVariant for GridVariant {
    const ALL: &'static [Self] = &[GridVariant::Grid, GridVariant::Carousel, GridVariant::Compact];
    fn name(self) -> &'static str {
        match self {
            GridVariant::Grid => "grid",
            GridVariant::Carousel => "carousel",
            GridVariant::Compact => "compact",
        }
    }
}

/// Product tiles. Products in prohibited verticals are removed before the
/// emptiness check, so a grid of only prohibited products is skipped.
#[derive(Debug, Default)]
pub struct ProductGridBlock;

impl ProductGridBlock {
    pub fn new() -> Self {
        Self
    }
}

impl BlockRenderer for ProductGridBlock {
    fn block_type(&self) -> &'static str {
        BLOCK
    }

    fn render(&self, props: &Value, ctx: &RenderCtx<'_>) -> Result<Rendered> {
        let p: ProductGridProps = decode_props(BLOCK, props)?;
        let locale = ctx.locale_for(p.locale.as_deref());
        let variant: GridVariant = select_variant(BLOCK, p.variant.as_deref());
        let add_to_cart = ctx.policy.feature_allowed(CART_FEATURE);

        let products: Vec<Value> = p
            .products
            .iter()
            .filter(|prod| {
                prod.category
                    .as_deref()
                    .map_or(true, |c| ctx.policy.vertical_allowed(c))
            })
            .filter_map(|prod| {
                let name = non_blank(Some(prod.name.as_str()))?;
                let price = prod
                    .price
                    .filter(|_| p.show_prices)
                    .map(|v| ctx.money(v, prod.currency.as_deref(), locale));
                let compare_at = prod
                    .compare_at_price
                    .filter(|c| p.show_prices && prod.price.map_or(false, |v| *c > v))
                    .map(|v| ctx.money(v, prod.currency.as_deref(), locale));
                Some(json!({
                    "id": non_blank(prod.id.as_deref()),
                    "name": name,
                    "price": price,
                    "compare_at_price": compare_at,
                    "image": non_blank(prod.image.as_deref()),
                    "href": non_blank(prod.href.as_deref()),
                    "add_to_cart": add_to_cart && prod.price.is_some(),
                }))
            })
            .collect();

        // A heading alone does not make a product grid.
        if products.is_empty() {
            return Ok(Rendered::Skip);
        }

        let heading = non_blank(p.heading.as_deref());
        let content = match variant {
            GridVariant::Grid => json!({
                "heading": heading,
                "columns": p.columns.unwrap_or(DEFAULT_COLUMNS).clamp(1, 6),
                "products": products,
            }),
            GridVariant::Carousel => json!({
                "heading": heading,
                "slides": products,
                "loop": products.len() > 1,
            }),
            GridVariant::Compact => {
                let rows: Vec<Value> = products
                    .iter()
                    .map(|prod| json!({ "name": prod["name"], "price": prod["price"], "href": prod["href"] }))
                    .collect();
                json!({ "heading": heading, "rows": rows })
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
