#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};

use storefront_composer::blocks::{self, StatsBlock};
use storefront_composer::compose::{ComposedPage, PageComposer};
use storefront_composer::config::{self, StorefrontConfig};
use storefront_composer::context::{TenantContext, TenantRequest, TenantResolver};
use storefront_composer::dispatch::{
    BlockRegistry, BlockRenderer, RenderCtx, Rendered, RegistryBuilder,
};
use storefront_composer::i18n::{CatalogTranslator, LocaleFormatter};
use storefront_composer::obs::ComposerMetrics;
use storefront_composer::policy::{PolicySnapshot, PolicyView};
use storefront_core::error::{Result, StorefrontError};
use storefront_core::locale::Direction;
use storefront_core::protocol::governance::GovernanceDocument;
use storefront_core::protocol::page::{BlockConfig, PageDefinition};

const CONFIG: &str = r#"
version: 1
locale:
  fallback: "fr"
tenants:
  - id: "acme"
    default_locale: "en"
    supported_locales: ["en", "de", "ar"]
  - id: "souq"
    default_locale: "ar"
    default_currency: "SAR"
  - id: "plain"
translations:
  en:
    newsletter.heading: "Stay in the loop"
    newsletter.subscribe: "Subscribe"
    hero.cta: "Shop now"
  de:
    newsletter.heading: "Bleib auf dem Laufenden"
"#;

struct Harness {
    cfg: StorefrontConfig,
    resolver: TenantResolver,
}

impl Harness {
    fn new() -> Self {
        let cfg = config::load_from_str(CONFIG).unwrap();
        let resolver = TenantResolver::new(&cfg);
        Self { cfg, resolver }
    }

    fn tenant(&self, id: &str, locale: Option<&str>) -> TenantContext {
        self.resolver
            .resolve(&TenantRequest {
                tenant: Some(id.to_string()),
                host: None,
                locale: locale.map(str::to_string),
            })
            .unwrap()
    }

    fn composer(&self, registry: BlockRegistry) -> PageComposer {
        PageComposer::new(
            Arc::new(registry),
            Arc::new(CatalogTranslator::new(&self.cfg.translations)),
            Arc::new(LocaleFormatter::new()),
        )
    }

    fn builtin(&self) -> PageComposer {
        self.composer(blocks::builtin_registry().unwrap())
    }
}

fn page(blocks: Vec<(&str, Value)>) -> PageDefinition {
    PageDefinition::new(
        blocks
            .into_iter()
            .map(|(t, props)| BlockConfig::new(t, props))
            .collect(),
    )
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
}

fn policy(json: &str) -> PolicyView {
    let doc = GovernanceDocument::from_json(json).unwrap();
    PolicyView::new(Some(Arc::new(PolicySnapshot::from_document(&doc))))
}

fn compose(h: &Harness, tenant: &str, blocks: Vec<(&str, Value)>) -> ComposedPage {
    h.builtin()
        .compose(&page(blocks), &h.tenant(tenant, None), &PolicyView::open(), now())
}

#[test]
fn stats_with_empty_list_is_skipped() {
    let h = Harness::new();
    let out = compose(&h, "acme", vec![("stats", json!({ "stats": [] }))]);
    assert!(out.blocks.is_empty());
}

#[test]
fn stats_with_one_item_renders() {
    let h = Harness::new();
    let out = compose(
        &h,
        "acme",
        vec![("stats", json!({ "stats": [{ "label": "Orders", "value": 12 }] }))],
    );
    assert_eq!(out.blocks.len(), 1);
    let block = &out.blocks[0];
    assert_eq!(block.block_type, "stats");
    assert_eq!(block.variant, "full");
    let items = block.content["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["label"], "Orders");
    assert_eq!(items[0]["value"], "12");
}

#[test]
fn unknown_block_type_is_silently_skipped() {
    let h = Harness::new();
    let metrics = Arc::new(ComposerMetrics::default());
    let composer = h.builtin().with_metrics(Arc::clone(&metrics));
    let out = composer.compose(
        &page(vec![("unknown-widget", json!({}))]),
        &h.tenant("acme", None),
        &PolicyView::open(),
        now(),
    );
    assert!(out.blocks.is_empty());
    assert_eq!(
        metrics
            .blocks_skipped
            .get(&[("block_type", "unknown-widget"), ("reason", "unknown_type")]),
        1
    );
}

#[test]
fn order_is_preserved_and_skipped_slots_leave_no_gap() {
    let h = Harness::new();
    let out = compose(
        &h,
        "acme",
        vec![
            ("hero", json!({ "heading": "Summer sale" })),
            ("unknown-widget", json!({})),
            ("faq", json!({})),
            ("stats", json!({ "heading": "By the numbers" })),
            ("hero", json!({ "subheading": "Again" })),
        ],
    );
    assert_eq!(out.block_types(), vec!["hero", "stats", "hero"]);
}

#[test]
fn alias_reports_requested_type() {
    let h = Harness::new();
    let out = compose(
        &h,
        "acme",
        vec![("stats-bar", json!({ "stats": [{ "label": "Rating", "value": 4.9 }] }))],
    );
    assert_eq!(out.block_types(), vec!["stats-bar"]);
}

#[test]
fn empty_props_skip_every_builtin_block_idempotently() {
    let h = Harness::new();
    let registry = blocks::builtin_registry().unwrap();
    let tenant = h.tenant("acme", None);
    let open = PolicyView::open();
    let i18n = CatalogTranslator::new(&HashMap::new());
    let fmt = LocaleFormatter::new();
    let ctx = RenderCtx::new(&tenant, &open, &i18n, &fmt, now());

    for block_type in registry.list_types() {
        let renderer = registry.resolve(block_type).unwrap();
        for props in [json!({}), Value::Null] {
            for _ in 0..2 {
                let out = renderer.render(&props, &ctx).unwrap();
                assert!(out.is_skip(), "{block_type} rendered with empty props");
            }
        }
    }
}

const MARK: &str = "only-this-field";

/// Props that make a block sufficient through exactly one field.
fn single_field_props(block_type: &str) -> Vec<Value> {
    match block_type {
        "hero" => vec![json!({ "heading": MARK }), json!({ "subheading": MARK })],
        "stats" | "stats-bar" => vec![
            json!({ "heading": MARK }),
            json!({ "description": MARK }),
            json!({ "stats": [{ "label": MARK, "value": 1 }] }),
        ],
        "product-grid" => vec![json!({ "products": [{ "name": MARK }] })],
        "testimonials" => vec![json!({ "items": [{ "quote": MARK }] })],
        "faq" => vec![
            json!({ "heading": MARK }),
            json!({ "description": MARK }),
            json!({ "items": [{ "question": MARK, "answer": "Yes" }] }),
        ],
        "rich-text" => vec![json!({ "heading": MARK }), json!({ "body": MARK })],
        "newsletter" => vec![json!({ "heading": MARK }), json!({ "description": MARK })],
        "promo-banner" => vec![json!({ "message": MARK })],
        other => panic!("no sample props for {other}"),
    }
}

fn variant_names(block_type: &str) -> &'static [&'static str] {
    match block_type {
        "hero" => &["centered", "split", "full-bleed"],
        "stats" | "stats-bar" => &["full", "compact", "live"],
        "product-grid" => &["grid", "carousel", "compact"],
        "testimonials" => &["grid", "carousel", "spotlight"],
        "faq" => &["accordion", "list", "two-column"],
        "rich-text" => &["prose", "callout"],
        "newsletter" => &["inline", "card", "banner"],
        "promo-banner" => &["bar", "card", "countdown"],
        other => panic!("no variants for {other}"),
    }
}

#[test]
fn every_variant_shows_the_field_that_made_it_sufficient() {
    let h = Harness::new();
    let registry = blocks::builtin_registry().unwrap();
    let tenant = h.tenant("acme", None);
    let open = PolicyView::open();
    let i18n = CatalogTranslator::new(&HashMap::new());
    let fmt = LocaleFormatter::new();
    let ctx = RenderCtx::new(&tenant, &open, &i18n, &fmt, now());

    for block_type in registry.list_types() {
        let renderer = registry.resolve(block_type).unwrap();
        for base in single_field_props(block_type) {
            for variant in variant_names(block_type) {
                let mut props = base.clone();
                props["variant"] = json!(variant);
                let out = match renderer.render(&props, &ctx).unwrap() {
                    Rendered::Block(out) => out,
                    Rendered::Skip => panic!("{block_type}/{variant} skipped {base}"),
                };
                assert!(
                    out.content.to_string().contains(MARK),
                    "{block_type}/{variant} with {base} rendered {}",
                    out.content
                );
            }
        }
    }
}

#[test]
fn out_of_range_grid_columns_are_clamped() {
    let h = Harness::new();
    for (columns, expected) in [(json!(300), 6), (json!(-2), 1), (json!(3), 3)] {
        let out = compose(
            &h,
            "acme",
            vec![(
                "product-grid",
                json!({ "columns": columns, "products": [{ "name": "Hat" }] }),
            )],
        );
        assert_eq!(out.blocks.len(), 1, "columns={columns}");
        assert_eq!(out.blocks[0].content["columns"], expected);
    }
}

#[test]
fn locale_precedence_explicit_then_tenant_then_global() {
    let h = Harness::new();
    let stat = json!({ "stats": [{ "label": "Orders", "value": 1234.5 }] });

    // explicit block locale
    let mut props = stat.clone();
    props["locale"] = json!("de");
    let out = compose(&h, "acme", vec![("stats", props)]);
    assert_eq!(out.blocks[0].locale, "de");
    assert_eq!(out.blocks[0].content["items"][0]["value"], "1.234,5");

    // tenant ambient locale
    let out = compose(&h, "acme", vec![("stats", stat.clone())]);
    assert_eq!(out.locale, "en");
    assert_eq!(out.blocks[0].locale, "en");
    assert_eq!(out.blocks[0].content["items"][0]["value"], "1,234.5");

    // request locale becomes the tenant locale when supported
    let out = h.builtin().compose(
        &page(vec![("stats", stat.clone())]),
        &h.tenant("acme", Some("de")),
        &PolicyView::open(),
        now(),
    );
    assert_eq!(out.blocks[0].locale, "de");

    // unsupported request locale falls back to the tenant default
    assert_eq!(h.tenant("acme", Some("ja")).locale, "en");

    // no tenant default: global fallback
    let out = compose(&h, "plain", vec![("stats", stat)]);
    assert_eq!(out.locale, "fr");
    assert_eq!(out.blocks[0].locale, "fr");
}

#[test]
fn arabic_tenant_renders_right_to_left() {
    let h = Harness::new();
    let out = compose(
        &h,
        "souq",
        vec![(
            "product-grid",
            json!({ "products": [{ "name": "Oud", "price": 99 }] }),
        )],
    );
    assert_eq!(out.dir, Direction::Rtl);
    assert_eq!(out.blocks[0].dir, Direction::Rtl);
    assert_eq!(
        out.blocks[0].content["products"][0]["price"],
        "99.00\u{a0}SAR"
    );
}

#[test]
fn translated_defaults_count_as_content() {
    let h = Harness::new();
    let out = compose(&h, "acme", vec![("newsletter", json!({}))]);
    assert_eq!(out.blocks.len(), 1);
    assert_eq!(out.blocks[0].content["heading"], "Stay in the loop");

    let out = h.builtin().compose(
        &page(vec![("newsletter", json!({ "variant": "card" }))]),
        &h.tenant("acme", Some("de")),
        &PolicyView::open(),
        now(),
    );
    assert_eq!(out.blocks[0].variant, "card");
    assert_eq!(out.blocks[0].content["heading"], "Bleib auf dem Laufenden");
    // missing in "de": default-locale text
    assert_eq!(out.blocks[0].content["form"]["button_label"], "Subscribe");
}

#[test]
fn unknown_variant_falls_back_to_default() {
    let h = Harness::new();
    let out = compose(
        &h,
        "acme",
        vec![("hero", json!({ "heading": "Hi", "variant": "diagonal" }))],
    );
    assert_eq!(out.blocks[0].variant, "centered");
}

#[test]
fn governance_denies_prohibited_verticals_and_disabled_features() {
    let h = Harness::new();
    let view = policy(
        r#"{ "effective_policies": {
            "prohibited_verticals": ["Tobacco"],
            "commerce_features": { "reviews": false, "cart": false }
        } }"#,
    );
    let out = h.builtin().compose(
        &page(vec![
            ("hero", json!({ "heading": "Cigars", "category": "TOBACCO" })),
            ("testimonials", json!({ "items": [{ "quote": "Great" }] })),
            (
                "product-grid",
                json!({ "products": [
                    { "name": "Pipe", "price": 20, "category": "tobacco" },
                    { "name": "Hat", "price": 15, "category": "apparel" }
                ] }),
            ),
            ("hero", json!({ "heading": "Hats", "category": "apparel" })),
        ]),
        &h.tenant("acme", None),
        &view,
        now(),
    );

    assert_eq!(out.block_types(), vec!["product-grid", "hero"]);
    let products = out.blocks[0].content["products"].as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["name"], "Hat");
    assert_eq!(products[0]["add_to_cart"], false);
}

#[test]
fn no_policy_allows_everything() {
    let h = Harness::new();
    let out = compose(
        &h,
        "acme",
        vec![
            ("hero", json!({ "heading": "Cigars", "category": "tobacco" })),
            ("testimonials", json!({ "items": [{ "quote": "Great" }] })),
        ],
    );
    assert_eq!(out.block_types(), vec!["hero", "testimonials"]);
}

#[test]
fn promo_banner_respects_its_window() {
    let h = Harness::new();
    let banner = |starts: &str, ends: &str| {
        compose(
            &h,
            "acme",
            vec![(
                "promo-banner",
                json!({
                    "message": "20% off",
                    "variant": "countdown",
                    "starts_at": starts,
                    "ends_at": ends,
                }),
            )],
        )
    };

    assert!(banner("2026-06-02T00:00:00Z", "2026-06-10T00:00:00Z").blocks.is_empty());
    assert!(banner("2026-05-01T00:00:00Z", "2026-06-01T12:00:00Z").blocks.is_empty());

    let out = banner("2026-05-01T00:00:00Z", "2026-06-01T13:00:00Z");
    assert_eq!(out.blocks[0].variant, "countdown");
    assert_eq!(out.blocks[0].content["seconds_remaining"], 3600);
    assert_eq!(out.blocks[0].content["ends_on"], "Jun 1, 2026");
}

struct Panicky;

impl BlockRenderer for Panicky {
    fn block_type(&self) -> &'static str {
        "panicky"
    }
    fn render(&self, _props: &Value, _ctx: &RenderCtx<'_>) -> Result<Rendered> {
        panic!("renderer bug")
    }
}

struct Failing;

impl BlockRenderer for Failing {
    fn block_type(&self) -> &'static str {
        "failing"
    }
    fn render(&self, _props: &Value, _ctx: &RenderCtx<'_>) -> Result<Rendered> {
        Err(StorefrontError::Render {
            block_type: "failing".into(),
            reason: "backend down".into(),
        })
    }
}

#[test]
fn renderer_faults_are_isolated_per_slot() {
    let h = Harness::new();
    let mut builder = RegistryBuilder::new();
    builder
        .register(Arc::new(Panicky))
        .unwrap()
        .register(Arc::new(Failing))
        .unwrap()
        .register(Arc::new(StatsBlock::new()))
        .unwrap();
    let metrics = Arc::new(ComposerMetrics::default());
    let composer = h.composer(builder.build()).with_metrics(Arc::clone(&metrics));

    let out = composer.compose(
        &page(vec![
            ("panicky", json!({})),
            ("stats", json!({ "heading": "Still here" })),
            ("failing", json!({})),
            ("stats", json!({ "stats": "not a list" })),
        ]),
        &h.tenant("acme", None),
        &PolicyView::open(),
        now(),
    );

    assert_eq!(out.block_types(), vec!["stats"]);
    assert_eq!(metrics.blocks_skipped.get(&[("block_type", "panicky"), ("reason", "fault")]), 1);
    assert_eq!(metrics.blocks_skipped.get(&[("block_type", "failing"), ("reason", "fault")]), 1);
    assert_eq!(metrics.blocks_skipped.get(&[("block_type", "stats"), ("reason", "fault")]), 1);
    assert_eq!(metrics.blocks_rendered.get(&[("block_type", "stats")]), 1);
}
