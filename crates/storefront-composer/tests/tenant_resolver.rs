#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use storefront_composer::config;
use storefront_composer::context::{TenantRequest, TenantResolver};
use storefront_core::locale::Direction;

const CONFIG: &str = r##"
version: 1
tenants:
  - id: "acme"
    slug: "acme-shop"
    domains: ["shop.acme.test", "ACME.example"]
    default_locale: "en-us"
    supported_locales: ["en_US", "de", "ar-EG"]
    default_currency: "usd"
    branding: { name: "Acme", primary_color: "#ff6600" }
  - id: "souq"
    default_locale: "ar"
    default_currency: "SAR"
"##;

fn resolver() -> TenantResolver {
    TenantResolver::new(&config::load_from_str(CONFIG).unwrap())
}

fn req(tenant: Option<&str>, host: Option<&str>, locale: Option<&str>) -> TenantRequest {
    TenantRequest {
        tenant: tenant.map(str::to_string),
        host: host.map(str::to_string),
        locale: locale.map(str::to_string),
    }
}

#[test]
fn resolves_by_slug_id_and_host() {
    let r = resolver();
    assert_eq!(r.resolve(&req(Some("acme-shop"), None, None)).unwrap().tenant_id, "acme");
    assert_eq!(r.resolve(&req(Some("acme"), None, None)).unwrap().tenant_id, "acme");
    assert_eq!(
        r.resolve(&req(None, Some("shop.acme.test:8080"), None)).unwrap().tenant_id,
        "acme"
    );
    assert_eq!(
        r.resolve(&req(None, Some("acme.EXAMPLE"), None)).unwrap().tenant_id,
        "acme"
    );
}

#[test]
fn explicit_tenant_wins_over_host() {
    let r = resolver();
    let ctx = r
        .resolve(&req(Some("souq"), Some("shop.acme.test"), None))
        .unwrap();
    assert_eq!(ctx.tenant_id, "souq");
}

#[test]
fn unknown_tenant_is_an_error() {
    let r = resolver();
    for request in [
        req(Some("nope"), None, None),
        req(None, Some("unknown.test"), None),
        req(None, None, None),
    ] {
        let err = r.resolve(&request).expect_err("must fail");
        assert_eq!(err.client_code().as_str(), "UNKNOWN_TENANT");
    }
}

#[test]
fn context_carries_normalized_tenant_data() {
    let ctx = resolver().resolve(&req(Some("acme"), None, None)).unwrap();
    assert_eq!(ctx.slug, "acme-shop");
    assert_eq!(ctx.locale, "en-US");
    assert_eq!(ctx.direction, Direction::Ltr);
    assert_eq!(ctx.default_currency, "USD");
    assert_eq!(ctx.branding.name.as_deref(), Some("Acme"));
    assert!(ctx.supported_locales.contains("ar-EG"));
}

#[test]
fn requested_locale_is_used_only_when_supported() {
    let r = resolver();
    let ctx = r.resolve(&req(Some("acme"), None, Some("ar_eg"))).unwrap();
    assert_eq!(ctx.locale, "ar-EG");
    assert_eq!(ctx.direction, Direction::Rtl);

    let ctx = r.resolve(&req(Some("acme"), None, Some("fr"))).unwrap();
    assert_eq!(ctx.locale, "en-US");

    // no supported set: anything goes
    let ctx = r.resolve(&req(Some("souq"), None, Some("fr"))).unwrap();
    assert_eq!(ctx.locale, "fr");
    let ctx = r.resolve(&req(Some("souq"), None, None)).unwrap();
    assert_eq!(ctx.direction, Direction::Rtl);
}

#[test]
fn locale_for_prefers_explicit_block_locale() {
    let ctx = resolver().resolve(&req(Some("acme"), None, None)).unwrap();
    assert_eq!(ctx.locale_for(Some("de")), "de");
    assert_eq!(ctx.locale_for(None), "en-US");
    assert_eq!(ctx.direction_for(Some("ar")), Direction::Rtl);
}
