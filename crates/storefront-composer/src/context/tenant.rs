use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use serde::Serialize;
use storefront_core::error::{Result, StorefrontError};
use storefront_core::locale::{normalize_locale, realize_locale, Direction};

use crate::config::{Branding, StorefrontConfig, TenantConfig};

/// Static, per-tenant data compiled once from config.
#[derive(Debug, Clone)]
pub struct TenantProfile {
    pub tenant_id: String,
    pub slug: String,
    pub default_locale: Option<String>,
    pub supported_locales: BTreeSet<String>,
    pub default_currency: String,
    pub branding: Branding,
}

impl TenantProfile {
    fn from_config(t: &TenantConfig) -> Self {
        Self {
            tenant_id: t.id.clone(),
            slug: t.slug().to_string(),
            default_locale: t.default_locale.as_deref().and_then(normalize_locale),
            supported_locales: t
                .supported_locales
                .iter()
                .filter_map(|l| normalize_locale(l))
                .collect(),
            default_currency: t.default_currency.to_ascii_uppercase(),
            branding: t.branding.clone(),
        }
    }

    /// An empty supported set accepts any locale.
    pub fn supports(&self, locale: &str) -> bool {
        self.supported_locales.is_empty() || self.supported_locales.contains(locale)
    }
}

/// What the resolver needs to know about one incoming request.
#[derive(Debug, Clone, Default)]
pub struct TenantRequest {
    /// Tenant slug or id taken from the route/query.
    pub tenant: Option<String>,
    /// `Host` header value.
    pub host: Option<String>,
    /// Explicit `locale` request parameter.
    pub locale: Option<String>,
}

/// Per-request tenant read model. Never mutated after resolution.
#[derive(Debug, Clone, Serialize)]
pub struct TenantContext {
    pub tenant_id: String,
    pub slug: String,
    pub locale: String,
    pub direction: Direction,
    pub default_currency: String,
    pub supported_locales: BTreeSet<String>,
    pub branding: Branding,
    /// Global fallback locale (third tier).
    pub fallback_locale: String,
}

impl TenantContext {
    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    /// Realized locale for a consumer with an optional explicit override.
    pub fn locale_for<'a>(&'a self, explicit: Option<&'a str>) -> &'a str {
        realize_locale(explicit, Some(self.locale.as_str()), &self.fallback_locale)
    }

    /// Direction for a consumer with an optional explicit locale override.
    pub fn direction_for(&self, explicit: Option<&str>) -> Direction {
        Direction::for_locale(self.locale_for(explicit))
    }
}

/// Resolves a [`TenantContext`] per request from routing/domain data.
pub struct TenantResolver {
    profiles: HashMap<String, Arc<TenantProfile>>,
    by_slug: HashMap<String, String>,
    by_domain: HashMap<String, String>,
    fallback_locale: String,
}

impl TenantResolver {
    pub fn new(cfg: &StorefrontConfig) -> Self {
        let mut profiles = HashMap::new();
        let mut by_slug = HashMap::new();
        let mut by_domain = HashMap::new();

        for t in &cfg.tenants {
            let profile = TenantProfile::from_config(t);
            by_slug.insert(profile.slug.clone(), profile.tenant_id.clone());
            for d in &t.domains {
                by_domain.insert(normalize_host(d), profile.tenant_id.clone());
            }
            profiles.insert(profile.tenant_id.clone(), Arc::new(profile));
        }

        let fallback_locale =
            normalize_locale(&cfg.locale.fallback).unwrap_or_else(|| "en".to_string());

        Self {
            profiles,
            by_slug,
            by_domain,
            fallback_locale,
        }
    }

    pub fn profile(&self, tenant_id: &str) -> Option<Arc<TenantProfile>> {
        self.profiles.get(tenant_id).cloned()
    }

    pub fn tenant_ids(&self) -> Vec<String> {
        self.profiles.keys().cloned().collect()
    }

    pub fn fallback_locale(&self) -> &str {
        &self.fallback_locale
    }

    /// Tenant from explicit slug/id first, then from the host name.
    pub fn identify(&self, req: &TenantRequest) -> Result<Arc<TenantProfile>> {
        if let Some(key) = req.tenant.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let id = self.by_slug.get(key).map(String::as_str).unwrap_or(key);
            return self
                .profiles
                .get(id)
                .cloned()
                .ok_or_else(|| StorefrontError::UnknownTenant(key.to_string()));
        }

        if let Some(host) = req.host.as_deref() {
            let host = normalize_host(host);
            if let Some(id) = self.by_domain.get(&host) {
                if let Some(p) = self.profiles.get(id) {
                    return Ok(Arc::clone(p));
                }
            }
            return Err(StorefrontError::UnknownTenant(host));
        }

        Err(StorefrontError::UnknownTenant(String::new()))
    }

    pub fn resolve(&self, req: &TenantRequest) -> Result<TenantContext> {
        let profile = self.identify(req)?;

        // Unsupported explicit locales fall through to the tenant default.
        let requested = req
            .locale
            .as_deref()
            .and_then(normalize_locale)
            .filter(|l| profile.supports(l));
        if requested.is_none() && req.locale.is_some() {
            tracing::debug!(tenant=%profile.tenant_id, locale=?req.locale, "unsupported locale requested; using tenant default");
        }

        let locale = realize_locale(
            requested.as_deref(),
            profile.default_locale.as_deref(),
            &self.fallback_locale,
        )
        .to_string();

        Ok(TenantContext {
            tenant_id: profile.tenant_id.clone(),
            slug: profile.slug.clone(),
            direction: Direction::for_locale(&locale),
            locale,
            default_currency: profile.default_currency.clone(),
            supported_locales: profile.supported_locales.clone(),
            branding: profile.branding.clone(),
            fallback_locale: self.fallback_locale.clone(),
        })
    }
}

/// Lowercase host without port.
fn normalize_host(raw: &str) -> String {
    let raw = raw.trim();
    let host = match raw.rsplit_once(':') {
        Some((h, port)) if port.chars().all(|c| c.is_ascii_digit()) => h,
        _ => raw,
    };
    host.trim_end_matches('.').to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::normalize_host;

    #[test]
    fn host_normalization_strips_port_and_case() {
        assert_eq!(normalize_host("Shop.Acme.com:8443"), "shop.acme.com");
        assert_eq!(normalize_host("acme.com."), "acme.com");
        assert_eq!(normalize_host("acme.com"), "acme.com");
    }
}
