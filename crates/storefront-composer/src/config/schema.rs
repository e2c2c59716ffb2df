use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Deserialize;
use serde_json::Value;
use storefront_core::error::{Result, StorefrontError};
use storefront_core::locale::normalize_locale;
use storefront_core::protocol::page::BlockConfig;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorefrontConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub locale: LocaleSection,

    #[serde(default)]
    pub governance: GovernanceSection,

    #[serde(default)]
    pub tenants: Vec<TenantConfig>,

    #[serde(default)]
    pub pages: Vec<PageConfig>,

    /// locale -> key -> text
    #[serde(default)]
    pub translations: HashMap<String, HashMap<String, String>>,
}

impl StorefrontConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(StorefrontError::UnsupportedVersion);
        }
        if self.tenants.is_empty() {
            return Err(StorefrontError::BadRequest("tenants must not be empty".into()));
        }

        self.locale.validate()?;
        self.governance.validate()?;

        let mut ids = HashSet::new();
        let mut slugs = HashSet::new();
        for t in &self.tenants {
            t.validate()?;
            if !ids.insert(t.id.as_str()) {
                return Err(StorefrontError::BadRequest(format!(
                    "duplicate tenant id: {}",
                    t.id
                )));
            }
            if !slugs.insert(t.slug()) {
                return Err(StorefrontError::BadRequest(format!(
                    "duplicate tenant slug: {}",
                    t.slug()
                )));
            }
        }

        let mut routes = HashSet::new();
        for p in &self.pages {
            if !ids.contains(p.tenant.as_str()) {
                return Err(StorefrontError::BadRequest(format!(
                    "page {} references unknown tenant: {}",
                    p.route, p.tenant
                )));
            }
            if !p.route.starts_with('/') {
                return Err(StorefrontError::BadRequest(format!(
                    "page route must start with '/': {}",
                    p.route
                )));
            }
            if !routes.insert((p.tenant.as_str(), p.route.as_str())) {
                return Err(StorefrontError::BadRequest(format!(
                    "duplicate page: tenant={} route={}",
                    p.tenant, p.route
                )));
            }
        }

        Ok(())
    }

    pub fn tenant(&self, id: &str) -> Option<&TenantConfig> {
        self.tenants.iter().find(|t| t.id == id)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocaleSection {
    /// Global fallback locale (third tier of the locale chain).
    #[serde(default = "default_fallback_locale")]
    pub fallback: String,
}

impl Default for LocaleSection {
    fn default() -> Self {
        Self {
            fallback: default_fallback_locale(),
        }
    }
}

impl LocaleSection {
    pub fn validate(&self) -> Result<()> {
        if normalize_locale(&self.fallback).is_none() {
            return Err(StorefrontError::BadRequest(
                "locale.fallback must not be empty".into(),
            ));
        }
        Ok(())
    }
}

fn default_fallback_locale() -> String {
    "en".into()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GovernanceSection {
    /// Staleness window after which a cached policy is refreshed in the background.
    #[serde(default = "default_stale_after_ms")]
    pub stale_after_ms: u64,

    /// Minimum delay between retries after a failed fetch.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    #[serde(default)]
    pub source: GovernanceSourceConfig,
}

impl Default for GovernanceSection {
    fn default() -> Self {
        Self {
            stale_after_ms: default_stale_after_ms(),
            retry_backoff_ms: default_retry_backoff_ms(),
            source: GovernanceSourceConfig::default(),
        }
    }
}

impl GovernanceSection {
    pub fn validate(&self) -> Result<()> {
        if !(1_000..=3_600_000).contains(&self.stale_after_ms) {
            return Err(StorefrontError::BadRequest(
                "governance.stale_after_ms must be between 1000 and 3600000".into(),
            ));
        }
        if self.retry_backoff_ms > self.stale_after_ms {
            return Err(StorefrontError::BadRequest(
                "governance.retry_backoff_ms must not exceed stale_after_ms".into(),
            ));
        }
        if let GovernanceSourceConfig::Http { endpoint, timeout_ms } = &self.source {
            if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                return Err(StorefrontError::BadRequest(
                    "governance.source.endpoint must be an http(s) url".into(),
                ));
            }
            if !(100..=60_000).contains(timeout_ms) {
                return Err(StorefrontError::BadRequest(
                    "governance.source.timeout_ms must be between 100 and 60000".into(),
                ));
            }
        }
        Ok(())
    }
}

fn default_stale_after_ms() -> u64 {
    300_000
}
fn default_retry_backoff_ms() -> u64 {
    10_000
}

/// Where governance documents come from.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GovernanceSourceConfig {
    /// Per-tenant `governance` blocks in this file.
    #[default]
    Static,
    /// Remote governance service.
    Http {
        endpoint: String,
        #[serde(default = "default_http_timeout_ms")]
        timeout_ms: u64,
    },
}

fn default_http_timeout_ms() -> u64 {
    2_000
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TenantConfig {
    pub id: String,

    /// Route slug; defaults to `id`.
    #[serde(default)]
    pub slug: Option<String>,

    /// Host names served for this tenant.
    #[serde(default)]
    pub domains: Vec<String>,

    #[serde(default)]
    pub default_locale: Option<String>,

    #[serde(default)]
    pub supported_locales: Vec<String>,

    #[serde(default = "default_currency")]
    pub default_currency: String,

    #[serde(default)]
    pub branding: Branding,

    /// Governance document used by the static source (same shape as upstream).
    #[serde(default)]
    pub governance: Option<Value>,
}

impl TenantConfig {
    pub fn slug(&self) -> &str {
        self.slug.as_deref().unwrap_or(&self.id)
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(StorefrontError::BadRequest("tenant id must not be empty".into()));
        }
        if self.default_currency.len() != 3
            || !self.default_currency.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(StorefrontError::BadRequest(format!(
                "tenant {}: default_currency must be a 3-letter ISO code",
                self.id
            )));
        }

        let supported: HashSet<String> = self
            .supported_locales
            .iter()
            .filter_map(|l| normalize_locale(l))
            .collect();
        if let Some(def) = self.default_locale.as_deref() {
            let def = normalize_locale(def).ok_or_else(|| {
                StorefrontError::BadRequest(format!(
                    "tenant {}: default_locale must not be empty",
                    self.id
                ))
            })?;
            if !supported.is_empty() && !supported.contains(&def) {
                return Err(StorefrontError::BadRequest(format!(
                    "tenant {}: default_locale {def} is not in supported_locales",
                    self.id
                )));
            }
        }
        Ok(())
    }
}

fn default_currency() -> String {
    "USD".into()
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, serde::Serialize)]
#[serde(deny_unknown_fields)]
pub struct Branding {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub primary_color: Option<String>,
    /// Free-form theme tokens passed through to blocks.
    #[serde(default)]
    pub tokens: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageConfig {
    pub tenant: String,
    pub route: String,
    #[serde(default)]
    pub blocks: Vec<BlockConfig>,
}
