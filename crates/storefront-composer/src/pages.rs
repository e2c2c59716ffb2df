//! Page definition sources.

use std::collections::HashMap;

use async_trait::async_trait;
use storefront_core::error::Result;
use storefront_core::protocol::page::PageDefinition;

use crate::config::StorefrontConfig;

/// Supplies the ordered block list for a tenant route.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn page(&self, tenant_id: &str, route: &str) -> Result<Option<PageDefinition>>;
}

/// Pages from the `pages` config section, keyed by `(tenant, route)`.
#[derive(Debug, Default)]
pub struct StaticPageSource {
    pages: HashMap<(String, String), PageDefinition>,
}

impl StaticPageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(cfg: &StorefrontConfig) -> Self {
        let mut src = Self::new();
        for p in &cfg.pages {
            let mut page = PageDefinition::new(p.blocks.clone());
            page.route = Some(p.route.clone());
            src.insert(&p.tenant, &p.route, page);
        }
        src
    }

    pub fn insert(&mut self, tenant_id: &str, route: &str, page: PageDefinition) {
        self.pages
            .insert((tenant_id.to_string(), normalize_route(route)), page);
    }

    /// Every configured page with its tenant id.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PageDefinition)> {
        self.pages.iter().map(|((t, _), p)| (t.as_str(), p))
    }
}

#[async_trait]
impl PageSource for StaticPageSource {
    async fn page(&self, tenant_id: &str, route: &str) -> Result<Option<PageDefinition>> {
        Ok(self
            .pages
            .get(&(tenant_id.to_string(), normalize_route(route)))
            .cloned())
    }
}

/// `""` and `"/about/"` map to `"/"` and `"/about"`.
fn normalize_route(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}
