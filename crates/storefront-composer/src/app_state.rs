//! Shared application state.
//!
//! Built once at startup; every component is read-only afterwards except the
//! governance gate's cache.

use std::sync::Arc;
use std::time::Duration;

use storefront_core::error::Result;

use crate::blocks;
use crate::compose::PageComposer;
use crate::config::{GovernanceSourceConfig, StorefrontConfig};
use crate::context::TenantResolver;
use crate::dispatch::BlockRegistry;
use crate::i18n::{CatalogTranslator, LocaleFormatter};
use crate::obs::ComposerMetrics;
use crate::pages::{PageSource, StaticPageSource};
use crate::policy::{
    GateSettings, GovernanceGate, GovernanceSource, HttpGovernanceSource, StaticGovernanceSource,
};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: StorefrontConfig,
    resolver: TenantResolver,
    gate: GovernanceGate,
    composer: PageComposer,
    pages: Arc<dyn PageSource>,
    metrics: Arc<ComposerMetrics>,
}

impl AppState {
    /// Wire every component from config with the built-in block set.
    pub fn new(cfg: StorefrontConfig) -> Result<Self> {
        let registry = blocks::builtin_registry()?;
        Self::with_registry(cfg, registry)
    }

    /// Wire every component with a caller-provided registry.
    pub fn with_registry(cfg: StorefrontConfig, registry: BlockRegistry) -> Result<Self> {
        let metrics = Arc::new(ComposerMetrics::default());

        let source: Arc<dyn GovernanceSource> = match &cfg.governance.source {
            GovernanceSourceConfig::Static => Arc::new(StaticGovernanceSource::from_config(&cfg)?),
            GovernanceSourceConfig::Http {
                endpoint,
                timeout_ms,
            } => Arc::new(HttpGovernanceSource::new(
                endpoint.clone(),
                Duration::from_millis(*timeout_ms),
            )?),
        };
        let gate = GovernanceGate::with_metrics(
            source,
            GateSettings::from(&cfg.governance),
            Arc::clone(&metrics),
        );

        let pages = StaticPageSource::from_config(&cfg);
        warn_unregistered(&registry, &pages);

        let composer = PageComposer::new(
            Arc::new(registry),
            Arc::new(CatalogTranslator::new(&cfg.translations)),
            Arc::new(LocaleFormatter::new()),
        )
        .with_metrics(Arc::clone(&metrics));

        let resolver = TenantResolver::new(&cfg);
        tracing::info!(
            tenants = cfg.tenants.len(),
            pages = cfg.pages.len(),
            block_types = composer.registry().len(),
            "storefront state ready"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                resolver,
                gate,
                composer,
                pages: Arc::new(pages),
                metrics,
            }),
        })
    }

    pub fn cfg(&self) -> &StorefrontConfig {
        &self.inner.cfg
    }

    pub fn resolver(&self) -> &TenantResolver {
        &self.inner.resolver
    }

    pub fn gate(&self) -> &GovernanceGate {
        &self.inner.gate
    }

    pub fn composer(&self) -> &PageComposer {
        &self.inner.composer
    }

    pub fn pages(&self) -> Arc<dyn PageSource> {
        Arc::clone(&self.inner.pages)
    }

    pub fn metrics(&self) -> Arc<ComposerMetrics> {
        Arc::clone(&self.inner.metrics)
    }

    /// Extra gauges appended to `/metrics`.
    pub fn metrics_extra(&self) -> Vec<(&'static str, u64)> {
        vec![
            ("storefront_tenants", self.inner.cfg.tenants.len() as u64),
            (
                "storefront_block_types",
                self.inner.composer.registry().len() as u64,
            ),
        ]
    }

    /// Prefetch governance for every configured tenant, then report ready.
    pub async fn warm(&self) {
        let ids = self.inner.resolver.tenant_ids();
        self.inner.gate.warm(&ids).await;
        self.inner.metrics.set_ready();
        tracing::info!(tenants = ids.len(), "governance cache warmed");
    }
}

/// Pages naming unregistered types still render (those slots are skipped),
/// but the mismatch is worth surfacing at boot.
fn warn_unregistered(registry: &BlockRegistry, pages: &StaticPageSource) {
    for (tenant, page) in pages.iter() {
        for block in &page.blocks {
            if !registry.contains(&block.block_type) {
                tracing::warn!(
                    tenant=%tenant,
                    route=?page.route,
                    block_type=%block.block_type,
                    "page references unregistered block type"
                );
            }
        }
    }
}
