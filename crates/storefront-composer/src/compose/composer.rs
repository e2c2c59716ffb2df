use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use storefront_core::locale::Direction;
use storefront_core::protocol::page::{BlockConfig, PageDefinition};

use crate::context::TenantContext;
use crate::dispatch::{BlockRegistry, BlockRenderer, RenderCtx, RenderOutput, Rendered};
use crate::i18n::{Formatter, Translator};
use crate::obs::ComposerMetrics;
use crate::policy::PolicyView;

/// A composed page: rendered blocks in input order, skipped slots absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComposedPage {
    pub tenant_id: String,
    pub route: Option<String>,
    pub locale: String,
    pub dir: Direction,
    pub blocks: Vec<RenderOutput>,
}

impl ComposedPage {
    pub fn block_types(&self) -> Vec<&str> {
        self.blocks.iter().map(|b| b.block_type.as_str()).collect()
    }
}

/// Why a slot produced nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SkipReason {
    UnknownType,
    Governance,
    Empty,
    Fault,
}

impl SkipReason {
    fn as_str(self) -> &'static str {
        match self {
            SkipReason::UnknownType => "unknown_type",
            SkipReason::Governance => "governance",
            SkipReason::Empty => "empty",
            SkipReason::Fault => "fault",
        }
    }
}

/// Composes pages out of registered blocks.
///
/// Composition never fails: every per-slot problem turns into a skipped slot.
#[derive(Clone)]
pub struct PageComposer {
    registry: Arc<BlockRegistry>,
    i18n: Arc<dyn Translator>,
    fmt: Arc<dyn Formatter>,
    metrics: Option<Arc<ComposerMetrics>>,
}

impl PageComposer {
    pub fn new(
        registry: Arc<BlockRegistry>,
        i18n: Arc<dyn Translator>,
        fmt: Arc<dyn Formatter>,
    ) -> Self {
        Self {
            registry,
            i18n,
            fmt,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<ComposerMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    pub fn compose(
        &self,
        page: &PageDefinition,
        tenant: &TenantContext,
        policy: &PolicyView,
        now: DateTime<Utc>,
    ) -> ComposedPage {
        let started = Instant::now();
        let ctx = RenderCtx::new(tenant, policy, self.i18n.as_ref(), self.fmt.as_ref(), now);

        let blocks: Vec<RenderOutput> = page
            .blocks
            .iter()
            .filter_map(|block| self.compose_block(block, &ctx))
            .collect();

        if let Some(m) = &self.metrics {
            m.pages_composed.inc(&[("tenant", tenant.tenant_id())]);
            m.compose_duration
                .observe(&[("tenant", tenant.tenant_id())], started.elapsed());
        }
        tracing::debug!(
            tenant=%tenant.tenant_id(),
            route=?page.route,
            configured=page.blocks.len(),
            rendered=blocks.len(),
            "page composed"
        );

        ComposedPage {
            tenant_id: tenant.tenant_id.clone(),
            route: page.route.clone(),
            locale: tenant.locale.clone(),
            dir: tenant.direction,
            blocks,
        }
    }

    fn compose_block(&self, block: &BlockConfig, ctx: &RenderCtx<'_>) -> Option<RenderOutput> {
        let block_type = block.block_type.as_str();

        let Some(renderer) = self.registry.resolve(block_type) else {
            tracing::debug!(tenant=%ctx.tenant.tenant_id(), block_type=%block_type, "unknown block type; slot skipped");
            self.skipped(block_type, SkipReason::UnknownType);
            return None;
        };

        if !self.permitted(renderer.as_ref(), block, ctx.policy) {
            tracing::debug!(tenant=%ctx.tenant.tenant_id(), block_type=%block_type, "block denied by governance");
            self.skipped(block_type, SkipReason::Governance);
            return None;
        }

        let outcome = catch_unwind(AssertUnwindSafe(|| renderer.render(&block.props, ctx)));
        match outcome {
            Ok(Ok(Rendered::Block(mut out))) => {
                // Aliases report the id the page asked for.
                out.block_type = block_type.to_string();
                if let Some(m) = &self.metrics {
                    m.blocks_rendered.inc(&[("block_type", block_type)]);
                }
                Some(out)
            }
            Ok(Ok(Rendered::Skip)) => {
                self.skipped(block_type, SkipReason::Empty);
                None
            }
            Ok(Err(e)) => {
                tracing::warn!(tenant=%ctx.tenant.tenant_id(), block_type=%block_type, error=%e, "block render failed; slot skipped");
                self.skipped(block_type, SkipReason::Fault);
                None
            }
            Err(_) => {
                tracing::warn!(tenant=%ctx.tenant.tenant_id(), block_type=%block_type, "block renderer panicked; slot skipped");
                self.skipped(block_type, SkipReason::Fault);
                None
            }
        }
    }

    fn permitted(&self, renderer: &dyn BlockRenderer, block: &BlockConfig, policy: &PolicyView) -> bool {
        if let Some(feature) = renderer.required_feature() {
            if !policy.feature_allowed(feature) {
                return false;
            }
        }
        match block.prop_str("category") {
            Some(category) => policy.vertical_allowed(category),
            None => true,
        }
    }

    fn skipped(&self, block_type: &str, reason: SkipReason) {
        if let Some(m) = &self.metrics {
            m.blocks_skipped
                .inc(&[("block_type", block_type), ("reason", reason.as_str())]);
        }
    }
}
