//! Governance gate: per-tenant fetch, cache, and stale-while-revalidate.
//!
//! Slot lifecycle per tenant id:
//! `Unloaded -> Loading -> Ready`, and `Ready -> Refreshing -> Ready` once the
//! staleness window has elapsed. `Refreshing` keeps serving the last `Ready`
//! value. A failed fetch leaves the slot as it was (fail-open when nothing was
//! ever loaded) and is retried after `retry_backoff`.
//!
//! All concurrent callers for one tenant share a single in-flight fetch. Slot
//! writes happen under the map's per-key entry lock, so they are atomic per
//! tenant id. Fetches run on spawned tasks and are never awaited by a render.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use futures_util::future::{join_all, BoxFuture, FutureExt, Shared};
use tokio::runtime::Handle;
use tokio::time::Instant;

use crate::config::GovernanceSection;
use crate::obs::ComposerMetrics;

use super::source::GovernanceSource;
use super::view::{PolicySnapshot, PolicyView};

type InFlight = Shared<BoxFuture<'static, ()>>;

/// Timing knobs for the gate.
#[derive(Debug, Clone, Copy)]
pub struct GateSettings {
    pub stale_after: Duration,
    pub retry_backoff: Duration,
}

impl Default for GateSettings {
    fn default() -> Self {
        Self {
            stale_after: Duration::from_secs(300),
            retry_backoff: Duration::from_secs(10),
        }
    }
}

impl From<&GovernanceSection> for GateSettings {
    fn from(s: &GovernanceSection) -> Self {
        Self {
            stale_after: Duration::from_millis(s.stale_after_ms),
            retry_backoff: Duration::from_millis(s.retry_backoff_ms),
        }
    }
}

/// Observable state of one tenant's slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Unloaded,
    Loading,
    Ready,
    /// `Ready` value still served while a refresh is in flight.
    Refreshing,
}

impl SlotState {
    pub fn as_str(self) -> &'static str {
        match self {
            SlotState::Unloaded => "unloaded",
            SlotState::Loading => "loading",
            SlotState::Ready => "ready",
            SlotState::Refreshing => "refreshing",
        }
    }
}

#[derive(Default)]
struct Slot {
    /// `None` with `fetched_at` set means "tenant has no document".
    current: Option<Arc<PolicySnapshot>>,
    fetched_at: Option<Instant>,
    failed_at: Option<Instant>,
    inflight: Option<InFlight>,
    generation: u64,
}

impl Slot {
    fn state(&self) -> SlotState {
        match (self.fetched_at.is_some(), self.inflight.is_some()) {
            (false, false) => SlotState::Unloaded,
            (false, true) => SlotState::Loading,
            (true, false) => SlotState::Ready,
            (true, true) => SlotState::Refreshing,
        }
    }

    fn needs_fetch(&self, now: Instant, settings: &GateSettings) -> bool {
        if self.inflight.is_some() {
            return false;
        }
        if let Some(failed) = self.failed_at {
            if now < failed + settings.retry_backoff {
                return false;
            }
        }
        match self.fetched_at {
            None => true,
            Some(at) => now >= at + settings.stale_after,
        }
    }
}

struct GateInner {
    source: Arc<dyn GovernanceSource>,
    settings: GateSettings,
    slots: DashMap<String, Slot>,
    metrics: Option<Arc<ComposerMetrics>>,
}

impl GateInner {
    /// Create the shared fetch future and park a clone in the slot.
    fn start_fetch(self: &Arc<Self>, tenant_id: &str, slot: &mut Slot) -> InFlight {
        let inner = Arc::clone(self);
        let tenant = tenant_id.to_string();
        let generation = slot.generation;
        let fut = async move { inner.run_fetch(tenant, generation).await }
            .boxed()
            .shared();
        slot.inflight = Some(fut.clone());
        fut
    }

    async fn run_fetch(&self, tenant: String, generation: u64) {
        let res = self.source.fetch(&tenant).await;
        let now = Instant::now();

        let Some(mut slot) = self.slots.get_mut(&tenant) else {
            return;
        };
        if slot.generation != generation {
            tracing::debug!(tenant=%tenant, "governance fetch superseded; result discarded");
            self.count("discarded");
            return;
        }
        slot.inflight = None;

        match res {
            Ok(doc) => {
                self.count(if doc.is_some() { "ok" } else { "missing" });
                slot.current = doc
                    .as_ref()
                    .map(|d| Arc::new(PolicySnapshot::from_document(d)));
                slot.fetched_at = Some(now);
                slot.failed_at = None;
                tracing::debug!(tenant=%tenant, has_policy=%slot.current.is_some(), "governance policy refreshed");
            }
            Err(e) => {
                self.count("error");
                slot.failed_at = Some(now);
                tracing::warn!(tenant=%tenant, error=%e, "governance fetch failed; failing open");
            }
        }
    }

    fn count(&self, outcome: &str) {
        if let Some(m) = &self.metrics {
            m.policy_fetches.inc(&[("outcome", outcome)]);
        }
    }
}

/// Fetches, caches and evaluates per-tenant governance policies.
#[derive(Clone)]
pub struct GovernanceGate {
    inner: Arc<GateInner>,
}

impl GovernanceGate {
    pub fn new(source: Arc<dyn GovernanceSource>, settings: GateSettings) -> Self {
        Self {
            inner: Arc::new(GateInner {
                source,
                settings,
                slots: DashMap::new(),
                metrics: None,
            }),
        }
    }

    pub fn with_metrics(
        source: Arc<dyn GovernanceSource>,
        settings: GateSettings,
        metrics: Arc<ComposerMetrics>,
    ) -> Self {
        Self {
            inner: Arc::new(GateInner {
                source,
                settings,
                slots: DashMap::new(),
                metrics: Some(metrics),
            }),
        }
    }

    pub fn settings(&self) -> GateSettings {
        self.inner.settings
    }

    /// Non-blocking read for a render pass.
    ///
    /// Returns the last known policy (or an open view) and, when the slot is
    /// unloaded or stale, starts a background refresh. Without a tokio runtime
    /// no refresh is started.
    pub fn policy(&self, tenant_id: &str) -> PolicyView {
        let handle = Handle::try_current().ok();
        let now = Instant::now();

        let (view, spawn) = {
            let mut slot = self.inner.slots.entry(tenant_id.to_string()).or_default();
            let spawn = match &handle {
                Some(_) if slot.needs_fetch(now, &self.inner.settings) => {
                    Some(self.inner.start_fetch(tenant_id, &mut slot))
                }
                _ => None,
            };
            (PolicyView::new(slot.current.clone()), spawn)
        };

        if let (Some(h), Some(fut)) = (handle, spawn) {
            h.spawn(fut);
        }
        view
    }

    /// Effective policy for a tenant.
    ///
    /// Fresh `Ready` returns the cached value; stale `Ready` returns the cached
    /// value and refreshes in the background; otherwise joins (or starts) the
    /// in-flight fetch and waits for it. `None` means "no restrictions".
    pub async fn fetch_policy(&self, tenant_id: &str) -> Option<Arc<PolicySnapshot>> {
        let now = Instant::now();

        let (spawn, wait) = {
            let mut slot = self.inner.slots.entry(tenant_id.to_string()).or_default();
            let spawn = if slot.needs_fetch(now, &self.inner.settings) {
                Some(self.inner.start_fetch(tenant_id, &mut slot))
            } else {
                None
            };
            let wait = if slot.fetched_at.is_some() {
                None
            } else {
                slot.inflight.clone()
            };
            (spawn, wait)
        };

        if let Some(fut) = spawn {
            tokio::spawn(fut);
        }
        if let Some(fut) = wait {
            fut.await;
        }
        self.current(tenant_id)
    }

    /// Prefetch several tenants concurrently (startup warm-up).
    pub async fn warm(&self, tenant_ids: &[String]) {
        join_all(tenant_ids.iter().map(|id| self.fetch_policy(id))).await;
    }

    /// Drop a tenant's cached policy. An in-flight fetch for the old
    /// generation is ignored when it resolves.
    pub fn invalidate(&self, tenant_id: &str) {
        if let Some(mut slot) = self.inner.slots.get_mut(tenant_id) {
            slot.generation += 1;
            slot.current = None;
            slot.fetched_at = None;
            slot.failed_at = None;
            slot.inflight = None;
        }
    }

    /// Last known snapshot without triggering any fetch.
    pub fn current(&self, tenant_id: &str) -> Option<Arc<PolicySnapshot>> {
        self.inner
            .slots
            .get(tenant_id)
            .and_then(|s| s.current.clone())
    }

    pub fn state(&self, tenant_id: &str) -> SlotState {
        self.inner
            .slots
            .get(tenant_id)
            .map(|s| s.state())
            .unwrap_or(SlotState::Unloaded)
    }
}
