//! Read-side of the governance gate: snapshots and fail-open predicates.

use std::sync::Arc;

use serde::Serialize;
use storefront_core::protocol::governance::{
    GovernanceAuthority, GovernanceDocument, GovernancePolicy,
};

/// Effective policy plus the authorities that contributed to it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PolicySnapshot {
    pub policy: GovernancePolicy,
    /// Audit/display only; never consulted for gating.
    pub authorities: Vec<GovernanceAuthority>,
}

impl PolicySnapshot {
    pub fn from_document(doc: &GovernanceDocument) -> Self {
        Self {
            policy: doc
                .effective_policies
                .as_ref()
                .map(GovernancePolicy::from_effective)
                .unwrap_or_default(),
            authorities: doc.authorities.clone(),
        }
    }
}

/// What a render pass sees of a tenant's policy.
///
/// `None` covers every "don't know" state (unloaded, loading, failed, no
/// document) and allows everything.
#[derive(Debug, Clone, Default)]
pub struct PolicyView {
    snapshot: Option<Arc<PolicySnapshot>>,
}

impl PolicyView {
    pub fn new(snapshot: Option<Arc<PolicySnapshot>>) -> Self {
        Self { snapshot }
    }

    /// View with no policy at all.
    pub fn open() -> Self {
        Self { snapshot: None }
    }

    pub fn snapshot(&self) -> Option<&PolicySnapshot> {
        self.snapshot.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Case-insensitive; `false` only for an explicitly prohibited vertical.
    pub fn vertical_allowed(&self, category: &str) -> bool {
        match &self.snapshot {
            Some(s) => s.policy.vertical_allowed(category),
            None => true,
        }
    }

    /// `false` only on an explicit `false` entry.
    pub fn feature_allowed(&self, feature: &str) -> bool {
        match &self.snapshot {
            Some(s) => s.policy.feature_allowed(feature),
            None => true,
        }
    }
}

impl From<Option<Arc<PolicySnapshot>>> for PolicyView {
    fn from(snapshot: Option<Arc<PolicySnapshot>>) -> Self {
        Self::new(snapshot)
    }
}
