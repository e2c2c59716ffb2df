//! Governance document sources.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use storefront_core::error::{Result, StorefrontError};
use storefront_core::protocol::governance::GovernanceDocument;

use crate::config::StorefrontConfig;

/// Supplies `{ authorities, effective_policies }` for a tenant.
///
/// `Ok(None)` means the tenant has no document, which is a valid state.
#[async_trait]
pub trait GovernanceSource: Send + Sync {
    async fn fetch(&self, tenant_id: &str) -> Result<Option<GovernanceDocument>>;
}

/// Documents embedded in the config file, one per tenant.
#[derive(Debug, Default)]
pub struct StaticGovernanceSource {
    docs: HashMap<String, GovernanceDocument>,
}

impl StaticGovernanceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(cfg: &StorefrontConfig) -> Result<Self> {
        let mut docs = HashMap::new();
        for t in &cfg.tenants {
            if let Some(raw) = &t.governance {
                let doc: GovernanceDocument = serde_json::from_value(raw.clone()).map_err(|e| {
                    StorefrontError::BadRequest(format!(
                        "tenant {}: invalid governance document: {e}",
                        t.id
                    ))
                })?;
                docs.insert(t.id.clone(), doc);
            }
        }
        Ok(Self { docs })
    }

    pub fn insert(&mut self, tenant_id: impl Into<String>, doc: GovernanceDocument) {
        self.docs.insert(tenant_id.into(), doc);
    }
}

#[async_trait]
impl GovernanceSource for StaticGovernanceSource {
    async fn fetch(&self, tenant_id: &str) -> Result<Option<GovernanceDocument>> {
        Ok(self.docs.get(tenant_id).cloned())
    }
}

/// Remote governance service: `GET {endpoint}/tenants/{id}/governance`.
///
/// 404 maps to "no document"; every other non-success status is an error.
pub struct HttpGovernanceSource {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpGovernanceSource {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StorefrontError::Internal(format!("http client build failed: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, tenant_id: &str) -> String {
        format!("{}/tenants/{}/governance", self.endpoint, tenant_id)
    }
}

#[async_trait]
impl GovernanceSource for HttpGovernanceSource {
    async fn fetch(&self, tenant_id: &str) -> Result<Option<GovernanceDocument>> {
        let resp = self
            .client
            .get(self.url(tenant_id))
            .send()
            .await
            .map_err(|e| StorefrontError::Fetch(format!("governance request failed: {e}")))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(StorefrontError::Fetch(format!(
                "governance service returned {}",
                resp.status()
            )));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| StorefrontError::Fetch(format!("governance body read failed: {e}")))?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        GovernanceDocument::from_json(&body).map(Some)
    }
}
