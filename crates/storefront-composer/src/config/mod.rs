//! Storefront config loader (strict parsing).

pub mod schema;

use std::fs;

use storefront_core::error::{Result, StorefrontError};

pub use schema::{
    Branding, GovernanceSection, GovernanceSourceConfig, LocaleSection, PageConfig,
    ServerSection, StorefrontConfig, TenantConfig,
};

pub fn load_from_file(path: &str) -> Result<StorefrontConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| StorefrontError::Internal(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<StorefrontConfig> {
    let cfg: StorefrontConfig = serde_yaml::from_str(s)
        .map_err(|e| StorefrontError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
