//! Shared error type across storefront crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed request or configuration.
    BadRequest,
    /// Tenant could not be resolved from the request.
    UnknownTenant,
    /// No page is configured for the requested route.
    NotFound,
    /// Block props did not match the block's schema.
    InvalidProps,
    /// A block renderer failed.
    RenderFailed,
    /// An upstream collaborator (governance source, page source) failed.
    Upstream,
    /// Unsupported config or document version.
    UnsupportedVersion,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::UnknownTenant => "UNKNOWN_TENANT",
            ClientCode::NotFound => "NOT_FOUND",
            ClientCode::InvalidProps => "INVALID_PROPS",
            ClientCode::RenderFailed => "RENDER_FAILED",
            ClientCode::Upstream => "UPSTREAM",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, StorefrontError>;

/// Unified error type used by core and composer.
#[derive(Debug, Error)]
pub enum StorefrontError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("block type registered twice: {0}")]
    DuplicateBlockType(String),
    #[error("unknown tenant: {0}")]
    UnknownTenant(String),
    #[error("no page for tenant={tenant} route={route}")]
    PageNotFound { tenant: String, route: String },
    #[error("invalid props for block {block_type}: {reason}")]
    InvalidProps { block_type: String, reason: String },
    #[error("render failed for block {block_type}: {reason}")]
    Render { block_type: String, reason: String },
    #[error("upstream fetch failed: {0}")]
    Fetch(String),
    #[error("unsupported version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl StorefrontError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            StorefrontError::BadRequest(_) => ClientCode::BadRequest,
            StorefrontError::DuplicateBlockType(_) => ClientCode::BadRequest,
            StorefrontError::UnknownTenant(_) => ClientCode::UnknownTenant,
            StorefrontError::PageNotFound { .. } => ClientCode::NotFound,
            StorefrontError::InvalidProps { .. } => ClientCode::InvalidProps,
            StorefrontError::Render { .. } => ClientCode::RenderFailed,
            StorefrontError::Fetch(_) => ClientCode::Upstream,
            StorefrontError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            StorefrontError::Internal(_) => ClientCode::Internal,
        }
    }

    /// Shorthand used by block renderers when props fail to decode.
    pub fn invalid_props(block_type: &str, reason: impl std::fmt::Display) -> Self {
        StorefrontError::InvalidProps {
            block_type: block_type.to_string(),
            reason: reason.to_string(),
        }
    }
}
