//! Tenant/request context types shared across layers.
//!
//! The resolver turns routing/domain data into an immutable `TenantContext`
//! that is passed explicitly into the composer and every block renderer.

pub mod tenant;

pub use tenant::{TenantContext, TenantProfile, TenantRequest, TenantResolver};
