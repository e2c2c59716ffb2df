//! Protocol modules (page definitions + governance documents).
//!
//! This module hosts the two documents the composer consumes from upstream
//! services:
//! - Page lane: ordered block configurations with untyped `props`.
//! - Governance lane: per-tenant policy documents with authority metadata.
//!
//! Both are lenient by construction: absent or partial fields decode to
//! "no content" / "no restriction" rather than failing the whole document.

pub mod governance;
pub mod page;
