//! Storefront core: transport-agnostic page/governance wire types, locale
//! primitives, and the shared error type.
//!
//! This crate defines the data contracts shared by the composer, block
//! implementations, and tooling. It intentionally carries no HTTP or runtime
//! dependencies so it can be reused by authoring tools and tests.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Malformed page or governance documents surface as `StorefrontError` or
//! degrade to documented defaults; they never crash a render.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod locale;
pub mod protocol;

/// Shared result type.
pub use error::{Result, StorefrontError};
