//! Storefront composition engine.
//!
//! Wires tenant resolution, the governance gate, the block registry and the
//! page composer behind a small HTTP surface. Consumed by the binary
//! (`main.rs`) and by integration tests.

pub mod app_state;
pub mod blocks;
pub mod compose;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod i18n;
pub mod obs;
pub mod ops;
pub mod pages;
pub mod policy;
pub mod router;
pub mod transport;
