//! Lightweight in-process metrics (no metrics crate).
//!
//! Metrics are stored as atomics and rendered by the `/metrics` handler.

pub mod metrics;

pub use metrics::ComposerMetrics;
