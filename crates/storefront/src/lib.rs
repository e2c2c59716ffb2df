//! Top-level facade crate for the storefront composition engine.
//!
//! Re-exports core types and the composer library so users can depend on a single crate.

pub mod core {
    pub use storefront_core::*;
}

pub mod composer {
    pub use storefront_composer::*;
}
