//! Block dispatch: the registry and the renderer contract.
//!
//! Re-exports the registry and contract types so blocks and the composer can
//! depend on this module directly.

pub mod contract;
pub mod registry;

pub use contract::{
    decode_props, has_content, non_blank, select_variant, BlockRenderer, BlockVariant,
    RenderCtx, RenderOutput, Rendered,
};
pub use registry::{BlockRegistry, RegistryBuilder};
