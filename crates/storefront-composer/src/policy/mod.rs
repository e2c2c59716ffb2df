//! Governance layer (policy sources, cache, fail-open evaluation).
//!
//! Fetches tenant policy documents, caches them with a staleness window, and
//! exposes cheap fail-open predicates for the composer and blocks to consume
//! at render time.

pub mod gate;
pub mod source;
pub mod view;

pub use gate::{GateSettings, GovernanceGate, SlotState};
pub use source::{GovernanceSource, HttpGovernanceSource, StaticGovernanceSource};
pub use view::{PolicySnapshot, PolicyView};
