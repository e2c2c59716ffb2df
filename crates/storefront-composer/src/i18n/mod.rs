//! Translation and formatting collaborators.
//!
//! Both are consumed through traits so deployments can plug in their own
//! stores; the built-ins here are config-backed and dependency-light.

pub mod format;
pub mod translate;

pub use format::{Formatter, LocaleFormatter};
pub use translate::{CatalogTranslator, Translator};
