//! Page composition: resolve, gate, render-or-skip.

pub mod composer;

pub use composer::{ComposedPage, PageComposer};
