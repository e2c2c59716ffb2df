//! HTTP transport.
//!
//! JSON read endpoints for composed pages and effective governance policy.

pub mod http;

pub use http::ApiError;
