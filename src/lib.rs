//! devdigest — per-author daily development digests (library crate).
//!
//! Re-exports public modules for integration tests and external use.

pub mod aggregate;
pub mod annotate;
pub mod config;
pub mod constants;
pub mod digest;
pub mod env;
pub mod failures;
pub mod fetch;
pub mod logging;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod source;
pub mod store;
