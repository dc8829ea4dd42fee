//! Textmint: Generate, Store and Verify Text
//!
//! A small pipeline that produces text payloads from a remote language-model
//! provider (falling back to a local pseudo-random generator), writes each
//! payload to its own file, and records a SHA-256 sidecar digest for it.

pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod integrity;
pub mod ledger;
pub mod logging;
pub mod pipeline;
pub mod provider;
pub mod store;
pub mod types;
