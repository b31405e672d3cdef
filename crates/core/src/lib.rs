//! Core library for the rembench remote benchmark runner
//!
//! This crate contains the lifecycle machinery for benchmark environments
//! hosted on remote machines: the status model, the phase-script registry,
//! host readiness gating, the two-step remote script runner, and the
//! lifecycle controller composing them. It also provides configuration
//! loading, logging, secret redaction, and a local executor implementation
//! of the capability contracts.

pub mod boot;
pub mod config;
pub mod environment;
pub mod errors;
pub mod exec;
pub mod local;
pub mod logging;
pub mod params;
pub mod redaction;
pub mod scripts;
pub mod services;
pub mod status;

/// Get the version of the core library
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
