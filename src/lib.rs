//! Reportal configuration core
//!
//! Layered configuration resolution for the report generator: ranked
//! sources (defaults, discovered files, explicit files, inline overrides,
//! a programmatic override record) are folded into one effective
//! configuration store, with lifecycle checkpoints for plugins.

pub mod cli;
pub mod config;
pub mod error;
pub mod hooks;
pub mod logging;
