//! Error taxonomy for configuration resolution.
//!
//! Everything here is fail-fast: contradictory user input, malformed config
//! files and failing lifecycle hooks all abort the resolution pass. Nothing
//! is retried, and a failed pass does not roll back fields that earlier
//! phases already wrote to the store.

use crate::hooks::HookEvent;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised during a resolution pass.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Contradictory user input, e.g. `--file-list` with more than one
    /// analysis directory.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A config file could not be read.
    #[error("failed to read config file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A config file or inline fragment contained malformed YAML.
    /// Surfaced verbatim from the loader, never swallowed or retried.
    #[error("failed to parse {context}")]
    Parse {
        context: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// Config content parsed as YAML but does not fit the store schema
    /// (e.g. a string where a list is expected).
    #[error("config from {context} does not match the schema")]
    Schema {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A registered lifecycle listener failed. Hooks are trusted extensions;
    /// a failing hook indicates a genuinely broken one, so the error
    /// propagates to the caller of the resolution pass.
    #[error("lifecycle hook for {event} failed")]
    Hook {
        event: HookEvent,
        #[source]
        source: anyhow::Error,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ConfigError>;
