//! Logging setup for resolution passes.
//!
//! The subscriber is built from the store's verbosity fields, which is why
//! the engine applies `quiet`/`verbose`/`no_ansi` before anything else in a
//! pass. The first successful initialization installs the process-wide
//! subscriber; later passes keep the existing one (tracing allows a single
//! global default per process), so verbosity is effectively fixed by the
//! first pass of a long-lived process.

use crate::config::ConfigStore;
use std::fs::OpenOptions;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Filename used when logging to a file is requested.
const LOG_FILENAME: &str = "reportal.log";

/// Maximum level derived from the store's verbosity fields.
pub fn log_level(store: &ConfigStore) -> Level {
    if store.verbose {
        Level::DEBUG
    } else if store.quiet {
        Level::WARN
    } else {
        Level::INFO
    }
}

/// Initialize the tracing subscriber from the store's verbosity fields.
///
/// With `log_to_file`, output goes to `reportal.log` in the temp directory
/// (append mode, no ANSI); otherwise to stderr, honoring `no_ansi`.
pub fn init_log(store: &ConfigStore, log_to_file: bool) {
    let level = log_level(store);

    if log_to_file {
        let path = std::env::temp_dir().join(LOG_FILENAME);
        if let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(file)
                .with_ansi(false)
                .finish();
            let _ = tracing::subscriber::set_global_default(subscriber);
            return;
        }
        // Fall through to stderr if the log file cannot be opened.
    }

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_ansi(!store.no_ansi)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_fields_drive_the_level() {
        let mut store = ConfigStore::default();
        assert_eq!(log_level(&store), Level::INFO);

        store.quiet = true;
        assert_eq!(log_level(&store), Level::WARN);

        // Verbose wins over quiet when both are set.
        store.verbose = true;
        assert_eq!(log_level(&store), Level::DEBUG);
    }
}
