//! Reportal CLI
//!
//! Parses command-line flags into an override record, runs one resolution
//! pass, and optionally dumps the effective configuration.

use anyhow::Result;
use clap::Parser;
use reportal::cli::Cli;
use reportal::config::{self, ConfigStore, ResolveOptions};
use reportal::hooks::HookRegistry;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let (session, analysis_dir) = cli.to_session();

    let mut store = ConfigStore::new();
    let mut hooks = HookRegistry::new();

    config::resolve(
        &mut store,
        &mut hooks,
        &session,
        &analysis_dir,
        ResolveOptions {
            log_to_file: cli.log_to_file,
            print_intro: Some(Box::new(|| {
                eprintln!("reportal v{}", env!("CARGO_PKG_VERSION"));
            })),
        },
    )?;

    if session.check_config == Some(true) {
        print!("{}", serde_yaml::to_string(&store)?);
        return Ok(());
    }

    // Report generation consumes the resolved store from here.
    tracing::info!(
        "configuration resolved for {} analysis path(s)",
        store.analysis_dir.len()
    );
    Ok(())
}
