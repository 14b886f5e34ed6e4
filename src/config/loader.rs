//! Source loader: turns config files and inline fragments into store state.
//!
//! Implicit files are discovered from fixed locations (home-directory
//! dotfile, an environment-variable path, the working directory, in that
//! order) and loaded in path order, so a later file wins over an earlier one
//! key by key. Explicit files and inline fragments reuse the same apply
//! path; their higher precedence comes purely from being applied later by
//! the resolution engine.
//!
//! All file I/O here is synchronous and sequential — later-file-wins
//! ordering is a correctness requirement, so loads are never parallelized.

use super::merge::deep_merge;
use super::store::ConfigStore;
use crate::error::{ConfigError, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming an extra implicit config file.
pub const CONFIG_PATH_ENV: &str = "REPORTAL_CONFIG_PATH";

/// Implicit config file in the user's home directory.
const HOME_CONFIG_FILENAME: &str = ".reportal_config.yaml";

/// Implicit config file in the working directory.
const CWD_CONFIG_FILENAME: &str = "reportal_config.yaml";

/// Candidate implicit config file locations, lowest precedence first.
pub fn implicit_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(HOME_CONFIG_FILENAME));
    }
    if let Ok(env_path) = std::env::var(CONFIG_PATH_ENV) {
        paths.push(PathBuf::from(env_path));
    }
    paths.push(PathBuf::from(CWD_CONFIG_FILENAME));
    paths
}

/// Discover and load every implicit config file that exists.
pub fn find_user_files(store: &mut ConfigStore) -> Result<()> {
    for path in implicit_config_paths() {
        if path.is_file() {
            load_config_file(store, &path, false)?;
        } else {
            debug!("no config file found at {}", path.display());
        }
    }
    Ok(())
}

/// Load one YAML config file onto the store.
///
/// Files already loaded during this pass are skipped, so overlapping
/// discovery and explicit lists do not double-apply. With `is_explicit` the
/// path is also pinned on the store and replayed by every later pass.
pub fn load_config_file(store: &mut ConfigStore, path: &Path, is_explicit: bool) -> Result<()> {
    if store.loaded_user_files.contains(path) {
        debug!("skipping already loaded config file {}", path.display());
        return Ok(());
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if content.trim().is_empty() {
        warn!("config file {} is empty", path.display());
    } else {
        let value: Value =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
                context: path.display().to_string(),
                source,
            })?;
        match value {
            Value::Object(map) => {
                apply_mapping(store, map, &path.display().to_string())?;
                info!("loaded config file {}", path.display());
            }
            _ => warn!(
                "config file {} does not contain a mapping, ignoring",
                path.display()
            ),
        }
    }

    store.loaded_user_files.insert(path.to_path_buf());
    if is_explicit {
        store.pin_config_file(path);
    }
    Ok(())
}

/// Apply inline `key: value` YAML fragments, in order.
pub fn load_inline_config(store: &mut ConfigStore, fragments: &[String]) -> Result<()> {
    for fragment in fragments {
        let value: Value =
            serde_yaml::from_str(fragment).map_err(|source| ConfigError::Parse {
                context: format!("inline config {fragment:?}"),
                source,
            })?;
        match value {
            Value::Object(map) => {
                debug!("applying inline config {:?}", fragment);
                apply_mapping(store, map, "inline config")?;
            }
            _ => warn!("inline config {:?} is not a `key: value` pair, ignoring", fragment),
        }
    }
    Ok(())
}

/// Fold a parsed YAML mapping onto the store.
///
/// The extra filename-cleaner lists extend (prepend) their store
/// counterparts; every other key goes through the deep merge, where unknown
/// keys fall into the store's kwargs bucket.
fn apply_mapping(
    store: &mut ConfigStore,
    mut overlay: serde_json::Map<String, Value>,
    context: &str,
) -> Result<()> {
    if let Some(Value::Array(extras)) = overlay.remove("extra_fn_clean_exts") {
        let mut exts = extras;
        exts.extend(store.fn_clean_exts.drain(..));
        store.fn_clean_exts = exts;
    }
    if let Some(Value::Array(extras)) = overlay.remove("extra_fn_clean_trim") {
        let mut trims: Vec<String> = extras
            .into_iter()
            .filter_map(|v| v.as_str().map(String::from))
            .collect();
        trims.extend(store.fn_clean_trim.drain(..));
        store.fn_clean_trim = trims;
    }

    let base = serde_json::to_value(&*store).map_err(|source| ConfigError::Schema {
        context: context.to_string(),
        source,
    })?;
    let merged = deep_merge(base, Value::Object(overlay));
    let mut next: ConfigStore =
        serde_json::from_value(merged).map_err(|source| ConfigError::Schema {
            context: context.to_string(),
            source,
        })?;

    // Bookkeeping fields are not serialized; carry them across the merge.
    next.loaded_user_files = std::mem::take(&mut store.loaded_user_files);
    next.top_modules_resolved = std::mem::take(&mut store.top_modules_resolved);
    next.module_order_resolved = std::mem::take(&mut store.module_order_resolved);
    *store = next;
    Ok(())
}

/// Load a tab-separated sample-name replacement table.
///
/// Each line holds a search string and its replacement.
pub fn load_replace_names(store: &mut ConfigStore, path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut count = 0usize;
    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let mut cols = line.split('\t');
        match (cols.next(), cols.next()) {
            (Some(from), Some(to)) => {
                store
                    .sample_names_replace
                    .insert(from.to_string(), to.to_string());
                count += 1;
            }
            _ => warn!(
                "sample replacement line has fewer than two columns: {:?}",
                line
            ),
        }
    }
    info!("loaded {} sample name replacements from {}", count, path.display());
    Ok(())
}

/// Load a tab-separated sample-renaming table.
///
/// The first row names the rename buttons; each following row carries one
/// name per button. Rows with a different column count are dropped.
pub fn load_sample_names(store: &mut ConfigStore, path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut lines = content.lines().filter(|l| !l.trim().is_empty());

    let Some(header) = lines.next() else {
        warn!("sample names file {} is empty", path.display());
        return Ok(());
    };
    let buttons: Vec<String> = header.split('\t').map(String::from).collect();
    if buttons.len() < 2 {
        warn!(
            "sample names file {} needs at least two columns, ignoring",
            path.display()
        );
        return Ok(());
    }

    let mut rows = Vec::new();
    for line in lines {
        let row: Vec<String> = line.split('\t').map(String::from).collect();
        if row.len() == buttons.len() {
            rows.push(row);
        } else {
            warn!(
                "sample names row has {} columns, expected {}: {:?}",
                row.len(),
                buttons.len(),
                line
            );
        }
    }

    info!(
        "loaded {} sample renaming rows ({} buttons) from {}",
        rows.len(),
        buttons.len(),
        path.display()
    );
    store.sample_names_rename_buttons = buttons;
    store.sample_names_rename = rows;
    Ok(())
}

/// Load a tab-separated show/hide filter table, if a path was given.
///
/// Columns: button label, mode (`show`, `hide`, `show_re`, `hide_re`), then
/// one or more patterns. Absence of a file is a no-op rather than a reset:
/// the store sections only change when a file is actually present.
pub fn load_show_hide(store: &mut ConfigStore, path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let cols: Vec<&str> = line.split('\t').collect();
        if cols.len() < 3 {
            warn!("show/hide line has fewer than three columns: {:?}", line);
            continue;
        }
        let mode = cols[1];
        if !matches!(mode, "show" | "hide" | "show_re" | "hide_re") {
            warn!("show/hide line has unknown mode {:?}: {:?}", mode, line);
            continue;
        }
        store.show_hide_buttons.push(cols[0].to_string());
        store.show_hide_mode.push(mode.to_string());
        store.show_hide_regex.push(mode.ends_with("_re"));
        store.show_hide_patterns.push(Value::Array(
            cols[2..]
                .iter()
                .map(|p| Value::String((*p).to_string()))
                .collect(),
        ));
    }

    info!(
        "loaded {} show/hide filter groups from {}",
        store.show_hide_buttons.len(),
        path.display()
    );
    Ok(())
}
