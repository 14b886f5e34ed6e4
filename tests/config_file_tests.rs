//! File-based source precedence: discovered and explicit files, inline
//! fragments, and the passthrough of unknown keys.

use reportal::config::{
    ConfigStore, ResolveOptions, SessionConfig, load_config_file, resolve,
};
use reportal::hooks::HookRegistry;
use serde_json::json;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_config(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn run(store: &mut ConfigStore, session: &SessionConfig) {
    let mut hooks = HookRegistry::new();
    resolve(store, &mut hooks, session, &[], ResolveOptions::default()).unwrap();
}

#[test]
fn later_session_file_wins_over_earlier() {
    let temp = TempDir::new().unwrap();
    let first = write_config(temp.path(), "first.yaml", "title: First\nforce: true\n");
    let second = write_config(temp.path(), "second.yaml", "title: Second\n");

    let mut store = ConfigStore::new();
    let session = SessionConfig {
        config_files: vec![first, second],
        ..SessionConfig::default()
    };
    run(&mut store, &session);

    // Key-by-key: second file wins on title, first still contributes force.
    assert_eq!(store.title.as_deref(), Some("Second"));
    assert!(store.force);
}

#[test]
fn session_files_outrank_pinned_files() {
    let temp = TempDir::new().unwrap();
    let pinned = write_config(temp.path(), "pinned.yaml", "template: gathered\n");
    let session_file = write_config(temp.path(), "session.yaml", "template: overridden\n");

    let mut store = ConfigStore::new();
    store.pin_config_file(pinned);

    let session = SessionConfig {
        config_files: vec![session_file],
        ..SessionConfig::default()
    };
    run(&mut store, &session);
    assert_eq!(store.template, "overridden");
}

#[test]
fn inline_config_outranks_files() {
    let temp = TempDir::new().unwrap();
    let file = write_config(temp.path(), "cfg.yaml", "data_format: json\nquiet: true\n");

    let mut store = ConfigStore::new();
    let session = SessionConfig {
        config_files: vec![file],
        cl_config: vec!["data_format: tsv".to_string()],
        ..SessionConfig::default()
    };
    run(&mut store, &session);

    assert_eq!(store.data_format, "tsv");
    assert!(store.quiet);
}

#[test]
fn session_fields_outrank_inline_config() {
    let mut store = ConfigStore::new();
    let session = SessionConfig {
        cl_config: vec!["title: Inline".to_string()],
        title: Some("Session".to_string()),
        ..SessionConfig::default()
    };
    run(&mut store, &session);
    assert_eq!(store.title.as_deref(), Some("Session"));
}

#[test]
fn pinned_files_are_replayed_every_pass() {
    let temp = TempDir::new().unwrap();
    let pinned = write_config(temp.path(), "pinned.yaml", "require_logs: true\n");

    let mut store = ConfigStore::new();
    store.pin_config_file(&pinned);

    run(&mut store, &SessionConfig::default());
    assert!(store.require_logs);

    // Reset at the start of the next pass wipes the value, the replay
    // restores it.
    run(&mut store, &SessionConfig::default());
    assert!(store.require_logs);
    assert_eq!(store.explicit_user_config_files, vec![pinned]);
}

#[test]
fn explicit_load_pins_the_file() {
    let temp = TempDir::new().unwrap();
    let path = write_config(temp.path(), "cfg.yaml", "strict: true\n");

    let mut store = ConfigStore::new();
    load_config_file(&mut store, &path, true).unwrap();

    assert!(store.strict);
    assert_eq!(store.explicit_user_config_files, vec![path]);
}

#[test]
fn a_file_is_loaded_once_per_pass() {
    let temp = TempDir::new().unwrap();
    let path = write_config(
        temp.path(),
        "cfg.yaml",
        "extra_fn_clean_exts: ['_dedup']\n",
    );

    let mut store = ConfigStore::new();
    store.pin_config_file(&path);

    // Also listed as a session file; the duplicate must not prepend twice.
    let session = SessionConfig {
        config_files: vec![path],
        ..SessionConfig::default()
    };
    run(&mut store, &session);

    let dedups = store
        .fn_clean_exts
        .iter()
        .filter(|v| **v == json!("_dedup"))
        .count();
    assert_eq!(dedups, 1);
}

#[test]
fn unknown_file_keys_land_in_kwargs() {
    let temp = TempDir::new().unwrap();
    let path = write_config(
        temp.path(),
        "cfg.yaml",
        "title: Known\nmy_plugin_setting:\n  depth: 7\n",
    );

    let mut store = ConfigStore::new();
    let session = SessionConfig {
        config_files: vec![path],
        ..SessionConfig::default()
    };
    run(&mut store, &session);

    assert_eq!(store.title.as_deref(), Some("Known"));
    assert_eq!(
        store.kwargs.get("my_plugin_setting"),
        Some(&json!({"depth": 7}))
    );
}

#[test]
fn file_extra_fn_clean_exts_prepend_to_defaults() {
    let temp = TempDir::new().unwrap();
    let path = write_config(
        temp.path(),
        "cfg.yaml",
        "extra_fn_clean_exts: ['_screen', '_qc']\n",
    );

    let defaults = ConfigStore::default().fn_clean_exts;

    let mut store = ConfigStore::new();
    let session = SessionConfig {
        config_files: vec![path],
        ..SessionConfig::default()
    };
    run(&mut store, &session);

    assert_eq!(store.fn_clean_exts[0], json!("_screen"));
    assert_eq!(store.fn_clean_exts[1], json!("_qc"));
    assert_eq!(&store.fn_clean_exts[2..], &defaults[..]);
}

#[test]
fn empty_config_file_is_harmless() {
    let temp = TempDir::new().unwrap();
    let path = write_config(temp.path(), "empty.yaml", "");

    let mut store = ConfigStore::new();
    let session = SessionConfig {
        config_files: vec![path],
        ..SessionConfig::default()
    };
    run(&mut store, &session);

    assert_eq!(store.template, "default");
}

#[test]
fn null_values_in_files_do_not_clobber() {
    let temp = TempDir::new().unwrap();
    let first = write_config(temp.path(), "first.yaml", "title: Kept\n");
    let second = write_config(temp.path(), "second.yaml", "title:\n");

    let mut store = ConfigStore::new();
    let session = SessionConfig {
        config_files: vec![first, second],
        ..SessionConfig::default()
    };
    run(&mut store, &session);
    assert_eq!(store.title.as_deref(), Some("Kept"));
}

#[test]
fn missing_session_file_fails_the_pass() {
    let mut store = ConfigStore::new();
    let mut hooks = HookRegistry::new();
    let session = SessionConfig {
        config_files: vec![PathBuf::from("/definitely/not/here.yaml")],
        ..SessionConfig::default()
    };

    let result = resolve(
        &mut store,
        &mut hooks,
        &session,
        &[],
        ResolveOptions::default(),
    );
    assert!(matches!(result, Err(reportal::error::ConfigError::Io { .. })));
}
