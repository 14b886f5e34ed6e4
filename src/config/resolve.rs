//! The resolution engine.
//!
//! One call to [`resolve`] is one resolution pass: the store is restored to
//! built-in defaults, every config source is folded in by ascending
//! precedence (implicit files, pinned explicit files, session files, inline
//! fragments, session fields), cross-field derivations are applied, and the
//! lifecycle checkpoints fire. Because every pass starts from defaults, two
//! passes with the same override record produce identical store state no
//! matter what ran in between.
//!
//! Phases run strictly sequentially on the calling thread. Nothing here is
//! rolled back on error: a failing phase leaves earlier mutations in place,
//! and callers wanting transactional behavior snapshot the store themselves.

use super::loader;
use super::overrides::SessionConfig;
use super::store::{ConfigStore, ModuleOrderEntry, SIMPLE_TEMPLATE};
use crate::error::{ConfigError, Result};
use crate::hooks::{HookEvent, HookRegistry};
use crate::logging;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Caller-supplied knobs that are not configuration themselves.
#[derive(Default)]
pub struct ResolveOptions {
    /// Send log output to a file instead of stderr.
    pub log_to_file: bool,
    /// Callback invoked once logging is ready, e.g. to print a banner.
    pub print_intro: Option<Box<dyn FnOnce()>>,
}

/// Run one resolution pass over `store`.
///
/// `analysis_dir` are the positional analysis paths; when non-empty they
/// replace the store's list. All effects are mutations of `store` plus the
/// synchronous lifecycle notifications on `hooks`.
pub fn resolve(
    store: &mut ConfigStore,
    hooks: &mut HookRegistry,
    session: &SessionConfig,
    analysis_dir: &[PathBuf],
    opts: ResolveOptions,
) -> Result<()> {
    // Reload from defaults
    store.reset();

    // Verbosity fields first: logging setup reads them
    if let Some(quiet) = session.quiet {
        store.quiet = quiet;
    }
    if let Some(no_ansi) = session.no_ansi {
        store.no_ansi = no_ansi;
    }
    if let Some(verbose) = session.verbose {
        store.verbose = verbose;
    }

    logging::init_log(store, opts.log_to_file);
    if let Some(print_intro) = opts.print_intro {
        print_intro();
    }

    debug!("this is reportal v{}", env!("CARGO_PKG_VERSION"));

    hooks.trigger(HookEvent::BeforeConfig)?;

    store.loaded_user_files.clear();

    // Re-find implicit configs
    loader::find_user_files(store)?;

    // Re-load caller-pinned explicit configs from previous passes
    for path in store.explicit_user_config_files.clone() {
        loader::load_config_file(store, &path, true)?;
    }

    // Session config files, one rank above discovery
    for path in &session.config_files {
        loader::load_config_file(store, path, false)?;
    }

    // Inline command-line config, one rank above session files
    if !session.cl_config.is_empty() {
        loader::load_inline_config(store, &session.cl_config)?;
    }

    // Session fields win over everything loaded from files
    apply_session_fields(store, session)?;
    apply_derivations(store);

    // Positional analysis paths replace the configured list
    if !analysis_dir.is_empty() {
        store.analysis_dir = analysis_dir.to_vec();
    }
    if let Some(file_list) = session.file_list {
        if store.analysis_dir.len() > 1 {
            return Err(ConfigError::Configuration(
                "--file-list requires a single analysis path pointing at a plain text manifest"
                    .to_string(),
            ));
        }
        store.file_list = file_list;
    }

    // Ignore and sample filters extend their store counterparts
    if !session.ignore.is_empty() {
        debug!(
            "ignoring files, directories and paths that match: {}",
            session.ignore.join(", ")
        );
        store.fn_ignore_files.extend(session.ignore.iter().cloned());
        store.fn_ignore_dirs.extend(session.ignore.iter().cloned());
        store.fn_ignore_paths.extend(session.ignore.iter().cloned());
    }
    if !session.ignore_samples.is_empty() {
        debug!(
            "ignoring sample names that match: {}",
            session.ignore_samples.join(", ")
        );
        store
            .sample_names_ignore
            .extend(session.ignore_samples.iter().cloned());
    }
    if !session.only_samples.is_empty() {
        debug!(
            "only including sample names that match: {}",
            session.only_samples.join(", ")
        );
        store
            .sample_names_only_include
            .extend(session.only_samples.iter().cloned());
    }

    // Rebuild the normalized module-order views from the final lists
    store.top_modules_resolved = store
        .top_modules
        .iter()
        .filter_map(ModuleOrderEntry::from_value)
        .collect();
    store.module_order_resolved = store
        .module_order
        .iter()
        .filter_map(ModuleOrderEntry::from_value)
        .collect();

    // Unrecognized command-line options, passed through to plugins
    if let Some(unknown) = &session.unknown_options {
        store.kwargs = unknown.clone();
    }

    hooks.trigger(HookEvent::ConfigLoaded)?;
    hooks.trigger(HookEvent::ExecutionStart)?;
    Ok(())
}

/// Apply the scalar and list fields of the override record, field by field,
/// in a fixed order. Unset fields never touch the store.
fn apply_session_fields(store: &mut ConfigStore, cfg: &SessionConfig) -> Result<()> {
    if let Some(template) = &cfg.template {
        store.template = template.clone();
    }
    if let Some(title) = &cfg.title {
        store.title = Some(title.clone());
        info!("report title: {}", title);
    }
    if let Some(comment) = &cfg.report_comment {
        store.report_comment = Some(comment.clone());
    }
    if let Some(prepend) = cfg.prepend_dirs {
        store.prepend_dirs = prepend;
        if prepend {
            info!("prepending directory to sample names");
        }
    }
    if let Some(depth) = cfg.dirs_depth {
        store.prepend_dirs = true;
        store.prepend_dirs_depth = depth;
    }
    if let Some(output_dir) = &cfg.output_dir {
        store.output_dir = absolutize(output_dir);
    }
    if let Some(source) = &cfg.use_filename_as_sample_name {
        store.use_filename_as_sample_name = source.clone();
        if source.is_enabled() {
            info!("using log filenames for sample names");
        }
    }
    if let Some(make_data_dir) = cfg.make_data_dir {
        store.make_data_dir = make_data_dir;
    }
    if let Some(force) = cfg.force {
        store.force = force;
    }
    if let Some(ignore_symlinks) = cfg.ignore_symlinks {
        store.ignore_symlinks = ignore_symlinks;
    }
    if let Some(zip_data_dir) = cfg.zip_data_dir {
        store.zip_data_dir = zip_data_dir;
    }
    if let Some(data_format) = &cfg.data_format {
        store.data_format = data_format.clone();
    }
    if let Some(export_plots) = cfg.export_plots {
        store.export_plots = export_plots;
    }
    if let Some(make_report) = cfg.make_report {
        store.make_report = make_report;
    }
    if let Some(flat) = cfg.plots_force_flat {
        store.plots_force_flat = flat;
    }
    if let Some(interactive) = cfg.plots_force_interactive {
        store.plots_force_interactive = interactive;
    }
    if let Some(strict) = cfg.strict {
        store.strict = strict;
        // Deprecated alias, mirrored for old consumers
        store.lint = strict;
    }
    if let Some(development) = cfg.development {
        store.development = development;
    }
    if cfg.make_pdf == Some(true) {
        store.make_pdf = true;
        store.template = SIMPLE_TEMPLATE.to_string();
    }
    if let Some(filename) = &cfg.filename {
        store.filename = Some(filename.clone());
    }
    if let Some(no_upload) = cfg.no_megaqc_upload {
        store.megaqc_upload = !no_upload;
    }
    if let Some(clean) = cfg.fn_clean_sample_names {
        store.fn_clean_sample_names = clean;
        if !clean {
            info!("not cleaning sample names");
        }
    }
    if let Some(path) = &cfg.replace_names {
        loader::load_replace_names(store, path)?;
    }
    if let Some(path) = &cfg.sample_names {
        loader::load_sample_names(store, path)?;
    }
    loader::load_show_hide(store, cfg.sample_filters.as_deref())?;
    if !cfg.run_modules.is_empty() {
        store.run_modules = cfg.run_modules.clone();
    }
    if !cfg.exclude_modules.is_empty() {
        store.exclude_modules = cfg.exclude_modules.clone();
    }
    if let Some(require_logs) = cfg.require_logs {
        store.require_logs = require_logs;
    }
    if let Some(profile_runtime) = cfg.profile_runtime {
        store.profile_runtime = profile_runtime;
    }
    if let Some(profile_memory) = cfg.profile_memory {
        store.profile_memory = profile_memory;
    }
    if let Some(no_version_check) = cfg.no_version_check {
        store.no_version_check = no_version_check;
    }
    if !cfg.custom_css_files.is_empty() {
        store
            .custom_css_files
            .extend(cfg.custom_css_files.iter().cloned());
    }
    if !cfg.module_order.is_empty() {
        store.module_order = cfg.module_order.clone();
    }
    if !cfg.extra_fn_clean_exts.is_empty() {
        let mut exts = cfg.extra_fn_clean_exts.clone();
        exts.extend(store.fn_clean_exts.drain(..));
        store.fn_clean_exts = exts;
    }
    if !cfg.extra_fn_clean_trim.is_empty() {
        let mut trims = cfg.extra_fn_clean_trim.clone();
        trims.extend(store.fn_clean_trim.drain(..));
        store.fn_clean_trim = trims;
    }
    if let Some(preserve) = cfg.preserve_module_raw_data {
        store.preserve_module_raw_data = preserve;
    }
    if let Some(write_raw) = cfg.data_dump_file_write_raw {
        store.data_dump_file_write_raw = write_raw;
    }
    if let Some(ai_summary) = cfg.ai_summary {
        store.ai_summary = ai_summary;
    }
    if let Some(ai_summary_full) = cfg.ai_summary_full {
        store.ai_summary_full = ai_summary_full;
    }
    if let Some(provider) = cfg.ai_provider {
        store.ai_provider = provider;
    }
    if let Some(model) = &cfg.ai_model {
        store.ai_model = Some(model.clone());
    }
    if let Some(endpoint) = &cfg.ai_custom_endpoint {
        store.ai_custom_endpoint = Some(endpoint.clone());
    }
    if let Some(window) = cfg.ai_custom_context_window {
        store.ai_custom_context_window = Some(window);
    }
    if let Some(prompt) = &cfg.ai_prompt_short {
        store.ai_prompt_short = Some(prompt.clone());
    }
    if let Some(prompt) = &cfg.ai_prompt_full {
        store.ai_prompt_full = Some(prompt.clone());
    }
    if let Some(no_ai) = cfg.no_ai {
        store.no_ai = no_ai;
    }
    Ok(())
}

/// Cross-field derivations. Order matters: later rules may read fields set
/// by earlier ones, and each pass recomputes them from the final trigger
/// values so no stale derivation survives a changed trigger.
fn apply_derivations(store: &mut ConfigStore) {
    if store.template == SIMPLE_TEMPLATE {
        store.plots_force_flat = true;
        store.simple_output = true;
    }
    if store.development && !store.export_plot_formats.iter().any(|f| f == "png") {
        store.export_plot_formats.push("png".to_string());
    }
    if store.ai_summary_full {
        store.ai_summary = true;
    }
    if store.profile_memory {
        store.profile_runtime = true;
    }
    if store.strict {
        store.lint = true;
    }
}

/// Anchor a relative path to the working directory without touching the
/// filesystem (the output directory may not exist yet).
fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_template_forces_flat_plots() {
        let mut store = ConfigStore::default();
        store.template = SIMPLE_TEMPLATE.to_string();
        apply_derivations(&mut store);
        assert!(store.plots_force_flat);
        assert!(store.simple_output);
    }

    #[test]
    fn development_appends_png_once() {
        let mut store = ConfigStore::default();
        store.development = true;
        apply_derivations(&mut store);
        apply_derivations(&mut store);
        let pngs = store
            .export_plot_formats
            .iter()
            .filter(|f| f.as_str() == "png")
            .count();
        assert_eq!(pngs, 1);
    }

    #[test]
    fn memory_profiling_implies_runtime_profiling() {
        let mut store = ConfigStore::default();
        store.profile_memory = true;
        apply_derivations(&mut store);
        assert!(store.profile_runtime);
    }

    #[test]
    fn non_simple_template_leaves_plot_flags_alone() {
        let mut store = ConfigStore::default();
        apply_derivations(&mut store);
        assert!(!store.plots_force_flat);
        assert!(!store.simple_output);
    }
}
