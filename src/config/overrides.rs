//! The per-invocation override record.
//!
//! `SessionConfig` is a sparse patch holding everything one invocation (CLI
//! flags or an embedding caller) wants to override. Every scalar field is a
//! tagged option — `None` means "not mentioned" and must never overwrite an
//! existing store value, while `Some(false)`/`Some("")` is an explicit
//! choice that wins over every lower-ranked source. List fields use the
//! empty list as "not mentioned".
//!
//! Construction never validates field combinations; consistency checks (the
//! file-list/directory-count rule) happen inside the resolution engine. The
//! schema itself is closed: unknown keys are rejected at deserialization,
//! with `unknown_options` as the one intentionally open passthrough bucket.

use super::store::{AiProvider, SampleNameSource};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Configuration overrides for one resolution pass.
///
/// Read-only after construction; the engine consumes it field by field and
/// the record is discarded when the pass completes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub file_list: Option<bool>,
    pub prepend_dirs: Option<bool>,
    pub dirs_depth: Option<u32>,
    pub fn_clean_sample_names: Option<bool>,
    pub title: Option<String>,
    pub report_comment: Option<String>,
    pub template: Option<String>,
    pub require_logs: Option<bool>,
    pub output_dir: Option<PathBuf>,
    pub use_filename_as_sample_name: Option<SampleNameSource>,
    pub replace_names: Option<PathBuf>,
    pub sample_names: Option<PathBuf>,
    pub sample_filters: Option<PathBuf>,
    pub filename: Option<String>,
    pub make_data_dir: Option<bool>,
    pub data_format: Option<String>,
    pub zip_data_dir: Option<bool>,
    pub force: Option<bool>,
    pub ignore_symlinks: Option<bool>,
    pub make_report: Option<bool>,
    pub export_plots: Option<bool>,
    pub plots_force_flat: Option<bool>,
    pub plots_force_interactive: Option<bool>,
    pub strict: Option<bool>,
    pub development: Option<bool>,
    pub make_pdf: Option<bool>,
    pub no_megaqc_upload: Option<bool>,
    pub quiet: Option<bool>,
    pub verbose: Option<bool>,
    pub no_ansi: Option<bool>,
    pub profile_runtime: Option<bool>,
    pub profile_memory: Option<bool>,
    pub no_version_check: Option<bool>,
    pub ignore: Vec<String>,
    pub ignore_samples: Vec<String>,
    pub only_samples: Vec<String>,
    pub run_modules: Vec<String>,
    pub exclude_modules: Vec<String>,
    pub config_files: Vec<PathBuf>,
    pub cl_config: Vec<String>,
    pub custom_css_files: Vec<String>,
    /// Raw module-order entries: bare names or name-to-options mappings.
    pub module_order: Vec<Value>,
    pub extra_fn_clean_exts: Vec<Value>,
    pub extra_fn_clean_trim: Vec<String>,
    pub preserve_module_raw_data: Option<bool>,
    pub data_dump_file_write_raw: Option<bool>,
    pub ai_summary: Option<bool>,
    pub ai_summary_full: Option<bool>,
    pub ai_provider: Option<AiProvider>,
    pub ai_model: Option<String>,
    pub ai_custom_endpoint: Option<String>,
    pub ai_custom_context_window: Option<u32>,
    pub ai_prompt_short: Option<String>,
    pub ai_prompt_full: Option<String>,
    pub no_ai: Option<bool>,
    /// Passthrough options for downstream plugins. Replaces the store's
    /// kwargs bucket wholesale when set.
    pub unknown_options: Option<Map<String, Value>>,
    /// Dump the effective configuration instead of running.
    pub check_config: Option<bool>,
}
