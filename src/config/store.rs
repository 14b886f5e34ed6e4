//! The effective configuration store.
//!
//! `ConfigStore` is the single effective configuration state for a
//! resolution pass. It is an explicit, passable context object: the caller
//! owns it and threads it through the engine and the loader by mutable
//! reference, so independent stores can coexist in one process (interactive
//! embedding, tests). It is never destroyed, only reset — every resolution
//! pass starts by restoring built-in defaults so repeated reconfiguration
//! stays reproducible.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// Template name that triggers the flattened-plot / simple-output derivation.
pub const SIMPLE_TEMPLATE: &str = "simple";

/// AI summary providers. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum AiProvider {
    /// Hosted default provider.
    #[default]
    Seqera,
    Openai,
    Anthropic,
    /// Custom OpenAI-compatible endpoint (`ai_custom_endpoint`).
    Custom,
}

/// Whether log filenames are used as sample names.
///
/// The upstream surface accepts either a plain boolean or a list of
/// search-pattern keys to apply it selectively. Downstream consumers have no
/// documented disambiguation rule, so the two shapes are preserved as a
/// tagged union instead of being collapsed to one type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SampleNameSource {
    Enabled(bool),
    Patterns(Vec<String>),
}

impl Default for SampleNameSource {
    fn default() -> Self {
        SampleNameSource::Enabled(false)
    }
}

impl SampleNameSource {
    /// True if the setting enables filename-derived sample names at all.
    pub fn is_enabled(&self) -> bool {
        match self {
            SampleNameSource::Enabled(on) => *on,
            SampleNameSource::Patterns(patterns) => !patterns.is_empty(),
        }
    }
}

/// One entry of the normalized module-order view: a module name plus its
/// (possibly empty) options mapping. Raw config entries are either bare
/// strings or single-key mappings; the engine rebuilds this uniform shape at
/// the end of every pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleOrderEntry {
    pub name: String,
    pub options: Map<String, Value>,
}

impl ModuleOrderEntry {
    /// Normalize a raw config entry. Bare names get empty options; mappings
    /// keep their first key as the module name.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(name) => Some(Self {
                name: name.clone(),
                options: Map::new(),
            }),
            Value::Object(map) => map.iter().next().map(|(name, options)| Self {
                name: name.clone(),
                options: options.as_object().cloned().unwrap_or_default(),
            }),
            _ => None,
        }
    }
}

/// The effective configuration for one process.
///
/// Scalar fields use replace semantics during resolution; list fields either
/// replace or extend depending on the field (see the resolution engine).
/// Unknown keys from config files and the CLI passthrough land in `kwargs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigStore {
    // Report identity
    pub title: Option<String>,
    pub report_comment: Option<String>,
    pub template: String,
    pub output_dir: PathBuf,
    pub filename: Option<String>,

    // Data directory handling
    pub make_data_dir: bool,
    pub data_format: String,
    pub zip_data_dir: bool,
    pub preserve_module_raw_data: bool,
    pub data_dump_file_write_raw: bool,

    // General behavior flags
    pub force: bool,
    pub ignore_symlinks: bool,
    pub make_report: bool,
    pub require_logs: bool,
    pub file_list: bool,
    pub no_version_check: bool,
    pub megaqc_upload: bool,

    // Plot/export behavior
    pub export_plots: bool,
    pub plots_force_flat: bool,
    pub plots_force_interactive: bool,
    pub export_plot_formats: Vec<String>,
    pub simple_output: bool,
    pub make_pdf: bool,

    // Modes
    pub strict: bool,
    /// Deprecated alias of `strict`, kept in sync for old consumers.
    pub lint: bool,
    pub development: bool,
    pub profile_runtime: bool,
    pub profile_memory: bool,

    // Output verbosity (read by logging setup before anything else)
    pub quiet: bool,
    pub verbose: bool,
    pub no_ansi: bool,

    // Sample-name handling
    pub prepend_dirs: bool,
    pub prepend_dirs_depth: u32,
    pub fn_clean_sample_names: bool,
    pub use_filename_as_sample_name: SampleNameSource,
    pub fn_clean_exts: Vec<Value>,
    pub fn_clean_trim: Vec<String>,

    // Search scope
    pub analysis_dir: Vec<PathBuf>,
    pub fn_ignore_files: Vec<String>,
    pub fn_ignore_dirs: Vec<String>,
    pub fn_ignore_paths: Vec<String>,

    // Sample filtering
    pub sample_names_ignore: Vec<String>,
    pub sample_names_only_include: Vec<String>,
    pub sample_names_replace: BTreeMap<String, String>,
    pub sample_names_rename_buttons: Vec<String>,
    pub sample_names_rename: Vec<Vec<String>>,
    pub show_hide_buttons: Vec<String>,
    pub show_hide_mode: Vec<String>,
    pub show_hide_regex: Vec<bool>,
    pub show_hide_patterns: Vec<Value>,

    // Module selection and ordering (raw config shape: string or mapping)
    pub run_modules: Vec<String>,
    pub exclude_modules: Vec<String>,
    pub module_order: Vec<Value>,
    pub top_modules: Vec<Value>,
    pub custom_css_files: Vec<String>,

    // AI summaries
    pub ai_summary: bool,
    pub ai_summary_full: bool,
    pub ai_provider: AiProvider,
    pub ai_model: Option<String>,
    pub ai_custom_endpoint: Option<String>,
    pub ai_custom_context_window: Option<u32>,
    pub ai_prompt_short: Option<String>,
    pub ai_prompt_full: Option<String>,
    pub no_ai: bool,

    /// Config files the caller pinned explicitly; reloaded at the start of
    /// every pass, and the only field that survives a reset.
    pub explicit_user_config_files: Vec<PathBuf>,

    /// Files loaded during the current pass. Cleared before re-discovery so
    /// stale bookkeeping from a previous pass cannot suppress a reload.
    #[serde(skip)]
    pub loaded_user_files: BTreeSet<PathBuf>,

    /// Normalized module-order views, rebuilt at the end of every pass.
    #[serde(skip)]
    pub top_modules_resolved: Vec<ModuleOrderEntry>,
    #[serde(skip)]
    pub module_order_resolved: Vec<ModuleOrderEntry>,

    /// Passthrough bucket for unknown keys. Intentionally open-ended: config
    /// files and the CLI can stash options for downstream plugins here.
    #[serde(flatten)]
    pub kwargs: Map<String, Value>,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self {
            title: None,
            report_comment: None,
            template: "default".to_string(),
            output_dir: PathBuf::from("."),
            filename: None,
            make_data_dir: true,
            data_format: "tsv".to_string(),
            zip_data_dir: false,
            preserve_module_raw_data: false,
            data_dump_file_write_raw: false,
            force: false,
            ignore_symlinks: false,
            make_report: true,
            require_logs: false,
            file_list: false,
            no_version_check: false,
            megaqc_upload: true,
            export_plots: false,
            plots_force_flat: false,
            plots_force_interactive: false,
            export_plot_formats: vec!["svg".to_string()],
            simple_output: false,
            make_pdf: false,
            strict: false,
            lint: false,
            development: false,
            profile_runtime: false,
            profile_memory: false,
            quiet: false,
            verbose: false,
            no_ansi: false,
            prepend_dirs: false,
            prepend_dirs_depth: 0,
            fn_clean_sample_names: true,
            use_filename_as_sample_name: SampleNameSource::default(),
            fn_clean_exts: default_fn_clean_exts(),
            fn_clean_trim: Vec::new(),
            analysis_dir: Vec::new(),
            fn_ignore_files: default_fn_ignore_files(),
            fn_ignore_dirs: default_fn_ignore_dirs(),
            fn_ignore_paths: Vec::new(),
            sample_names_ignore: Vec::new(),
            sample_names_only_include: Vec::new(),
            sample_names_replace: BTreeMap::new(),
            sample_names_rename_buttons: Vec::new(),
            sample_names_rename: Vec::new(),
            show_hide_buttons: Vec::new(),
            show_hide_mode: Vec::new(),
            show_hide_regex: Vec::new(),
            show_hide_patterns: Vec::new(),
            run_modules: Vec::new(),
            exclude_modules: Vec::new(),
            module_order: Vec::new(),
            top_modules: Vec::new(),
            custom_css_files: Vec::new(),
            ai_summary: false,
            ai_summary_full: false,
            ai_provider: AiProvider::default(),
            ai_model: None,
            ai_custom_endpoint: None,
            ai_custom_context_window: None,
            ai_prompt_short: None,
            ai_prompt_full: None,
            no_ai: false,
            explicit_user_config_files: Vec::new(),
            loaded_user_files: BTreeSet::new(),
            top_modules_resolved: Vec::new(),
            module_order_resolved: Vec::new(),
            kwargs: Map::new(),
        }
    }
}

fn default_fn_clean_exts() -> Vec<Value> {
    [".gz", ".fastq", ".fq", ".bam", ".sam", ".log", ".txt", ".tsv"]
        .iter()
        .map(|ext| Value::String((*ext).to_string()))
        .collect()
}

fn default_fn_ignore_files() -> Vec<String> {
    vec![
        ".DS_Store".to_string(),
        "*.parquet".to_string(),
        "*.bam".to_string(),
    ]
}

fn default_fn_ignore_dirs() -> Vec<String> {
    vec!["icarus_viewers".to_string(), "__pycache__".to_string()]
}

impl ConfigStore {
    /// Create a store holding built-in defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore built-in defaults, keeping only the caller-pinned explicit
    /// config file list (those files are replayed by the next pass).
    pub fn reset(&mut self) {
        let explicit = std::mem::take(&mut self.explicit_user_config_files);
        *self = Self::default();
        self.explicit_user_config_files = explicit;
    }

    /// Pin a config file so every subsequent resolution pass reloads it.
    pub fn pin_config_file(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if !self.explicit_user_config_files.contains(&path) {
            self.explicit_user_config_files.push(path);
        }
    }
}
