//! CLI definitions.
//!
//! Flags map one-to-one onto the [`SessionConfig`] override record: a flag
//! that was not passed becomes an unset field, so command lines never
//! clobber values coming from config files unless the user actually typed
//! the flag.

use crate::config::{AiProvider, SampleNameSource, SessionConfig};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Aggregate analysis-tool logs into a single report
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directories or files to scan for analysis logs
    pub analysis_dir: Vec<PathBuf>,

    /// Treat the single analysis path as a plain-text list of files to scan
    #[arg(short = 'l', long)]
    pub file_list: bool,

    /// Report title
    #[arg(short = 'i', long)]
    pub title: Option<String>,

    /// Custom comment shown at the top of the report
    #[arg(short = 'b', long)]
    pub comment: Option<String>,

    /// Report template to use
    #[arg(short = 't', long)]
    pub template: Option<String>,

    /// Prepend directory names to sample names
    #[arg(short = 'd', long)]
    pub dirs: bool,

    /// Prepend at most this many directory levels
    #[arg(long)]
    pub dirs_depth: Option<u32>,

    /// Keep full log filenames, do not clean sample names
    #[arg(short = 's', long = "fullnames")]
    pub fullnames: bool,

    /// Use log filenames as sample names
    #[arg(long)]
    pub fn_as_s_name: bool,

    /// Output directory for the report
    #[arg(short = 'o', long)]
    pub outdir: Option<PathBuf>,

    /// Report output filename
    #[arg(short = 'n', long)]
    pub filename: Option<String>,

    /// TSV file with sample name replacements
    #[arg(long)]
    pub replace_names: Option<PathBuf>,

    /// TSV file with sample renaming buttons
    #[arg(long)]
    pub sample_names: Option<PathBuf>,

    /// TSV file with show/hide filter groups
    #[arg(long)]
    pub sample_filters: Option<PathBuf>,

    /// Ignore files, directories and paths matching these patterns
    #[arg(short = 'x', long = "ignore")]
    pub ignore: Vec<String>,

    /// Ignore sample names matching these patterns
    #[arg(long)]
    pub ignore_samples: Vec<String>,

    /// Only include sample names matching these patterns
    #[arg(long)]
    pub only_samples: Vec<String>,

    /// Run only these modules
    #[arg(short = 'm', long = "module")]
    pub run_modules: Vec<String>,

    /// Exclude these modules
    #[arg(short = 'e', long = "exclude")]
    pub exclude_modules: Vec<String>,

    /// Extra config files to load
    #[arg(short = 'c', long = "config")]
    pub config_files: Vec<PathBuf>,

    /// Inline `key: value` config overrides
    #[arg(long)]
    pub cl_config: Vec<String>,

    /// Overwrite an existing report
    #[arg(short = 'f', long)]
    pub force: bool,

    /// Fail if a requested module finds no logs
    #[arg(long)]
    pub require_logs: bool,

    /// Do not create the parsed data directory
    #[arg(long, conflicts_with = "data_dir")]
    pub no_data_dir: bool,

    /// Create the parsed data directory
    #[arg(long)]
    pub data_dir: bool,

    /// Compress the parsed data directory
    #[arg(short = 'z', long)]
    pub zip_data_dir: bool,

    /// Output format for the parsed data directory
    #[arg(long)]
    pub data_format: Option<String>,

    /// Skip report generation, only export parsed data
    #[arg(long)]
    pub no_report: bool,

    /// Export plots as static images
    #[arg(short = 'p', long = "export")]
    pub export_plots: bool,

    /// Force flat (static) plots
    #[arg(long = "flat")]
    pub plots_force_flat: bool,

    /// Force interactive plots
    #[arg(long = "interactive", conflicts_with = "plots_force_flat")]
    pub plots_force_interactive: bool,

    /// Strict mode: extra validation, fail on warnings
    #[arg(long)]
    pub strict: bool,

    /// Development mode
    #[arg(long)]
    pub development: bool,

    /// Render the report as PDF (forces the simple template)
    #[arg(long)]
    pub pdf: bool,

    /// Disable the centralized metrics upload
    #[arg(long)]
    pub no_megaqc_upload: bool,

    /// Only show warnings and errors
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose output
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long)]
    pub no_ansi: bool,

    /// Profile module run times
    #[arg(long)]
    pub profile_runtime: bool,

    /// Profile memory usage (implies runtime profiling)
    #[arg(long)]
    pub profile_memory: bool,

    /// Skip the new-version check
    #[arg(long)]
    pub no_version_check: bool,

    /// Custom CSS files to include in the report
    #[arg(long = "custom-css-file")]
    pub custom_css_files: Vec<String>,

    /// Generate a short AI summary of the report
    #[arg(long)]
    pub ai_summary: bool,

    /// Generate a detailed AI summary of the report
    #[arg(long)]
    pub ai_summary_full: bool,

    /// AI provider for report summaries
    #[arg(long, value_enum)]
    pub ai_provider: Option<AiProvider>,

    /// Disable all AI features
    #[arg(long)]
    pub no_ai: bool,

    /// Write logs to a file instead of stderr
    #[arg(long)]
    pub log_to_file: bool,

    /// Print the effective configuration and exit
    #[arg(long)]
    pub check_config: bool,
}

/// A boolean flag becomes a set override only when the user passed it.
fn flag(set: bool) -> Option<bool> {
    set.then_some(true)
}

impl Cli {
    /// Build the override record and the positional analysis paths.
    pub fn to_session(&self) -> (SessionConfig, Vec<PathBuf>) {
        let session = SessionConfig {
            file_list: flag(self.file_list),
            prepend_dirs: flag(self.dirs),
            dirs_depth: self.dirs_depth,
            fn_clean_sample_names: self.fullnames.then_some(false),
            title: self.title.clone(),
            report_comment: self.comment.clone(),
            template: self.template.clone(),
            require_logs: flag(self.require_logs),
            output_dir: self.outdir.clone(),
            use_filename_as_sample_name: self
                .fn_as_s_name
                .then_some(SampleNameSource::Enabled(true)),
            replace_names: self.replace_names.clone(),
            sample_names: self.sample_names.clone(),
            sample_filters: self.sample_filters.clone(),
            filename: self.filename.clone(),
            make_data_dir: if self.no_data_dir {
                Some(false)
            } else {
                flag(self.data_dir)
            },
            data_format: self.data_format.clone(),
            zip_data_dir: flag(self.zip_data_dir),
            force: flag(self.force),
            make_report: self.no_report.then_some(false),
            export_plots: flag(self.export_plots),
            plots_force_flat: flag(self.plots_force_flat),
            plots_force_interactive: flag(self.plots_force_interactive),
            strict: flag(self.strict),
            development: flag(self.development),
            make_pdf: flag(self.pdf),
            no_megaqc_upload: flag(self.no_megaqc_upload),
            quiet: flag(self.quiet),
            verbose: (self.verbose > 0).then_some(true),
            no_ansi: flag(self.no_ansi),
            profile_runtime: flag(self.profile_runtime),
            profile_memory: flag(self.profile_memory),
            no_version_check: flag(self.no_version_check),
            ignore: self.ignore.clone(),
            ignore_samples: self.ignore_samples.clone(),
            only_samples: self.only_samples.clone(),
            run_modules: self.run_modules.clone(),
            exclude_modules: self.exclude_modules.clone(),
            config_files: self.config_files.clone(),
            cl_config: self.cl_config.clone(),
            custom_css_files: self.custom_css_files.clone(),
            ai_summary: flag(self.ai_summary),
            ai_summary_full: flag(self.ai_summary_full),
            ai_provider: self.ai_provider,
            no_ai: flag(self.no_ai),
            check_config: flag(self.check_config),
            ..SessionConfig::default()
        };
        (session, self.analysis_dir.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untyped_flags_stay_unset() {
        let cli = Cli::parse_from(["reportal", "data/"]);
        let (session, dirs) = cli.to_session();

        assert_eq!(dirs, vec![PathBuf::from("data/")]);
        assert_eq!(session.force, None);
        assert_eq!(session.make_data_dir, None);
        assert_eq!(session.fn_clean_sample_names, None);
        assert_eq!(session.verbose, None);
    }

    #[test]
    fn negative_flags_map_to_explicit_false() {
        let cli = Cli::parse_from(["reportal", "--fullnames", "--no-data-dir", "--no-report"]);
        let (session, _) = cli.to_session();

        assert_eq!(session.fn_clean_sample_names, Some(false));
        assert_eq!(session.make_data_dir, Some(false));
        assert_eq!(session.make_report, Some(false));
    }

    #[test]
    fn repeated_flags_collect_into_lists() {
        let cli = Cli::parse_from([
            "reportal", "-x", "*.tmp", "-x", "*.bak", "-m", "fastqc", "-c", "extra.yaml",
        ]);
        let (session, _) = cli.to_session();

        assert_eq!(session.ignore, vec!["*.tmp", "*.bak"]);
        assert_eq!(session.run_modules, vec!["fastqc"]);
        assert_eq!(session.config_files, vec![PathBuf::from("extra.yaml")]);
    }
}
