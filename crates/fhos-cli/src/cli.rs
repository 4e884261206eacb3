//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "fhos",
    version,
    about = "FHOS equipment analysis - handpiece service life and treatment summaries",
    long_about = "Analyze FHOS equipment exports.\n\n\
                  Reads handpiece, cutoff-hint, treatment and treatment-type CSV exports,\n\
                  and produces per-device handpiece usage, treatment summaries and reports."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Analyze one or more devices and write their reports.
    Analyze(AnalyzeArgs),

    /// Print the suggested cutoff date of a device.
    Cutoff(CutoffArgs),

    /// Print the class of raw handpiece identifiers.
    Classify(ClassifyArgs),
}

/// Source file names inside the data folder.
#[derive(Args, Clone)]
pub struct SourceArgs {
    /// Path to the folder holding the CSV exports.
    #[arg(value_name = "DATA_DIR")]
    pub data_dir: PathBuf,

    /// Handpiece export file name.
    #[arg(long = "handpieces", value_name = "FILE", default_value = "handpieces.csv")]
    pub handpieces: String,

    /// Cutoff-hint export file name.
    #[arg(long = "cutoff-hints", value_name = "FILE", default_value = "datos_drv_it.csv")]
    pub cutoff_hints: String,

    /// Treatment export file name.
    #[arg(long = "treatments", value_name = "FILE", default_value = "treatments.csv")]
    pub treatments: String,

    /// Treatment-type reference file name.
    #[arg(
        long = "treatment-types",
        value_name = "FILE",
        default_value = "treatments_id.csv"
    )]
    pub treatment_types: String,
}

#[derive(Parser)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub sources: SourceArgs,

    /// Device identifier (DIN); repeat for several devices.
    #[arg(long = "din", value_name = "DIN", required = true)]
    pub dins: Vec<String>,

    /// Cutoff date (YYYY-MM-DD) for every device; defaults to each device's
    /// suggested cutoff.
    #[arg(long = "cutoff", value_name = "DATE")]
    pub cutoff: Option<String>,

    /// Output directory for reports (default: <DATA_DIR>/output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Report files to write.
    #[arg(long = "format", value_enum, default_value = "both")]
    pub format: OutputFormatArg,

    /// Analyze and print without writing report files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct CutoffArgs {
    #[command(flatten)]
    pub sources: SourceArgs,

    /// Device identifier (DIN).
    #[arg(long = "din", value_name = "DIN")]
    pub din: String,
}

#[derive(Parser)]
pub struct ClassifyArgs {
    /// Raw handpiece identifiers.
    #[arg(value_name = "ID", required = true)]
    pub ids: Vec<String>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    Csv,
    Json,
    Both,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
