//! CLI argument definitions for the evidence parser.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "evd",
    version,
    about = "Evidence parser - Turn PanelApp and ClinGen curations into disease evidence",
    long_about = "Turn a PanelApp gene panel export or a ClinGen gene validity download into\n\
                  gzip-compressed JSON-lines evidence.\n\n\
                  Phenotype strings are cleaned and split, mapped to ontology terms\n\
                  and annotated with the PubMed references of each panel."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
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
    /// Parse a PanelApp export into evidence records.
    Panelapp(PanelAppArgs),

    /// Parse ClinGen gene validity curations into evidence records.
    Clingen(ClinGenArgs),

    /// Normalize phenotype strings and print the result.
    Normalize(NormalizeArgs),
}

#[derive(Parser)]
pub struct PanelAppArgs {
    /// Tab-separated PanelApp gene panel export.
    #[arg(long = "input-file", short = 'i', value_name = "FILE")]
    pub input_file: PathBuf,

    /// Destination of the gzip-compressed JSON-lines evidence.
    #[arg(long = "output-file", short = 'o', value_name = "FILE")]
    pub output_file: PathBuf,

    #[command(flatten)]
    pub lookup: LookupArgs,

    /// Mapping dictionary used to seed the lookup cache.
    #[arg(long = "mappings-dict", value_name = "FILE")]
    pub mappings_dict: Option<PathBuf>,

    /// Save the lookup cache as a mapping dictionary after the run.
    #[arg(long = "save-mappings", value_name = "FILE")]
    pub save_mappings: Option<PathBuf>,

    /// Report fuzzy ontology matches instead of discarding them.
    #[arg(long = "keep-fuzzy")]
    pub keep_fuzzy: bool,

    /// Attempts per lookup term before giving up.
    #[arg(long = "max-attempts", value_name = "N", default_value_t = 3)]
    pub max_attempts: u32,

    /// Keep phenotypes marked with '?' instead of dropping them.
    #[arg(long = "keep-uncertain")]
    pub keep_uncertain: bool,

    /// Extra phenotype value treated as missing (falls back to the panel name).
    #[arg(long = "placeholder", value_name = "TEXT")]
    pub placeholders: Vec<String>,

    /// Skip fetching PubMed references from the PanelApp API.
    #[arg(long = "skip-literature")]
    pub skip_literature: bool,

    /// PanelApp API base URL.
    #[arg(long = "panelapp-url", value_name = "URL")]
    pub panelapp_url: Option<String>,
}

/// Ontology lookup backend. At most one may be given; OLS is the default.
#[derive(Args)]
#[group(multiple = false)]
pub struct LookupArgs {
    /// Write evidence without ontology mapping.
    #[arg(long = "skip-mapping")]
    pub skip_mapping: bool,

    /// Map with a local tab-separated table (query, term, label, quality, source).
    #[arg(long = "lookup-table", value_name = "FILE")]
    pub lookup_table: Option<PathBuf>,

    /// Map with the Ontology Lookup Service at this base URL.
    #[arg(long = "ols-url", value_name = "URL")]
    pub ols_url: Option<String>,
}

#[derive(Parser)]
pub struct ClinGenArgs {
    /// Gene validity curations downloaded from ClinGen (CSV).
    #[arg(long = "input-file", short = 'i', value_name = "FILE")]
    pub input_file: PathBuf,

    /// Destination of the gzip-compressed JSON-lines evidence.
    #[arg(long = "output-file", short = 'o', value_name = "FILE")]
    pub output_file: PathBuf,

    #[command(flatten)]
    pub lookup: LookupArgs,

    /// Mapping dictionary used to seed the lookup cache.
    #[arg(long = "mappings-dict", value_name = "FILE")]
    pub mappings_dict: Option<PathBuf>,

    /// Save the lookup cache as a mapping dictionary after the run.
    #[arg(long = "save-mappings", value_name = "FILE")]
    pub save_mappings: Option<PathBuf>,

    /// Attempts per lookup term before giving up.
    #[arg(long = "max-attempts", value_name = "N", default_value_t = 3)]
    pub max_attempts: u32,
}

#[derive(Parser)]
pub struct NormalizeArgs {
    /// Raw phenotype strings, one per argument.
    #[arg(value_name = "TEXT", required = true)]
    pub texts: Vec<String>,

    /// Keep phenotypes marked with '?'.
    #[arg(long = "keep-uncertain")]
    pub keep_uncertain: bool,
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
