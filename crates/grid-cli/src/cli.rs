//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use grid_cli::query::parse_key_value;
use grid_export::ExportFormat;

#[derive(Parser)]
#[command(
    name = "inventory-grid",
    version,
    about = "Browse, filter and export collected cloud inventory",
    long_about = "Browse, filter and export collected cloud inventory.\n\n\
                  Listings are read from <DATA_DIR>/<ResourceType>.json, either a JSON\n\
                  array of records or an object with an \"items\" array."
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

    /// Log output format.
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

    /// Settings file (default: platform config directory).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Directory with resource listings (overrides settings).
    #[arg(long = "data-dir", value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the resource types in the catalog.
    Types,

    /// Show one page of a resource grid.
    List(ListArgs),

    /// Export every matching record of a resource grid.
    Export(ExportArgs),

    /// Show or change the visible columns of a resource grid.
    Columns(ColumnsArgs),

    /// Value distributions and totals over matching records.
    Summary(SummaryArgs),

    /// Print the effective settings and where they are stored.
    Config {
        /// Write the settings file if it does not exist yet.
        #[arg(long)]
        init: bool,
    },
}

/// Search, filter and sort options shared by grid commands.
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// Resource type, e.g. EC2Instance (case-insensitive).
    #[arg(value_name = "TYPE")]
    pub resource_type: String,

    /// Free-text search over searchable columns.
    #[arg(long, short = 's', value_name = "TERM")]
    pub search: Option<String>,

    /// Typed filter, e.g. region=eu-west-1, hasSchedules=yes, lastRun=stale.
    #[arg(long = "filter", short = 'f', value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub filters: Vec<(String, String)>,

    /// Column to sort by.
    #[arg(long, value_name = "COLUMN")]
    pub sort: Option<String>,

    /// Sort descending.
    #[arg(long, requires = "sort")]
    pub desc: bool,
}

#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Page to show (1-based; out-of-range values are clamped).
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    pub page: i64,

    /// Rows per page (default from settings).
    #[arg(long = "page-size", value_name = "N")]
    pub page_size: Option<usize>,

    /// List the options of an exact filter instead of rows.
    #[arg(long = "options", value_name = "FIELD")]
    pub options: Option<String>,
}

#[derive(Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Export format (default from settings).
    #[arg(long, value_enum)]
    pub format: Option<ExportFormatArg>,

    /// Output directory (default from settings).
    #[arg(long, short = 'o', value_name = "DIR")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ColumnsArgs {
    /// Resource type (case-insensitive).
    #[arg(value_name = "TYPE")]
    pub resource_type: String,

    /// Column to show.
    #[arg(long, value_name = "KEY")]
    pub show: Vec<String>,

    /// Column to hide (required columns stay visible).
    #[arg(long, value_name = "KEY")]
    pub hide: Vec<String>,

    /// Show every column.
    #[arg(long, conflicts_with = "none")]
    pub all: bool,

    /// Hide every optional column.
    #[arg(long)]
    pub none: bool,

    /// Return to the schema's default columns.
    #[arg(long, conflicts_with_all = ["all", "none"])]
    pub reset: bool,
}

impl ColumnsArgs {
    pub fn has_changes(&self) -> bool {
        self.all || self.none || self.reset || !self.show.is_empty() || !self.hide.is_empty()
    }
}

#[derive(Args)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Field to count values of (repeatable).
    #[arg(long = "by", value_name = "FIELD")]
    pub by: Vec<String>,

    /// Numeric field to total (repeatable).
    #[arg(long = "sum", value_name = "FIELD")]
    pub sum: Vec<String>,

    /// Show only the most frequent values.
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ExportFormatArg {
    Csv,
    Sheet,
}

impl From<ExportFormatArg> for ExportFormat {
    fn from(arg: ExportFormatArg) -> Self {
        match arg {
            ExportFormatArg::Csv => ExportFormat::Csv,
            ExportFormatArg::Sheet => ExportFormat::Sheet,
        }
    }
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
