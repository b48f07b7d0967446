//! Inventory grid CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use grid_cli::logging::{LogConfig, LogFormat, init_logging};
use grid_export::ExportOutcome;
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod render;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{App, run_columns, run_config, run_export, run_list, run_summary, run_types};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let app = App::load(cli.config.clone(), cli.data_dir.clone());
    let result = match &cli.command {
        Command::Types => {
            run_types(&app);
            Ok(0)
        }
        Command::List(args) => run_list(&app, args).map(|()| 0),
        Command::Export(args) => run_export(&app, args).map(|outcome| match outcome {
            ExportOutcome::Failed => 1,
            ExportOutcome::Delivered { .. } | ExportOutcome::Empty => 0,
        }),
        Command::Columns(args) => run_columns(&app, args).map(|()| 0),
        Command::Summary(args) => run_summary(&app, args).map(|()| 0),
        Command::Config { init } => run_config(&app, *init).map(|()| 0),
    };
    let exit_code = match result {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
