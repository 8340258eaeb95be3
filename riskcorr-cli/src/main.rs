//! riskcorr CLI entry point
//!
//! Parses arguments, initialises logging, dispatches to the subcommand
//! handler, and maps any error to a process exit code.

mod cli;
mod commands;
mod error;
mod output;
mod pipeline;

use clap::Parser;

use riskcorr_core::config::RiskcorrConfig;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

fn main() {
    let cli = Cli::parse();

    let (log_level, log_format) = logging_settings(&cli);
    init_logging(&log_level, &log_format);

    tracing::info!(config = %cli.config.display(), "riskcorr starting");

    if let Err(e) = dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(e.exit_code());
    }
}

/// Resolve the effective log level and format.
///
/// Level precedence: `--log-level` flag, then `[general].log_level` from the
/// config file, then the built-in default. The format has no CLI flag and
/// comes from `[general].log_format`. A missing or invalid config file falls
/// back to defaults here; the subcommand surfaces the real error with a
/// proper exit code.
fn logging_settings(cli: &Cli) -> (String, String) {
    let general = RiskcorrConfig::load(&cli.config)
        .map(|config| config.general)
        .unwrap_or_default();
    let level = cli.log_level.clone().unwrap_or(general.log_level);
    (level, general.log_format)
}

/// Initialise the global tracing subscriber on stderr.
fn init_logging(level: &str, format: &str) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_writer(std::io::stderr);
    if format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn dispatch(cli: Cli) -> Result<(), CliError> {
    let writer = OutputWriter::new(cli.output);

    match cli.command {
        Commands::Run(args) => commands::run::execute(args, &cli.config, &writer),
        Commands::Report(args) => commands::report::execute(args, &cli.config, &writer),
        Commands::Config(args) => commands::config::execute(args, &cli.config, &writer),
    }
}
