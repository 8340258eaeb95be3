//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// riskcorr -- correlate nmap scan reports with NVD CVE feeds.
///
/// Use `riskcorr <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "riskcorr", version, about, long_about = None)]
pub struct Cli {
    /// Path to the riskcorr.toml configuration file.
    #[arg(short, long, default_value = "riskcorr.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full extract-load-correlate-dedup batch.
    Run(RunArgs),

    /// Print the correlated findings table.
    Report(ReportArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- run ----

/// Run the one-shot correlation batch.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// NVD CVE feed XML path (overrides the config file).
    #[arg(long)]
    pub cve_feed: Option<PathBuf>,

    /// nmap scan report XML path (overrides the config file).
    #[arg(long)]
    pub scan_report: Option<PathBuf>,

    /// SQLite database path (overrides the config file).
    #[arg(long)]
    pub db: Option<PathBuf>,
}

// ---- report ----

/// Display correlated findings.
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Maximum number of rows to display.
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// SQLite database path (overrides the config file).
    #[arg(long)]
    pub db: Option<PathBuf>,
}

// ---- config ----

/// Manage riskcorr configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, inputs, database).
        #[arg(long)]
        section: Option<String>,
    },
}
