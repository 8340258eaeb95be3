//! `riskcorr run` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use riskcorr_core::config::RiskcorrConfig;
use riskcorr_store::RiskStore;

use crate::cli::RunArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};
use crate::pipeline;

/// Execute the `run` command.
pub fn execute(args: RunArgs, config_path: &Path, writer: &OutputWriter) -> Result<(), CliError> {
    let config = effective_config(&args, config_path)?;

    info!(
        cve_feed = %config.inputs.cve_feed,
        scan_report = %config.inputs.scan_report,
        db = %config.database.path,
        "starting correlation run"
    );

    let cve_xml = std::fs::read_to_string(&config.inputs.cve_feed)?;
    let scan_xml = std::fs::read_to_string(&config.inputs.scan_report)?;

    let mut store = RiskStore::open(&config.database.path)?;
    let summary = pipeline::run_pipeline(&mut store, &cve_xml, &scan_xml)?;

    let report = RunReport {
        cve_feed: config.inputs.cve_feed,
        scan_report: config.inputs.scan_report,
        database: config.database.path,
        vuln_records: summary.vuln_records,
        scan_records: summary.scan_records,
        correlated: summary.correlated,
        duplicates_removed: summary.duplicates_removed,
    };
    writer.render(&report)?;

    Ok(())
}

/// Resolve the effective configuration for this run.
///
/// Precedence: CLI arguments > environment variables > config file > defaults.
/// A missing config file is tolerated when both input paths are given on the
/// command line; otherwise it is an error.
fn effective_config(args: &RunArgs, config_path: &Path) -> Result<RiskcorrConfig, CliError> {
    let mut config = if config_path.exists() {
        RiskcorrConfig::load(config_path).map_err(|e| CliError::Config(e.to_string()))?
    } else if args.cve_feed.is_some() && args.scan_report.is_some() {
        RiskcorrConfig::from_env().map_err(|e| CliError::Config(e.to_string()))?
    } else {
        return Err(CliError::Config(format!(
            "config file not found: {} (pass --cve-feed and --scan-report to run without one)",
            config_path.display()
        )));
    };

    if let Some(path) = &args.cve_feed {
        config.inputs.cve_feed = path.display().to_string();
    }
    if let Some(path) = &args.scan_report {
        config.inputs.scan_report = path.display().to_string();
    }
    if let Some(path) = &args.db {
        config.database.path = path.display().to_string();
    }

    Ok(config)
}

/// Summary of a completed correlation run.
#[derive(Serialize)]
pub struct RunReport {
    /// CVE feed path that was read
    pub cve_feed: String,
    /// Scan report path that was read
    pub scan_report: String,
    /// Database path that was written
    pub database: String,
    /// Vulnerability rows loaded
    pub vuln_records: usize,
    /// Scan rows loaded
    pub scan_records: usize,
    /// Rows produced by the correlation join
    pub correlated: usize,
    /// Rows removed by deduplication
    pub duplicates_removed: usize,
}

impl Render for RunReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "{}", "Correlation Run".bold())?;
        writeln!(w, "  CVE feed:     {}", self.cve_feed)?;
        writeln!(w, "  Scan report:  {}", self.scan_report)?;
        writeln!(w, "  Database:     {}", self.database)?;
        writeln!(w)?;
        writeln!(w, "  Vulnerability records: {}", self.vuln_records)?;
        writeln!(w, "  Scan records:          {}", self.scan_records)?;
        writeln!(
            w,
            "  Correlated findings:   {}",
            self.correlated.to_string().green().bold()
        )?;
        writeln!(w, "  Duplicates removed:    {}", self.duplicates_removed)?;

        Ok(())
    }
}
