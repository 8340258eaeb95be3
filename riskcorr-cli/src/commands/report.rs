//! `riskcorr report` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use riskcorr_core::config::RiskcorrConfig;
use riskcorr_core::types::CorrelatedRecord;
use riskcorr_store::{RiskStore, Table};

use crate::cli::ReportArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `report` command.
pub fn execute(
    args: ReportArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let db_path = match &args.db {
        Some(path) => path.display().to_string(),
        None => {
            let config =
                RiskcorrConfig::load(config_path).map_err(|e| CliError::Config(e.to_string()))?;
            config.database.path
        }
    };

    if !Path::new(&db_path).exists() {
        return Err(CliError::Command(format!(
            "database not found: {} (run `riskcorr run` first)",
            db_path
        )));
    }

    info!(db = %db_path, "loading correlated findings");

    let store = RiskStore::open(&db_path)?;
    store.create_schema()?;
    let total = store.count(Table::Correlated)?;
    let findings = store.correlated_records(args.limit)?;

    let report = FindingsReport {
        database: db_path,
        total,
        shown: findings.len(),
        findings,
    };
    writer.render(&report)?;

    Ok(())
}

/// Correlated findings listing.
#[derive(Serialize)]
pub struct FindingsReport {
    /// Database path that was read
    pub database: String,
    /// Total rows in the correlated table
    pub total: u64,
    /// Rows included in this report (after limit)
    pub shown: usize,
    /// The findings themselves
    pub findings: Vec<CorrelatedRecord>,
}

impl Render for FindingsReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(
            w,
            "{} ({} of {} rows, db: {})",
            "Correlated Findings".bold(),
            self.shown,
            self.total,
            self.database
        )?;

        if self.findings.is_empty() {
            writeln!(w, "  no findings")?;
            return Ok(());
        }

        writeln!(w)?;
        writeln!(
            w,
            "{:<16} {:<6} {:<16} {:<6} {}",
            "IP", "Port", "CVE", "Score", "CPE"
        )?;
        writeln!(w, "{}", "-".repeat(80))?;

        for finding in &self.findings {
            writeln!(
                w,
                "{:<16} {:<6} {:<16} {:<6} {}",
                finding.scan.ip_address,
                finding.scan.port_number,
                finding.vuln.cve_id.red(),
                finding.vuln.cvss_score.as_deref().unwrap_or("-"),
                finding.scan.cpe,
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use riskcorr_core::types::{ScanRecord, VulnRecord};

    use super::*;

    fn sample_finding() -> CorrelatedRecord {
        CorrelatedRecord {
            scan: ScanRecord {
                ip_address: "10.15.0.0".to_owned(),
                port_number: "443".to_owned(),
                start_time: "1527667881".to_owned(),
                accuracy: "86".to_owned(),
                cpe: "cpe:/h:asus:rt-53n".to_owned(),
            },
            vuln: {
                let mut v = VulnRecord::bare("CVE-2013-5948");
                v.cpe = Some("cpe:/h:asus:rt-53n".to_owned());
                v.cvss_score = Some("9.3".to_owned());
                v
            },
        }
    }

    #[test]
    fn test_findings_report_render_text() {
        let report = FindingsReport {
            database: "riskcorr.db".to_owned(),
            total: 1,
            shown: 1,
            findings: vec![sample_finding()],
        };

        let mut buffer = Vec::new();
        report
            .render_text(&mut buffer)
            .expect("text rendering should succeed");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("10.15.0.0"), "should show IP");
        assert!(output.contains("CVE-2013-5948"), "should show CVE id");
        assert!(output.contains("9.3"), "should show score");
        assert!(output.contains("cpe:/h:asus:rt-53n"), "should show CPE");
    }

    #[test]
    fn test_findings_report_render_text_empty() {
        let report = FindingsReport {
            database: "riskcorr.db".to_owned(),
            total: 0,
            shown: 0,
            findings: Vec::new(),
        };

        let mut buffer = Vec::new();
        report
            .render_text(&mut buffer)
            .expect("text rendering should succeed");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("no findings"), "should show empty notice");
    }

    #[test]
    fn test_findings_report_json_serialization() {
        let report = FindingsReport {
            database: "riskcorr.db".to_owned(),
            total: 5,
            shown: 1,
            findings: vec![sample_finding()],
        };

        let json = serde_json::to_string(&report).expect("JSON serialization should succeed");
        let parsed: serde_json::Value = serde_json::from_str(&json).expect("should parse JSON");

        assert_eq!(parsed["total"].as_u64(), Some(5));
        assert_eq!(parsed["shown"].as_u64(), Some(1));
        assert_eq!(
            parsed["findings"][0]["vuln"]["cve_id"].as_str(),
            Some("CVE-2013-5948")
        );
        // missing metric fields serialize as null, not empty string
        assert!(parsed["findings"][0]["vuln"]["access_vector"].is_null());
    }

    #[test]
    fn test_execute_missing_database_fails() {
        let args = ReportArgs {
            limit: None,
            db: Some("/nonexistent/riskcorr.db".into()),
        };
        let writer = OutputWriter::new(crate::cli::OutputFormat::Text);
        let result = execute(args, Path::new("/nonexistent/riskcorr.toml"), &writer);
        assert!(matches!(result, Err(CliError::Command(_))));
    }
}
