//! One-shot batch orchestration
//!
//! The batch is strictly sequential: schema, vulnerability load, scan load,
//! correlation, deduplication. Any failure aborts the run; nothing is
//! retried. Re-running against the same database is safe because schema
//! creation is idempotent and deduplication collapses repeated rows.

use tracing::info;

use riskcorr_extract::{extract_scan_records, extract_vuln_records};
use riskcorr_store::RiskStore;

use crate::error::CliError;

/// Counters produced by a completed pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSummary {
    /// Vulnerability rows loaded from the CVE feed.
    pub vuln_records: usize,
    /// Scan rows loaded from the nmap report.
    pub scan_records: usize,
    /// Rows the correlation join inserted.
    pub correlated: usize,
    /// Rows removed by deduplication across all three tables.
    pub duplicates_removed: usize,
}

/// Execute the full batch against an open store.
///
/// The store handle is passed in by the caller; this function never
/// decides where the database lives.
pub fn run_pipeline(
    store: &mut RiskStore,
    cve_xml: &str,
    scan_xml: &str,
) -> Result<PipelineSummary, CliError> {
    store.create_schema()?;

    let vulns = extract_vuln_records(cve_xml)?;
    store.insert_vuln_records(&vulns)?;
    info!(count = vulns.len(), "vulnerability records loaded");

    let scans = extract_scan_records(scan_xml)?;
    store.insert_scan_records(&scans)?;
    info!(count = scans.len(), "scan records loaded");

    let correlated = store.correlate()?;
    let duplicates_removed = store.dedup_all()?;

    Ok(PipelineSummary {
        vuln_records: vulns.len(),
        scan_records: scans.len(),
        correlated,
        duplicates_removed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use riskcorr_store::Table;

    const CVE_FEED: &str = r#"<?xml version="1.0"?>
<nvd xmlns="http://scap.nist.gov/schema/feed/vulnerability/2.0">
  <entry id="CVE-2013-5948">
    <vulnerable-software-list>
      <product>cpe:/h:asus:rt-53n</product>
    </vulnerable-software-list>
    <cvss>
      <base_metrics>
        <score>9.3</score>
        <access-vector>NETWORK</access-vector>
        <authentication>NONE</authentication>
        <confidentiality-impact>COMPLETE</confidentiality-impact>
        <integrity-impact>COMPLETE</integrity-impact>
        <availability-impact>COMPLETE</availability-impact>
      </base_metrics>
    </cvss>
  </entry>
  <entry id="CVE-2014-10068"></entry>
</nvd>"#;

    const SCAN_REPORT: &str = r#"<?xml version="1.0"?>
<nmaprun scanner="nmap" start="1527667881">
  <host starttime="1527667881">
    <address addr="10.15.0.0" addrtype="ipv4"/>
    <ports><port protocol="tcp" portid="443"><state state="open"/></port></ports>
    <os>
      <osmatch name="ASUS RT-N53" accuracy="86">
        <osclass type="WAP" accuracy="86"><cpe>cpe:/h:asus:rt-53n</cpe></osclass>
      </osmatch>
    </os>
  </host>
  <host starttime="1527667899">
    <address addr="10.15.0.1" addrtype="ipv4"/>
    <ports><port protocol="tcp" portid="80"><state state="open"/></port></ports>
  </host>
</nmaprun>"#;

    #[test]
    fn pipeline_end_to_end() {
        let mut store = RiskStore::open_in_memory().unwrap();
        let summary = run_pipeline(&mut store, CVE_FEED, SCAN_REPORT).unwrap();

        assert_eq!(summary.vuln_records, 2);
        assert_eq!(summary.scan_records, 2);
        assert_eq!(summary.correlated, 1);
        assert_eq!(summary.duplicates_removed, 0);

        let rows = store.correlated_records(None).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].scan.ip_address, "10.15.0.0");
        assert_eq!(rows[0].scan.port_number, "443");
        assert_eq!(rows[0].vuln.cve_id, "CVE-2013-5948");
    }

    #[test]
    fn pipeline_rerun_is_stable() {
        let mut store = RiskStore::open_in_memory().unwrap();
        run_pipeline(&mut store, CVE_FEED, SCAN_REPORT).unwrap();
        let second = run_pipeline(&mut store, CVE_FEED, SCAN_REPORT).unwrap();

        // second run's duplicates all collapse, leaving single-run contents
        assert!(second.duplicates_removed > 0);
        assert_eq!(store.count(Table::Scan).unwrap(), 2);
        assert_eq!(store.count(Table::Vulnerability).unwrap(), 2);
        assert_eq!(store.count(Table::Correlated).unwrap(), 1);
    }

    #[test]
    fn pipeline_aborts_on_malformed_feed() {
        let mut store = RiskStore::open_in_memory().unwrap();
        let result = run_pipeline(&mut store, "<nvd><entry", SCAN_REPORT);
        assert!(matches!(result, Err(CliError::Extract(_))));
        // failed before the vulnerability load, so the scan table stays empty
        assert_eq!(store.count(Table::Scan).unwrap(), 0);
    }
}
