//! 테이블 스키마 정의
//!
//! 컬럼 순서는 외부 인터페이스의 일부입니다. `correlated` 테이블은
//! 스캔 5개 컬럼 뒤에 취약점 8개 컬럼이 오는 13컬럼 연접이며,
//! `INSERT INTO correlated SELECT s.*, v.* ...` 조인이 이 순서에 의존합니다.

use crate::error::StoreError;

pub(crate) const SCHEMA_SQL: &str = r#"
-- 스캔 레코드 (호스트 × OS 후보 × CPE당 한 행)
CREATE TABLE IF NOT EXISTS scan (
    ip_address  TEXT NOT NULL,
    port_number TEXT NOT NULL,
    start_time  TEXT NOT NULL,
    accuracy    TEXT NOT NULL,
    cpe         TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_scan_cpe ON scan(cpe);

-- 취약점 레코드 (CVE entry × 영향 플랫폼당 한 행)
-- cve_id 외의 컬럼은 원본에 값이 없으면 NULL
CREATE TABLE IF NOT EXISTS vulnerability (
    cve_id                 TEXT NOT NULL,
    cpe                    TEXT,
    cvss_score             TEXT,
    access_vector          TEXT,
    authentication         TEXT,
    confidentiality_impact TEXT,
    integrity_impact       TEXT,
    availability_impact    TEXT
);
CREATE INDEX IF NOT EXISTS idx_vulnerability_cpe ON vulnerability(cpe);

-- 상관관계 결과 (scan 컬럼 + vulnerability 컬럼의 연접)
CREATE TABLE IF NOT EXISTS correlated (
    ip_address             TEXT NOT NULL,
    port_number            TEXT NOT NULL,
    start_time             TEXT NOT NULL,
    accuracy               TEXT NOT NULL,
    scan_cpe               TEXT NOT NULL,
    cve_id                 TEXT NOT NULL,
    cpe                    TEXT,
    cvss_score             TEXT,
    access_vector          TEXT,
    authentication         TEXT,
    confidentiality_impact TEXT,
    integrity_impact       TEXT,
    availability_impact    TEXT
);
"#;

/// 스토어가 관리하는 세 테이블.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    /// 스캔 레코드
    Scan,
    /// 취약점 레코드
    Vulnerability,
    /// 상관관계 결과
    Correlated,
}

impl Table {
    /// 전체 테이블 목록 (중복 제거 순회용).
    pub const ALL: [Table; 3] = [Table::Scan, Table::Vulnerability, Table::Correlated];

    /// SQL 테이블명.
    pub fn name(self) -> &'static str {
        match self {
            Table::Scan => "scan",
            Table::Vulnerability => "vulnerability",
            Table::Correlated => "correlated",
        }
    }

    /// 선언 순서대로의 컬럼 목록. 중복 제거의 GROUP BY 기준이 됩니다.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Table::Scan => &["ip_address", "port_number", "start_time", "accuracy", "cpe"],
            Table::Vulnerability => &[
                "cve_id",
                "cpe",
                "cvss_score",
                "access_vector",
                "authentication",
                "confidentiality_impact",
                "integrity_impact",
                "availability_impact",
            ],
            Table::Correlated => &[
                "ip_address",
                "port_number",
                "start_time",
                "accuracy",
                "scan_cpe",
                "cve_id",
                "cpe",
                "cvss_score",
                "access_vector",
                "authentication",
                "confidentiality_impact",
                "integrity_impact",
                "availability_impact",
            ],
        }
    }
}

/// 스키마를 생성합니다. `CREATE TABLE IF NOT EXISTS`라 재실행해도 안전합니다.
pub(crate) fn create_tables(conn: &rusqlite::Connection) -> Result<(), StoreError> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
