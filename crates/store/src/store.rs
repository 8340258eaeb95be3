//! SQLite 기반 관계형 스토어
//!
//! [`RiskStore`]는 연결 하나를 소유하며 모든 연산은 동기적으로 수행됩니다.
//! 반환 시점에는 항상 커밋이 끝나 있습니다.

use std::path::Path;

use rusqlite::{Connection, params};
use tracing::{debug, info};

use riskcorr_core::types::{CorrelatedRecord, ScanRecord, VulnRecord};

use crate::error::StoreError;
use crate::schema::{self, Table};

/// 추출된 레코드를 담는 SQLite 스토어.
pub struct RiskStore {
    pub(crate) conn: Connection,
}

impl RiskStore {
    /// 파일 기반 데이터베이스를 엽니다.
    ///
    /// WAL 저널 모드를 사용합니다. 스키마는 생성하지 않으므로
    /// 쓰기 전에 [`create_schema`](Self::create_schema)를 호출해야 합니다.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| StoreError::Open {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        info!(path = %path.display(), "database opened");
        Ok(Self { conn })
    }

    /// 인메모리 데이터베이스를 엽니다. 주로 테스트용입니다.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// 세 테이블과 인덱스를 생성합니다. 재실행해도 안전합니다.
    pub fn create_schema(&self) -> Result<(), StoreError> {
        schema::create_tables(&self.conn)
    }

    /// 스캔 레코드를 단일 트랜잭션으로 일괄 삽입합니다.
    ///
    /// 중간에 실패하면 전체가 롤백됩니다. 삽입된 행 수를 반환합니다.
    pub fn insert_scan_records(&mut self, records: &[ScanRecord]) -> Result<usize, StoreError> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO scan (ip_address, port_number, start_time, accuracy, cpe)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for record in records {
                stmt.execute(params![
                    record.ip_address,
                    record.port_number,
                    record.start_time,
                    record.accuracy,
                    record.cpe,
                ])?;
            }
        }
        tx.commit()?;
        debug!(count = records.len(), "scan records inserted");
        Ok(records.len())
    }

    /// 취약점 레코드를 단일 트랜잭션으로 일괄 삽입합니다.
    ///
    /// `None` 필드는 SQL `NULL`로 저장됩니다. 삽입된 행 수를 반환합니다.
    pub fn insert_vuln_records(&mut self, records: &[VulnRecord]) -> Result<usize, StoreError> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO vulnerability (cve_id, cpe, cvss_score, access_vector,
                     authentication, confidentiality_impact, integrity_impact, availability_impact)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for record in records {
                stmt.execute(params![
                    record.cve_id,
                    record.cpe,
                    record.cvss_score,
                    record.access_vector,
                    record.authentication,
                    record.confidentiality_impact,
                    record.integrity_impact,
                    record.availability_impact,
                ])?;
            }
        }
        tx.commit()?;
        debug!(count = records.len(), "vulnerability records inserted");
        Ok(records.len())
    }

    /// scan 테이블 전체를 rowid 순으로 읽습니다.
    pub fn scan_records(&self) -> Result<Vec<ScanRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT ip_address, port_number, start_time, accuracy, cpe
             FROM scan ORDER BY rowid",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(ScanRecord {
                ip_address: row.get(0)?,
                port_number: row.get(1)?,
                start_time: row.get(2)?,
                accuracy: row.get(3)?,
                cpe: row.get(4)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// vulnerability 테이블 전체를 rowid 순으로 읽습니다.
    pub fn vuln_records(&self) -> Result<Vec<VulnRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT cve_id, cpe, cvss_score, access_vector, authentication,
                    confidentiality_impact, integrity_impact, availability_impact
             FROM vulnerability ORDER BY rowid",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(VulnRecord {
                cve_id: row.get(0)?,
                cpe: row.get(1)?,
                cvss_score: row.get(2)?,
                access_vector: row.get(3)?,
                authentication: row.get(4)?,
                confidentiality_impact: row.get(5)?,
                integrity_impact: row.get(6)?,
                availability_impact: row.get(7)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// correlated 테이블 전체를 rowid 순으로 읽습니다.
    ///
    /// 조회 시 `limit`으로 행 수를 제한할 수 있습니다 (`None`이면 전체).
    pub fn correlated_records(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<CorrelatedRecord>, StoreError> {
        let sql = match limit {
            Some(n) => format!(
                "SELECT ip_address, port_number, start_time, accuracy, scan_cpe,
                        cve_id, cpe, cvss_score, access_vector, authentication,
                        confidentiality_impact, integrity_impact, availability_impact
                 FROM correlated ORDER BY rowid LIMIT {n}"
            ),
            None => "SELECT ip_address, port_number, start_time, accuracy, scan_cpe,
                            cve_id, cpe, cvss_score, access_vector, authentication,
                            confidentiality_impact, integrity_impact, availability_impact
                     FROM correlated ORDER BY rowid"
                .to_owned(),
        };
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| {
            Ok(CorrelatedRecord {
                scan: ScanRecord {
                    ip_address: row.get(0)?,
                    port_number: row.get(1)?,
                    start_time: row.get(2)?,
                    accuracy: row.get(3)?,
                    cpe: row.get(4)?,
                },
                vuln: VulnRecord {
                    cve_id: row.get(5)?,
                    cpe: row.get(6)?,
                    cvss_score: row.get(7)?,
                    access_vector: row.get(8)?,
                    authentication: row.get(9)?,
                    confidentiality_impact: row.get(10)?,
                    integrity_impact: row.get(11)?,
                    availability_impact: row.get(12)?,
                },
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// 테이블의 행 수를 반환합니다.
    pub fn count(&self, table: Table) -> Result<u64, StoreError> {
        let sql = format!("SELECT COUNT(*) FROM {}", table.name());
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
