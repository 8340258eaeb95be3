//! 상관관계 조인과 중복 제거
//!
//! 두 연산 모두 SQL 선언문 하나로 수행됩니다. 조인 의미(NULL 불일치,
//! N×M 곱집합)와 중복 제거 의미(NULL끼리 같은 그룹)는 SQLite의
//! 표준 동작을 그대로 사용합니다.

use tracing::info;

use crate::error::StoreError;
use crate::schema::Table;
use crate::store::RiskStore;

impl RiskStore {
    /// scan과 vulnerability를 CPE 문자열 동등으로 내부 조인하여
    /// correlated 테이블에 추가합니다.
    ///
    /// - 대소문자를 구분하는 정확한 문자열 비교입니다.
    /// - 취약점 측 `cpe`가 NULL인 행은 어떤 것과도 매칭되지 않습니다.
    /// - 같은 CPE의 스캔 행 N개와 취약점 행 M개는 N×M개의 결과 행이 됩니다.
    /// - 기존 correlated 행은 건드리지 않고 추가만 합니다.
    ///
    /// 삽입된 행 수를 반환합니다.
    pub fn correlate(&self) -> Result<usize, StoreError> {
        let inserted = self.conn.execute(
            "INSERT INTO correlated
             SELECT s.*, v.*
             FROM scan s INNER JOIN vulnerability v ON s.cpe = v.cpe",
            [],
        )?;
        info!(inserted, "correlation complete");
        Ok(inserted)
    }

    /// 전체 컬럼이 동일한 행 그룹에서 최소 rowid 행만 남기고 삭제합니다.
    ///
    /// SQLite의 GROUP BY는 같은 컬럼의 NULL들을 같은 그룹으로 취급하므로
    /// 없는 값끼리도 중복으로 접힙니다. 삭제된 행 수를 반환하며,
    /// 재실행하면 0을 반환합니다.
    pub fn dedup(&self, table: Table) -> Result<usize, StoreError> {
        let sql = format!(
            "DELETE FROM {t} WHERE rowid NOT IN
             (SELECT MIN(rowid) FROM {t} GROUP BY {cols})",
            t = table.name(),
            cols = table.columns().join(", "),
        );
        let deleted = self.conn.execute(&sql, [])?;
        info!(table = table.name(), deleted, "deduplication complete");
        Ok(deleted)
    }

    /// 세 테이블 모두 중복 제거를 수행하고 삭제된 행 수의 합을 반환합니다.
    pub fn dedup_all(&self) -> Result<usize, StoreError> {
        let mut total = 0;
        for table in Table::ALL {
            total += self.dedup(table)?;
        }
        Ok(total)
    }
}
