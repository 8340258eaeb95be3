//! 도메인 타입 — 시스템 전역에서 사용되는 공통 레코드
//!
//! 추출기와 스토어가 공유하는 평탄화된(flat) 레코드를 정의합니다.
//! 모든 필드는 원본 XML의 문자열 값을 가공 없이 보존합니다.
//! 숫자처럼 보이는 값(점수, 포트 번호)도 문자열 그대로 다룹니다.

use std::fmt;

use serde::{Deserialize, Serialize};

/// CVE 취약점 레코드
///
/// NVD 피드의 entry 하나에서 추출된 행 하나를 나타냅니다.
/// 영향 플랫폼(CPE)이 여러 개인 entry는 CPE당 한 레코드로 펼쳐집니다.
///
/// `cve_id`를 제외한 모든 필드는 `Option`입니다.
/// `None`은 원본에 해당 값이 없었다는 명시적 표시이며,
/// 존재하지만 비어 있는 값(`Some("")`)과 구분됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VulnRecord {
    /// CVE 식별자 (예: CVE-2016-1234)
    pub cve_id: String,
    /// 영향받는 플랫폼 CPE 문자열
    pub cpe: Option<String>,
    /// CVSS 기본 점수
    pub cvss_score: Option<String>,
    /// 접근 벡터 (NETWORK, LOCAL 등)
    pub access_vector: Option<String>,
    /// 인증 요구 수준
    pub authentication: Option<String>,
    /// 기밀성 영향
    pub confidentiality_impact: Option<String>,
    /// 무결성 영향
    pub integrity_impact: Option<String>,
    /// 가용성 영향
    pub availability_impact: Option<String>,
}

impl VulnRecord {
    /// 식별자만 있는 레코드를 만듭니다 (나머지 필드는 전부 `None`).
    pub fn bare(cve_id: impl Into<String>) -> Self {
        Self {
            cve_id: cve_id.into(),
            cpe: None,
            cvss_score: None,
            access_vector: None,
            authentication: None,
            confidentiality_impact: None,
            integrity_impact: None,
            availability_impact: None,
        }
    }
}

impl fmt::Display for VulnRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} cpe={} score={}",
            self.cve_id,
            self.cpe.as_deref().unwrap_or("-"),
            self.cvss_score.as_deref().unwrap_or("-"),
        )
    }
}

/// 스캔 레코드
///
/// nmap 리포트의 호스트 하나에서 나온 OS 후보 하나를 나타냅니다.
/// 호스트 하나가 OS 후보 × CPE 조합 수만큼의 레코드로 펼쳐집니다.
///
/// `VulnRecord`와 달리 모든 필드가 `String`입니다.
/// 후보가 없거나 CPE가 없는 경우 `accuracy`/`cpe`는 빈 문자열이 되며,
/// 이 비대칭은 조인 의미에 영향을 주므로 의도된 것입니다
/// (빈 문자열끼리는 매칭되지만 NULL은 어떤 것과도 매칭되지 않음).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRecord {
    /// 호스트 IP 주소
    pub ip_address: String,
    /// 포트 번호 (문자열 그대로 보존)
    pub port_number: String,
    /// 스캔 시작 시각 (epoch 초, 문자열 그대로 보존)
    pub start_time: String,
    /// OS 추정 정확도 (0-100, 없으면 빈 문자열)
    pub accuracy: String,
    /// OS 후보 CPE 문자열 (없으면 빈 문자열)
    pub cpe: String,
}

impl fmt::Display for ScanRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} accuracy={} cpe={}",
            self.ip_address, self.port_number, self.accuracy, self.cpe,
        )
    }
}

/// 상관관계 레코드
///
/// 스캔 레코드와 취약점 레코드가 CPE로 매칭된 결과 행 하나입니다.
/// 관계형 표현은 스캔 5개 컬럼 + 취약점 8개 컬럼의 13컬럼 연접입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelatedRecord {
    /// 매칭된 스캔 측 레코드
    pub scan: ScanRecord,
    /// 매칭된 취약점 측 레코드
    pub vuln: VulnRecord,
}

impl fmt::Display for CorrelatedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} <- {} ({})",
            self.scan.ip_address,
            self.scan.port_number,
            self.vuln.cve_id,
            self.scan.cpe,
        )
    }
}
