//! NVD CVE 피드 추출기
//!
//! NVD 2.0 XML 피드의 `entry` 요소들을 [`VulnRecord`] 목록으로 펼칩니다.
//! entry 하나는 (CVSS 메트릭 유무 × 영향 플랫폼 목록 유무)에 따라
//! 네 가지 경우로 나뉘며, 플랫폼이 여러 개면 플랫폼당 한 레코드가 됩니다.

use roxmltree::{Document, Node};
use tracing::debug;

use riskcorr_core::types::VulnRecord;

use crate::error::ExtractError;

/// CVSS base_metrics 블록에서 반드시 읽어야 하는 여섯 개 하위 요소.
const METRIC_FIELDS: [&str; 6] = [
    "score",
    "access-vector",
    "authentication",
    "confidentiality-impact",
    "integrity-impact",
    "availability-impact",
];

/// NVD 피드 XML에서 취약점 레코드를 추출합니다.
///
/// 요소는 로컬 이름으로만 매칭하며 네임스페이스 URI는 검증하지 않습니다.
///
/// # Errors
///
/// - XML 문법 오류: [`ExtractError::Xml`]
/// - entry에 `id` 속성 없음: [`ExtractError::MissingAttribute`]
/// - 메트릭 블록은 있으나 하위 값 누락: [`ExtractError::MissingMetric`]
pub fn extract_vuln_records(xml: &str) -> Result<Vec<VulnRecord>, ExtractError> {
    let doc = Document::parse(xml)?;
    let mut records = Vec::new();

    for entry in child_elements(doc.root_element(), "entry") {
        extract_entry(entry, &mut records)?;
    }

    debug!(count = records.len(), "vulnerability extraction complete");
    Ok(records)
}

/// entry 하나를 레코드로 펼칩니다.
fn extract_entry(entry: Node<'_, '_>, records: &mut Vec<VulnRecord>) -> Result<(), ExtractError> {
    let cve_id = entry
        .attribute("id")
        .ok_or(ExtractError::MissingAttribute {
            element: "entry",
            attribute: "id",
        })?;

    // cvss/base_metrics 블록 (없을 수 있음)
    let metrics = child_elements(entry, "cvss")
        .next()
        .and_then(|cvss| child_elements(cvss, "base_metrics").next());

    // vulnerable-software-list/product 텍스트 리프 (없거나 비어 있을 수 있음)
    // 리스트 요소가 반복되면 모든 리스트의 product를 순서대로 모은다
    let products: Vec<String> = child_elements(entry, "vulnerable-software-list")
        .flat_map(|list| child_elements(list, "product"))
        .map(|p| p.text().unwrap_or("").to_owned())
        .collect();

    // 메트릭 블록이 존재하면 여섯 값 모두 필수. 하나라도 빠지면 기본값으로
    // 메우지 않고 전체 추출을 실패시킨다.
    let metric_values = match metrics {
        Some(block) => Some(read_metrics(block, cve_id)?),
        None => None,
    };

    match (&metric_values, products.is_empty()) {
        // 메트릭 있음 + 플랫폼 있음: 플랫폼당 한 레코드, 메트릭 값 공유
        (Some(values), false) => {
            for product in products {
                records.push(values.to_record(cve_id, Some(product)));
            }
        }
        // 메트릭 있음 + 플랫폼 없음: cpe만 비운 레코드 하나
        (Some(values), true) => {
            records.push(values.to_record(cve_id, None));
        }
        // 메트릭 없음 + 플랫폼 있음: 플랫폼당 한 레코드, 메트릭 전부 None
        (None, false) => {
            for product in products {
                let mut record = VulnRecord::bare(cve_id);
                record.cpe = Some(product);
                records.push(record);
            }
        }
        // 메트릭 없음 + 플랫폼 없음: 식별자만 있는 레코드 하나
        (None, true) => {
            records.push(VulnRecord::bare(cve_id));
        }
    }

    Ok(())
}

/// base_metrics 블록에서 읽은 여섯 개 메트릭 값.
struct MetricValues {
    score: String,
    access_vector: String,
    authentication: String,
    confidentiality_impact: String,
    integrity_impact: String,
    availability_impact: String,
}

impl MetricValues {
    fn to_record(&self, cve_id: &str, cpe: Option<String>) -> VulnRecord {
        VulnRecord {
            cve_id: cve_id.to_owned(),
            cpe,
            cvss_score: Some(self.score.clone()),
            access_vector: Some(self.access_vector.clone()),
            authentication: Some(self.authentication.clone()),
            confidentiality_impact: Some(self.confidentiality_impact.clone()),
            integrity_impact: Some(self.integrity_impact.clone()),
            availability_impact: Some(self.availability_impact.clone()),
        }
    }
}

fn read_metrics(block: Node<'_, '_>, cve_id: &str) -> Result<MetricValues, ExtractError> {
    let mut values: [String; 6] = Default::default();
    for (slot, field) in values.iter_mut().zip(METRIC_FIELDS) {
        let node = child_elements(block, field)
            .next()
            .ok_or_else(|| ExtractError::MissingMetric {
                cve_id: cve_id.to_owned(),
                field,
            })?;
        // 존재하지만 비어 있는 리프는 빈 문자열로 보존
        *slot = node.text().unwrap_or("").to_owned();
    }
    let [score, access_vector, authentication, confidentiality_impact, integrity_impact, availability_impact] =
        values;
    Ok(MetricValues {
        score,
        access_vector,
        authentication,
        confidentiality_impact,
        integrity_impact,
        availability_impact,
    })
}

/// 로컬 이름이 일치하는 자식 요소 이터레이터.
fn child_elements<'a, 'input>(
    node: Node<'a, 'input>,
    local_name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == local_name)
}
