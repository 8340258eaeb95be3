//! nmap 스캔 리포트 추출기
//!
//! nmap `-oX` 출력의 `host` 요소들을 [`ScanRecord`] 목록으로 펼칩니다.
//! 호스트 하나는 (OS 후보 × CPE) 조합 수만큼의 레코드가 됩니다.
//!
//! 호스트가 주소나 포트를 여러 개 보고해도 첫 번째 것만 읽습니다.
//! 원본 데이터 계보를 유지하기 위한 알려진 제약입니다.

use roxmltree::{Document, Node};
use tracing::debug;

use riskcorr_core::types::ScanRecord;

use crate::error::ExtractError;

/// nmap 리포트 XML에서 스캔 레코드를 추출합니다.
///
/// 호스트마다 `starttime` 속성, 첫 `address`의 `addr`, 첫 `ports/port`의
/// `portid`가 필수이며 하나라도 없으면 전체 추출이 실패합니다.
/// OS 후보(`os/osmatch/osclass`)는 없어도 되며, 이 경우 `accuracy`와
/// `cpe`가 빈 문자열인 레코드 하나가 만들어집니다.
///
/// # Errors
///
/// - XML 문법 오류: [`ExtractError::Xml`]
/// - 필수 요소/속성 누락: [`ExtractError::MissingElement`] / [`ExtractError::MissingAttribute`]
pub fn extract_scan_records(xml: &str) -> Result<Vec<ScanRecord>, ExtractError> {
    let doc = Document::parse(xml)?;
    let mut records = Vec::new();

    for host in child_elements(doc.root_element(), "host") {
        extract_host(host, &mut records)?;
    }

    debug!(count = records.len(), "scan extraction complete");
    Ok(records)
}

/// host 하나를 레코드로 펼칩니다.
fn extract_host(host: Node<'_, '_>, records: &mut Vec<ScanRecord>) -> Result<(), ExtractError> {
    let start_time = host
        .attribute("starttime")
        .ok_or(ExtractError::MissingAttribute {
            element: "host",
            attribute: "starttime",
        })?;

    // 첫 번째 address만 사용 (복수 주소 호스트의 나머지는 무시)
    let address = child_elements(host, "address")
        .next()
        .ok_or(ExtractError::MissingElement {
            parent: "host",
            element: "address",
        })?;
    let ip_address = address
        .attribute("addr")
        .ok_or(ExtractError::MissingAttribute {
            element: "address",
            attribute: "addr",
        })?;

    // 첫 번째 ports/port만 사용
    let ports = child_elements(host, "ports")
        .next()
        .ok_or(ExtractError::MissingElement {
            parent: "host",
            element: "ports",
        })?;
    let port = child_elements(ports, "port")
        .next()
        .ok_or(ExtractError::MissingElement {
            parent: "ports",
            element: "port",
        })?;
    let port_number = port
        .attribute("portid")
        .ok_or(ExtractError::MissingAttribute {
            element: "port",
            attribute: "portid",
        })?;

    let base = ScanRecord {
        ip_address: ip_address.to_owned(),
        port_number: port_number.to_owned(),
        start_time: start_time.to_owned(),
        accuracy: String::new(),
        cpe: String::new(),
    };

    let before = records.len();
    for osmatch in child_elements(host, "os").flat_map(|os| child_elements(os, "osmatch")) {
        for osclass in child_elements(osmatch, "osclass") {
            let accuracy = osclass.attribute("accuracy").unwrap_or("");
            let mut emitted = false;
            for cpe in child_elements(osclass, "cpe") {
                records.push(ScanRecord {
                    accuracy: accuracy.to_owned(),
                    cpe: cpe.text().unwrap_or("").to_owned(),
                    ..base.clone()
                });
                emitted = true;
            }
            // CPE가 하나도 없는 후보도 정확도는 보존한다
            if !emitted {
                records.push(ScanRecord {
                    accuracy: accuracy.to_owned(),
                    ..base.clone()
                });
            }
        }
    }

    // OS 후보가 전혀 없는 호스트도 레코드 하나는 남긴다
    if records.len() == before {
        records.push(base);
    }

    Ok(())
}

/// 로컬 이름이 일치하는 자식 요소 이터레이터.
fn child_elements<'a, 'input>(
    node: Node<'a, 'input>,
    local_name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == local_name)
}
