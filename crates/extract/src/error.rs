//! 추출기 에러 타입

use riskcorr_core::error::{ParseError, RiskcorrError};

/// XML 추출 과정에서 발생하는 에러
///
/// `MissingMetric`은 나머지와 성격이 다릅니다. 문서 구조는 온전하지만
/// 메트릭 블록 안의 필수 값이 빠진 데이터 품질 결함이며,
/// 코어 에러로 변환될 때도 이 구분이 유지됩니다.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// XML 문법 오류
    #[error("xml parse failed: {0}")]
    Xml(#[from] roxmltree::Error),

    /// 필수 요소 누락
    #[error("missing element '{element}' under '{parent}'")]
    MissingElement {
        parent: &'static str,
        element: &'static str,
    },

    /// 필수 속성 누락
    #[error("missing attribute '{attribute}' on '{element}'")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    /// 메트릭 블록은 있으나 필수 하위 값 누락
    #[error("entry '{cve_id}' has base metrics but no '{field}' value")]
    MissingMetric {
        cve_id: String,
        field: &'static str,
    },
}

impl From<ExtractError> for RiskcorrError {
    fn from(e: ExtractError) -> Self {
        match e {
            ExtractError::MissingMetric { .. } => {
                RiskcorrError::Parse(ParseError::IncompleteData {
                    reason: e.to_string(),
                })
            }
            _ => RiskcorrError::Parse(ParseError::Malformed {
                reason: e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_metric_converts_to_incomplete_data() {
        let err = ExtractError::MissingMetric {
            cve_id: "CVE-2016-0001".to_owned(),
            field: "score",
        };
        let core: RiskcorrError = err.into();
        assert!(matches!(
            core,
            RiskcorrError::Parse(ParseError::IncompleteData { .. })
        ));
    }

    #[test]
    fn missing_element_converts_to_malformed() {
        let err = ExtractError::MissingElement {
            parent: "host",
            element: "address",
        };
        let core: RiskcorrError = err.into();
        assert!(matches!(
            core,
            RiskcorrError::Parse(ParseError::Malformed { .. })
        ));
    }

    #[test]
    fn xml_error_converts_to_malformed() {
        let parse_err = roxmltree::Document::parse("<unclosed").unwrap_err();
        let core: RiskcorrError = ExtractError::Xml(parse_err).into();
        assert!(matches!(
            core,
            RiskcorrError::Parse(ParseError::Malformed { .. })
        ));
    }

    #[test]
    fn display_names_the_missing_piece() {
        let err = ExtractError::MissingAttribute {
            element: "entry",
            attribute: "id",
        };
        let msg = err.to_string();
        assert!(msg.contains("entry"));
        assert!(msg.contains("id"));
    }
}
