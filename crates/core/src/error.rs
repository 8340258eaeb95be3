//! 에러 타입 — 도메인별 에러 정의

/// riskcorr 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum RiskcorrError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 파싱 에러
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// 스토리지 에러
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 파싱 에러
///
/// 입력 XML이 깨졌거나 필수 구조가 빠진 경우(`Malformed`)와,
/// 구조는 있으나 필수 하위 값이 빠진 데이터 품질 문제(`IncompleteData`)를 구분합니다.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// 문서 구조 결함 (XML 문법 오류, 필수 요소/속성 누락)
    #[error("malformed document: {reason}")]
    Malformed { reason: String },

    /// 데이터 품질 결함 (블록은 존재하나 필수 하위 값 누락)
    #[error("incomplete data: {reason}")]
    IncompleteData { reason: String },
}

/// 스토리지 에러
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// 연결 실패
    #[error("connection failed: {0}")]
    Connection(String),

    /// 쿼리 실패
    #[error("query failed: {0}")]
    Query(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display_includes_path() {
        let err = RiskcorrError::Config(ConfigError::FileNotFound {
            path: "riskcorr.toml".to_owned(),
        });
        assert!(err.to_string().contains("riskcorr.toml"));
        assert!(err.to_string().starts_with("config error"));
    }

    #[test]
    fn parse_error_variants_are_distinguishable() {
        let malformed = ParseError::Malformed {
            reason: "unexpected end of document".to_owned(),
        };
        let incomplete = ParseError::IncompleteData {
            reason: "entry has metrics but no score".to_owned(),
        };
        assert!(malformed.to_string().contains("malformed"));
        assert!(incomplete.to_string().contains("incomplete"));
    }

    #[test]
    fn io_error_converts_to_top_level() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: RiskcorrError = io.into();
        assert!(matches!(err, RiskcorrError::Io(_)));
    }

    #[test]
    fn storage_error_display() {
        let err = RiskcorrError::Storage(StorageError::Query("no such table: scan".to_owned()));
        assert!(err.to_string().contains("no such table"));
    }
}
