//! 설정 관리 — riskcorr.toml 파싱 및 런타임 설정
//!
//! [`RiskcorrConfig`]는 전체 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`RISKCORR_DATABASE_PATH=/tmp/riskcorr.db` 형식)
//! 3. 설정 파일 (`riskcorr.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # fn example() -> Result<(), riskcorr_core::error::RiskcorrError> {
//! use riskcorr_core::config::RiskcorrConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = RiskcorrConfig::load("riskcorr.toml")?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = RiskcorrConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, RiskcorrError};

/// riskcorr 통합 설정
///
/// `riskcorr.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RiskcorrConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 입력 파일 설정
    #[serde(default)]
    pub inputs: InputsConfig,
    /// 데이터베이스 설정
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl RiskcorrConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    ///
    /// 설정 로딩 순서:
    /// 1. TOML 파일 파싱
    /// 2. 환경변수 오버라이드 적용
    /// 3. 유효성 검증
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RiskcorrError> {
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 기본값에 환경변수 오버라이드만 적용한 설정을 만듭니다.
    ///
    /// 설정 파일 없이 CLI 인자만으로 실행할 때 사용합니다.
    pub fn from_env() -> Result<Self, RiskcorrError> {
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RiskcorrError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RiskcorrError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                RiskcorrError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, RiskcorrError> {
        toml::from_str(toml_str).map_err(|e| {
            RiskcorrError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `RISKCORR_{SECTION}_{FIELD}`
    /// 예: `RISKCORR_INPUTS_CVE_FEED=/data/nvd.xml`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "RISKCORR_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "RISKCORR_GENERAL_LOG_FORMAT");

        // Inputs
        override_string(&mut self.inputs.cve_feed, "RISKCORR_INPUTS_CVE_FEED");
        override_string(&mut self.inputs.scan_report, "RISKCORR_INPUTS_SCAN_REPORT");

        // Database
        override_string(&mut self.database.path, "RISKCORR_DATABASE_PATH");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), RiskcorrError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        // 데이터베이스 경로 검증
        if self.database.path.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database.path".to_owned(),
                reason: "path must not be empty".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

// Default는 derive 매크로로 자동 생성 (각 필드가 Default를 구현하므로)

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 입력 파일 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputsConfig {
    /// NVD CVE 피드 XML 경로
    pub cve_feed: String,
    /// nmap 스캔 리포트 XML 경로
    pub scan_report: String,
}

impl Default for InputsConfig {
    fn default() -> Self {
        Self {
            cve_feed: "data/cve_feed.xml".to_owned(),
            scan_report: "data/scan_report.xml".to_owned(),
        }
    }
}

/// 데이터베이스 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite 데이터베이스 파일 경로
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "riskcorr.db".to_owned(),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}
