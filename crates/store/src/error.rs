//! 스토어 에러 타입

use riskcorr_core::error::{RiskcorrError, StorageError};

/// SQLite 스토어에서 발생하는 에러
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// 데이터베이스 파일 열기 실패
    #[error("failed to open database '{path}': {reason}")]
    Open { path: String, reason: String },

    /// SQLite 쿼리 실패
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl From<StoreError> for RiskcorrError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Open { .. } => RiskcorrError::Storage(StorageError::Connection(e.to_string())),
            StoreError::Sqlite(_) => RiskcorrError::Storage(StorageError::Query(e.to_string())),
        }
    }
}
