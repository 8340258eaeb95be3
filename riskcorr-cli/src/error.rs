//! CLI-specific error types and exit code mapping

use riskcorr_core::error::RiskcorrError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to standard Unix exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// XML extraction failed.
    #[error("extract error: {0}")]
    Extract(String),

    /// Database operation failed.
    #[error("store error: {0}")]
    Store(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from riskcorr-core.
    #[error("{0}")]
    Core(#[from] RiskcorrError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                 |
    /// |------|-------------------------|
    /// | 0    | Success                 |
    /// | 1    | General / command error |
    /// | 2    | Configuration error     |
    /// | 4    | Database error          |
    /// | 5    | Extraction error        |
    /// | 10   | IO error                |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Store(_) => 4,
            Self::Extract(_) => 5,
            Self::Io(_) => 10,
            Self::JsonSerialize(_) | Self::Command(_) | Self::Core(_) => 1,
        }
    }
}

impl From<riskcorr_extract::ExtractError> for CliError {
    fn from(e: riskcorr_extract::ExtractError) -> Self {
        Self::Extract(e.to_string())
    }
}

impl From<riskcorr_store::StoreError> for CliError {
    fn from(e: riskcorr_store::StoreError) -> Self {
        Self::Store(e.to_string())
    }
}
