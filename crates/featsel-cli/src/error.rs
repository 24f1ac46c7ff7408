//! Error types for the featsel CLI.

use featsel::FeatselError;
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// Result type alias for CLI operations
pub(crate) type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub(crate) enum CliError {
    /// Input file missing
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Bad flag value or configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Dataset could not be read or is malformed
    #[error("Invalid data: {0}")]
    Data(String),

    /// Search hit the deadline
    #[error("Aborted: {0}")]
    Aborted(String),

    /// Every requested optimizer failed
    #[error("All optimizers failed")]
    AllFailed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything else from the library
    #[error("{0}")]
    Featsel(String),
}

impl CliError {
    /// Get exit code for this error
    pub(crate) fn exit_code(&self) -> ExitCode {
        match self {
            Self::Featsel(_) => ExitCode::from(1),
            Self::Config(_) => ExitCode::from(2),
            Self::FileNotFound(_) => ExitCode::from(3),
            Self::Data(_) => ExitCode::from(4),
            Self::AllFailed => ExitCode::from(5),
            Self::Aborted(_) => ExitCode::from(6),
            Self::Io(_) => ExitCode::from(7),
        }
    }
}

impl From<FeatselError> for CliError {
    fn from(e: FeatselError) -> Self {
        match e {
            FeatselError::ConfigurationError { .. } => Self::Config(e.to_string()),
            FeatselError::Data { .. } | FeatselError::LabelMismatch { .. } => {
                Self::Data(e.to_string())
            }
            FeatselError::Aborted { reason } => Self::Aborted(reason),
            FeatselError::Io(io) => Self::Io(io),
            other => Self::Featsel(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::Featsel(format!("JSON: {e}"))
    }
}
