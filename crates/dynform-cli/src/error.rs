//! Error types for the dynform CLI

use dynform_core::SchemaError;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::ExitCode;

#[derive(Error, Debug)]
pub enum CliError {
    /// Arguments or file contents that cannot be used
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to read '{}': {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A data file that is not valid JSON or YAML
    #[error("Failed to parse '{}': {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CliError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        CliError::InvalidInput(msg.into())
    }

    pub fn file(path: &Path, source: std::io::Error) -> Self {
        CliError::File {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn parse(path: &Path, message: impl ToString) -> Self {
        CliError::Parse {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }

    /// Whether the failure was caused by the caller rather than by us
    pub fn is_user_error(&self) -> bool {
        !matches!(self, CliError::Serialization(_))
    }

    pub fn exit_code(&self) -> ExitCode {
        match self {
            CliError::InvalidInput(_) | CliError::Parse { .. } => ExitCode::InvalidInput,
            CliError::File { .. } => ExitCode::FileError,
            CliError::Schema(_) => ExitCode::SchemaError,
            CliError::Serialization(_) => ExitCode::InternalError,
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(err: serde_yaml::Error) -> Self {
        CliError::Serialization(err.to_string())
    }
}
