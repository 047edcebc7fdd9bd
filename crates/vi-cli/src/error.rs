//! CLI error type and its exit-code mapping.

use crate::exit_codes::ExitCode;
use std::path::PathBuf;
use thiserror::Error;
use vi_annotate::ValidationError;
use vi_report::ReportError;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    /// Argument value clap could not check.
    #[error("invalid argument: {0}")]
    Args(String),

    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid TOML in '{path}': {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("settings file '{0}' does not exist")]
    SettingsNotFound(PathBuf),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Report(#[from] ReportError),
}

impl CliError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CliError::Args(_) => ExitCode::ArgsError,
            CliError::Read { .. } | CliError::Write { .. } | CliError::SettingsNotFound(_) => {
                ExitCode::IoError
            }
            CliError::Json { .. } | CliError::Toml { .. } | CliError::Validation(_) => {
                ExitCode::InvalidInput
            }
            CliError::Report(err) => match err {
                ReportError::MissingInspection => ExitCode::MissingInspection,
                ReportError::JsonError(_) | ReportError::InvalidConfig(_) => ExitCode::InvalidInput,
                ReportError::IoError(_) => ExitCode::IoError,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_mapping() {
        assert_eq!(
            CliError::Report(ReportError::MissingInspection).exit_code(),
            ExitCode::MissingInspection
        );
        assert_eq!(
            CliError::Validation(ValidationError::NotFinite).exit_code(),
            ExitCode::InvalidInput
        );
        assert_eq!(
            CliError::Args("x".to_string()).exit_code(),
            ExitCode::ArgsError
        );
        assert_eq!(
            CliError::SettingsNotFound(PathBuf::from("/nope")).exit_code(),
            ExitCode::IoError
        );
    }
}
