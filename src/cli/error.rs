//! CLI error type and exit codes

use crate::catalog::CatalogError;
use crate::model::ModelLoadError;
use crate::validation::ConfigError;
use thiserror::Error;

/// Exit code for a model with error-severity issues
pub const EXIT_INVALID: i32 = 1;
/// Exit code for unreadable input or configuration
pub const EXIT_FAILURE: i32 = 2;

/// Errors that stop the CLI before a report is produced
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Load(#[from] ModelLoadError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid rule catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        EXIT_FAILURE
    }

    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            CliError::Load(e) => e.user_message(),
            CliError::Config(e) => e.user_message(),
            CliError::Catalog(e) => format!(
                "Invalid rule catalog: {e}\n\nHint: Check the custom [[types]] and [[rules]] in your configuration."
            ),
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_and_message() {
        let err = CliError::from(CatalogError::InvalidPredicate("runsOn".to_string()));
        assert_eq!(err.exit_code(), EXIT_FAILURE);
        assert!(err.user_message().contains("runsOn"));
        assert!(err.user_message().contains("Hint:"));
    }
}
