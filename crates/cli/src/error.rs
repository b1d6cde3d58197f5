//! Error types for CLI operations.

use contracts::ReplayError;
use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Session dump not found
    #[error("Session file not found: {path}")]
    SessionNotFound { path: String },

    /// Replay file could not be read or parsed
    #[error("Failed to load replay {path}: {message}")]
    ReplayLoad { path: String, message: String },

    /// Replay file could not be written
    #[error("Failed to write replay {path}: {message}")]
    ReplayWrite { path: String, message: String },

    /// Engine error
    #[error(transparent)]
    Replay(#[from] ReplayError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn session_not_found(path: impl Into<String>) -> Self {
        Self::SessionNotFound { path: path.into() }
    }

    pub fn replay_load(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ReplayLoad {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn replay_write(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ReplayWrite {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CliError::replay_load("a.json", "expected value");
        assert_eq!(err.to_string(), "Failed to load replay a.json: expected value");

        let err: CliError = ReplayError::NoValidDrivers.into();
        assert_eq!(err.to_string(), "no driver has usable telemetry");
    }
}
