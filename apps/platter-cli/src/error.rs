//! # CLI Error Type
//!
//! One error type for every command, carrying a machine-readable code and
//! a message fit to print.
//!
//! ```text
//! ClientError::Validation ────► INVALID_INPUT     exit 2
//! ClientError::Transport ─────► UNREACHABLE       exit 3
//! not signed in ──────────────► NOT_AUTHENTICATED exit 4
//! config load/save/invalid ───► CONFIG_ERROR      exit 5
//! everything else ────────────► REQUEST_FAILED    exit 1
//! ```

use std::process::ExitCode;

use platter_client::ClientError;
use serde::Serialize;
use thiserror::Error;

/// Result alias for command handlers.
pub type CliResult<T> = Result<T, CliError>;

/// Error returned from a command.
///
/// Printed as `{"code": "...", "message": "..."}` in `--json` mode.
#[derive(Debug, Clone, Error, Serialize)]
#[error("{message}")]
pub struct CliError {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input rejected before any request was sent
    InvalidInput,

    /// The API could not be reached
    Unreachable,

    /// The command needs a live session
    NotAuthenticated,

    /// Configuration could not be loaded, saved or validated
    ConfigError,

    /// The server refused or the response was unusable
    RequestFailed,

    Internal,
}

impl ErrorCode {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorCode::RequestFailed | ErrorCode::Internal => 1,
            ErrorCode::InvalidInput => 2,
            ErrorCode::Unreachable => 3,
            ErrorCode::NotAuthenticated => 4,
            ErrorCode::ConfigError => 5,
        }
    }
}

impl CliError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::InvalidInput, message)
    }

    pub fn not_authenticated() -> Self {
        CliError::new(
            ErrorCode::NotAuthenticated,
            "Not signed in. Run `platter login` first.",
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::Internal, message)
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code.exit_code())
    }
}

impl From<ClientError> for CliError {
    fn from(err: ClientError) -> Self {
        let code = if err.is_validation() {
            ErrorCode::InvalidInput
        } else if matches!(err, ClientError::Transport(_)) {
            ErrorCode::Unreachable
        } else if err.is_config_error() {
            ErrorCode::ConfigError
        } else {
            ErrorCode::RequestFailed
        };

        match &err {
            // Storage and decode details go to the log, not the terminal.
            ClientError::Storage(_) | ClientError::Decode(_) => {
                tracing::error!(error = %err, "Command failed");
                CliError::new(code, err.notice_text())
            }
            _ => CliError::new(code, err.to_string()),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::internal(format!("Could not encode output: {err}"))
    }
}
