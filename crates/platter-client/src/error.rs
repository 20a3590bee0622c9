//! # Client Error Types
//!
//! Error types for store actions, transport and configuration.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Client Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐  │
//! │  │   Transport     │  │   Application   │  │     Validation          │  │
//! │  │                 │  │                 │  │                         │  │
//! │  │  Transport      │  │  Rejected       │  │  Validation             │  │
//! │  │  Status         │  │  (success=false)│  │  (no request sent)      │  │
//! │  │  Decode         │  │                 │  │                         │  │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘  │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐                               │
//! │  │    Storage      │  │  Configuration  │                               │
//! │  │                 │  │                 │                               │
//! │  │  Storage        │  │  InvalidConfig  │                               │
//! │  │                 │  │  InvalidUrl     │                               │
//! │  │                 │  │  ConfigLoad/Save│                               │
//! │  └─────────────────┘  └─────────────────┘                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use platter_core::{CoreError, ValidationError};
use platter_storage::StorageError;
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Text shown for any failure that carries no server message.
pub const GENERIC_FAILURE: &str = "An error occurred";

/// Client error type covering every way a store action can fail.
#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The request never produced a response (DNS, refused, reset, TLS).
    #[error("Request failed: {0}")]
    Transport(String),

    /// Non-2xx response without a readable envelope.
    #[error("Server responded with status {status}")]
    Status { status: u16 },

    /// Response body was not the expected JSON shape.
    #[error("Invalid response body: {0}")]
    Decode(String),

    // =========================================================================
    // Application Errors
    // =========================================================================
    /// The server answered with `success: false`.
    #[error("{message}")]
    Rejected { message: String },

    // =========================================================================
    // Validation Errors
    // =========================================================================
    /// Input rejected before any request was sent.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Domain rule violated (e.g. checkout with an empty cart).
    #[error("{0}")]
    Domain(CoreError),

    // =========================================================================
    // Storage Errors
    // =========================================================================
    /// Persisted state could not be read or written.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid client configuration.
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    /// Invalid API base URL.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<CoreError> for ClientError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(v) => ClientError::Validation(v),
            other => ClientError::Domain(other),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            match err.status() {
                Some(status) => ClientError::Status {
                    status: status.as_u16(),
                },
                None => ClientError::Transport(err.to_string()),
            }
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ClientError {
    /// Text for the error notice shown to the user.
    ///
    /// ```text
    /// Rejected            → server message (or the action's fallback)
    /// Validation / Domain → the rule that failed
    /// everything else     → "An error occurred"
    /// ```
    pub fn notice_text(&self) -> String {
        match self {
            ClientError::Rejected { message } => message.clone(),
            ClientError::Validation(v) => v.to_string(),
            ClientError::Domain(d) => d.to_string(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }

    /// Returns true if the request failed before a usable response arrived.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ClientError::Transport(_) | ClientError::Status { .. } | ClientError::Decode(_)
        )
    }

    /// Returns true if the error was raised before any request was sent.
    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_) | ClientError::Domain(_))
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidConfig(_)
                | ClientError::InvalidUrl(_)
                | ClientError::ConfigLoadFailed(_)
                | ClientError::ConfigSaveFailed(_)
        )
    }
}
