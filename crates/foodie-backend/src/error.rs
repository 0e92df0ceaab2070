//! # Backend Error Types
//!
//! Error types for calls into the hosted backend.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Backend Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │      Auth       │  │     Documents           │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Unauthorized   │  │  NotFound               │ │
//! │  │  ConfigLoad     │  │  NoSession      │  │  AlreadyExists          │ │
//! │  │                 │  │                 │  │  InvalidDocument        │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐                              │
//! │  │    Transport    │  │   Validation    │                              │
//! │  │                 │  │                 │                              │
//! │  │  Transport      │  │  (form errors   │                              │
//! │  │                 │  │   before call)  │                              │
//! │  └─────────────────┘  └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use foodie_core::ValidationError;
use thiserror::Error;

/// Result type alias for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// Backend error type covering every failure a remote call can report.
#[derive(Debug, Error)]
pub enum BackendError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid backend configuration.
    #[error("Invalid backend configuration: {0}")]
    InvalidConfig(String),

    /// Failed to load the config file.
    #[error("Failed to load config: {0}")]
    ConfigLoad(String),

    // =========================================================================
    // Auth Errors
    // =========================================================================
    /// Credentials rejected.
    #[error("Invalid credentials. Please check the email and password.")]
    Unauthorized,

    /// No active session (user is signed out).
    #[error("No user logged in")]
    NoSession,

    // =========================================================================
    // Document / File Errors
    // =========================================================================
    /// Row or file not found.
    #[error("{collection} not found: {id}")]
    NotFound { collection: String, id: String },

    /// A row, file or account with this identity already exists.
    #[error("{collection} '{id}' already exists")]
    AlreadyExists { collection: String, id: String },

    /// A document could not be decoded into the expected shape.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The request never got a usable answer (network, timeout, 5xx).
    #[error("Transport error: {0}")]
    Transport(String),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    /// Input rejected before any call was made.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl BackendError {
    /// Creates a NotFound error for a collection and id.
    pub fn not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        BackendError::NotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }

    /// Creates an AlreadyExists error for a collection and id.
    pub fn already_exists(collection: impl Into<String>, id: impl Into<String>) -> Self {
        BackendError::AlreadyExists {
            collection: collection.into(),
            id: id.into(),
        }
    }

    /// Returns true if retrying the same call might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BackendError::Transport(_))
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::InvalidDocument(err.to_string())
    }
}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        BackendError::ConfigLoad(err.to_string())
    }
}

impl From<toml::de::Error> for BackendError {
    fn from(err: toml::de::Error) -> Self {
        BackendError::ConfigLoad(err.to_string())
    }
}

impl From<toml::ser::Error> for BackendError {
    fn from(err: toml::ser::Error) -> Self {
        BackendError::InvalidConfig(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = BackendError::not_found("menu", "menu-1");
        assert_eq!(err.to_string(), "menu not found: menu-1");

        let err: BackendError = ValidationError::Required {
            field: "email".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "email is required");
    }

    #[test]
    fn test_retryable() {
        assert!(BackendError::Transport("timeout".into()).is_retryable());
        assert!(!BackendError::Unauthorized.is_retryable());
    }
}
