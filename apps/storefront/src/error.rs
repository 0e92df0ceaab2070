//! # App Error Type
//!
//! Unified error type for storefront actions (sign in, sign up, sign out).
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Storefront                         │
//! │                                                                         │
//! │  Screen                      Rust                                       │
//! │  ──────                      ────                                       │
//! │                                                                         │
//! │  onPress(sign in)                                                       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  AppState::sign_in                                               │  │
//! │  │  Result<User, AppError>                                          │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Form invalid?   ─── ValidationError ──────────────┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Backend failed? ─── BackendError ─────────────── AppError ────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  Alert.alert("Error", e.message)                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Data fetches never produce an `AppError`; the [`crate::fetch::Fetcher`]
//! keeps the message in its state instead.

use foodie_backend::BackendError;
use foodie_core::ValidationError;
use serde::Serialize;

/// Error returned from storefront actions.
///
/// ## Serialization
/// ```json
/// {
///   "code": "UNAUTHORIZED",
///   "message": "Invalid credentials. Please check the email and password."
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for storefront actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Form input rejected before any call
    ValidationError,

    /// Credentials rejected
    Unauthorized,

    /// Nobody is signed in
    NotSignedIn,

    /// Row, file or account missing
    NotFound,

    /// Account or row already exists
    Conflict,

    /// Backend unreachable
    Network,

    /// Anything else
    Internal,
}

impl AppError {
    /// Creates a new app error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::Internal, message)
    }
}

/// Converts backend errors to app errors.
impl From<BackendError> for AppError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Validation(e) => AppError::validation(e.to_string()),
            BackendError::Unauthorized => AppError::new(ErrorCode::Unauthorized, err.to_string()),
            BackendError::NoSession => AppError::new(ErrorCode::NotSignedIn, err.to_string()),
            BackendError::NotFound { .. } => AppError::new(ErrorCode::NotFound, err.to_string()),
            BackendError::AlreadyExists { .. } => {
                AppError::new(ErrorCode::Conflict, err.to_string())
            }
            BackendError::Transport(e) => {
                tracing::warn!("Backend unreachable: {}", e);
                AppError::new(ErrorCode::Network, "Could not reach the server. Try again.")
            }
            BackendError::InvalidDocument(e) => {
                tracing::error!("Malformed backend document: {}", e);
                AppError::internal("Unexpected response from the server")
            }
            BackendError::InvalidConfig(e) | BackendError::ConfigLoad(e) => {
                tracing::error!("Backend configuration error: {}", e);
                AppError::internal("The app is misconfigured")
            }
        }
    }
}

/// Converts form validation errors to app errors.
impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::validation(err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}
