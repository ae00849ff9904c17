//! Error types for the data-access layer.
//!
//! # Design
//! Every per-operation failure is an `OperationError`: a human-readable
//! message plus the numeric status code. Backend failures, malformed bodies
//! and transport failures all share it; callers that need finer behavior
//! branch on `status_code`. Transport failures that never produced a response
//! carry `NO_RESPONSE_STATUS`.

use thiserror::Error;

/// Message used when a failed response carries no readable `message` field.
pub const DEFAULT_ERROR_MESSAGE: &str = "Request failed";

/// Status code reported when no HTTP response was received.
pub const NO_RESPONSE_STATUS: u16 = 0;

/// Normalized failure of a data-access operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (status {status_code})")]
pub struct OperationError {
    pub message: String,
    pub status_code: u16,
}

impl OperationError {
    pub fn new(message: impl Into<String>, status_code: u16) -> Self {
        Self {
            message: message.into(),
            status_code,
        }
    }

    /// A failure that happened before or instead of an HTTP exchange.
    pub fn no_response(message: impl Into<String>) -> Self {
        Self::new(message, NO_RESPONSE_STATUS)
    }

    pub fn unknown_resource(resource: &str) -> Self {
        Self::new(format!("Unknown resource: {resource}"), 404)
    }

    pub fn unsupported(operation: &str) -> Self {
        Self::new(format!("Operation not supported: {operation}"), 405)
    }

    /// The backend rejected the caller's session (treat as session expiry).
    pub fn is_unauthorized(&self) -> bool {
        self.status_code == 401
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code == 404
    }
}

/// Errors raised while building a `ClientConfig` at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting `{0}`")]
    Missing(&'static str),

    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),
}
