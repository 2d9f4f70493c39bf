//! Error types for the UMA authorization engine

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

/// UMA engine errors
#[derive(Debug, Error)]
pub enum UmaError {
    /// Resource descriptor missing or unresolvable (server misconfiguration)
    #[error("Resource resolution failed: {0}")]
    ResourceResolution(String),

    /// Policy scripts or scope expression refused access
    #[error("Forbidden by policy: {reason}")]
    ForbiddenByPolicy {
        /// Human-readable reason, for logs only
        reason: String,
    },

    /// Unexpected failure reading or writing persisted records
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Client referenced by an RPT is not registered
    #[error("Client not found: {0}")]
    ClientNotFound(String),

    /// Ticket is blank, unknown or invalidated
    #[error("Invalid ticket: {0}")]
    InvalidTicket(String),

    /// Ticket's permission has expired
    #[error("Expired ticket: {0}")]
    ExpiredTicket(String),

    /// Scope list or scope expression is not acceptable
    #[error("Invalid scope: {0}")]
    InvalidScope(String),

    /// Client referenced by an RPT is disabled
    #[error("Client is disabled: {0}")]
    DisabledClient(String),
}

impl UmaError {
    /// Shorthand for a policy refusal
    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::ForbiddenByPolicy {
            reason: reason.into(),
        }
    }

    /// HTTP status the transport layer should answer with
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ForbiddenByPolicy { .. } | Self::DisabledClient(_) => StatusCode::FORBIDDEN,
            Self::InvalidTicket(_) | Self::ExpiredTicket(_) | Self::InvalidScope(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::ResourceResolution(_) | Self::Persistence(_) | Self::ClientNotFound(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// UMA error code placed on the wire
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ForbiddenByPolicy { .. } => "forbidden_by_policy",
            Self::InvalidTicket(_) => "invalid_ticket",
            Self::ExpiredTicket(_) => "expired_ticket",
            Self::InvalidScope(_) => "invalid_scope",
            Self::DisabledClient(_) => "disabled_client",
            Self::ResourceResolution(_) | Self::Persistence(_) | Self::ClientNotFound(_) => {
                "server_error"
            }
        }
    }

    /// Whether this error is the expected policy refusal rather than a fault
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::ForbiddenByPolicy { .. })
    }
}

impl IntoResponse for UmaError {
    fn into_response(self) -> Response {
        // The reason string never leaves the process.
        let body = Json(json!({ "error": self.error_code() }));
        (self.status_code(), body).into_response()
    }
}

impl From<crate::logic::LogicError> for UmaError {
    fn from(err: crate::logic::LogicError) -> Self {
        UmaError::forbidden(err.to_string())
    }
}

/// Result type for UMA operations
pub type Result<T> = std::result::Result<T, UmaError>;
