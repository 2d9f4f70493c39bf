//! UMA 2.0 permission ticket responses
//!
//! When an RPT is missing or insufficient, the resource server answers with
//! 403 and hands the client a permission ticket plus the authorization
//! server location (UMA 2.0 §3.2). These responses must reach the client
//! unchanged.

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::UmaConfig;
use crate::types::Ticket;

/// Header carrying the issuer
pub const HOST_ID_HEADER: &str = "host_id";
/// Header carrying the UMA configuration endpoint
pub const AS_URI_HEADER: &str = "as_uri";
/// Header carrying the UMA error code
pub const ERROR_HEADER: &str = "error";
/// Error code for a missing or insufficient RPT
pub const INSUFFICIENT_SCOPE: &str = "insufficient_scope";

/// JSON body of a ticket response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketBody {
    pub ticket: Ticket,
}

/// 403 response carrying a freshly registered permission ticket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketResponse {
    /// Issuer (`host_id` header)
    pub host_id: String,

    /// UMA configuration endpoint (`as_uri` header)
    pub as_uri: String,

    /// Ticket body
    pub body: TicketBody,
}

impl TicketResponse {
    pub fn ticket(&self) -> &str {
        &self.body.ticket
    }

    /// Header name/value pairs in the order they are emitted
    pub fn headers(&self) -> [(&'static str, &str); 3] {
        [
            (HOST_ID_HEADER, self.host_id.as_str()),
            (AS_URI_HEADER, self.as_uri.as_str()),
            (ERROR_HEADER, INSUFFICIENT_SCOPE),
        ]
    }
}

impl IntoResponse for TicketResponse {
    fn into_response(self) -> Response {
        let mut response = (StatusCode::FORBIDDEN, Json(&self.body)).into_response();

        for (name, value) in self.headers() {
            match HeaderValue::from_str(value) {
                Ok(value) => {
                    response
                        .headers_mut()
                        .insert(HeaderName::from_static(name), value);
                }
                Err(e) => warn!("Skipping unrepresentable {} header: {}", name, e),
            }
        }

        response
    }
}

/// Builds ticket responses from the server configuration
#[derive(Debug, Clone)]
pub struct TicketResponseBuilder {
    issuer: String,
    as_uri: String,
}

impl TicketResponseBuilder {
    pub fn new(issuer: impl Into<String>, as_uri: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            as_uri: as_uri.into(),
        }
    }

    pub fn from_config(config: &UmaConfig) -> Self {
        Self::new(
            config.issuer.clone(),
            config.uma_configuration_endpoint.clone(),
        )
    }

    /// Build the 403 response for `ticket`; never fails
    pub fn build(&self, ticket: Ticket) -> TicketResponse {
        TicketResponse {
            host_id: self.issuer.clone(),
            as_uri: self.as_uri.clone(),
            body: TicketBody { ticket },
        }
    }
}

/// Why a sufficiency check did not allow access
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeniedResponse {
    /// No granted permission overlaps; a ticket was registered
    InsufficientScope(TicketResponse),

    /// The resource descriptor could not be resolved; no ticket is exposed
    ResourceUnresolved,
}

impl DeniedResponse {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InsufficientScope(_) => StatusCode::FORBIDDEN,
            Self::ResourceUnresolved => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Ticket handed to the client, if any
    pub fn ticket(&self) -> Option<&str> {
        match self {
            Self::InsufficientScope(response) => Some(response.ticket()),
            Self::ResourceUnresolved => None,
        }
    }
}

impl IntoResponse for DeniedResponse {
    fn into_response(self) -> Response {
        match self {
            Self::InsufficientScope(response) => response.into_response(),
            Self::ResourceUnresolved => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}
