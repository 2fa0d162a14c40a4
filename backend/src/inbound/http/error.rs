//! HTTP rendering of domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while giving every
//! controller and middleware the same JSON error envelope:
//!
//! ```json
//! { "error": "NotFoundError", "message": "...", "timestamp": "...", "traceId": "..." }
//! ```
//!
//! Internal errors are logged in full and redacted before they reach the
//! client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error};
use utoipa::ToSchema;

use crate::domain::{Error, ErrorCode, TraceId};
use crate::inbound::http::adapter::HttpResponse;
use crate::inbound::http::schemas::ErrorCodeSchema;

/// Message returned in place of internal error details.
pub const REDACTED_MESSAGE: &str = "An unexpected error occurred";

/// HTTP status for an error code.
pub fn status_for(code: ErrorCode) -> u16 {
    match code {
        ErrorCode::Validation => 400,
        ErrorCode::Unauthorized => 401,
        ErrorCode::NotFound => 404,
        ErrorCode::Conflict => 409,
        ErrorCode::Internal => 500,
    }
}

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    /// Stable machine-readable error code.
    #[schema(value_type = ErrorCodeSchema)]
    pub error: ErrorCode,
    /// Human-readable message; redacted for internal errors.
    #[schema(example = "User ID is required")]
    pub message: String,
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: DateTime<Utc>,
    /// Correlation identifier echoed in the `trace-id` header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    /// Supplementary details for client errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<Value>,
}

impl ErrorEnvelope {
    /// Envelope with an explicit code and message, stamped now and carrying
    /// the trace identifier in scope.
    pub fn new(error: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            error,
            message: message.into(),
            timestamp: Utc::now(),
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
        }
    }

    /// Envelope for a domain error. Internal errors lose their message and
    /// details.
    pub fn from_error(error: &Error) -> Self {
        let trace_id = error
            .trace_id()
            .map(str::to_owned)
            .or_else(|| TraceId::current().map(|id| id.to_string()));
        let (message, details) = match error.code() {
            ErrorCode::Internal => (REDACTED_MESSAGE.to_owned(), None),
            _ => (error.message().to_owned(), error.details().cloned()),
        };
        Self {
            error: error.code(),
            message,
            timestamp: Utc::now(),
            trace_id,
            details,
        }
    }
}

/// Write `envelope` with `status` to `res`.
pub fn write_envelope(res: &mut HttpResponse, status: u16, envelope: &ErrorEnvelope) {
    match serde_json::to_value(envelope) {
        Ok(body) => res.status(status).json(body),
        Err(err) => {
            error!(error = %err, "failed to serialise error envelope");
            res.status(500).send(REDACTED_MESSAGE);
        }
    }
}

/// Render a domain error onto `res` using the status for its code.
pub fn write_error(res: &mut HttpResponse, error: &Error) {
    if error.code() == ErrorCode::Internal {
        error!(error = %error, trace_id = ?error.trace_id(), "internal error");
    } else {
        debug!(code = %error.code(), message = %error.message(), "request failed");
    }
    write_envelope(res, status_for(error.code()), &ErrorEnvelope::from_error(error));
}

#[cfg(test)]
mod tests;
