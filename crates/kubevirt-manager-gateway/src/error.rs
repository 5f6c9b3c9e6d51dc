//! API error types and responses.
//!
//! This module defines the standard error format for all API responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use kubevirt_manager_control::{ControlError, OrchestratorError};

/// API error type that implements `IntoResponse`.
///
/// Orchestrator failures keep their category in the error code but are all
/// answered with a 500; only a bad request is the caller's fault.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request parameters.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The orchestrator could not serve the request.
    #[error("{message}")]
    Orchestrator {
        /// Machine-readable failure category.
        code: &'static str,
        /// Human-readable description.
        message: String,
    },
}

/// Error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

/// Error details.
#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl ApiError {
    /// Get the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Orchestrator { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code string for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::Orchestrator { code, .. } => *code,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();
        let message = self.to_string();

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<OrchestratorError> for ApiError {
    fn from(err: OrchestratorError) -> Self {
        let code = match &err {
            OrchestratorError::Unavailable(_) => "orchestrator_unavailable",
            OrchestratorError::Forbidden(_) => "forbidden",
            OrchestratorError::NotFound(_) => "not_found",
            OrchestratorError::Conflict(_) => "conflict",
            OrchestratorError::InvalidSpec(_) => "invalid_spec",
            OrchestratorError::Config(_) => "config_error",
        };

        tracing::error!(
            error = %err,
            code,
            upstream_status = err.http_status_code(),
            "Orchestrator error"
        );

        Self::Orchestrator {
            code,
            message: err.to_string(),
        }
    }
}

impl From<ControlError> for ApiError {
    fn from(err: ControlError) -> Self {
        match err {
            ControlError::UnsupportedAction(action) => {
                Self::BadRequest(format!("unsupported action {action:?}"))
            }
            ControlError::Orchestrator(e) => Self::from(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_status_codes() {
        assert_eq!(
            ApiError::BadRequest("test".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(ControlError::UnsupportedAction("stop".into())).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(OrchestratorError::NotFound("vm".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(OrchestratorError::Conflict("vm".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn error_codes() {
        let cases = [
            (OrchestratorError::Unavailable("x".into()), "orchestrator_unavailable"),
            (OrchestratorError::Forbidden("x".into()), "forbidden"),
            (OrchestratorError::NotFound("x".into()), "not_found"),
            (OrchestratorError::Conflict("x".into()), "conflict"),
            (OrchestratorError::InvalidSpec("x".into()), "invalid_spec"),
            (OrchestratorError::Config("x".into()), "config_error"),
        ];
        for (err, code) in cases {
            assert_eq!(ApiError::from(ControlError::from(err)).code(), code);
        }
        assert_eq!(ApiError::BadRequest("x".into()).code(), "bad_request");
    }

    #[test]
    fn message_keeps_orchestrator_detail() {
        let err = ApiError::from(OrchestratorError::NotFound("vmi \"a\"".into()));
        assert_eq!(err.to_string(), "not found: vmi \"a\"");
    }
}
