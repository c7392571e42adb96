//! API error handling
//!
//! Every failure leaves as `{"success": false, "error": "<message>"}`. Domain
//! precondition messages pass through verbatim.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use core_kernel::PortError;
use domain_documents::DocumentError;
use domain_submission::WorkflowError;

use crate::auth::AuthError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    /// Lost an optimistic concurrency race
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }
        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<PortError> for ApiError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { entity_type, .. } => ApiError::NotFound(format!("{entity_type} not found")),
            PortError::Validation { message, .. } => ApiError::BadRequest(message),
            PortError::Conflict { .. } => {
                ApiError::Conflict("The record was modified by another request; reload and retry".to_string())
            }
            PortError::Unauthorized { .. } => ApiError::Forbidden(err.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::Port(port) => port.into(),
            err if err.is_validation() || err.is_precondition() => ApiError::BadRequest(err.to_string()),
            err @ WorkflowError::Payment(_) => ApiError::BadRequest(err.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<DocumentError> for ApiError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::NotApplicable(_) | DocumentError::NoFinancePlan => ApiError::NotFound(err.to_string()),
            DocumentError::Render(_) => ApiError::Internal(format!("Failed to generate PDF: {err}")),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Forbidden(_) => ApiError::Forbidden(err.to_string()),
            AuthError::InvalidToken | AuthError::TokenExpired => ApiError::Unauthorized(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precondition_is_bad_request_with_message() {
        let err = ApiError::from(WorkflowError::EsignRequiredForPayment);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "E-Signature must be completed before payment");
    }

    #[test]
    fn test_failed_charge_is_bad_request() {
        let err = ApiError::from(WorkflowError::Payment("Connection error: card declined".to_string()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Payment processing failed: Connection error: card declined");
    }

    #[test]
    fn test_port_errors_map_to_status() {
        assert_eq!(
            ApiError::from(PortError::not_found("Quote", "QTE-1")).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ApiError::from(PortError::conflict("stale")).status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::from(WorkflowError::Port(PortError::connection("down"))).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_auth_errors() {
        assert_eq!(ApiError::from(AuthError::TokenExpired).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::from(AuthError::Forbidden("Admin access required")).status(),
            StatusCode::FORBIDDEN
        );
    }
}
