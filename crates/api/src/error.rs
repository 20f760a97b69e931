//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use checkout::CheckoutError;
use domain::DomainError;
use thiserror::Error;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Catalog or quantity contract misuse.
    Domain(DomainError),
    /// Checkout lifecycle error.
    Checkout(CheckoutError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Domain(err) => (domain_status(&err), error_body(err.to_string())),
            ApiError::Checkout(CheckoutError::Validation(errors)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                serde_json::json!({
                    "error": "Order is invalid",
                    "fieldErrors": errors,
                    "summary": errors.summary(),
                }),
            ),
            ApiError::Checkout(err) => (checkout_status(&err), error_body(err.to_string())),
        };

        if status.is_server_error() {
            tracing::error!(%status, body = %body, "request failed");
        }

        (status, axum::Json(body)).into_response()
    }
}

fn error_body(message: String) -> serde_json::Value {
    serde_json::json!({ "error": message })
}

fn domain_status(err: &DomainError) -> StatusCode {
    match err {
        DomainError::IndexOutOfRange { .. } => StatusCode::NOT_FOUND,
        DomainError::UnknownOfferingType { .. } | DomainError::QuantityOutOfRange { .. } => {
            StatusCode::BAD_REQUEST
        }
        DomainError::DuplicateOfferingType { .. }
        | DomainError::NegativeCost { .. }
        | DomainError::CostTooLarge { .. }
        | DomainError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn checkout_status(err: &CheckoutError) -> StatusCode {
    match err {
        CheckoutError::Domain(domain_err) => domain_status(domain_err),
        CheckoutError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        CheckoutError::SubmissionInProgress
        | CheckoutError::InvalidState { .. }
        | CheckoutError::NoCatalogSelected
        | CheckoutError::Stale => StatusCode::CONFLICT,
        CheckoutError::Submission(_) => StatusCode::BAD_GATEWAY,
        CheckoutError::Closed => StatusCode::SERVICE_UNAVAILABLE,
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        ApiError::Checkout(err)
    }
}

/// Errors raised while preparing the server at startup.
#[derive(Debug, Error)]
pub enum StartupError {
    /// The catalog file could not be read.
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// The catalog could not be loaded.
    #[error("Invalid catalog: {0}")]
    Catalog(#[from] DomainError),
}
