use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use thiserror::Error;

use salonbook_auth::AuthzError;
use salonbook_core::DomainError;
use salonbook_infra::StoreError;
use salonbook_records::FieldError;

/// Every failure a handler can surface.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Denied(#[from] AuthzError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("booking form has {} invalid field(s)", .0.len())]
    Form(Vec<FieldError>),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        api_error_to_response(self)
    }
}

pub fn api_error_to_response(err: ApiError) -> axum::response::Response {
    match err {
        ApiError::Denied(e) => json_error(StatusCode::FORBIDDEN, "permission_denied", e.to_string()),
        ApiError::Domain(DomainError::Validation(msg)) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        ApiError::Domain(DomainError::InvalidId(msg)) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        ApiError::Domain(DomainError::NotFound) => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        ApiError::Domain(DomainError::Conflict(msg)) => json_error(StatusCode::CONFLICT, "conflict", msg),
        ApiError::Store(e @ StoreError::NotFound { .. }) => {
            json_error(StatusCode::NOT_FOUND, "not_found", e.to_string())
        }
        ApiError::Store(e @ (StoreError::AlreadyExists { .. } | StoreError::Modified { .. })) => {
            json_error(StatusCode::CONFLICT, "conflict", e.to_string())
        }
        ApiError::Store(e @ StoreError::Unavailable(_)) => {
            tracing::error!("store failure: {e}");
            json_error(StatusCode::SERVICE_UNAVAILABLE, "store_unavailable", e.to_string())
        }
        ApiError::Form(fields) => (
            StatusCode::BAD_REQUEST,
            axum::Json(json!({
                "error": "validation_error",
                "message": "booking form is invalid",
                "fields": fields,
            })),
        )
            .into_response(),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
