//! Access explanations for debugging and audit.

use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use crate::app::dto;
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::CallerContext;

pub fn router() -> Router {
    Router::new().route("/explain", get(explain))
}

/// Explain whether the caller could perform an operation. Never mutates.
pub async fn explain(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<CallerContext>,
    Query(query): Query<dto::ExplainQuery>,
) -> Result<Response, ApiError> {
    let explanation = services.explain(
        ctx.caller(),
        &query.collection,
        &query.operation,
        query.id.as_deref(),
        query.salon_id.as_deref(),
    )?;
    Ok((StatusCode::OK, Json(explanation)).into_response())
}
