//! Stamp cards: issuing passes, recording visits, redeeming rewards.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::Value;

use crate::app::dto;
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::CallerContext;

/// Salon-scoped routes, nested under `/salons`.
pub fn salon_router() -> Router {
    Router::new()
        .route("/:id/passes", post(enroll_pass))
        .route("/:id/visits", post(record_visit))
}

pub async fn enroll_pass(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<CallerContext>,
    Path(salon_id): Path<String>,
    Json(body): Json<dto::EnrollPass>,
) -> Result<Response, ApiError> {
    let pass = services.enroll_pass(ctx.caller(), &salon_id, &body.program_id, &body.client_email)?;
    Ok((StatusCode::CREATED, Json(pass.to_json())).into_response())
}

pub async fn record_visit(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<CallerContext>,
    Path(salon_id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Response, ApiError> {
    let visit = services.record_visit(ctx.caller(), &salon_id, body)?;
    Ok((StatusCode::CREATED, Json(visit.to_json())).into_response())
}

pub async fn redeem_reward(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<CallerContext>,
    Path(pass_id): Path<String>,
) -> Result<Response, ApiError> {
    let pass = services.redeem_reward(ctx.caller(), &pass_id)?;
    Ok((StatusCode::OK, Json(pass.to_json())).into_response())
}
