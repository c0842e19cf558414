use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;

use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::CallerContext;

/// `POST /invitations/:id/accept`: join the inviting salon's team.
pub async fn accept_invitation(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<CallerContext>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let member = services.accept_invitation(ctx.caller(), &id, Utc::now())?;
    Ok((StatusCode::CREATED, Json(member.to_json())).into_response())
}
