use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use crate::app::services::AppServices;
use crate::context::CallerContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<CallerContext>,
) -> impl IntoResponse {
    let caller = ctx.caller();
    Json(serde_json::json!({
        "authenticated": caller.is_some(),
        "identity": caller.map(|c| c.identity().to_string()),
        "email": caller.and_then(|c| c.email()),
        "platform_admin": services.policy().is_platform_admin(caller),
    }))
}
