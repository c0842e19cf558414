//! Generic document access: `/collections/:collection[/:id]`.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::Value;

use crate::app::dto;
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::CallerContext;

pub fn router() -> Router {
    Router::new()
        .route("/:collection", get(list_documents).post(create_document))
        .route(
            "/:collection/:id",
            get(get_document)
                .post(create_document_with_id)
                .put(update_document)
                .delete(delete_document),
        )
}

pub async fn list_documents(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<CallerContext>,
    Path(collection): Path<String>,
    Query(query): Query<dto::ListQuery>,
) -> Result<Response, ApiError> {
    let items = services.list_documents(ctx.caller(), &collection, query.salon_id.as_deref())?;
    Ok((StatusCode::OK, Json(dto::items(items))).into_response())
}

pub async fn get_document(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<CallerContext>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let body = services.read_document(ctx.caller(), &collection, &id)?;
    Ok((StatusCode::OK, Json(body)).into_response())
}

pub async fn create_document(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<CallerContext>,
    Path(collection): Path<String>,
    Json(body): Json<Value>,
) -> Result<Response, ApiError> {
    let created = services.create_document(ctx.caller(), &collection, None, body)?;
    Ok((StatusCode::CREATED, Json(created)).into_response())
}

pub async fn create_document_with_id(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<CallerContext>,
    Path((collection, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<Response, ApiError> {
    let created = services.create_document(ctx.caller(), &collection, Some(&id), body)?;
    Ok((StatusCode::CREATED, Json(created)).into_response())
}

pub async fn update_document(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<CallerContext>,
    Path((collection, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<Response, ApiError> {
    let updated = services.update_document(ctx.caller(), &collection, &id, body)?;
    Ok((StatusCode::OK, Json(updated)).into_response())
}

pub async fn delete_document(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<CallerContext>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    services.delete_document(ctx.caller(), &collection, &id)?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
