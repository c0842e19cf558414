//! Booking page and dashboard reads.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;

use salonbook_records::BookingForm;

use crate::app::dto;
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::CallerContext;

pub fn router() -> Router {
    Router::new()
        .route("/:id", get(get_salon))
        .route("/:id/clients", get(list_clients))
        .route("/:id/booking-requests", get(list_booking_requests).post(submit_booking))
}

pub async fn get_salon(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<CallerContext>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let salon = services.get_salon(ctx.caller(), &id)?;
    Ok((StatusCode::OK, Json(salon.to_json())).into_response())
}

pub async fn get_provider(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<CallerContext>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let provider = services.get_provider(ctx.caller(), &id)?;
    Ok((StatusCode::OK, Json(provider.to_json())).into_response())
}

pub async fn list_clients(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<CallerContext>,
    Path(id): Path<String>,
    Query(query): Query<dto::RosterQuery>,
) -> Result<Response, ApiError> {
    let roster = services.client_roster(ctx.caller(), &id, query.q.as_deref())?;
    Ok((StatusCode::OK, Json(dto::items(roster))).into_response())
}

pub async fn list_booking_requests(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<CallerContext>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let rows = services
        .list_booking_requests(ctx.caller(), &id)?
        .iter()
        .map(|r| r.to_json())
        .collect::<Vec<_>>();
    Ok((StatusCode::OK, Json(dto::items(rows))).into_response())
}

pub async fn submit_booking(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<CallerContext>,
    Path(id): Path<String>,
    Json(form): Json<BookingForm>,
) -> Result<Response, ApiError> {
    let record = services.submit_booking(ctx.caller(), &id, form, Utc::now())?;
    let body = dto::BookingCreated {
        id: record.id,
        estimated_total_cents: record.data.estimated_total_cents,
    };
    Ok((StatusCode::CREATED, Json(body)).into_response())
}
