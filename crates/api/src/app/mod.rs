//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store, policy evaluator, and the authorized flows
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: query strings and response shapes
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};

use crate::config::ApiConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router over a fresh in-memory store.
pub fn build_app(config: &ApiConfig) -> Router {
    build_app_with_store(config, Arc::new(salonbook_infra::InMemoryDocumentStore::new()))
}

/// Build the router over an existing store (tests seed through this).
pub fn build_app_with_store(config: &ApiConfig, store: services::SharedStore) -> Router {
    let jwt = Arc::new(salonbook_auth::Hs256JwtValidator::new(
        config.jwt_secret.clone().into_bytes(),
    ));
    let auth_state = middleware::AuthState { jwt };

    let services = Arc::new(services::build_services(config, store));

    // Every route except /health sees a caller context (possibly anonymous).
    let guarded = routes::router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(guarded)
}
