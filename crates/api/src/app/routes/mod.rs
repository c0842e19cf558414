use axum::{
    routing::{get, post},
    Router,
};

pub mod collections;
pub mod loyalty;
pub mod policy;
pub mod salons;
pub mod system;
pub mod team;

/// Router for every endpoint behind the caller-context middleware.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/collections", collections::router())
        .nest("/salons", salons::router().merge(loyalty::salon_router()))
        .route("/providers/:id", get(salons::get_provider))
        .route("/invitations/:id/accept", post(team::accept_invitation))
        .route("/passes/:id/redeem", post(loyalty::redeem_reward))
        .nest("/policy", policy::router())
}
