use axum::{Router, routing::get};

use super::handlers::health_handler;
use crate::presentation::AppState;

pub(crate) mod auth;
pub(crate) mod posts;
pub(crate) mod tags;
pub(crate) mod users;

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .nest("/api/auth", auth::router())
        .nest("/api/users", users::router(state.clone()))
        .nest("/api/posts", posts::router(state.clone()))
        .nest("/api/tags", tags::router(state.clone()))
        .with_state(state)
}
