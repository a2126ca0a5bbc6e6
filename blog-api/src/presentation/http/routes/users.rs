use axum::Router;
use axum::middleware;
use axum::routing::{get, put};

use crate::presentation::AppState;
use crate::presentation::http::handlers::users::{delete_user, get_user, list_users, update_user};
use crate::presentation::http::middleware::auth::jwt_auth_middleware;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/", get(list_users))
        .route("/{id}", get(get_user));

    let protected = Router::new()
        .route("/{id}", put(update_user).delete(delete_user))
        .layer(middleware::from_fn_with_state(state, jwt_auth_middleware));

    public.merge(protected)
}
