use axum::Router;
use axum::middleware;
use axum::routing::{get, post, put};

use crate::presentation::AppState;
use crate::presentation::http::handlers::tags::{
    create_tag, delete_tag, get_tag, list_tags, update_tag,
};
use crate::presentation::http::middleware::auth::jwt_auth_middleware;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/", get(list_tags))
        .route("/{id}", get(get_tag));

    let protected = Router::new()
        .route("/", post(create_tag))
        .route("/{id}", put(update_tag).delete(delete_tag))
        .layer(middleware::from_fn_with_state(state, jwt_auth_middleware));

    public.merge(protected)
}
