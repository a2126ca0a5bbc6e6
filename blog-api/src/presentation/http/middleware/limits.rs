use std::time::Duration;

use axum::{
    BoxError, Router, error_handling::HandleErrorLayer, http::StatusCode, response::Response,
};
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::warn;

use crate::infrastructure::settings::Settings;
use crate::presentation::http::app_error::error_response;

/// Request timeout, load shedding above the concurrency limit, and a body
/// size cap.
pub(crate) fn apply_limits(router: Router, settings: &Settings) -> Router {
    router
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .load_shed()
                .concurrency_limit(settings.http_concurrency_limit)
                .timeout(Duration::from_secs(settings.http_request_timeout_secs)),
        )
        .layer(RequestBodyLimitLayer::new(
            settings.http_request_body_limit_bytes,
        ))
}

async fn handle_middleware_error(err: BoxError) -> Response {
    if err.is::<tower::timeout::error::Elapsed>() {
        warn!("request timed out");
        return error_response(StatusCode::REQUEST_TIMEOUT, "request timed out");
    }
    if err.is::<tower::load_shed::error::Overloaded>() {
        warn!("request shed: server overloaded");
        return error_response(StatusCode::SERVICE_UNAVAILABLE, "server overloaded");
    }
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
}
