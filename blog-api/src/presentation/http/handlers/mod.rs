use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

pub(crate) mod auth;
pub(crate) mod posts;
pub(crate) mod tags;
pub(crate) mod users;

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_PER_PAGE: u32 = 10;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct PaginationQuery {
    #[validate(range(min = 1))]
    pub(crate) page: Option<u32>,
    #[validate(range(min = 1, max = 100))]
    pub(crate) per_page: Option<u32>,
}

impl PaginationQuery {
    pub(crate) fn page(&self) -> u32 {
        self.page.unwrap_or(DEFAULT_PAGE)
    }

    pub(crate) fn per_page(&self) -> u32 {
        self.per_page.unwrap_or(DEFAULT_PER_PAGE)
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct PageDto<T> {
    pub(crate) data: Vec<T>,
    pub(crate) page: u32,
    pub(crate) per_page: u32,
    pub(crate) total: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct HealthzResponse {
    status: &'static str,
}

pub(crate) async fn health_handler() -> Json<HealthzResponse> {
    Json(HealthzResponse { status: "ok" })
}
