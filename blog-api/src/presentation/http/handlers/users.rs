use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{PageDto, PaginationQuery};
use crate::application::user_service::ListUsersResult;
use crate::domain::user::{UpdateUserRequest, User};
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::extract::{JsonBody, PathParam, QueryParams};
use crate::presentation::http::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct UpdateUserDto {
    #[validate(length(min = 1, max = 255))]
    pub(crate) name: Option<String>,
    #[validate(email)]
    pub(crate) email: Option<String>,
    #[validate(length(min = 6, max = 128))]
    pub(crate) password: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UserDto {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<ListUsersResult> for PageDto<UserDto> {
    fn from(result: ListUsersResult) -> Self {
        Self {
            data: result.users.into_iter().map(UserDto::from).collect(),
            page: result.page,
            per_page: result.per_page,
            total: result.total,
        }
    }
}

pub(crate) async fn list_users(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<PaginationQuery>,
) -> AppResult<Json<PageDto<UserDto>>> {
    query.validate()?;

    let result = state
        .user_service
        .list_users(query.page(), query.per_page())
        .await?;

    Ok(Json(result.into()))
}

pub(crate) async fn get_user(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> AppResult<Json<UserDto>> {
    let user = state.user_service.get_user(id).await?;
    Ok(Json(user.into()))
}

pub(crate) async fn update_user(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    PathParam(id): PathParam<i64>,
    JsonBody(dto): JsonBody<UpdateUserDto>,
) -> AppResult<Json<UserDto>> {
    dto.validate()?;
    let req = UpdateUserRequest {
        name: dto.name,
        email: dto.email,
        password: dto.password,
    };

    let user = state
        .user_service
        .update_user(auth.user_id, id, req)
        .await?;
    Ok(Json(user.into()))
}

pub(crate) async fn delete_user(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    PathParam(id): PathParam<i64>,
) -> AppResult<StatusCode> {
    state.user_service.delete_user(auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
