use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{PageDto, PaginationQuery};
use crate::application::tag_service::ListTagsResult;
use crate::domain::tag::{Tag, TagRequest};
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::extract::{JsonBody, PathParam, QueryParams};
use crate::presentation::http::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct TagNameDto {
    #[validate(length(min = 1, max = 255))]
    pub(crate) name: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct TagDto {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) slug: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl From<Tag> for TagDto {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
            slug: tag.slug,
            created_at: tag.created_at,
            updated_at: tag.updated_at,
        }
    }
}

impl From<ListTagsResult> for PageDto<TagDto> {
    fn from(result: ListTagsResult) -> Self {
        Self {
            data: result.tags.into_iter().map(TagDto::from).collect(),
            page: result.page,
            per_page: result.per_page,
            total: result.total,
        }
    }
}

pub(crate) async fn list_tags(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<PaginationQuery>,
) -> AppResult<Json<PageDto<TagDto>>> {
    query.validate()?;

    let result = state
        .tag_service
        .list_tags(query.page(), query.per_page())
        .await?;

    Ok(Json(result.into()))
}

pub(crate) async fn get_tag(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> AppResult<Json<TagDto>> {
    let tag = state.tag_service.get_tag(id).await?;
    Ok(Json(tag.into()))
}

pub(crate) async fn create_tag(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    JsonBody(dto): JsonBody<TagNameDto>,
) -> AppResult<(StatusCode, Json<TagDto>)> {
    dto.validate()?;

    let tag = state
        .tag_service
        .create_tag(auth.user_id, TagRequest { name: dto.name })
        .await?;
    Ok((StatusCode::CREATED, Json(tag.into())))
}

pub(crate) async fn update_tag(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    PathParam(id): PathParam<i64>,
    JsonBody(dto): JsonBody<TagNameDto>,
) -> AppResult<Json<TagDto>> {
    dto.validate()?;

    let tag = state
        .tag_service
        .update_tag(auth.user_id, id, TagRequest { name: dto.name })
        .await?;
    Ok(Json(tag.into()))
}

pub(crate) async fn delete_tag(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    PathParam(id): PathParam<i64>,
) -> AppResult<StatusCode> {
    state.tag_service.delete_tag(auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
