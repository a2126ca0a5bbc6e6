use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::tags::TagDto;
use super::{PageDto, PaginationQuery};
use crate::application::post_service::ListPostsResult;
use crate::domain::post::{CreatePostRequest, PostWithTags, UpdatePostRequest};
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::extract::{JsonBody, PathParam, QueryParams};
use crate::presentation::http::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct CreatePostDto {
    #[validate(length(min = 1, max = 255))]
    pub(crate) title: String,
    #[validate(length(min = 1))]
    pub(crate) content: String,
    #[serde(default)]
    pub(crate) tags: Option<Vec<String>>,
}

/// `tags` absent or `null` leaves associations alone; `[]` clears them.
#[derive(Debug, Deserialize, Validate)]
pub(crate) struct UpdatePostDto {
    #[validate(length(min = 1, max = 255))]
    pub(crate) title: String,
    #[validate(length(min = 1))]
    pub(crate) content: String,
    #[serde(default)]
    pub(crate) tags: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PostDto {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) slug: String,
    pub(crate) user_id: i64,
    pub(crate) tags: Vec<TagDto>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl From<PostWithTags> for PostDto {
    fn from(value: PostWithTags) -> Self {
        let PostWithTags { post, tags } = value;
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            slug: post.slug,
            user_id: post.user_id,
            tags: tags.into_iter().map(TagDto::from).collect(),
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

impl From<ListPostsResult> for PageDto<PostDto> {
    fn from(result: ListPostsResult) -> Self {
        Self {
            data: result.posts.into_iter().map(PostDto::from).collect(),
            page: result.page,
            per_page: result.per_page,
            total: result.total,
        }
    }
}

pub(crate) async fn list_posts(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<PaginationQuery>,
) -> AppResult<Json<PageDto<PostDto>>> {
    query.validate()?;

    let result = state
        .post_service
        .list_posts(query.page(), query.per_page())
        .await?;

    Ok(Json(result.into()))
}

pub(crate) async fn get_post(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> AppResult<Json<PostDto>> {
    let result = state.post_service.get_post(id).await?;
    Ok(Json(result.into()))
}

pub(crate) async fn create_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    JsonBody(dto): JsonBody<CreatePostDto>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    dto.validate()?;
    let req = CreatePostRequest {
        title: dto.title,
        content: dto.content,
        tags: dto.tags,
    };

    let result = state.post_service.create_post(auth.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(result.into())))
}

pub(crate) async fn update_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    PathParam(id): PathParam<i64>,
    JsonBody(dto): JsonBody<UpdatePostDto>,
) -> AppResult<Json<PostDto>> {
    dto.validate()?;
    let req = UpdatePostRequest {
        title: dto.title,
        content: dto.content,
        tags: dto.tags,
    };

    let result = state
        .post_service
        .update_post(auth.user_id, id, req)
        .await?;
    Ok(Json(result.into()))
}

pub(crate) async fn delete_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    PathParam(id): PathParam<i64>,
) -> AppResult<StatusCode> {
    state.post_service.delete_post(auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
