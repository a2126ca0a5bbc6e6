use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::auth_service::AuthResult;
use crate::domain::user::{LoginRequest, RegisterRequest};
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::extract::JsonBody;
use crate::presentation::http::handlers::users::UserDto;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct RegisterDto {
    #[validate(length(min = 1, max = 255))]
    pub(crate) name: String,
    #[validate(email)]
    pub(crate) email: String,
    #[validate(length(min = 6, max = 128))]
    pub(crate) password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct LoginDto {
    #[validate(length(min = 1, max = 255))]
    pub(crate) email: String,
    #[validate(length(min = 1))]
    pub(crate) password: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct AuthResponseDto {
    pub(crate) access_token: String,
    pub(crate) token_type: &'static str,
    pub(crate) expires_in: i64,
    pub(crate) user: UserDto,
}

impl AuthResponseDto {
    fn new(result: AuthResult, expires_in: i64) -> Self {
        Self {
            access_token: result.access_token,
            token_type: "Bearer",
            expires_in,
            user: result.user.into(),
        }
    }
}

pub(crate) async fn register(
    State(state): State<AppState>,
    JsonBody(dto): JsonBody<RegisterDto>,
) -> AppResult<(StatusCode, Json<AuthResponseDto>)> {
    dto.validate()?;

    let req = RegisterRequest {
        name: dto.name,
        email: dto.email,
        password: dto.password,
    };

    let result = state.auth_service.register(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponseDto::new(result, state.jwt.ttl_seconds())),
    ))
}

pub(crate) async fn login(
    State(state): State<AppState>,
    JsonBody(dto): JsonBody<LoginDto>,
) -> AppResult<(StatusCode, Json<AuthResponseDto>)> {
    dto.validate()?;

    let req = LoginRequest {
        email: dto.email,
        password: dto.password,
    };

    let result = state.auth_service.login(req).await?;

    Ok((
        StatusCode::OK,
        Json(AuthResponseDto::new(result, state.jwt.ttl_seconds())),
    ))
}
