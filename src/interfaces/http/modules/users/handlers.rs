//! User HTTP handlers
//!
//! Identity is carried as data only; authentication is a presentation
//! concern outside this service.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::domain::models::{User, UserRole};
use crate::domain::{DomainError, RepositoryProvider};
use crate::interfaces::http::common::{bad_request, domain_error, ApiResponse, ValidatedJson};

use super::dto::*;

/// Application state for user handlers.
#[derive(Clone)]
pub struct UserAppState {
    pub repos: Arc<dyn RepositoryProvider>,
}

type HandlerResult<T> = Result<Json<ApiResponse<T>>, (StatusCode, Json<ApiResponse<T>>)>;

#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    request_body = RegisterUserRequest,
    responses(
        (status = 200, description = "User registered", body = ApiResponse<UserDto>),
        (status = 400, description = "Invalid request")
    )
)]
pub async fn register_user(
    State(state): State<UserAppState>,
    ValidatedJson(request): ValidatedJson<RegisterUserRequest>,
) -> HandlerResult<UserDto> {
    let Some(role) = UserRole::parse(&request.role) else {
        return Err(bad_request(format!("Unknown role '{}'", request.role)));
    };

    let user = User::new(
        Uuid::new_v4().to_string(),
        request.email,
        request.phone,
        request.name,
        role,
    );
    state
        .repos
        .users()
        .save(user.clone())
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(user.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    tag = "Users",
    params(("user_id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = ApiResponse<UserDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_user(
    State(state): State<UserAppState>,
    Path(user_id): Path<String>,
) -> HandlerResult<UserDto> {
    let user = state
        .repos
        .users()
        .find_by_id(&user_id)
        .await
        .map_err(domain_error)?
        .ok_or_else(|| domain_error(DomainError::not_found("User", &user_id)))?;
    Ok(Json(ApiResponse::success(user.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    responses(
        (status = 200, description = "All users", body = ApiResponse<Vec<UserDto>>)
    )
)]
pub async fn list_users(State(state): State<UserAppState>) -> HandlerResult<Vec<UserDto>> {
    let users = state.repos.users().find_all().await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        users.into_iter().map(UserDto::from).collect(),
    )))
}
