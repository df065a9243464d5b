use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;

use crate::{
    dto::user_dto::{CreateUserPayload, UpdateUserPayload, UserResponse},
    error::Result,
    extractors::ValidJson,
    AppState,
};

#[axum::debug_handler]
pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let users = state.user_service.list().await?;
    let body: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(body))
}

#[axum::debug_handler]
pub async fn create_user(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<CreateUserPayload>,
) -> Result<impl IntoResponse> {
    let user = state.user_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

#[axum::debug_handler]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidJson(payload): ValidJson<UpdateUserPayload>,
) -> Result<impl IntoResponse> {
    let user = state.user_service.update(id, payload).await?;
    Ok(Json(UserResponse::from(user)))
}

#[axum::debug_handler]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.user_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Profile routes are the same records through a narrower door; the admin
/// frontend edits its own account here.
#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let user = state.user_service.get_by_id(id).await?;
    Ok(Json(UserResponse::from(user)))
}

#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidJson(payload): ValidJson<UpdateUserPayload>,
) -> Result<impl IntoResponse> {
    let user = state.user_service.update(id, payload).await?;
    Ok(Json(UserResponse::from(user)))
}
