use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;

use crate::{
    dto::blog_dto::{BlogListQuery, BlogPostResponse, CreateBlogPostPayload, UpdateBlogPostPayload},
    error::Result,
    extractors::ValidJson,
    AppState,
};

#[axum::debug_handler]
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<BlogListQuery>,
) -> Result<impl IntoResponse> {
    let posts = state.blog_service.list(query).await?;
    let body: Vec<BlogPostResponse> = posts.into_iter().map(BlogPostResponse::from).collect();
    Ok(Json(body))
}

#[axum::debug_handler]
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let post = state.blog_service.get_by_id(id).await?;
    Ok(Json(BlogPostResponse::from(post)))
}

#[axum::debug_handler]
pub async fn create_post(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<CreateBlogPostPayload>,
) -> Result<impl IntoResponse> {
    let post = state.blog_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(BlogPostResponse::from(post))))
}

#[axum::debug_handler]
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidJson(payload): ValidJson<UpdateBlogPostPayload>,
) -> Result<impl IntoResponse> {
    let post = state.blog_service.update(id, payload).await?;
    Ok(Json(BlogPostResponse::from(post)))
}

#[axum::debug_handler]
pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.blog_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
