use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;

use crate::{
    dto::template_dto::{CreateTemplatePayload, TemplateResponse, UpdateTemplatePayload},
    error::Result,
    extractors::ValidJson,
    AppState,
};

#[axum::debug_handler]
pub async fn list_templates(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let templates = state.template_service.list().await?;
    let body: Vec<TemplateResponse> = templates.into_iter().map(TemplateResponse::from).collect();
    Ok(Json(body))
}

#[axum::debug_handler]
pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let template = state.template_service.get_by_id(id).await?;
    Ok(Json(TemplateResponse::from(template)))
}

#[axum::debug_handler]
pub async fn create_template(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<CreateTemplatePayload>,
) -> Result<impl IntoResponse> {
    let template = state.template_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(TemplateResponse::from(template))))
}

#[axum::debug_handler]
pub async fn update_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidJson(payload): ValidJson<UpdateTemplatePayload>,
) -> Result<impl IntoResponse> {
    let template = state.template_service.update(id, payload).await?;
    Ok(Json(TemplateResponse::from(template)))
}

#[axum::debug_handler]
pub async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.template_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
