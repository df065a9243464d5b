use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;

use crate::{
    dto::candidate_dto::{
        BulkStatusPayload, CandidateListQuery, CandidateResponse, CreateCandidatePayload,
        UpdateCandidatePayload, UpdateCandidateStatusPayload,
    },
    error::Result,
    extractors::ValidJson,
    models::notification::NotificationKind,
    AppState,
};

// Course responses embed candidatesCount, so every candidate mutation
// invalidates the course snapshot as well.
async fn invalidate_candidate_caches(state: &AppState) {
    state.candidate_cache.invalidate().await;
    state.course_cache.invalidate().await;
}

#[axum::debug_handler]
pub async fn list_candidates(
    State(state): State<AppState>,
    Query(query): Query<CandidateListQuery>,
) -> Result<impl IntoResponse> {
    let candidates = if query.is_filtered() {
        state.candidate_service.list_filtered(query).await?
    } else {
        let service = state.candidate_service.clone();
        let loader = move || async move { service.list_all().await };
        if query.wants_refresh() {
            state.candidate_cache.refresh(loader).await?
        } else {
            state.candidate_cache.get_or_refresh(loader).await?
        }
    };

    let body: Vec<CandidateResponse> = candidates
        .into_iter()
        .map(CandidateResponse::from)
        .collect();
    Ok(Json(body))
}

#[axum::debug_handler]
pub async fn get_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let candidate = state.candidate_service.get_by_id(id).await?;
    Ok(Json(CandidateResponse::from(candidate)))
}

/// Public application submission; also used by the admin form. Records an
/// INFO notification as a side effect, which never fails the request.
#[axum::debug_handler]
pub async fn create_candidate(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<CreateCandidatePayload>,
) -> Result<impl IntoResponse> {
    let candidate = state.candidate_service.create(payload).await?;
    invalidate_candidate_caches(&state).await;

    let message = match &candidate.course_name {
        Some(course) => format!("{} candidatou-se ao curso {}", candidate.name, course),
        None => format!("{} candidatou-se", candidate.name),
    };
    state
        .notification_service
        .record("Nova candidatura", &message, NotificationKind::Info)
        .await;

    Ok((StatusCode::CREATED, Json(CandidateResponse::from(candidate))))
}

#[axum::debug_handler]
pub async fn update_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidJson(payload): ValidJson<UpdateCandidatePayload>,
) -> Result<impl IntoResponse> {
    let candidate = state.candidate_service.update(id, payload).await?;
    invalidate_candidate_caches(&state).await;
    Ok(Json(CandidateResponse::from(candidate)))
}

#[axum::debug_handler]
pub async fn update_candidate_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidJson(payload): ValidJson<UpdateCandidateStatusPayload>,
) -> Result<impl IntoResponse> {
    let candidate = state
        .candidate_service
        .update_status(id, payload.status)
        .await?;
    invalidate_candidate_caches(&state).await;
    Ok(Json(CandidateResponse::from(candidate)))
}

#[axum::debug_handler]
pub async fn bulk_update_status(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<BulkStatusPayload>,
) -> Result<impl IntoResponse> {
    let updated = state
        .candidate_service
        .bulk_update_status(&payload.ids, payload.status)
        .await?;
    invalidate_candidate_caches(&state).await;

    let body: Vec<CandidateResponse> = updated.into_iter().map(CandidateResponse::from).collect();
    Ok(Json(body))
}

#[axum::debug_handler]
pub async fn delete_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.candidate_service.delete(id).await?;
    invalidate_candidate_caches(&state).await;
    Ok(StatusCode::NO_CONTENT)
}
