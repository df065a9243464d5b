use axum::{
    extract::State,
    response::{IntoResponse, Json},
};

use crate::{dto::candidate_dto::CandidateResponse, error::Result, AppState};

/// Derived view over candidates whose status marks them as enrolled. Never
/// cached; membership follows the status column directly.
#[axum::debug_handler]
pub async fn list_students(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let students = state.candidate_service.list_students().await?;
    let body: Vec<CandidateResponse> = students.into_iter().map(CandidateResponse::from).collect();
    Ok(Json(body))
}
