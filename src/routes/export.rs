use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};
use chrono::Utc;

use crate::{error::Result, AppState};

fn csv_download(filename: String, body: String) -> impl IntoResponse {
    let disposition = format!("attachment; filename=\"{}\"", filename);
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
}

#[axum::debug_handler]
pub async fn export_candidates(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let csv = state.export_service.candidates_csv().await?;
    let filename = format!("candidatos_{}.csv", Utc::now().format("%Y%m%d"));
    Ok(csv_download(filename, csv))
}

#[axum::debug_handler]
pub async fn export_students(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let csv = state.export_service.students_csv().await?;
    let filename = format!("alunos_{}.csv", Utc::now().format("%Y%m%d"));
    Ok(csv_download(filename, csv))
}
