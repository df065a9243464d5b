use axum::{
    extract::State,
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::{
    dto::communication_dto::{SendCommunicationPayload, SendReportResponse, SendTestPayload},
    error::Result,
    extractors::ValidJson,
    AppState,
};

/// Bulk send. The tally always comes back 200; per-recipient failures live
/// inside it rather than failing the request.
#[axum::debug_handler]
pub async fn send_communication(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<SendCommunicationPayload>,
) -> Result<impl IntoResponse> {
    let report = state.communication_service.send(payload).await?;
    Ok(Json(SendReportResponse::from(report)))
}

#[axum::debug_handler]
pub async fn send_test(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<SendTestPayload>,
) -> Result<impl IntoResponse> {
    state.communication_service.send_test(payload).await?;
    Ok(Json(json!({ "message": "Email de teste enviado" })))
}
