use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;

use crate::{
    dto::notification_dto::{
        CreateNotificationPayload, NotificationListQuery, NotificationListResponse,
        NotificationResponse,
    },
    error::Result,
    extractors::ValidJson,
    AppState,
};

/// The list always carries the unread total so the bell badge needs no
/// second request.
#[axum::debug_handler]
pub async fn list_notifications(
    State(state): State<AppState>,
    Query(query): Query<NotificationListQuery>,
) -> Result<impl IntoResponse> {
    let unread_only = query.unread.unwrap_or(false);
    let items = state.notification_service.list(unread_only).await?;
    let unread_count = state.notification_service.unread_count().await?;

    Ok(Json(NotificationListResponse {
        items: items.into_iter().map(NotificationResponse::from).collect(),
        unread_count,
    }))
}

#[axum::debug_handler]
pub async fn create_notification(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<CreateNotificationPayload>,
) -> Result<impl IntoResponse> {
    let notification = state
        .notification_service
        .create(&payload.title, &payload.message, payload.kind)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(NotificationResponse::from(notification)),
    ))
}

#[axum::debug_handler]
pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let notification = state.notification_service.mark_read(id).await?;
    Ok(Json(NotificationResponse::from(notification)))
}

#[axum::debug_handler]
pub async fn mark_all_read(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let updated = state.notification_service.mark_all_read().await?;
    Ok(Json(serde_json::json!({ "updated": updated })))
}

#[axum::debug_handler]
pub async fn delete_notification(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.notification_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
