use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::notification::{Notification, NotificationKind};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateNotificationPayload {
    #[validate(length(min = 1, message = "o título é obrigatório"))]
    pub title: String,
    #[validate(length(min = 1, message = "a mensagem é obrigatória"))]
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
}

/// Wire name for the kind column is `type`, kept for the admin frontend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationListResponse {
    pub items: Vec<NotificationResponse>,
    pub unread_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NotificationListQuery {
    pub unread: Option<bool>,
}

impl From<Notification> for NotificationResponse {
    fn from(value: Notification) -> Self {
        Self {
            id: value.id,
            title: value.title,
            message: value.message,
            kind: value.kind,
            is_read: value.is_read,
            created_at: value.created_at,
        }
    }
}
