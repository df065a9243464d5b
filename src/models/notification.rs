use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

/// Written as a side effect of domain events (new application, bulk email
/// outcome) or by the admin by hand; only `is_read` ever changes after
/// creation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}
