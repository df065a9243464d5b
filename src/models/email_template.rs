use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "template_kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TemplateKind {
    Welcome,
    Acceptance,
    Rejection,
    Reminder,
}

/// Subject and content accept the literal placeholder tokens {nome},
/// {email}, {curso}, {estado}, {pais} and {telefone}.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmailTemplate {
    pub id: Uuid,
    pub name: String,
    pub subject: String,
    pub content: String,
    pub kind: TemplateKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
