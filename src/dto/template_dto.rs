use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::email_template::{EmailTemplate, TemplateKind};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTemplatePayload {
    #[validate(length(min = 1, message = "o nome é obrigatório"))]
    pub name: String,
    #[validate(length(min = 1, message = "o assunto é obrigatório"))]
    pub subject: String,
    #[validate(length(min = 1, message = "o conteúdo é obrigatório"))]
    pub content: String,
    #[serde(rename = "type")]
    pub kind: TemplateKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateTemplatePayload {
    #[validate(length(min = 1, message = "o nome é obrigatório"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "o assunto é obrigatório"))]
    pub subject: Option<String>,
    #[validate(length(min = 1, message = "o conteúdo é obrigatório"))]
    pub content: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<TemplateKind>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateResponse {
    pub id: Uuid,
    pub name: String,
    pub subject: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: TemplateKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EmailTemplate> for TemplateResponse {
    fn from(value: EmailTemplate) -> Self {
        Self {
            id: value.id,
            name: value.name,
            subject: value.subject,
            content: value.content,
            kind: value.kind,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}
