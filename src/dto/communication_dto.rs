use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::candidate::CandidateStatus;
use crate::services::communication_service::SendReport;

/// How the recipient set is resolved. Modes are mutually exclusive; the
/// discriminator a mode depends on is checked before any database access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipientMode {
    All,
    Course,
    Status,
    Custom,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendCommunicationPayload {
    pub mode: RecipientMode,
    pub course_id: Option<Uuid>,
    pub status: Option<CandidateStatus>,
    pub candidate_ids: Option<Vec<Uuid>>,
    #[validate(length(min = 1, message = "o assunto é obrigatório"))]
    pub subject: String,
    #[validate(length(min = 1, message = "a mensagem é obrigatória"))]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendTestPayload {
    #[validate(email(message = "email inválido"))]
    pub email: String,
    #[validate(length(min = 1, message = "o assunto é obrigatório"))]
    pub subject: String,
    #[validate(length(min = 1, message = "a mensagem é obrigatória"))]
    pub message: String,
}

/// Dispatch tally. `success + failed` always equals the number of resolved
/// recipients; each error string names the recipient it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendReportResponse {
    pub success: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

impl From<SendReport> for SendReportResponse {
    fn from(value: SendReport) -> Self {
        Self {
            success: value.success,
            failed: value.failed,
            errors: value.errors,
        }
    }
}
