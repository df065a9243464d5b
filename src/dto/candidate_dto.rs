use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::candidate::{Candidate, CandidateStatus};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = validate_attachment_pairing))]
pub struct CreateCandidatePayload {
    #[validate(length(min = 1, message = "o nome é obrigatório"))]
    pub name: String,
    #[validate(email(message = "email inválido"))]
    pub email: String,
    pub country: Option<String>,
    pub phone: Option<String>,
    #[validate(range(min = 14, max = 100, message = "idade fora do intervalo permitido"))]
    pub age: Option<i32>,
    pub education: Option<String>,
    pub experience: Option<String>,
    pub notes: Option<String>,
    pub course_id: Option<Uuid>,
    pub status: Option<CandidateStatus>,
    #[serde(default)]
    pub attachments: Vec<String>,
    #[serde(default)]
    pub document_names: Vec<String>,
}

// attachments[i] pairs with document_names[i]; nothing stronger than the
// index binds them, so at least the lengths must agree.
fn validate_attachment_pairing(payload: &CreateCandidatePayload) -> Result<(), ValidationError> {
    if payload.attachments.len() != payload.document_names.len() {
        let mut err = ValidationError::new("attachment_pairing");
        err.message =
            Some("o número de nomes de documentos deve corresponder ao número de anexos".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = validate_attachment_pairing_update))]
pub struct UpdateCandidatePayload {
    #[validate(length(min = 1, message = "o nome é obrigatório"))]
    pub name: Option<String>,
    #[validate(email(message = "email inválido"))]
    pub email: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
    #[validate(range(min = 14, max = 100, message = "idade fora do intervalo permitido"))]
    pub age: Option<i32>,
    pub education: Option<String>,
    pub experience: Option<String>,
    pub notes: Option<String>,
    pub course_id: Option<Uuid>,
    pub attachments: Option<Vec<String>>,
    pub document_names: Option<Vec<String>>,
}

// Both lists ride together or not at all, otherwise the stored pairing
// would silently drift.
fn validate_attachment_pairing_update(
    payload: &UpdateCandidatePayload,
) -> Result<(), ValidationError> {
    let lengths = (
        payload.attachments.as_ref().map(Vec::len),
        payload.document_names.as_ref().map(Vec::len),
    );
    if let (None, None) = lengths {
        return Ok(());
    }
    if lengths.0 != lengths.1 {
        let mut err = ValidationError::new("attachment_pairing");
        err.message =
            Some("os anexos e os nomes de documentos devem ser atualizados em conjunto".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateCandidateStatusPayload {
    pub status: CandidateStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BulkStatusPayload {
    #[validate(length(min = 1, message = "a lista de candidatos não pode estar vazia"))]
    pub ids: Vec<Uuid>,
    pub status: CandidateStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub country: Option<String>,
    pub phone: Option<String>,
    pub age: Option<i32>,
    pub education: Option<String>,
    pub experience: Option<String>,
    pub notes: Option<String>,
    pub course_id: Option<Uuid>,
    pub course_name: Option<String>,
    pub status: CandidateStatus,
    pub attachments: Vec<String>,
    pub document_names: Vec<String>,
    pub applied_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct CandidateListQuery {
    pub status: Option<CandidateStatus>,
    #[serde(alias = "course")]
    pub course_id: Option<Uuid>,
    pub search: Option<String>,
    pub refresh: Option<bool>,
}

impl CandidateListQuery {
    pub fn is_filtered(&self) -> bool {
        self.status.is_some() || self.course_id.is_some() || self.search.is_some()
    }

    pub fn wants_refresh(&self) -> bool {
        self.refresh.unwrap_or(false)
    }
}

impl From<Candidate> for CandidateResponse {
    fn from(value: Candidate) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            country: value.country,
            phone: value.phone,
            age: value.age,
            education: value.education,
            experience: value.experience,
            notes: value.notes,
            course_id: value.course_id,
            course_name: value.course_name,
            status: value.status,
            attachments: value.attachments,
            document_names: value.document_names,
            applied_at: value.applied_at,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> CreateCandidatePayload {
        CreateCandidatePayload {
            name: "Ana Silva".into(),
            email: "ana@example.com".into(),
            country: Some("Portugal".into()),
            phone: None,
            age: Some(24),
            education: None,
            experience: None,
            notes: None,
            course_id: None,
            status: None,
            attachments: vec!["https://cdn.example.com/cv.pdf".into()],
            document_names: vec!["cv.pdf".into()],
        }
    }

    #[test]
    fn accepts_paired_attachments() {
        assert!(payload().validate().is_ok());
    }

    #[test]
    fn rejects_unpaired_attachments() {
        let mut p = payload();
        p.document_names.clear();
        assert!(p.validate().is_err());
    }

    #[test]
    fn update_requires_both_attachment_lists() {
        let mut p = UpdateCandidatePayload {
            name: None,
            email: None,
            country: None,
            phone: None,
            age: None,
            education: None,
            experience: None,
            notes: None,
            course_id: None,
            attachments: Some(vec!["https://cdn.example.com/cv.pdf".into()]),
            document_names: None,
        };
        assert!(p.validate().is_err());

        p.document_names = Some(vec!["cv.pdf".into()]);
        assert!(p.validate().is_ok());

        p.attachments = None;
        p.document_names = None;
        assert!(p.validate().is_ok());
    }

    #[test]
    fn rejects_bad_email_and_age() {
        let mut p = payload();
        p.email = "not-an-email".into();
        p.age = Some(7);
        let errors = p.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("age"));
    }

    #[test]
    fn bulk_payload_requires_ids() {
        let empty = BulkStatusPayload {
            ids: vec![],
            status: CandidateStatus::Accepted,
        };
        assert!(empty.validate().is_err());

        let ok = BulkStatusPayload {
            ids: vec![Uuid::new_v4()],
            status: CandidateStatus::Accepted,
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn list_query_accepts_course_alias() {
        let q: CandidateListQuery =
            serde_json::from_str(r#"{"course": "7b1c9cb6-5df3-4ba5-b6a8-0c53976a1edc"}"#).unwrap();
        assert!(q.course_id.is_some());
        assert!(q.is_filtered());
    }
}
