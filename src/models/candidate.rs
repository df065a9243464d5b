use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "candidate_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CandidateStatus {
    Registered,
    Accepted,
    InTraining,
    Completed,
    Rejected,
}

impl sqlx::postgres::PgHasArrayType for CandidateStatus {
    fn array_type_info() -> sqlx::postgres::PgTypeInfo {
        sqlx::postgres::PgTypeInfo::with_name("_candidate_status")
    }
}

impl CandidateStatus {
    pub const ALL: [CandidateStatus; 5] = [
        CandidateStatus::Registered,
        CandidateStatus::Accepted,
        CandidateStatus::InTraining,
        CandidateStatus::Completed,
        CandidateStatus::Rejected,
    ];

    /// The statuses whose candidates appear in the derived "students" view.
    pub const STUDENT_STATUSES: [CandidateStatus; 3] = [
        CandidateStatus::Accepted,
        CandidateStatus::InTraining,
        CandidateStatus::Completed,
    ];

    /// Any enum value is a legal direct transition target; bulk status
    /// changes and one-click accept/reject rely on this. Status-mutating
    /// call sites must go through here, so a transition graph can be added
    /// in one place.
    pub fn permits_transition_to(&self, _target: CandidateStatus) -> bool {
        true
    }

    pub fn is_student(&self) -> bool {
        matches!(
            self,
            CandidateStatus::Accepted | CandidateStatus::InTraining | CandidateStatus::Completed
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateStatus::Registered => "REGISTERED",
            CandidateStatus::Accepted => "ACCEPTED",
            CandidateStatus::InTraining => "IN_TRAINING",
            CandidateStatus::Completed => "COMPLETED",
            CandidateStatus::Rejected => "REJECTED",
        }
    }
}

/// `attachments[i]` pairs with `document_names[i]` by position only; both
/// hold externally hosted media (URL + original file name), never bytes.
/// `course_name` is derived via a join, not a stored column.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Candidate {
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
