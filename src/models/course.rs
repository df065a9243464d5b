use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "course_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CourseStatus {
    Open,
    InProgress,
    Closed,
    Completed,
}

impl CourseStatus {
    pub const ALL: [CourseStatus; 4] = [
        CourseStatus::Open,
        CourseStatus::InProgress,
        CourseStatus::Closed,
        CourseStatus::Completed,
    ];

    /// Any enum value is a legal direct transition target; the admin UI's
    /// one-click status changes rely on this. Status-mutating call sites
    /// must go through here, so a transition graph can be added in one
    /// place.
    pub fn permits_transition_to(&self, _target: CourseStatus) -> bool {
        true
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CourseStatus::Open => "OPEN",
            CourseStatus::InProgress => "IN_PROGRESS",
            CourseStatus::Closed => "CLOSED",
            CourseStatus::Completed => "COMPLETED",
        }
    }
}

/// `candidates_count` is derived (a subselect in every course query), not a
/// stored column.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub duration: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub max_students: i32,
    pub application_limit: Option<i32>,
    pub price: Option<Decimal>,
    pub location: Option<String>,
    pub image: Option<String>,
    pub status: CourseStatus,
    pub candidates_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
