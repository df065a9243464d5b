use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::course::{Course, CourseStatus};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = validate_course_dates))]
pub struct CreateCoursePayload {
    #[validate(length(min = 1, message = "o nome é obrigatório"))]
    pub name: String,
    pub description: Option<String>,
    pub duration: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[validate(range(min = 1, message = "deve ser pelo menos 1"))]
    pub max_students: i32,
    #[validate(range(min = 1, message = "deve ser pelo menos 1"))]
    pub application_limit: Option<i32>,
    pub price: Option<Decimal>,
    pub location: Option<String>,
    #[validate(url(message = "URL inválido"))]
    pub image: Option<String>,
    pub status: Option<CourseStatus>,
}

// The date-order rule applies to the creation payload only; partial updates
// may move either date on its own.
fn validate_course_dates(payload: &CreateCoursePayload) -> Result<(), ValidationError> {
    if payload.end_date < payload.start_date {
        let mut err = ValidationError::new("date_order");
        err.message = Some("a data de fim não pode ser anterior à data de início".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCoursePayload {
    #[validate(length(min = 1, message = "o nome é obrigatório"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[validate(range(min = 1, message = "deve ser pelo menos 1"))]
    pub max_students: Option<i32>,
    #[validate(range(min = 1, message = "deve ser pelo menos 1"))]
    pub application_limit: Option<i32>,
    pub price: Option<Decimal>,
    pub location: Option<String>,
    #[validate(url(message = "URL inválido"))]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateCourseStatusPayload {
    pub status: CourseStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
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

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct CourseListQuery {
    pub status: Option<CourseStatus>,
    pub search: Option<String>,
    pub refresh: Option<bool>,
}

impl CourseListQuery {
    pub fn is_filtered(&self) -> bool {
        self.status.is_some() || self.search.is_some()
    }

    pub fn wants_refresh(&self) -> bool {
        self.refresh.unwrap_or(false)
    }
}

impl From<Course> for CourseResponse {
    fn from(value: Course) -> Self {
        Self {
            id: value.id,
            name: value.name,
            description: value.description,
            duration: value.duration,
            start_date: value.start_date,
            end_date: value.end_date,
            max_students: value.max_students,
            application_limit: value.application_limit,
            price: value.price,
            location: value.location,
            image: value.image,
            status: value.status,
            candidates_count: value.candidates_count,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}
