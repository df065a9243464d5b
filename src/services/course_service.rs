use crate::dto::course_dto::{CourseListQuery, CreateCoursePayload, UpdateCoursePayload};
use crate::error::{Error, Result};
use crate::models::course::{Course, CourseStatus};
use sqlx::PgPool;
use uuid::Uuid;

// candidates_count is derived on every read so the admin tables never show
// a stale number next to the capacity columns.
const COURSE_COLUMNS: &str = "id, name, description, duration, start_date, end_date, \
    max_students, application_limit, price, location, image, status, created_at, updated_at, \
    (SELECT COUNT(*) FROM candidates WHERE candidates.course_id = courses.id) AS candidates_count";

#[derive(Clone)]
pub struct CourseService {
    pool: PgPool,
}

impl CourseService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: CreateCoursePayload) -> Result<Course> {
        let status = payload.status.unwrap_or(CourseStatus::Open);

        let sql = format!(
            "INSERT INTO courses \
                (name, description, duration, start_date, end_date, max_students, \
                 application_limit, price, location, image, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {COURSE_COLUMNS}"
        );
        let course = sqlx::query_as::<_, Course>(&sql)
            .bind(payload.name)
            .bind(payload.description)
            .bind(payload.duration)
            .bind(payload.start_date)
            .bind(payload.end_date)
            .bind(payload.max_students)
            .bind(payload.application_limit)
            .bind(payload.price)
            .bind(payload.location)
            .bind(payload.image)
            .bind(status)
            .fetch_one(&self.pool)
            .await?;
        Ok(course)
    }

    /// Unfiltered load used by the list cache.
    pub async fn list_all(&self) -> Result<Vec<Course>> {
        let sql = format!("SELECT {COURSE_COLUMNS} FROM courses ORDER BY created_at DESC");
        let items = sqlx::query_as::<_, Course>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    pub async fn list_filtered(&self, query: CourseListQuery) -> Result<Vec<Course>> {
        let mut filters = Vec::new();
        let mut args: Vec<String> = Vec::new();

        if let Some(status) = query.status {
            filters.push(format!("status::text = ${}", args.len() + 1));
            args.push(status.as_str().to_string());
        }
        if let Some(search) = query.search {
            let first = args.len() + 1;
            let second = first + 1;
            filters.push(format!(
                "(name ILIKE ${} OR COALESCE(description, '') ILIKE ${})",
                first, second
            ));
            args.push(format!("%{}%", search.clone()));
            args.push(format!("%{}%", search));
        }

        let where_clause = if filters.is_empty() {
            "".to_string()
        } else {
            format!("WHERE {}", filters.join(" AND "))
        };

        let sql =
            format!("SELECT {COURSE_COLUMNS} FROM courses {where_clause} ORDER BY created_at DESC");

        let mut statement = sqlx::query_as::<_, Course>(&sql);
        for value in &args {
            statement = statement.bind(value);
        }
        let items = statement.fetch_all(&self.pool).await?;
        Ok(items)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Course> {
        let sql = format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1");
        sqlx::query_as::<_, Course>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Curso não encontrado".to_string()))
    }

    pub async fn update(&self, id: Uuid, payload: UpdateCoursePayload) -> Result<Course> {
        self.get_by_id(id).await?;

        let sql = format!(
            "UPDATE courses SET \
                name = COALESCE($2, name), \
                description = COALESCE($3, description), \
                duration = COALESCE($4, duration), \
                start_date = COALESCE($5, start_date), \
                end_date = COALESCE($6, end_date), \
                max_students = COALESCE($7, max_students), \
                application_limit = COALESCE($8, application_limit), \
                price = COALESCE($9, price), \
                location = COALESCE($10, location), \
                image = COALESCE($11, image), \
                updated_at = NOW() \
             WHERE id = $1 RETURNING {COURSE_COLUMNS}"
        );
        let course = sqlx::query_as::<_, Course>(&sql)
            .bind(id)
            .bind(payload.name)
            .bind(payload.description)
            .bind(payload.duration)
            .bind(payload.start_date)
            .bind(payload.end_date)
            .bind(payload.max_students)
            .bind(payload.application_limit)
            .bind(payload.price)
            .bind(payload.location)
            .bind(payload.image)
            .fetch_one(&self.pool)
            .await?;
        Ok(course)
    }

    pub async fn update_status(&self, id: Uuid, status: CourseStatus) -> Result<Course> {
        let current = self.get_by_id(id).await?;
        if !current.status.permits_transition_to(status) {
            return Err(Error::Conflict(
                "Transição de estado não permitida".to_string(),
            ));
        }

        let sql = format!(
            "UPDATE courses SET status = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {COURSE_COLUMNS}"
        );
        let course = sqlx::query_as::<_, Course>(&sql)
            .bind(id)
            .bind(status)
            .fetch_one(&self.pool)
            .await?;
        Ok(course)
    }

    /// Rejected while any candidate still references the course; the caller
    /// must detach or delete them first.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let attached =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM candidates WHERE course_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        if attached > 0 {
            return Err(Error::Conflict(
                "Não é possível eliminar o curso: existem candidatos associados".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Curso não encontrado".to_string()));
        }
        Ok(())
    }

    /// Closes every OPEN or IN_PROGRESS course whose end date has passed.
    /// Returns how many rows changed so the caller can invalidate caches.
    pub async fn close_expired(&self) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE courses SET status = 'CLOSED', updated_at = NOW() \
             WHERE end_date < CURRENT_DATE AND status IN ('OPEN', 'IN_PROGRESS')",
        )
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM courses")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
