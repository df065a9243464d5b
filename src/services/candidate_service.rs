use crate::dto::candidate_dto::{
    CandidateListQuery, CreateCandidatePayload, UpdateCandidatePayload,
};
use crate::error::{Error, Result};
use crate::models::candidate::{Candidate, CandidateStatus};
use sqlx::PgPool;
use uuid::Uuid;

pub(crate) const CANDIDATE_COLUMNS: &str = "id, name, email, country, phone, age, education, \
    experience, notes, course_id, status, attachments, document_names, applied_at, created_at, \
    updated_at, \
    (SELECT name FROM courses WHERE courses.id = candidates.course_id) AS course_name";

#[derive(Clone)]
pub struct CandidateService {
    pool: PgPool,
}

impl CandidateService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: CreateCandidatePayload) -> Result<Candidate> {
        if let Some(course_id) = payload.course_id {
            self.ensure_course_exists(course_id).await?;
        }
        let status = payload.status.unwrap_or(CandidateStatus::Registered);

        let sql = format!(
            "INSERT INTO candidates \
                (name, email, country, phone, age, education, experience, notes, course_id, \
                 status, attachments, document_names) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {CANDIDATE_COLUMNS}"
        );
        let candidate = sqlx::query_as::<_, Candidate>(&sql)
            .bind(payload.name)
            .bind(payload.email)
            .bind(payload.country)
            .bind(payload.phone)
            .bind(payload.age)
            .bind(payload.education)
            .bind(payload.experience)
            .bind(payload.notes)
            .bind(payload.course_id)
            .bind(status)
            .bind(payload.attachments)
            .bind(payload.document_names)
            .fetch_one(&self.pool)
            .await?;
        Ok(candidate)
    }

    /// Unfiltered load used by the list cache.
    pub async fn list_all(&self) -> Result<Vec<Candidate>> {
        let sql = format!("SELECT {CANDIDATE_COLUMNS} FROM candidates ORDER BY applied_at DESC");
        let items = sqlx::query_as::<_, Candidate>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    pub async fn list_filtered(&self, query: CandidateListQuery) -> Result<Vec<Candidate>> {
        let mut filters = Vec::new();
        let mut args: Vec<String> = Vec::new();

        if let Some(status) = query.status {
            filters.push(format!("status::text = ${}", args.len() + 1));
            args.push(status.as_str().to_string());
        }
        if let Some(course_id) = query.course_id {
            filters.push(format!("course_id::text = ${}", args.len() + 1));
            args.push(course_id.to_string());
        }
        if let Some(search) = query.search {
            let first = args.len() + 1;
            let second = first + 1;
            filters.push(format!(
                "(name ILIKE ${} OR email ILIKE ${})",
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

        let sql = format!(
            "SELECT {CANDIDATE_COLUMNS} FROM candidates {where_clause} ORDER BY applied_at DESC"
        );

        let mut statement = sqlx::query_as::<_, Candidate>(&sql);
        for value in &args {
            statement = statement.bind(value);
        }
        let items = statement.fetch_all(&self.pool).await?;
        Ok(items)
    }

    /// The student view: candidates whose status sits in the accepted set.
    pub async fn list_students(&self) -> Result<Vec<Candidate>> {
        let sql = format!(
            "SELECT {CANDIDATE_COLUMNS} FROM candidates \
             WHERE status = ANY($1) ORDER BY updated_at DESC"
        );
        let items = sqlx::query_as::<_, Candidate>(&sql)
            .bind(CandidateStatus::STUDENT_STATUSES.to_vec())
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Candidate> {
        let sql = format!("SELECT {CANDIDATE_COLUMNS} FROM candidates WHERE id = $1");
        sqlx::query_as::<_, Candidate>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Candidato não encontrado".to_string()))
    }

    pub async fn update(&self, id: Uuid, payload: UpdateCandidatePayload) -> Result<Candidate> {
        self.get_by_id(id).await?;
        if let Some(course_id) = payload.course_id {
            self.ensure_course_exists(course_id).await?;
        }

        let sql = format!(
            "UPDATE candidates SET \
                name = COALESCE($2, name), \
                email = COALESCE($3, email), \
                country = COALESCE($4, country), \
                phone = COALESCE($5, phone), \
                age = COALESCE($6, age), \
                education = COALESCE($7, education), \
                experience = COALESCE($8, experience), \
                notes = COALESCE($9, notes), \
                course_id = COALESCE($10, course_id), \
                attachments = COALESCE($11, attachments), \
                document_names = COALESCE($12, document_names), \
                updated_at = NOW() \
             WHERE id = $1 RETURNING {CANDIDATE_COLUMNS}"
        );
        let candidate = sqlx::query_as::<_, Candidate>(&sql)
            .bind(id)
            .bind(payload.name)
            .bind(payload.email)
            .bind(payload.country)
            .bind(payload.phone)
            .bind(payload.age)
            .bind(payload.education)
            .bind(payload.experience)
            .bind(payload.notes)
            .bind(payload.course_id)
            .bind(payload.attachments)
            .bind(payload.document_names)
            .fetch_one(&self.pool)
            .await?;
        Ok(candidate)
    }

    pub async fn update_status(&self, id: Uuid, status: CandidateStatus) -> Result<Candidate> {
        let current = self.get_by_id(id).await?;
        if !current.status.permits_transition_to(status) {
            return Err(Error::Conflict(
                "Transição de estado não permitida".to_string(),
            ));
        }

        let sql = format!(
            "UPDATE candidates SET status = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {CANDIDATE_COLUMNS}"
        );
        let candidate = sqlx::query_as::<_, Candidate>(&sql)
            .bind(id)
            .bind(status)
            .fetch_one(&self.pool)
            .await?;
        Ok(candidate)
    }

    /// All-or-nothing: every id must exist and permit the transition before
    /// any row is touched.
    pub async fn bulk_update_status(
        &self,
        ids: &[Uuid],
        status: CandidateStatus,
    ) -> Result<Vec<Candidate>> {
        let current = sqlx::query_as::<_, (Uuid, CandidateStatus)>(
            "SELECT id, status FROM candidates WHERE id = ANY($1)",
        )
        .bind(ids.to_vec())
        .fetch_all(&self.pool)
        .await?;

        if current.len() != ids.len() {
            return Err(Error::NotFound(
                "Um ou mais candidatos não foram encontrados".to_string(),
            ));
        }
        for (_, from) in &current {
            if !from.permits_transition_to(status) {
                return Err(Error::Conflict(
                    "Transição de estado não permitida".to_string(),
                ));
            }
        }

        let sql = format!(
            "UPDATE candidates SET status = $1, updated_at = NOW() \
             WHERE id = ANY($2) RETURNING {CANDIDATE_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Candidate>(&sql)
            .bind(status)
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM candidates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Candidato não encontrado".to_string()));
        }
        Ok(())
    }

    pub async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM candidates")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn count_students(&self) -> Result<i64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM candidates WHERE status = ANY($1)")
                .bind(CandidateStatus::STUDENT_STATUSES.to_vec())
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    pub async fn count_recent_week(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM candidates WHERE applied_at >= NOW() - INTERVAL '7 days'",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    pub async fn status_counts(&self) -> Result<Vec<(CandidateStatus, i64)>> {
        let rows = sqlx::query_as::<_, (CandidateStatus, i64)>(
            "SELECT status, COUNT(*) FROM candidates GROUP BY status ORDER BY COUNT(*) DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn ensure_course_exists(&self, course_id: Uuid) -> Result<()> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM courses WHERE id = $1)")
                .bind(course_id)
                .fetch_one(&self.pool)
                .await?;
        if !exists {
            return Err(Error::BadRequest("O curso indicado não existe".to_string()));
        }
        Ok(())
    }
}
