use crate::dto::template_dto::{CreateTemplatePayload, UpdateTemplatePayload};
use crate::error::{Error, Result};
use crate::models::email_template::EmailTemplate;
use sqlx::PgPool;
use uuid::Uuid;

const TEMPLATE_COLUMNS: &str = "id, name, subject, content, kind, created_at, updated_at";

#[derive(Clone)]
pub struct TemplateService {
    pool: PgPool,
}

impl TemplateService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: CreateTemplatePayload) -> Result<EmailTemplate> {
        let sql = format!(
            "INSERT INTO email_templates (name, subject, content, kind) \
             VALUES ($1, $2, $3, $4) RETURNING {TEMPLATE_COLUMNS}"
        );
        let template = sqlx::query_as::<_, EmailTemplate>(&sql)
            .bind(payload.name)
            .bind(payload.subject)
            .bind(payload.content)
            .bind(payload.kind)
            .fetch_one(&self.pool)
            .await?;
        Ok(template)
    }

    pub async fn list(&self) -> Result<Vec<EmailTemplate>> {
        let sql = format!("SELECT {TEMPLATE_COLUMNS} FROM email_templates ORDER BY name");
        let items = sqlx::query_as::<_, EmailTemplate>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<EmailTemplate> {
        let sql = format!("SELECT {TEMPLATE_COLUMNS} FROM email_templates WHERE id = $1");
        sqlx::query_as::<_, EmailTemplate>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Modelo de email não encontrado".to_string()))
    }

    pub async fn update(&self, id: Uuid, payload: UpdateTemplatePayload) -> Result<EmailTemplate> {
        let sql = format!(
            "UPDATE email_templates SET \
                name = COALESCE($2, name), \
                subject = COALESCE($3, subject), \
                content = COALESCE($4, content), \
                kind = COALESCE($5, kind), \
                updated_at = NOW() \
             WHERE id = $1 RETURNING {TEMPLATE_COLUMNS}"
        );
        sqlx::query_as::<_, EmailTemplate>(&sql)
            .bind(id)
            .bind(payload.name)
            .bind(payload.subject)
            .bind(payload.content)
            .bind(payload.kind)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Modelo de email não encontrado".to_string()))
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM email_templates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Modelo de email não encontrado".to_string()));
        }
        Ok(())
    }
}
