use crate::error::{Error, Result};
use crate::models::notification::{Notification, NotificationKind};
use sqlx::PgPool;
use uuid::Uuid;

const NOTIFICATION_COLUMNS: &str = "id, title, message, kind, is_read, created_at";

#[derive(Clone)]
pub struct NotificationService {
    pool: PgPool,
}

impl NotificationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        title: &str,
        message: &str,
        kind: NotificationKind,
    ) -> Result<Notification> {
        let sql = format!(
            "INSERT INTO notifications (title, message, kind) VALUES ($1, $2, $3) \
             RETURNING {NOTIFICATION_COLUMNS}"
        );
        let notification = sqlx::query_as::<_, Notification>(&sql)
            .bind(title)
            .bind(message)
            .bind(kind)
            .fetch_one(&self.pool)
            .await?;
        Ok(notification)
    }

    /// Side-effect notifications must never fail the operation that produced
    /// them; errors are logged and dropped here.
    pub async fn record(&self, title: &str, message: &str, kind: NotificationKind) {
        if let Err(err) = self.create(title, message, kind).await {
            tracing::warn!(error = %err, title, "failed to record notification");
        }
    }

    pub async fn list(&self, unread_only: bool) -> Result<Vec<Notification>> {
        let sql = if unread_only {
            format!(
                "SELECT {NOTIFICATION_COLUMNS} FROM notifications \
                 WHERE is_read = FALSE ORDER BY created_at DESC"
            )
        } else {
            format!("SELECT {NOTIFICATION_COLUMNS} FROM notifications ORDER BY created_at DESC")
        };
        let items = sqlx::query_as::<_, Notification>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    pub async fn unread_count(&self) -> Result<i64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM notifications WHERE is_read = FALSE")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    pub async fn mark_read(&self, id: Uuid) -> Result<Notification> {
        let sql = format!(
            "UPDATE notifications SET is_read = TRUE WHERE id = $1 \
             RETURNING {NOTIFICATION_COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Notificação não encontrada".to_string()))
    }

    pub async fn mark_all_read(&self) -> Result<u64> {
        let result = sqlx::query("UPDATE notifications SET is_read = TRUE WHERE is_read = FALSE")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Notificação não encontrada".to_string()));
        }
        Ok(())
    }
}
