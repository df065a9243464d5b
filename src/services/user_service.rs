use crate::dto::user_dto::{CreateUserPayload, UpdateUserPayload};
use crate::error::{Error, Result};
use crate::models::user::{User, UserRole};
use crate::utils::crypto;
use sqlx::PgPool;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, name, email, password_hash, role, department, avatar, phone, \
    reset_token, reset_token_expiry, created_at, updated_at";

fn duplicate_email(err: sqlx::Error) -> Error {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            Error::Conflict("Já existe um utilizador com este email".to_string())
        }
        _ => Error::from(err),
    }
}

#[derive(Clone)]
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: CreateUserPayload) -> Result<User> {
        let password_hash = crypto::hash_password(&payload.password)?;
        let role = payload.role.unwrap_or(UserRole::User);

        let sql = format!(
            "INSERT INTO users (name, email, password_hash, role, department, avatar, phone) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(payload.name)
            .bind(payload.email)
            .bind(password_hash)
            .bind(role)
            .bind(payload.department)
            .bind(payload.avatar)
            .bind(payload.phone)
            .fetch_one(&self.pool)
            .await
            .map_err(duplicate_email)?;
        Ok(user)
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at");
        let items = sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?;
        Ok(items)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<User> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Utilizador não encontrado".to_string()))
    }

    pub async fn update(&self, id: Uuid, payload: UpdateUserPayload) -> Result<User> {
        self.get_by_id(id).await?;

        let password_hash = match &payload.password {
            Some(password) => Some(crypto::hash_password(password)?),
            None => None,
        };

        let sql = format!(
            "UPDATE users SET \
                name = COALESCE($2, name), \
                email = COALESCE($3, email), \
                password_hash = COALESCE($4, password_hash), \
                role = COALESCE($5, role), \
                department = COALESCE($6, department), \
                avatar = COALESCE($7, avatar), \
                phone = COALESCE($8, phone), \
                updated_at = NOW() \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(payload.name)
            .bind(payload.email)
            .bind(password_hash)
            .bind(payload.role)
            .bind(payload.department)
            .bind(payload.avatar)
            .bind(payload.phone)
            .fetch_one(&self.pool)
            .await
            .map_err(duplicate_email)?;
        Ok(user)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Utilizador não encontrado".to_string()));
        }
        Ok(())
    }

    /// The same response covers unknown email and wrong password, so a
    /// caller cannot probe which accounts exist.
    pub async fn verify_login(&self, email: &str, password: &str) -> Result<User> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::Unauthorized("Credenciais inválidas".to_string()))?;

        if !crypto::verify_password(password, &user.password_hash)? {
            return Err(Error::Unauthorized("Credenciais inválidas".to_string()));
        }
        Ok(user)
    }

    /// Returns the fresh token only when the account exists; the route
    /// answers identically either way.
    pub async fn issue_reset_token(&self, email: &str) -> Result<Option<(User, String)>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        let Some(user) = user else {
            return Ok(None);
        };

        let token = crypto::generate_reset_token();
        sqlx::query(
            "UPDATE users SET reset_token = $2, reset_token_expiry = $3, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(user.id)
        .bind(&token)
        .bind(crypto::reset_token_expiry())
        .execute(&self.pool)
        .await?;

        Ok(Some((user, token)))
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<User> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE reset_token = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(token)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::BadRequest("Código de recuperação inválido".to_string()))?;

        if crypto::reset_token_expired(user.reset_token_expiry) {
            return Err(Error::BadRequest(
                "O código de recuperação expirou".to_string(),
            ));
        }

        let password_hash = crypto::hash_password(new_password)?;
        let update_sql = format!(
            "UPDATE users SET password_hash = $2, reset_token = NULL, \
             reset_token_expiry = NULL, updated_at = NOW() \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&update_sql)
            .bind(user.id)
            .bind(password_hash)
            .fetch_one(&self.pool)
            .await?;
        Ok(user)
    }

    /// Seeded at startup because the argon2 hash cannot live in a migration.
    pub async fn ensure_default_admin(&self, email: &str, password: &str) -> Result<()> {
        let password_hash = crypto::hash_password(password)?;
        let result = sqlx::query(
            "INSERT INTO users (name, email, password_hash, role) \
             VALUES ('Administrador', $1, $2, 'ADMIN') \
             ON CONFLICT (email) DO NOTHING",
        )
        .bind(email)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            tracing::info!(email, "default admin account created");
        }
        Ok(())
    }
}
