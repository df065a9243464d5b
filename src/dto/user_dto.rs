use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::user::{User, UserRole};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserPayload {
    #[validate(length(min = 1, message = "o nome é obrigatório"))]
    pub name: String,
    #[validate(email(message = "email inválido"))]
    pub email: String,
    #[validate(length(min = 8, message = "a palavra-passe deve ter pelo menos 8 caracteres"))]
    pub password: String,
    pub role: Option<UserRole>,
    pub department: Option<String>,
    #[validate(url(message = "URL inválido"))]
    pub avatar: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserPayload {
    #[validate(length(min = 1, message = "o nome é obrigatório"))]
    pub name: Option<String>,
    #[validate(email(message = "email inválido"))]
    pub email: Option<String>,
    #[validate(length(min = 8, message = "a palavra-passe deve ter pelo menos 8 caracteres"))]
    pub password: Option<String>,
    pub role: Option<UserRole>,
    pub department: Option<String>,
    #[validate(url(message = "URL inválido"))]
    pub avatar: Option<String>,
    pub phone: Option<String>,
}

/// Never carries the password hash or the reset token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub department: Option<String>,
    pub avatar: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginPayload {
    #[validate(email(message = "email inválido"))]
    pub email: String,
    #[validate(length(min = 1, message = "a palavra-passe é obrigatória"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ForgotPasswordPayload {
    #[validate(email(message = "email inválido"))]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordPayload {
    #[validate(length(min = 1, message = "o código de recuperação é obrigatório"))]
    pub token: String,
    #[validate(length(min = 8, message = "a palavra-passe deve ter pelo menos 8 caracteres"))]
    pub new_password: String,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            role: value.role,
            department: value.department,
            avatar: value.avatar,
            phone: value.phone,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}
