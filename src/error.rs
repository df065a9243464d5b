use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Serialize;
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

/// User-facing messages are short Portuguese strings; the raw cause of
/// database/provider failures is logged server-side and never serialized
/// into a response.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Validation error")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Mail transport error: {0}")]
    Mail(#[from] reqwest::Error),

    #[error("Mail provider error: {0}")]
    Provider(String),

    #[error("Too many requests")]
    RateLimited,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

fn field_errors(errors: &validator::ValidationErrors) -> Vec<FieldError> {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| FieldError {
                field: field.to_string(),
                message: e
                    .message
                    .clone()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "valor inválido".to_string()),
            })
        })
        .collect()
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        if let Error::Validation(errors) = &self {
            let fields = field_errors(errors);
            let body = Json(json!({ "error": "Dados inválidos", "fields": fields }));
            return (StatusCode::BAD_REQUEST, body).into_response();
        }

        let (status, message) = match self {
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Error::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Error::Conflict(msg) => (StatusCode::CONFLICT, msg),
            Error::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "Demasiados pedidos. Tente novamente dentro de momentos.".to_string(),
            ),
            Error::Database(err) => {
                tracing::error!(error = %err, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado. Tente novamente mais tarde.".to_string(),
                )
            }
            Error::Mail(err) => {
                tracing::error!(error = %err, "mail transport error");
                (
                    StatusCode::BAD_GATEWAY,
                    "Não foi possível enviar o email. Tente novamente mais tarde.".to_string(),
                )
            }
            Error::Provider(detail) => {
                tracing::error!(error = %detail, "mail provider error");
                (
                    StatusCode::BAD_GATEWAY,
                    "Não foi possível enviar o email. Tente novamente mais tarde.".to_string(),
                )
            }
            Error::Json(err) => {
                tracing::warn!(error = %err, "request body rejected");
                (StatusCode::BAD_REQUEST, "Corpo do pedido inválido".to_string())
            }
            Error::Config(msg) | Error::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado. Tente novamente mais tarde.".to_string(),
                )
            }
            Error::Anyhow(err) => {
                tracing::error!(error = ?err, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado. Tente novamente mais tarde.".to_string(),
                )
            }
            Error::Validation(_) => unreachable!("handled above"),
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound("Recurso não encontrado".to_string()),
            other => Error::Database(other),
        }
    }
}
