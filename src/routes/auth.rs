use axum::{
    extract::State,
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::{
    config::get_config,
    dto::user_dto::{ForgotPasswordPayload, LoginPayload, ResetPasswordPayload, UserResponse},
    error::Result,
    extractors::ValidJson,
    AppState,
};

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<LoginPayload>,
) -> Result<impl IntoResponse> {
    let user = state
        .user_service
        .verify_login(&payload.email, &payload.password)
        .await?;
    Ok(Json(UserResponse::from(user)))
}

/// Always answers with the same message so the route cannot be used to
/// probe which emails have accounts.
#[axum::debug_handler]
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<ForgotPasswordPayload>,
) -> Result<impl IntoResponse> {
    if let Some((user, token)) = state.user_service.issue_reset_token(&payload.email).await? {
        let link = format!("{}/reset-password?token={}", get_config().app_base_url, token);
        let html = format!(
            "<p>Olá {},</p>\
             <p>Recebemos um pedido para redefinir a sua palavra-passe. \
             Aceda a <a href=\"{}\">este endereço</a> para escolher uma nova. \
             O código é válido durante uma hora.</p>\
             <p>Se não fez este pedido, ignore este email.</p>",
            user.name, link
        );
        state
            .mailer
            .send(&user.email, "Recuperação de palavra-passe", &html)
            .await?;
    }

    Ok(Json(json!({
        "message": "Se o email existir, receberá instruções para redefinir a palavra-passe"
    })))
}

#[axum::debug_handler]
pub async fn reset_password(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<ResetPasswordPayload>,
) -> Result<impl IntoResponse> {
    state
        .user_service
        .reset_password(&payload.token, &payload.new_password)
        .await?;
    Ok(Json(json!({ "message": "Palavra-passe redefinida com sucesso" })))
}
