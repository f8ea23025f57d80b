use axum::{Json, extract::State, response::IntoResponse};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{AuthResponse, LoginPayload},
};

pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let (token, usuario) = app_state
        .auth_service
        .login(&payload.email, &payload.senha)
        .await?;

    Ok(Json(AuthResponse { token, usuario }))
}

pub async fn me(AuthenticatedUser(usuario): AuthenticatedUser) -> impl IntoResponse {
    Json(usuario)
}
