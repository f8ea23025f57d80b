use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::RequireAdmin,
    models::auth::{AtualizarUsuarioPayload, CriarAdminPayload},
};

pub async fn listar_admins(
    _admin: RequireAdmin,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let admins = app_state.auth_service.listar_admins().await?;
    Ok(Json(admins))
}

pub async fn criar_admin(
    _admin: RequireAdmin,
    State(app_state): State<AppState>,
    Json(payload): Json<CriarAdminPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let usuario = app_state.auth_service.criar_admin(&payload).await?;
    Ok((StatusCode::CREATED, Json(usuario)))
}

pub async fn atualizar(
    _admin: RequireAdmin,
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<AtualizarUsuarioPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let usuario = app_state.auth_service.atualizar_usuario(id, &payload).await?;
    Ok(Json(usuario))
}

pub async fn deletar(
    _admin: RequireAdmin,
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    app_state.auth_service.deletar_admin(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
