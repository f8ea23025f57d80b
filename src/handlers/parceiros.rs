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
    models::parceiro::{AtualizarParceiroPayload, CriarParceiroPayload},
};

pub async fn listar(
    _admin: RequireAdmin,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let parceiros = app_state.parceiro_service.listar().await?;
    Ok(Json(parceiros))
}

pub async fn buscar(
    _admin: RequireAdmin,
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let parceiro = app_state.parceiro_service.buscar(id).await?;
    Ok(Json(parceiro))
}

pub async fn criar(
    _admin: RequireAdmin,
    State(app_state): State<AppState>,
    Json(payload): Json<CriarParceiroPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let parceiro = app_state.parceiro_service.criar(&payload).await?;
    Ok((StatusCode::CREATED, Json(parceiro)))
}

pub async fn atualizar(
    _admin: RequireAdmin,
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<AtualizarParceiroPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let parceiro = app_state.parceiro_service.atualizar(id, &payload).await?;
    Ok(Json(parceiro))
}

pub async fn deletar(
    _admin: RequireAdmin,
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    app_state.parceiro_service.deletar(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
