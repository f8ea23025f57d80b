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
    middleware::auth::{AuthenticatedUser, RequireAdmin},
    models::peca::{AtualizarPecaPayload, CriarPecaPayload},
};

pub async fn listar(
    _usuario: AuthenticatedUser,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let pecas = app_state.peca_repo.listar().await?;
    Ok(Json(pecas))
}

pub async fn buscar(
    _usuario: AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let peca = app_state
        .peca_repo
        .buscar(id)
        .await?
        .ok_or(AppError::NotFound("Peça"))?;
    Ok(Json(peca))
}

pub async fn criar(
    _admin: RequireAdmin,
    State(app_state): State<AppState>,
    Json(payload): Json<CriarPecaPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let peca = app_state.peca_repo.criar(&payload).await?;

    tracing::info!("Peça '{}' cadastrada", peca.codigo_etiqueta);
    Ok((StatusCode::CREATED, Json(peca)))
}

pub async fn atualizar(
    _admin: RequireAdmin,
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<AtualizarPecaPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let peca = app_state.peca_repo.atualizar(id, &payload).await?;
    Ok(Json(peca))
}

pub async fn deletar(
    _admin: RequireAdmin,
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    app_state.peca_repo.deletar(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
