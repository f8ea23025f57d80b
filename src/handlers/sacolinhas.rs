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
    models::sacolinha::{AdicionarPecaPayload, EnviarSacolinhaPayload},
};

pub async fn listar(
    _admin: RequireAdmin,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let sacolinhas = app_state.sacolinha_service.listar().await?;
    Ok(Json(sacolinhas))
}

pub async fn buscar(
    _usuario: AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let sacolinha = app_state.sacolinha_service.buscar(id).await?;
    Ok(Json(sacolinha))
}

// Coloca a peça na sacolinha aberta do cliente, criando uma se preciso.
pub async fn adicionar_peca(
    _admin: RequireAdmin,
    State(app_state): State<AppState>,
    Path(cliente_id): Path<i32>,
    Json(payload): Json<AdicionarPecaPayload>,
) -> Result<impl IntoResponse, AppError> {
    let sacolinha = app_state
        .sacolinha_service
        .adicionar_peca(cliente_id, payload.peca_id)
        .await?;
    Ok(Json(sacolinha))
}

pub async fn remover_peca(
    _admin: RequireAdmin,
    State(app_state): State<AppState>,
    Path((id, peca_id)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, AppError> {
    app_state.sacolinha_service.remover_peca(id, peca_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn enviar(
    _admin: RequireAdmin,
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<EnviarSacolinhaPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let sacolinha = app_state.sacolinha_service.enviar(id, &payload).await?;
    Ok(Json(sacolinha))
}

pub async fn entregar(
    _admin: RequireAdmin,
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let sacolinha = app_state.sacolinha_service.entregar(id).await?;
    Ok(Json(sacolinha))
}
