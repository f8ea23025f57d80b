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
    models::cliente::{AtualizarClientePayload, CriarClientePayload},
    services::AuthService,
};

pub async fn listar(
    _admin: RequireAdmin,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let clientes = app_state.cliente_repo.listar().await?;
    Ok(Json(clientes))
}

pub async fn buscar(
    _usuario: AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let cliente = app_state
        .cliente_repo
        .buscar(id)
        .await?
        .ok_or(AppError::NotFound("Cliente"))?;
    Ok(Json(cliente))
}

// Rota pública: auto-cadastro de cliente.
pub async fn criar(
    State(app_state): State<AppState>,
    Json(payload): Json<CriarClientePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let senha_hash = AuthService::hash_senha(&payload.senha).await?;
    let cliente = app_state.cliente_repo.criar(&payload, &senha_hash).await?;

    tracing::info!("Cliente {} cadastrado", cliente.id);
    Ok((StatusCode::CREATED, Json(cliente)))
}

pub async fn atualizar(
    _admin: RequireAdmin,
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<AtualizarClientePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let senha_hash = match &payload.senha {
        Some(senha) => Some(AuthService::hash_senha(senha).await?),
        None => None,
    };
    let cliente = app_state
        .cliente_repo
        .atualizar(id, &payload, senha_hash.as_deref())
        .await?;
    Ok(Json(cliente))
}

pub async fn deletar(
    _admin: RequireAdmin,
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    app_state.cliente_repo.deletar(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn sacolinhas(
    _usuario: AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let sacolinhas = app_state.sacolinha_service.listar_por_cliente(id).await?;
    Ok(Json(sacolinhas))
}

// Histórico achatado de compras: cada peça de cada sacolinha do cliente.
pub async fn compras(
    _usuario: AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let compras = app_state.sacolinha_service.compras_por_cliente(id).await?;
    Ok(Json(compras))
}
