use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::{AuthenticatedUser, RequireAdmin},
    models::pagamento::MarcarPagoPayload,
};

pub async fn listar(
    _admin: RequireAdmin,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let pagamentos = app_state.pagamento_service.listar().await?;
    Ok(Json(pagamentos))
}

pub async fn marcar_pago(
    _admin: RequireAdmin,
    State(app_state): State<AppState>,
    Json(payload): Json<MarcarPagoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let atualizados = app_state.pagamento_service.marcar_pagos(&payload.ids).await?;
    Ok(Json(json!({ "atualizados": atualizados })))
}

// Parceiro autenticado consulta os próprios pagamentos.
pub async fn listar_por_parceiro(
    _usuario: AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(parceiro_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let pagamentos = app_state
        .pagamento_service
        .listar_por_parceiro(parceiro_id)
        .await?;
    Ok(Json(pagamentos))
}

pub async fn recibo(
    _admin: RequireAdmin,
    State(app_state): State<AppState>,
    Path(parceiro_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let recibo = app_state.pagamento_service.gerar_recibo(parceiro_id).await?;
    Ok(Json(recibo))
}
