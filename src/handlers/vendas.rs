use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use validator::Validate;

use crate::{
    common::error::AppError, config::AppState, middleware::auth::RequireAdmin,
    models::venda::RegistrarVendaPayload,
};

pub async fn listar(
    _admin: RequireAdmin,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let vendas = app_state.venda_service.listar().await?;
    Ok(Json(vendas))
}

pub async fn registrar(
    _admin: RequireAdmin,
    State(app_state): State<AppState>,
    Json(payload): Json<RegistrarVendaPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let registro = app_state.venda_service.registrar(&payload).await?;
    Ok((StatusCode::CREATED, Json(registro)))
}
