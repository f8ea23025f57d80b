use axum::{
    Extension, Json, Router,
    extract::Path,
    http::StatusCode,
    middleware as axum_middleware,
    response::IntoResponse,
    routing::{get, put},
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    db::CatalogoRepository,
    middleware::auth::{auth_guard, RequireAdmin},
    models::catalogo::{AtualizarItemCatalogoPayload, CriarItemCatalogoPayload},
};

// Marcas, tamanhos e tipos de peça têm exatamente a mesma cara: o router é
// montado uma vez por tabela, com o repositório certo injetado via Extension.
pub fn router(repo: CatalogoRepository, app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(listar).post(criar))
        .route("/{id}", put(atualizar).delete(deletar))
        .layer(axum_middleware::from_fn_with_state(app_state, auth_guard))
        .layer(Extension(repo))
}

async fn listar(
    Extension(repo): Extension<CatalogoRepository>,
) -> Result<impl IntoResponse, AppError> {
    let itens = repo.listar().await?;
    Ok(Json(itens))
}

async fn criar(
    _admin: RequireAdmin,
    Extension(repo): Extension<CatalogoRepository>,
    Json(payload): Json<CriarItemCatalogoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let item = repo.criar(&payload.nome).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn atualizar(
    _admin: RequireAdmin,
    Extension(repo): Extension<CatalogoRepository>,
    Path(id): Path<i32>,
    Json(payload): Json<AtualizarItemCatalogoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let item = repo.atualizar(id, payload.nome.as_deref(), payload.ativo).await?;
    Ok(Json(item))
}

async fn deletar(
    _admin: RequireAdmin,
    Extension(repo): Extension<CatalogoRepository>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    repo.deletar(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
