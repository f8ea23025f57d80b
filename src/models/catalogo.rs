use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

// Uma entrada de catálogo (marca, tamanho ou tipo de peça). As três tabelas
// têm o mesmo formato, então o modelo é um só.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ItemCatalogo {
    pub id: i32,
    pub nome: String,
    pub ativo: bool,
    pub criado_em: DateTime<Utc>,
}

// Referência mínima a uma entrada de catálogo, para respostas aninhadas.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefCatalogo {
    pub id: i32,
    pub nome: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CriarItemCatalogoPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nome: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AtualizarItemCatalogoPayload {
    #[validate(length(min = 1, message = "O nome não pode ser vazio."))]
    pub nome: Option<String>,
    pub ativo: Option<bool>,
}
