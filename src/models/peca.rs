use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use crate::models::{auth::UsuarioResumo, catalogo::RefCatalogo};

pub const MAX_FOTOS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "status_peca", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StatusPeca {
    Disponivel,
    Vendida,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Peca {
    pub id: i32,
    pub codigo_etiqueta: String,
    pub nome: String,
    pub parceiro_id: i32,
    pub marca_id: i32,
    pub tamanho_id: i32,
    pub tipo_peca_id: i32,
    pub valor_custo: Decimal,
    pub valor_venda: Decimal,
    pub status: StatusPeca,
    pub observacoes: Option<String>,
    pub fotos: Vec<String>,
    pub criado_em: DateTime<Utc>,
}

// Parceiro resumido dentro de uma peça.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParceiroResumo {
    pub id: i32,
    pub percentual: Decimal,
    pub usuario: UsuarioResumo,
}

// Peça com todos os atributos de catálogo e o parceiro resolvidos, como as
// leituras da API sempre devolvem.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PecaDetalhe {
    pub id: i32,
    pub codigo_etiqueta: String,
    pub nome: String,
    pub valor_custo: Decimal,
    pub valor_venda: Decimal,
    pub status: StatusPeca,
    pub observacoes: Option<String>,
    pub fotos: Vec<String>,
    pub criado_em: DateTime<Utc>,
    pub marca: RefCatalogo,
    pub tamanho: RefCatalogo,
    pub tipo_peca: RefCatalogo,
    pub parceiro: ParceiroResumo,
}

fn validate_nao_negativo(valor: &Decimal) -> Result<(), ValidationError> {
    if valor.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

fn validate_fotos(fotos: &Vec<String>) -> Result<(), ValidationError> {
    if fotos.len() > MAX_FOTOS {
        let mut err = ValidationError::new("length");
        err.message = Some("No máximo 5 fotos por peça.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CriarPecaPayload {
    #[validate(length(min = 1, message = "O código de etiqueta é obrigatório."))]
    pub codigo_etiqueta: String,
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nome: String,
    pub parceiro_id: i32,
    pub marca_id: i32,
    pub tamanho_id: i32,
    pub tipo_peca_id: i32,
    #[validate(custom(function = "validate_nao_negativo"))]
    #[serde(default)]
    pub valor_custo: Decimal,
    #[validate(custom(function = "validate_nao_negativo"))]
    #[serde(default)]
    pub valor_venda: Decimal,
    pub observacoes: Option<String>,
    #[validate(custom(function = "validate_fotos"))]
    #[serde(default)]
    pub fotos: Vec<String>,
}

// Atualização parcial; status pode ser imposto diretamente pelo admin
// (correção administrativa), sem passar pelo fluxo de venda.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AtualizarPecaPayload {
    #[validate(length(min = 1, message = "O código de etiqueta não pode ser vazio."))]
    pub codigo_etiqueta: Option<String>,
    #[validate(length(min = 1, message = "O nome não pode ser vazio."))]
    pub nome: Option<String>,
    pub parceiro_id: Option<i32>,
    pub marca_id: Option<i32>,
    pub tamanho_id: Option<i32>,
    pub tipo_peca_id: Option<i32>,
    #[validate(custom(function = "validate_nao_negativo"))]
    pub valor_custo: Option<Decimal>,
    #[validate(custom(function = "validate_nao_negativo"))]
    pub valor_venda: Option<Decimal>,
    pub status: Option<StatusPeca>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub observacoes: Option<Option<String>>,
    #[validate(custom(function = "validate_fotos"))]
    pub fotos: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload_base() -> CriarPecaPayload {
        CriarPecaPayload {
            codigo_etiqueta: "MPM-0001".into(),
            nome: "Body manga longa".into(),
            parceiro_id: 1,
            marca_id: 1,
            tamanho_id: 1,
            tipo_peca_id: 1,
            valor_custo: Decimal::new(1050, 2),
            valor_venda: Decimal::new(2500, 2),
            observacoes: None,
            fotos: vec![],
        }
    }

    #[test]
    fn valores_negativos_sao_rejeitados() {
        let mut payload = payload_base();
        payload.valor_venda = Decimal::new(-100, 2);
        let erros = payload.validate().unwrap_err();
        assert!(erros.field_errors().contains_key("valor_venda"));
    }

    #[test]
    fn mais_de_cinco_fotos_e_rejeitado() {
        let mut payload = payload_base();
        payload.fotos = (0..6).map(|i| format!("/uploads/foto-{i}.jpg")).collect();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn texto_invalido_em_campo_numerico_e_rejeitado() {
        let json = r#"{
            "codigoEtiqueta": "MPM-0002",
            "nome": "Vestido",
            "parceiroId": 1, "marcaId": 1, "tamanhoId": 1, "tipoPecaId": 1,
            "valorVenda": "abc"
        }"#;
        assert!(serde_json::from_str::<CriarPecaPayload>(json).is_err());
    }

    #[test]
    fn status_serializa_em_minusculas() {
        assert_eq!(
            serde_json::to_value(StatusPeca::Disponivel).unwrap(),
            "disponivel"
        );
        assert_eq!(serde_json::to_value(StatusPeca::Vendida).unwrap(), "vendida");
    }
}
