use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use crate::models::auth::UsuarioResumo;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Parceiro {
    pub id: i32,
    pub usuario_id: i32,
    pub telefone: Option<String>,
    pub percentual: Decimal,
    pub observacoes: Option<String>,
    pub criado_em: DateTime<Utc>,
}

// Parceiro com o usuário de login resolvido, como a API sempre devolve.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParceiroDetalhe {
    pub id: i32,
    pub telefone: Option<String>,
    pub percentual: Decimal,
    pub observacoes: Option<String>,
    pub criado_em: DateTime<Utc>,
    pub usuario: UsuarioResumo,
}

fn validate_percentual(percentual: &Decimal) -> Result<(), ValidationError> {
    if *percentual < Decimal::ZERO || *percentual > Decimal::from(100) {
        let mut err = ValidationError::new("range");
        err.message = Some("O percentual deve estar entre 0 e 100.".into());
        return Err(err);
    }
    Ok(())
}

// Criar um parceiro provisiona também o usuário de login (tipo 'parceiro').
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CriarParceiroPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nome: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub senha: String,
    #[validate(custom(function = "validate_percentual"))]
    pub percentual: Decimal,
    pub telefone: Option<String>,
    pub observacoes: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AtualizarParceiroPayload {
    #[validate(length(min = 1, message = "O nome não pode ser vazio."))]
    pub nome: Option<String>,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub senha: Option<String>,
    #[validate(custom(function = "validate_percentual"))]
    pub percentual: Option<Decimal>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub telefone: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub observacoes: Option<Option<String>>,
    pub ativo: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentual_fora_da_faixa_e_rejeitado() {
        let mut payload = CriarParceiroPayload {
            nome: "Ana".into(),
            email: "ana@exemplo.com".into(),
            senha: "segredo1".into(),
            percentual: Decimal::from(101),
            telefone: None,
            observacoes: None,
        };
        assert!(payload.validate().is_err());

        payload.percentual = Decimal::from(50);
        assert!(payload.validate().is_ok());
    }
}
