use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Cliente {
    pub id: i32,
    pub nome: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub senha: String,
    pub telefone: Option<String>,
    pub endereco: Option<String>,
    pub cep: Option<String>,
    pub cidade: Option<String>,
    pub estado: Option<String>,
    pub observacoes: Option<String>,
    pub ativo: bool,
    pub criado_em: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClienteResumo {
    pub id: i32,
    pub nome: String,
    pub email: String,
}

// Auto-cadastro de cliente (rota pública).
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CriarClientePayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nome: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub senha: String,
    pub telefone: Option<String>,
    pub endereco: Option<String>,
    pub cep: Option<String>,
    pub cidade: Option<String>,
    pub estado: Option<String>,
    pub observacoes: Option<String>,
}

// Atualização parcial. Campos de texto opcionais usam Option<Option<T>>:
// ausente = inalterado, null explícito = limpar, valor = substituir.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AtualizarClientePayload {
    #[validate(length(min = 1, message = "O nome não pode ser vazio."))]
    pub nome: Option<String>,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub senha: Option<String>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub telefone: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub endereco: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub cep: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub cidade: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub estado: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub observacoes: Option<Option<String>>,
    pub ativo: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atualizacao_distingue_campo_ausente_de_null() {
        let payload: AtualizarClientePayload =
            serde_json::from_str(r#"{"nome": "Maria", "telefone": null}"#).unwrap();

        // ausente = não mexe
        assert!(payload.observacoes.is_none());
        // null explícito = limpar
        assert_eq!(payload.telefone, Some(None));
        // valor = substituir
        assert_eq!(payload.nome.as_deref(), Some("Maria"));
    }
}
