use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "tipo_usuario", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TipoUsuario {
    Admin,
    Parceiro,
}

// Usuário como vem do banco. A senha (hash) nunca é serializada.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Usuario {
    pub id: i32,
    pub nome: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub senha: String,
    pub tipo: TipoUsuario,
    pub ativo: bool,
    pub criado_em: DateTime<Utc>,
}

impl Usuario {
    pub fn is_admin(&self) -> bool {
        self.tipo == TipoUsuario::Admin
    }
}

// Projeção pública de um usuário, para respostas aninhadas.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsuarioResumo {
    pub id: i32,
    pub nome: String,
    pub email: String,
    pub ativo: bool,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub senha: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub usuario: Usuario,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CriarAdminPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nome: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub senha: String,
}

// Atualização parcial: campo ausente = inalterado.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AtualizarUsuarioPayload {
    #[validate(length(min = 1, message = "O nome não pode ser vazio."))]
    pub nome: Option<String>,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub senha: Option<String>,
    pub ativo: Option<bool>,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,
    pub tipo: TipoUsuario,
    pub exp: usize,
    pub iat: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn senha_nunca_aparece_na_serializacao() {
        let usuario = Usuario {
            id: 1,
            nome: "Administrador".into(),
            email: "admin@brecho.com.br".into(),
            senha: "$2b$10$hash".into(),
            tipo: TipoUsuario::Admin,
            ativo: true,
            criado_em: Utc::now(),
        };

        let json = serde_json::to_value(&usuario).unwrap();
        assert!(json.get("senha").is_none());
        assert_eq!(json["email"], "admin@brecho.com.br");
        assert_eq!(json["tipo"], "admin");
    }

    #[test]
    fn login_exige_email_valido_e_senha_minima() {
        let payload = LoginPayload {
            email: "nao-e-email".into(),
            senha: "12345".into(),
        };
        let erros = payload.validate().unwrap_err();
        assert!(erros.field_errors().contains_key("email"));
        assert!(erros.field_errors().contains_key("senha"));
    }
}
