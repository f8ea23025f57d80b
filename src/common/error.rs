use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

// Taxonomia de erros da aplicação. Cada variante de "erro de cliente" carrega
// informação suficiente para montar uma mensagem amigável; o resto vira 500.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Violação de chave única; o campo conflitante vai na resposta.
    #[error("Já existe um registro com este {0}")]
    DuplicateKey(&'static str),

    // Exclusão bloqueada por registros dependentes.
    #[error("{0}")]
    ReferentialConflict(String),

    #[error("{0} não encontrado(a)")]
    NotFound(&'static str),

    // Transição ou operação não permitida no estado atual da entidade.
    #[error("{0}")]
    InvalidState(String),

    #[error("E-mail ou senha inválidos")]
    InvalidCredentials,

    #[error("Token de autenticação inválido ou ausente")]
    InvalidToken,

    #[error("Acesso restrito a administradores")]
    Forbidden,

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, mensagem) = match &self {
            AppError::ValidationError(errors) => {
                let mut detalhes = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let mensagens: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    detalhes.insert(field.to_string(), mensagens);
                }
                let body = Json(json!({
                    "erro": "Um ou mais campos são inválidos.",
                    "detalhes": detalhes,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::DuplicateKey(_) => (StatusCode::CONFLICT, self.to_string()),
            AppError::ReferentialConflict(_) => (StatusCode::CONFLICT, self.to_string()),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::InvalidState(_) => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),
            e => {
                tracing::error!("Erro interno do servidor: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        let body = Json(json!({ "erro": mensagem }));
        (status, body).into_response()
    }
}
