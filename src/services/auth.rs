use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::UsuarioRepository,
    models::auth::{AtualizarUsuarioPayload, Claims, CriarAdminPayload, TipoUsuario, Usuario},
};

#[derive(Clone)]
pub struct AuthService {
    usuario_repo: UsuarioRepository,
    jwt_secret: String,
    pool: PgPool,
}

impl AuthService {
    pub fn new(usuario_repo: UsuarioRepository, jwt_secret: String, pool: PgPool) -> Self {
        Self { usuario_repo, jwt_secret, pool }
    }

    /// Hash de senha fora do runtime (bcrypt é caro).
    pub async fn hash_senha(senha: &str) -> Result<String, AppError> {
        let senha = senha.to_owned();
        let hashed = tokio::task::spawn_blocking(move || hash(&senha, bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {e}"))??;
        Ok(hashed)
    }

    pub async fn login(&self, email: &str, senha: &str) -> Result<(String, Usuario), AppError> {
        let usuario = self
            .usuario_repo
            .buscar_por_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        // Usuário desativado não entra, mesmo com a senha certa.
        if !usuario.ativo {
            return Err(AppError::InvalidCredentials);
        }

        let senha = senha.to_owned();
        let senha_hash = usuario.senha.clone();
        let senha_valida = tokio::task::spawn_blocking(move || verify(&senha, &senha_hash))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {e}"))??;

        if !senha_valida {
            return Err(AppError::InvalidCredentials);
        }

        let token = self.criar_token(&usuario)?;
        Ok((token, usuario))
    }

    pub async fn validate_token(&self, token: &str) -> Result<Usuario, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        let usuario = self.usuario_repo.buscar_por_id(token_data.claims.sub).await?;
        usuario_do_token(usuario)
    }

    fn criar_token(&self, usuario: &Usuario) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: usuario.id,
            tipo: usuario.tipo,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }

    // ---
    // Gestão de administradores
    // ---

    pub async fn listar_admins(&self) -> Result<Vec<Usuario>, AppError> {
        self.usuario_repo.listar_admins().await
    }

    pub async fn criar_admin(&self, payload: &CriarAdminPayload) -> Result<Usuario, AppError> {
        let senha_hash = Self::hash_senha(&payload.senha).await?;
        self.usuario_repo
            .criar(
                &self.pool,
                &payload.nome,
                &payload.email,
                &senha_hash,
                TipoUsuario::Admin,
            )
            .await
    }

    pub async fn atualizar_usuario(
        &self,
        id: i32,
        payload: &AtualizarUsuarioPayload,
    ) -> Result<Usuario, AppError> {
        let senha_hash = match &payload.senha {
            Some(senha) => Some(Self::hash_senha(senha).await?),
            None => None,
        };

        self.usuario_repo
            .atualizar(
                &self.pool,
                id,
                payload.nome.as_deref(),
                payload.email.as_deref(),
                senha_hash.as_deref(),
                payload.ativo,
            )
            .await
    }

    pub async fn deletar_admin(&self, id: i32) -> Result<(), AppError> {
        let restantes = self.usuario_repo.contar_admins_ativos_exceto(id).await?;
        if restantes == 0 {
            return Err(AppError::InvalidState(
                "Não é possível deletar o último administrador ativo".into(),
            ));
        }
        self.usuario_repo.deletar(&self.pool, id).await
    }
}

// Um token só autentica se o usuário ainda existir e estiver ativo. Conta
// removida e conta desativada respondem igual, sem revelar qual é o caso.
fn usuario_do_token(usuario: Option<Usuario>) -> Result<Usuario, AppError> {
    match usuario {
        Some(usuario) if usuario.ativo => Ok(usuario),
        _ => Err(AppError::InvalidToken),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usuario(ativo: bool) -> Usuario {
        Usuario {
            id: 1,
            nome: "Maria".into(),
            email: "maria@brecho.com.br".into(),
            senha: "$2b$10$hash".into(),
            tipo: TipoUsuario::Admin,
            ativo,
            criado_em: Utc::now(),
        }
    }

    #[test]
    fn usuario_ativo_autentica() {
        assert!(usuario_do_token(Some(usuario(true))).is_ok());
    }

    #[test]
    fn usuario_removido_e_desativado_respondem_com_token_invalido() {
        let erro = usuario_do_token(None).unwrap_err();
        assert!(matches!(erro, AppError::InvalidToken));

        let erro = usuario_do_token(Some(usuario(false))).unwrap_err();
        assert!(matches!(erro, AppError::InvalidToken));
    }
}
