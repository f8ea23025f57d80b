use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{ParceiroRepository, UsuarioRepository},
    models::{
        auth::TipoUsuario,
        parceiro::{AtualizarParceiroPayload, CriarParceiroPayload, ParceiroDetalhe},
    },
    services::AuthService,
};

#[derive(Clone)]
pub struct ParceiroService {
    parceiro_repo: ParceiroRepository,
    usuario_repo: UsuarioRepository,
    pool: PgPool,
}

impl ParceiroService {
    pub fn new(
        parceiro_repo: ParceiroRepository,
        usuario_repo: UsuarioRepository,
        pool: PgPool,
    ) -> Self {
        Self { parceiro_repo, usuario_repo, pool }
    }

    pub async fn listar(&self) -> Result<Vec<ParceiroDetalhe>, AppError> {
        self.parceiro_repo.listar().await
    }

    pub async fn buscar(&self, id: i32) -> Result<ParceiroDetalhe, AppError> {
        self.parceiro_repo
            .buscar(id)
            .await?
            .ok_or(AppError::NotFound("Parceiro"))
    }

    /// Cria o usuário de login (tipo 'parceiro') e o parceiro na mesma
    /// transação: ou os dois existem, ou nenhum.
    pub async fn criar(&self, payload: &CriarParceiroPayload) -> Result<ParceiroDetalhe, AppError> {
        let senha_hash = AuthService::hash_senha(&payload.senha).await?;

        let mut tx = self.pool.begin().await?;

        let usuario = self
            .usuario_repo
            .criar(
                &mut *tx,
                &payload.nome,
                &payload.email,
                &senha_hash,
                TipoUsuario::Parceiro,
            )
            .await?;

        let parceiro = self
            .parceiro_repo
            .criar(
                &mut *tx,
                usuario.id,
                payload.telefone.as_deref(),
                payload.percentual,
                payload.observacoes.as_deref(),
            )
            .await?;

        tx.commit().await?;

        tracing::info!("Parceiro {} criado (usuário {})", parceiro.id, usuario.id);
        self.buscar(parceiro.id).await
    }

    pub async fn atualizar(
        &self,
        id: i32,
        payload: &AtualizarParceiroPayload,
    ) -> Result<ParceiroDetalhe, AppError> {
        let senha_hash = match &payload.senha {
            Some(senha) => Some(AuthService::hash_senha(senha).await?),
            None => None,
        };

        let mut tx = self.pool.begin().await?;

        let parceiro = self
            .parceiro_repo
            .atualizar(
                &mut *tx,
                id,
                payload.percentual,
                payload.telefone.clone(),
                payload.observacoes.clone(),
            )
            .await?;

        let mexe_no_usuario = payload.nome.is_some()
            || payload.email.is_some()
            || senha_hash.is_some()
            || payload.ativo.is_some();
        if mexe_no_usuario {
            self.usuario_repo
                .atualizar(
                    &mut *tx,
                    parceiro.usuario_id,
                    payload.nome.as_deref(),
                    payload.email.as_deref(),
                    senha_hash.as_deref(),
                    payload.ativo,
                )
                .await?;
        }

        tx.commit().await?;
        self.buscar(id).await
    }

    /// Remove parceiro e usuário de login juntos. Falha com conflito
    /// referencial se o parceiro ainda possuir peças ou pagamentos.
    pub async fn deletar(&self, id: i32) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        let usuario_id = self.parceiro_repo.deletar(&mut *tx, id).await?;
        self.usuario_repo.deletar(&mut *tx, usuario_id).await?;
        tx.commit().await?;
        Ok(())
    }
}
