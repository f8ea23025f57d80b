use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::cliente::{AtualizarClientePayload, Cliente, CriarClientePayload},
};

#[derive(Clone)]
pub struct ClienteRepository {
    pool: PgPool,
}

impl ClienteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn listar(&self) -> Result<Vec<Cliente>, AppError> {
        let clientes = sqlx::query_as::<_, Cliente>("SELECT * FROM clientes ORDER BY nome ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(clientes)
    }

    pub async fn buscar(&self, id: i32) -> Result<Option<Cliente>, AppError> {
        let cliente = sqlx::query_as::<_, Cliente>("SELECT * FROM clientes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(cliente)
    }

    /// Trava a linha do cliente até o fim da transação. Serializa o
    /// find-or-create da sacolinha aberta por cliente.
    pub async fn travar<'e, E>(&self, executor: E, id: i32) -> Result<Option<i32>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let linha: Option<(i32,)> =
            sqlx::query_as("SELECT id FROM clientes WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(executor)
                .await?;
        Ok(linha.map(|(id,)| id))
    }

    pub async fn criar(
        &self,
        payload: &CriarClientePayload,
        senha_hash: &str,
    ) -> Result<Cliente, AppError> {
        sqlx::query_as::<_, Cliente>(
            r#"
            INSERT INTO clientes (nome, email, senha, telefone, endereco, cep, cidade, estado, observacoes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(&payload.nome)
        .bind(&payload.email)
        .bind(senha_hash)
        .bind(&payload.telefone)
        .bind(&payload.endereco)
        .bind(&payload.cep)
        .bind(&payload.cidade)
        .bind(&payload.estado)
        .bind(&payload.observacoes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::DuplicateKey("e-mail");
                }
            }
            e.into()
        })
    }

    /// Atualização parcial. Campos limpáveis distinguem ausente (inalterado)
    /// de null explícito (limpar), via Option<Option<T>> no payload.
    pub async fn atualizar(
        &self,
        id: i32,
        payload: &AtualizarClientePayload,
        senha_hash: Option<&str>,
    ) -> Result<Cliente, AppError> {
        sqlx::query_as::<_, Cliente>(
            r#"
            UPDATE clientes SET
                nome = COALESCE($2, nome),
                email = COALESCE($3, email),
                senha = COALESCE($4, senha),
                ativo = COALESCE($5, ativo),
                telefone = CASE WHEN $6 THEN $7 ELSE telefone END,
                endereco = CASE WHEN $8 THEN $9 ELSE endereco END,
                cep = CASE WHEN $10 THEN $11 ELSE cep END,
                cidade = CASE WHEN $12 THEN $13 ELSE cidade END,
                estado = CASE WHEN $14 THEN $15 ELSE estado END,
                observacoes = CASE WHEN $16 THEN $17 ELSE observacoes END
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.nome)
        .bind(&payload.email)
        .bind(senha_hash)
        .bind(payload.ativo)
        .bind(payload.telefone.is_some())
        .bind(payload.telefone.clone().flatten())
        .bind(payload.endereco.is_some())
        .bind(payload.endereco.clone().flatten())
        .bind(payload.cep.is_some())
        .bind(payload.cep.clone().flatten())
        .bind(payload.cidade.is_some())
        .bind(payload.cidade.clone().flatten())
        .bind(payload.estado.is_some())
        .bind(payload.estado.clone().flatten())
        .bind(payload.observacoes.is_some())
        .bind(payload.observacoes.clone().flatten())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::DuplicateKey("e-mail");
                }
            }
            AppError::from(e)
        })?
        .ok_or(AppError::NotFound("Cliente"))
    }

    pub async fn deletar(&self, id: i32) -> Result<(), AppError> {
        let resultado = sqlx::query("DELETE FROM clientes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_foreign_key_violation() {
                        return AppError::ReferentialConflict(
                            "Não é possível deletar: cliente possui sacolinhas ou vendas".into(),
                        );
                    }
                }
                AppError::from(e)
            })?;

        if resultado.rows_affected() == 0 {
            return Err(AppError::NotFound("Cliente"));
        }
        Ok(())
    }
}
