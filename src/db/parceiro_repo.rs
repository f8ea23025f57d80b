use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, FromRow, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::{
        auth::UsuarioResumo,
        parceiro::{Parceiro, ParceiroDetalhe},
    },
};

const SELECT_PARCEIRO_DETALHE: &str = r#"
SELECT pa.id, pa.usuario_id, pa.telefone, pa.percentual, pa.observacoes, pa.criado_em,
       u.nome AS usuario_nome, u.email AS usuario_email, u.ativo AS usuario_ativo
FROM parceiros pa
JOIN usuarios u ON u.id = pa.usuario_id
"#;

#[derive(Debug, FromRow)]
struct ParceiroDetalheRow {
    id: i32,
    usuario_id: i32,
    telefone: Option<String>,
    percentual: Decimal,
    observacoes: Option<String>,
    criado_em: DateTime<Utc>,
    usuario_nome: String,
    usuario_email: String,
    usuario_ativo: bool,
}

impl ParceiroDetalheRow {
    fn into_detalhe(self) -> ParceiroDetalhe {
        ParceiroDetalhe {
            id: self.id,
            telefone: self.telefone,
            percentual: self.percentual,
            observacoes: self.observacoes,
            criado_em: self.criado_em,
            usuario: UsuarioResumo {
                id: self.usuario_id,
                nome: self.usuario_nome,
                email: self.usuario_email,
                ativo: self.usuario_ativo,
            },
        }
    }
}

#[derive(Clone)]
pub struct ParceiroRepository {
    pool: PgPool,
}

impl ParceiroRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn listar(&self) -> Result<Vec<ParceiroDetalhe>, AppError> {
        let sql = format!("{SELECT_PARCEIRO_DETALHE} ORDER BY u.nome ASC");
        let linhas = sqlx::query_as::<_, ParceiroDetalheRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(linhas.into_iter().map(ParceiroDetalheRow::into_detalhe).collect())
    }

    pub async fn buscar(&self, id: i32) -> Result<Option<ParceiroDetalhe>, AppError> {
        let sql = format!("{SELECT_PARCEIRO_DETALHE} WHERE pa.id = $1");
        let linha = sqlx::query_as::<_, ParceiroDetalheRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(linha.map(ParceiroDetalheRow::into_detalhe))
    }

    pub async fn criar<'e, E>(
        &self,
        executor: E,
        usuario_id: i32,
        telefone: Option<&str>,
        percentual: Decimal,
        observacoes: Option<&str>,
    ) -> Result<Parceiro, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let parceiro = sqlx::query_as::<_, Parceiro>(
            r#"
            INSERT INTO parceiros (usuario_id, telefone, percentual, observacoes)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(usuario_id)
        .bind(telefone)
        .bind(percentual)
        .bind(observacoes)
        .fetch_one(executor)
        .await?;
        Ok(parceiro)
    }

    pub async fn atualizar<'e, E>(
        &self,
        executor: E,
        id: i32,
        percentual: Option<Decimal>,
        telefone: Option<Option<String>>,
        observacoes: Option<Option<String>>,
    ) -> Result<Parceiro, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Parceiro>(
            r#"
            UPDATE parceiros SET
                percentual = COALESCE($2, percentual),
                telefone = CASE WHEN $3 THEN $4 ELSE telefone END,
                observacoes = CASE WHEN $5 THEN $6 ELSE observacoes END
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(percentual)
        .bind(telefone.is_some())
        .bind(telefone.flatten())
        .bind(observacoes.is_some())
        .bind(observacoes.flatten())
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NotFound("Parceiro"))
    }

    /// Percentual de comissão vigente, lido dentro da transação da venda.
    pub async fn percentual<'e, E>(
        &self,
        executor: E,
        id: i32,
    ) -> Result<Option<Decimal>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let linha: Option<(Decimal,)> =
            sqlx::query_as("SELECT percentual FROM parceiros WHERE id = $1")
                .bind(id)
                .fetch_optional(executor)
                .await?;
        Ok(linha.map(|(p,)| p))
    }

    /// Remove o parceiro e devolve o id do usuário vinculado, para que a
    /// mesma transação remova também o login.
    pub async fn deletar<'e, E>(&self, executor: E, id: i32) -> Result<i32, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let linha: Option<(i32,)> =
            sqlx::query_as("DELETE FROM parceiros WHERE id = $1 RETURNING usuario_id")
                .bind(id)
                .fetch_optional(executor)
                .await
                .map_err(|e| {
                    if let Some(db_err) = e.as_database_error() {
                        if db_err.is_foreign_key_violation() {
                            return AppError::ReferentialConflict(
                                "Não é possível deletar: parceiro possui peças ou pagamentos"
                                    .into(),
                            );
                        }
                    }
                    AppError::from(e)
                })?;

        linha.map(|(usuario_id,)| usuario_id).ok_or(AppError::NotFound("Parceiro"))
    }
}
