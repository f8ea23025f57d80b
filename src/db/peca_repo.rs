use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, FromRow, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::{
        auth::UsuarioResumo,
        catalogo::RefCatalogo,
        peca::{AtualizarPecaPayload, CriarPecaPayload, ParceiroResumo, Peca, PecaDetalhe, StatusPeca},
    },
};

// Projeção "peça com tudo resolvido" (marca, tamanho, tipo, parceiro e
// usuário do parceiro), compartilhada pelas leituras de peças, sacolinhas,
// vendas e pagamentos. Colunas e joins ficam separados para que as outras
// consultas possam acrescentar seus próprios joins e filtros.
pub(crate) const COLUNAS_PECA_DETALHE: &str = r#"
       p.id, p.codigo_etiqueta, p.nome, p.valor_custo, p.valor_venda,
       p.status, p.observacoes, p.fotos, p.criado_em,
       m.id AS marca_id, m.nome AS marca_nome,
       t.id AS tamanho_id, t.nome AS tamanho_nome,
       tp.id AS tipo_peca_id, tp.nome AS tipo_peca_nome,
       pa.id AS parceiro_id, pa.percentual AS parceiro_percentual,
       u.id AS usuario_id, u.nome AS usuario_nome,
       u.email AS usuario_email, u.ativo AS usuario_ativo
"#;

pub(crate) const FROM_PECA_DETALHE: &str = r#"
FROM pecas p
JOIN marcas m ON m.id = p.marca_id
JOIN tamanhos t ON t.id = p.tamanho_id
JOIN tipos_peca tp ON tp.id = p.tipo_peca_id
JOIN parceiros pa ON pa.id = p.parceiro_id
JOIN usuarios u ON u.id = pa.usuario_id
"#;

#[derive(Debug, FromRow)]
pub(crate) struct PecaDetalheRow {
    pub id: i32,
    pub codigo_etiqueta: String,
    pub nome: String,
    pub valor_custo: Decimal,
    pub valor_venda: Decimal,
    pub status: StatusPeca,
    pub observacoes: Option<String>,
    pub fotos: Vec<String>,
    pub criado_em: DateTime<Utc>,
    pub marca_id: i32,
    pub marca_nome: String,
    pub tamanho_id: i32,
    pub tamanho_nome: String,
    pub tipo_peca_id: i32,
    pub tipo_peca_nome: String,
    pub parceiro_id: i32,
    pub parceiro_percentual: Decimal,
    pub usuario_id: i32,
    pub usuario_nome: String,
    pub usuario_email: String,
    pub usuario_ativo: bool,
}

impl PecaDetalheRow {
    pub(crate) fn parceiro_resumo(&self) -> ParceiroResumo {
        ParceiroResumo {
            id: self.parceiro_id,
            percentual: self.parceiro_percentual,
            usuario: UsuarioResumo {
                id: self.usuario_id,
                nome: self.usuario_nome.clone(),
                email: self.usuario_email.clone(),
                ativo: self.usuario_ativo,
            },
        }
    }

    pub(crate) fn into_detalhe(self) -> PecaDetalhe {
        PecaDetalhe {
            id: self.id,
            codigo_etiqueta: self.codigo_etiqueta,
            nome: self.nome,
            valor_custo: self.valor_custo,
            valor_venda: self.valor_venda,
            status: self.status,
            observacoes: self.observacoes,
            fotos: self.fotos,
            criado_em: self.criado_em,
            marca: RefCatalogo { id: self.marca_id, nome: self.marca_nome },
            tamanho: RefCatalogo { id: self.tamanho_id, nome: self.tamanho_nome },
            tipo_peca: RefCatalogo { id: self.tipo_peca_id, nome: self.tipo_peca_nome },
            parceiro: ParceiroResumo {
                id: self.parceiro_id,
                percentual: self.parceiro_percentual,
                usuario: UsuarioResumo {
                    id: self.usuario_id,
                    nome: self.usuario_nome,
                    email: self.usuario_email,
                    ativo: self.usuario_ativo,
                },
            },
        }
    }
}

#[derive(Clone)]
pub struct PecaRepository {
    pool: PgPool,
}

impl PecaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn listar(&self) -> Result<Vec<PecaDetalhe>, AppError> {
        let sql =
            format!("SELECT {COLUNAS_PECA_DETALHE} {FROM_PECA_DETALHE} ORDER BY p.criado_em DESC");
        let linhas = sqlx::query_as::<_, PecaDetalheRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(linhas.into_iter().map(PecaDetalheRow::into_detalhe).collect())
    }

    pub async fn buscar(&self, id: i32) -> Result<Option<PecaDetalhe>, AppError> {
        let sql = format!("SELECT {COLUNAS_PECA_DETALHE} {FROM_PECA_DETALHE} WHERE p.id = $1");
        let linha = sqlx::query_as::<_, PecaDetalheRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(linha.map(PecaDetalheRow::into_detalhe))
    }

    pub async fn criar(&self, payload: &CriarPecaPayload) -> Result<Peca, AppError> {
        sqlx::query_as::<_, Peca>(
            r#"
            INSERT INTO pecas (codigo_etiqueta, nome, parceiro_id, marca_id, tamanho_id,
                               tipo_peca_id, valor_custo, valor_venda, observacoes, fotos)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(&payload.codigo_etiqueta)
        .bind(&payload.nome)
        .bind(payload.parceiro_id)
        .bind(payload.marca_id)
        .bind(payload.tamanho_id)
        .bind(payload.tipo_peca_id)
        .bind(payload.valor_custo)
        .bind(payload.valor_venda)
        .bind(&payload.observacoes)
        .bind(&payload.fotos)
        .fetch_one(&self.pool)
        .await
        .map_err(Self::mapear_erro_escrita)
    }

    pub async fn atualizar(
        &self,
        id: i32,
        payload: &AtualizarPecaPayload,
    ) -> Result<Peca, AppError> {
        sqlx::query_as::<_, Peca>(
            r#"
            UPDATE pecas SET
                codigo_etiqueta = COALESCE($2, codigo_etiqueta),
                nome = COALESCE($3, nome),
                parceiro_id = COALESCE($4, parceiro_id),
                marca_id = COALESCE($5, marca_id),
                tamanho_id = COALESCE($6, tamanho_id),
                tipo_peca_id = COALESCE($7, tipo_peca_id),
                valor_custo = COALESCE($8, valor_custo),
                valor_venda = COALESCE($9, valor_venda),
                status = COALESCE($10, status),
                fotos = COALESCE($11, fotos),
                observacoes = CASE WHEN $12 THEN $13 ELSE observacoes END
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.codigo_etiqueta)
        .bind(&payload.nome)
        .bind(payload.parceiro_id)
        .bind(payload.marca_id)
        .bind(payload.tamanho_id)
        .bind(payload.tipo_peca_id)
        .bind(payload.valor_custo)
        .bind(payload.valor_venda)
        .bind(payload.status)
        .bind(&payload.fotos)
        .bind(payload.observacoes.is_some())
        .bind(payload.observacoes.clone().flatten())
        .fetch_optional(&self.pool)
        .await
        .map_err(Self::mapear_erro_escrita)?
        .ok_or(AppError::NotFound("Peça"))
    }

    pub async fn deletar(&self, id: i32) -> Result<(), AppError> {
        let resultado = sqlx::query("DELETE FROM pecas WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_foreign_key_violation() {
                        return AppError::ReferentialConflict(
                            "Não é possível deletar: peça está vinculada a vendas ou sacolinhas"
                                .into(),
                        );
                    }
                }
                AppError::from(e)
            })?;

        if resultado.rows_affected() == 0 {
            return Err(AppError::NotFound("Peça"));
        }
        Ok(())
    }

    /// Trava a linha da peça até o fim da transação (venda / sacolinha).
    pub async fn travar<'e, E>(&self, executor: E, id: i32) -> Result<Option<Peca>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let peca = sqlx::query_as::<_, Peca>("SELECT * FROM pecas WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(peca)
    }

    pub async fn atualizar_status<'e, E>(
        &self,
        executor: E,
        id: i32,
        status: StatusPeca,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE pecas SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Id da sacolinha aberta que já contém a peça, se houver. O status
    /// "na sacolinha" é derivado da existência da linha de junção, nunca
    /// armazenado.
    pub async fn sacolinha_aberta_contendo<'e, E>(
        &self,
        executor: E,
        peca_id: i32,
    ) -> Result<Option<i32>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let linha: Option<(i32,)> = sqlx::query_as(
            r#"
            SELECT s.id
            FROM sacolinha_pecas sp
            JOIN sacolinhas s ON s.id = sp.sacolinha_id
            WHERE sp.peca_id = $1 AND s.status = 'aguardando_envio'
            LIMIT 1
            "#,
        )
        .bind(peca_id)
        .fetch_optional(executor)
        .await?;
        Ok(linha.map(|(id,)| id))
    }

    // Falha de FK num INSERT/UPDATE de peça significa id de catálogo ou
    // parceiro que não existe.
    fn mapear_erro_escrita(e: sqlx::Error) -> AppError {
        if let Some(db_err) = e.as_database_error() {
            if db_err.is_unique_violation() {
                return AppError::DuplicateKey("código de etiqueta");
            }
            if db_err.is_foreign_key_violation() {
                return AppError::NotFound("Parceiro, marca, tamanho ou tipo de peça");
            }
        }
        AppError::from(e)
    }
}
