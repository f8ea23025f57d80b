use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, FromRow, PgPool, Postgres};

use crate::{
    common::error::AppError,
    db::peca_repo::{COLUNAS_PECA_DETALHE, FROM_PECA_DETALHE, PecaDetalheRow},
    models::{
        cliente::ClienteResumo,
        pagamento::{LinhaRecibo, Pagamento, PagamentoDetalhe, PecaRecibo},
        venda::{Venda, VendaDetalhe},
    },
};

#[derive(Debug, FromRow)]
struct VendaDetalheRow {
    venda_id: i32,
    valor_vendido: Decimal,
    data_venda: DateTime<Utc>,
    venda_criado_em: DateTime<Utc>,
    cliente_id: i32,
    cliente_nome: String,
    cliente_email: String,
    #[sqlx(flatten)]
    peca: PecaDetalheRow,
}

impl VendaDetalheRow {
    fn into_detalhe(self) -> VendaDetalhe {
        VendaDetalhe {
            id: self.venda_id,
            valor_vendido: self.valor_vendido,
            data_venda: self.data_venda,
            criado_em: self.venda_criado_em,
            cliente: ClienteResumo {
                id: self.cliente_id,
                nome: self.cliente_nome,
                email: self.cliente_email,
            },
            peca: self.peca.into_detalhe(),
        }
    }
}

#[derive(Debug, FromRow)]
struct PagamentoDetalheRow {
    pagamento_id: i32,
    pagamento_percentual: Decimal,
    valor_parceiro: Decimal,
    pago: bool,
    data_pagamento: Option<DateTime<Utc>>,
    pagamento_criado_em: DateTime<Utc>,
    #[sqlx(flatten)]
    venda: VendaDetalheRow,
}

#[derive(Debug, FromRow)]
struct LinhaReciboRow {
    id: i32,
    percentual: Decimal,
    valor_parceiro: Decimal,
    pago: bool,
    data_pagamento: Option<DateTime<Utc>>,
    data_venda: DateTime<Utc>,
    valor_vendido: Decimal,
    peca_codigo: String,
    marca_nome: String,
    tamanho_nome: String,
}

const COLUNAS_VENDA_DETALHE: &str = r#"
       v.id AS venda_id, v.valor_vendido, v.data_venda, v.criado_em AS venda_criado_em,
       c.id AS cliente_id, c.nome AS cliente_nome, c.email AS cliente_email
"#;

#[derive(Clone)]
pub struct PagamentoRepository {
    pool: PgPool,
}

impl PagamentoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Vendas
    // ---

    pub async fn criar_venda<'e, E>(
        &self,
        executor: E,
        peca_id: i32,
        cliente_id: i32,
        valor_vendido: Decimal,
        data_venda: Option<DateTime<Utc>>,
    ) -> Result<Venda, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let venda = sqlx::query_as::<_, Venda>(
            r#"
            INSERT INTO vendas (peca_id, cliente_id, valor_vendido, data_venda)
            VALUES ($1, $2, $3, COALESCE($4, now()))
            RETURNING *
            "#,
        )
        .bind(peca_id)
        .bind(cliente_id)
        .bind(valor_vendido)
        .bind(data_venda)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_foreign_key_violation() {
                    return AppError::NotFound("Cliente");
                }
            }
            e.into()
        })?;
        Ok(venda)
    }

    pub async fn listar_vendas(&self) -> Result<Vec<VendaDetalhe>, AppError> {
        let sql = format!(
            r#"
            SELECT {COLUNAS_VENDA_DETALHE}, {COLUNAS_PECA_DETALHE}
            {FROM_PECA_DETALHE}
            JOIN vendas v ON v.peca_id = p.id
            JOIN clientes c ON c.id = v.cliente_id
            ORDER BY v.criado_em DESC
            "#
        );
        let linhas = sqlx::query_as::<_, VendaDetalheRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(linhas.into_iter().map(VendaDetalheRow::into_detalhe).collect())
    }

    // ---
    // Pagamentos
    // ---

    pub async fn criar_pagamento<'e, E>(
        &self,
        executor: E,
        parceiro_id: i32,
        venda_id: i32,
        percentual: Decimal,
        valor_parceiro: Decimal,
    ) -> Result<Pagamento, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let pagamento = sqlx::query_as::<_, Pagamento>(
            r#"
            INSERT INTO pagamentos (parceiro_id, venda_id, percentual, valor_parceiro)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(parceiro_id)
        .bind(venda_id)
        .bind(percentual)
        .bind(valor_parceiro)
        .fetch_one(executor)
        .await?;
        Ok(pagamento)
    }

    pub async fn listar(&self) -> Result<Vec<PagamentoDetalhe>, AppError> {
        let sql = format!(
            r#"
            SELECT pg.id AS pagamento_id, pg.percentual AS pagamento_percentual,
                   pg.valor_parceiro, pg.pago, pg.data_pagamento,
                   pg.criado_em AS pagamento_criado_em,
                   {COLUNAS_VENDA_DETALHE}, {COLUNAS_PECA_DETALHE}
            {FROM_PECA_DETALHE}
            JOIN vendas v ON v.peca_id = p.id
            JOIN pagamentos pg ON pg.venda_id = v.id
            JOIN clientes c ON c.id = v.cliente_id
            ORDER BY pg.criado_em DESC
            "#
        );
        let linhas = sqlx::query_as::<_, PagamentoDetalheRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(linhas
            .into_iter()
            .map(|l| {
                let parceiro = l.venda.peca.parceiro_resumo();
                PagamentoDetalhe {
                    id: l.pagamento_id,
                    percentual: l.pagamento_percentual,
                    valor_parceiro: l.valor_parceiro,
                    pago: l.pago,
                    data_pagamento: l.data_pagamento,
                    criado_em: l.pagamento_criado_em,
                    venda: l.venda.into_detalhe(),
                    parceiro,
                }
            })
            .collect())
    }

    /// Marca os pagamentos como pagos em lote; ids desconhecidos são
    /// ignorados. Devolve o número de linhas realmente atualizadas.
    pub async fn marcar_pagos(&self, ids: &[i32]) -> Result<u64, AppError> {
        let resultado = sqlx::query(
            "UPDATE pagamentos SET pago = TRUE, data_pagamento = now() WHERE id = ANY($1)",
        )
        .bind(ids)
        .execute(&self.pool)
        .await?;
        Ok(resultado.rows_affected())
    }

    /// Todas as linhas de pagamento de um parceiro (pagas e pendentes),
    /// no formato das linhas do recibo.
    pub async fn listar_por_parceiro(&self, parceiro_id: i32) -> Result<Vec<LinhaRecibo>, AppError> {
        let linhas = sqlx::query_as::<_, LinhaReciboRow>(
            r#"
            SELECT pg.id, pg.percentual, pg.valor_parceiro, pg.pago, pg.data_pagamento,
                   v.data_venda, v.valor_vendido,
                   p.codigo_etiqueta AS peca_codigo,
                   m.nome AS marca_nome, t.nome AS tamanho_nome
            FROM pagamentos pg
            JOIN vendas v ON v.id = pg.venda_id
            JOIN pecas p ON p.id = v.peca_id
            JOIN marcas m ON m.id = p.marca_id
            JOIN tamanhos t ON t.id = p.tamanho_id
            WHERE pg.parceiro_id = $1
            ORDER BY pg.criado_em DESC
            "#,
        )
        .bind(parceiro_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(linhas
            .into_iter()
            .map(|l| LinhaRecibo {
                id: l.id,
                peca: PecaRecibo {
                    codigo: l.peca_codigo,
                    marca: l.marca_nome,
                    tamanho: l.tamanho_nome,
                },
                data_venda: l.data_venda,
                valor_vendido: l.valor_vendido,
                percentual: l.percentual,
                valor_parceiro: l.valor_parceiro,
                pago: l.pago,
                data_pagamento: l.data_pagamento,
            })
            .collect())
    }
}
