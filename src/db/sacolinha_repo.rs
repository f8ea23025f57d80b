use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, FromRow, PgPool, Postgres};

use crate::{
    common::error::AppError,
    db::peca_repo::{COLUNAS_PECA_DETALHE, FROM_PECA_DETALHE, PecaDetalheRow},
    models::{
        cliente::ClienteResumo,
        sacolinha::{
            EnviarSacolinhaPayload, ItemSacolinha, Sacolinha, SacolinhaDetalhe, StatusSacolinha,
        },
    },
};

#[derive(Debug, FromRow)]
struct SacolinhaClienteRow {
    id: i32,
    status: StatusSacolinha,
    valor_frete: Option<Decimal>,
    codigo_rastreio: Option<String>,
    observacoes: Option<String>,
    data_envio: Option<DateTime<Utc>>,
    data_entrega: Option<DateTime<Utc>>,
    criado_em: DateTime<Utc>,
    cliente_id: i32,
    cliente_nome: String,
    cliente_email: String,
}

#[derive(Debug, FromRow)]
struct ItemSacolinhaRow {
    item_id: i32,
    item_criado_em: DateTime<Utc>,
    item_sacolinha_id: i32,
    #[sqlx(flatten)]
    peca: PecaDetalheRow,
}

const SELECT_SACOLINHA: &str = r#"
SELECT s.id, s.status, s.valor_frete, s.codigo_rastreio, s.observacoes,
       s.data_envio, s.data_entrega, s.criado_em,
       c.id AS cliente_id, c.nome AS cliente_nome, c.email AS cliente_email
FROM sacolinhas s
JOIN clientes c ON c.id = s.cliente_id
"#;

#[derive(Clone)]
pub struct SacolinhaRepository {
    pool: PgPool,
}

impl SacolinhaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leituras aninhadas (sacolinha -> cliente + peças em ordem de inserção)
    // ---

    pub async fn buscar_detalhe(&self, id: i32) -> Result<Option<SacolinhaDetalhe>, AppError> {
        let sql = format!("{SELECT_SACOLINHA} WHERE s.id = $1");
        let cabecalho = sqlx::query_as::<_, SacolinhaClienteRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match cabecalho {
            None => Ok(None),
            Some(linha) => {
                let itens = self.itens_das_sacolinhas(&[linha.id]).await?;
                let mut detalhes = montar_detalhes(vec![linha], itens);
                Ok(detalhes.pop())
            }
        }
    }

    pub async fn listar(&self) -> Result<Vec<SacolinhaDetalhe>, AppError> {
        let sql = format!("{SELECT_SACOLINHA} ORDER BY s.criado_em DESC");
        let cabecalhos = sqlx::query_as::<_, SacolinhaClienteRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        self.completar(cabecalhos).await
    }

    pub async fn listar_por_cliente(
        &self,
        cliente_id: i32,
    ) -> Result<Vec<SacolinhaDetalhe>, AppError> {
        let sql = format!("{SELECT_SACOLINHA} WHERE s.cliente_id = $1 ORDER BY s.criado_em DESC");
        let cabecalhos = sqlx::query_as::<_, SacolinhaClienteRow>(&sql)
            .bind(cliente_id)
            .fetch_all(&self.pool)
            .await?;
        self.completar(cabecalhos).await
    }

    async fn completar(
        &self,
        cabecalhos: Vec<SacolinhaClienteRow>,
    ) -> Result<Vec<SacolinhaDetalhe>, AppError> {
        let ids: Vec<i32> = cabecalhos.iter().map(|s| s.id).collect();
        let itens = self.itens_das_sacolinhas(&ids).await?;
        Ok(montar_detalhes(cabecalhos, itens))
    }

    async fn itens_das_sacolinhas(
        &self,
        sacolinha_ids: &[i32],
    ) -> Result<Vec<ItemSacolinhaRow>, AppError> {
        if sacolinha_ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            r#"
            SELECT sp.id AS item_id, sp.criado_em AS item_criado_em,
                   sp.sacolinha_id AS item_sacolinha_id,
                   {COLUNAS_PECA_DETALHE}
            {FROM_PECA_DETALHE}
            JOIN sacolinha_pecas sp ON sp.peca_id = p.id
            WHERE sp.sacolinha_id = ANY($1)
            ORDER BY sp.criado_em ASC, sp.id ASC
            "#
        );
        let itens = sqlx::query_as::<_, ItemSacolinhaRow>(&sql)
            .bind(sacolinha_ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(itens)
    }

    // ---
    // Escritas (sempre dentro da transação do serviço)
    // ---

    /// Sacolinha aberta do cliente, travada até o fim da transação.
    pub async fn buscar_aberta<'e, E>(
        &self,
        executor: E,
        cliente_id: i32,
    ) -> Result<Option<Sacolinha>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sacolinha = sqlx::query_as::<_, Sacolinha>(
            r#"
            SELECT * FROM sacolinhas
            WHERE cliente_id = $1 AND status = 'aguardando_envio'
            FOR UPDATE
            "#,
        )
        .bind(cliente_id)
        .fetch_optional(executor)
        .await?;
        Ok(sacolinha)
    }

    pub async fn criar<'e, E>(&self, executor: E, cliente_id: i32) -> Result<Sacolinha, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sacolinha = sqlx::query_as::<_, Sacolinha>(
            "INSERT INTO sacolinhas (cliente_id) VALUES ($1) RETURNING *",
        )
        .bind(cliente_id)
        .fetch_one(executor)
        .await?;
        Ok(sacolinha)
    }

    pub async fn adicionar_peca<'e, E>(
        &self,
        executor: E,
        sacolinha_id: i32,
        peca_id: i32,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("INSERT INTO sacolinha_pecas (sacolinha_id, peca_id) VALUES ($1, $2)")
            .bind(sacolinha_id)
            .bind(peca_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Remove a associação; idempotente (0 linhas afetadas não é erro).
    pub async fn remover_peca(&self, sacolinha_id: i32, peca_id: i32) -> Result<u64, AppError> {
        let resultado =
            sqlx::query("DELETE FROM sacolinha_pecas WHERE sacolinha_id = $1 AND peca_id = $2")
                .bind(sacolinha_id)
                .bind(peca_id)
                .execute(&self.pool)
                .await?;
        Ok(resultado.rows_affected())
    }

    /// Trava a linha da sacolinha para a checagem de transição de estado.
    pub async fn travar<'e, E>(&self, executor: E, id: i32) -> Result<Option<Sacolinha>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sacolinha =
            sqlx::query_as::<_, Sacolinha>("SELECT * FROM sacolinhas WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(executor)
                .await?;
        Ok(sacolinha)
    }

    /// Campo ausente no payload deixa a coluna como está; null explícito
    /// limpa, como nas demais atualizações parciais.
    pub async fn marcar_enviada<'e, E>(
        &self,
        executor: E,
        id: i32,
        payload: &EnviarSacolinhaPayload,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE sacolinhas SET
                status = 'enviada',
                data_envio = now(),
                valor_frete = CASE WHEN $2 THEN $3 ELSE valor_frete END,
                codigo_rastreio = CASE WHEN $4 THEN $5 ELSE codigo_rastreio END,
                observacoes = CASE WHEN $6 THEN $7 ELSE observacoes END
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(payload.valor_frete.is_some())
        .bind(payload.valor_frete.flatten())
        .bind(payload.codigo_rastreio.is_some())
        .bind(payload.codigo_rastreio.clone().flatten())
        .bind(payload.observacoes.is_some())
        .bind(payload.observacoes.clone().flatten())
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn marcar_entregue<'e, E>(&self, executor: E, id: i32) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE sacolinhas SET status = 'entregue', data_entrega = now() WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }
}

// Agrupa as linhas de item por sacolinha preservando a ordem das duas
// consultas (sacolinhas por criação DESC, itens por inserção ASC).
fn montar_detalhes(
    cabecalhos: Vec<SacolinhaClienteRow>,
    itens: Vec<ItemSacolinhaRow>,
) -> Vec<SacolinhaDetalhe> {
    let mut detalhes: Vec<SacolinhaDetalhe> = cabecalhos
        .into_iter()
        .map(|s| SacolinhaDetalhe {
            id: s.id,
            status: s.status,
            valor_frete: s.valor_frete,
            codigo_rastreio: s.codigo_rastreio,
            observacoes: s.observacoes,
            data_envio: s.data_envio,
            data_entrega: s.data_entrega,
            criado_em: s.criado_em,
            cliente: ClienteResumo {
                id: s.cliente_id,
                nome: s.cliente_nome,
                email: s.cliente_email,
            },
            pecas: Vec::new(),
        })
        .collect();

    for item in itens {
        if let Some(detalhe) = detalhes.iter_mut().find(|d| d.id == item.item_sacolinha_id) {
            detalhe.pecas.push(ItemSacolinha {
                id: item.item_id,
                criado_em: item.item_criado_em,
                peca: item.peca.into_detalhe(),
            });
        }
    }

    detalhes
}
