use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{ClienteRepository, PecaRepository, SacolinhaRepository},
    models::{
        sacolinha::{
            AcaoSacolinha, CompraCliente, EnviarSacolinhaPayload, SacolinhaDetalhe,
            pode_entrar_em_sacolinha,
        },
    },
};

// Dono do ciclo de vida da sacolinha: find-or-create atômico da sacolinha
// aberta e transições de estado guardadas.
#[derive(Clone)]
pub struct SacolinhaService {
    sacolinha_repo: SacolinhaRepository,
    cliente_repo: ClienteRepository,
    peca_repo: PecaRepository,
    pool: PgPool,
}

impl SacolinhaService {
    pub fn new(
        sacolinha_repo: SacolinhaRepository,
        cliente_repo: ClienteRepository,
        peca_repo: PecaRepository,
        pool: PgPool,
    ) -> Self {
        Self { sacolinha_repo, cliente_repo, peca_repo, pool }
    }

    pub async fn listar(&self) -> Result<Vec<SacolinhaDetalhe>, AppError> {
        self.sacolinha_repo.listar().await
    }

    pub async fn buscar(&self, id: i32) -> Result<SacolinhaDetalhe, AppError> {
        self.sacolinha_repo
            .buscar_detalhe(id)
            .await?
            .ok_or(AppError::NotFound("Sacolinha"))
    }

    pub async fn listar_por_cliente(
        &self,
        cliente_id: i32,
    ) -> Result<Vec<SacolinhaDetalhe>, AppError> {
        self.sacolinha_repo.listar_por_cliente(cliente_id).await
    }

    /// Adiciona uma peça à sacolinha aberta do cliente, criando a sacolinha
    /// se não houver nenhuma. Tudo numa transação só: a trava na linha do
    /// cliente serializa chamadas concorrentes para o mesmo cliente, e o
    /// índice parcial do banco garante no máximo uma sacolinha aberta.
    pub async fn adicionar_peca(
        &self,
        cliente_id: i32,
        peca_id: i32,
    ) -> Result<SacolinhaDetalhe, AppError> {
        let mut tx = self.pool.begin().await?;

        self.cliente_repo
            .travar(&mut *tx, cliente_id)
            .await?
            .ok_or(AppError::NotFound("Cliente"))?;

        let peca = self
            .peca_repo
            .travar(&mut *tx, peca_id)
            .await?
            .ok_or(AppError::NotFound("Peça"))?;

        let ja_em_sacolinha = self
            .peca_repo
            .sacolinha_aberta_contendo(&mut *tx, peca_id)
            .await?;
        pode_entrar_em_sacolinha(&peca, ja_em_sacolinha)?;

        let sacolinha = match self.sacolinha_repo.buscar_aberta(&mut *tx, cliente_id).await? {
            Some(sacolinha) => sacolinha,
            None => {
                let nova = self.sacolinha_repo.criar(&mut *tx, cliente_id).await?;
                tracing::info!("Sacolinha {} criada para o cliente {}", nova.id, cliente_id);
                nova
            }
        };

        self.sacolinha_repo
            .adicionar_peca(&mut *tx, sacolinha.id, peca_id)
            .await?;

        tx.commit().await?;
        self.buscar(sacolinha.id).await
    }

    /// Idempotente: remover uma peça que não está na sacolinha não é erro.
    pub async fn remover_peca(&self, sacolinha_id: i32, peca_id: i32) -> Result<u64, AppError> {
        self.sacolinha_repo.remover_peca(sacolinha_id, peca_id).await
    }

    pub async fn enviar(
        &self,
        id: i32,
        payload: &EnviarSacolinhaPayload,
    ) -> Result<SacolinhaDetalhe, AppError> {
        let mut tx = self.pool.begin().await?;

        let sacolinha = self
            .sacolinha_repo
            .travar(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("Sacolinha"))?;

        sacolinha.status.transicionar(AcaoSacolinha::Enviar)?;

        self.sacolinha_repo.marcar_enviada(&mut *tx, id, payload).await?;

        tx.commit().await?;
        tracing::info!("Sacolinha {id} enviada");
        self.buscar(id).await
    }

    pub async fn entregar(&self, id: i32) -> Result<SacolinhaDetalhe, AppError> {
        let mut tx = self.pool.begin().await?;

        let sacolinha = self
            .sacolinha_repo
            .travar(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("Sacolinha"))?;

        sacolinha.status.transicionar(AcaoSacolinha::Entregar)?;
        self.sacolinha_repo.marcar_entregue(&mut *tx, id).await?;

        tx.commit().await?;
        tracing::info!("Sacolinha {id} entregue");
        self.buscar(id).await
    }

    /// Visão achatada das "compras" do cliente: cada peça de cada sacolinha,
    /// com o status da sacolinha de origem.
    pub async fn compras_por_cliente(
        &self,
        cliente_id: i32,
    ) -> Result<Vec<CompraCliente>, AppError> {
        let sacolinhas = self.listar_por_cliente(cliente_id).await?;

        let mut compras = Vec::new();
        for sacolinha in sacolinhas {
            for item in sacolinha.pecas {
                compras.push(CompraCliente {
                    id: item.id,
                    data_venda: sacolinha.criado_em,
                    valor_vendido: item.peca.valor_venda,
                    sacolinha_id: sacolinha.id,
                    sacolinha_status: sacolinha.status,
                    peca: item.peca,
                });
            }
        }
        Ok(compras)
    }
}
