use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{PagamentoRepository, ParceiroRepository, PecaRepository},
    models::{
        pagamento::calcular_valor_parceiro,
        peca::StatusPeca,
        venda::{RegistrarVendaPayload, RegistroVenda, VendaDetalhe},
    },
};

#[derive(Clone)]
pub struct VendaService {
    peca_repo: PecaRepository,
    parceiro_repo: ParceiroRepository,
    pagamento_repo: PagamentoRepository,
    pool: PgPool,
}

impl VendaService {
    pub fn new(
        peca_repo: PecaRepository,
        parceiro_repo: ParceiroRepository,
        pagamento_repo: PagamentoRepository,
        pool: PgPool,
    ) -> Self {
        Self { peca_repo, parceiro_repo, pagamento_repo, pool }
    }

    pub async fn listar(&self) -> Result<Vec<VendaDetalhe>, AppError> {
        self.pagamento_repo.listar_vendas().await
    }

    /// Registra a venda de uma peça e deriva o pagamento do parceiro na
    /// mesma transação, com o percentual de comissão congelado no momento
    /// da venda.
    pub async fn registrar(&self, payload: &RegistrarVendaPayload) -> Result<RegistroVenda, AppError> {
        let mut tx = self.pool.begin().await?;

        let peca = self
            .peca_repo
            .travar(&mut *tx, payload.peca_id)
            .await?
            .ok_or(AppError::NotFound("Peça"))?;

        if peca.status == StatusPeca::Vendida {
            return Err(AppError::InvalidState(format!(
                "A peça '{}' já foi vendida",
                peca.codigo_etiqueta
            )));
        }

        let percentual = self
            .parceiro_repo
            .percentual(&mut *tx, peca.parceiro_id)
            .await?
            .ok_or(AppError::NotFound("Parceiro"))?;

        let venda = self
            .pagamento_repo
            .criar_venda(
                &mut *tx,
                peca.id,
                payload.cliente_id,
                payload.valor_vendido,
                payload.data_venda,
            )
            .await?;

        self.peca_repo
            .atualizar_status(&mut *tx, peca.id, StatusPeca::Vendida)
            .await?;

        let valor_parceiro = calcular_valor_parceiro(payload.valor_vendido, percentual);
        let pagamento = self
            .pagamento_repo
            .criar_pagamento(&mut *tx, peca.parceiro_id, venda.id, percentual, valor_parceiro)
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Venda {} registrada: peça {} por {}, comissão {}",
            venda.id,
            peca.codigo_etiqueta,
            venda.valor_vendido,
            pagamento.valor_parceiro
        );
        Ok(RegistroVenda { venda, pagamento })
    }
}
