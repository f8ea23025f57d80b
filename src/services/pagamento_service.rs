use chrono::Utc;

use crate::{
    common::error::AppError,
    db::{PagamentoRepository, ParceiroRepository},
    models::pagamento::{
        LinhaRecibo, PagamentoDetalhe, ParceiroRecibo, Recibo, TotaisRecibo,
    },
};

#[derive(Clone)]
pub struct PagamentoService {
    pagamento_repo: PagamentoRepository,
    parceiro_repo: ParceiroRepository,
}

impl PagamentoService {
    pub fn new(pagamento_repo: PagamentoRepository, parceiro_repo: ParceiroRepository) -> Self {
        Self { pagamento_repo, parceiro_repo }
    }

    pub async fn listar(&self) -> Result<Vec<PagamentoDetalhe>, AppError> {
        self.pagamento_repo.listar().await
    }

    /// Marca pagamentos como pagos em lote; ids desconhecidos são ignorados.
    pub async fn marcar_pagos(&self, ids: &[i32]) -> Result<u64, AppError> {
        let atualizados = self.pagamento_repo.marcar_pagos(ids).await?;
        tracing::info!("{atualizados} pagamento(s) marcado(s) como pago(s)");
        Ok(atualizados)
    }

    pub async fn listar_por_parceiro(
        &self,
        parceiro_id: i32,
    ) -> Result<Vec<LinhaRecibo>, AppError> {
        self.pagamento_repo.listar_por_parceiro(parceiro_id).await
    }

    /// Recibo do parceiro: todos os pagamentos (pagos e pendentes) com os
    /// totais fechados. Instantâneo gerado na hora, nunca persistido.
    pub async fn gerar_recibo(&self, parceiro_id: i32) -> Result<Recibo, AppError> {
        let parceiro = self
            .parceiro_repo
            .buscar(parceiro_id)
            .await?
            .ok_or(AppError::NotFound("Parceiro"))?;

        let pagamentos = self.pagamento_repo.listar_por_parceiro(parceiro_id).await?;
        let totais = TotaisRecibo::calcular(&pagamentos);

        Ok(Recibo {
            parceiro: ParceiroRecibo {
                id: parceiro.id,
                nome: parceiro.usuario.nome,
                email: parceiro.usuario.email,
                telefone: parceiro.telefone,
                percentual: parceiro.percentual,
            },
            pagamentos,
            totais,
            data_geracao: Utc::now(),
        })
    }
}
