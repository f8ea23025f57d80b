use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Pagamento {
    pub id: i32,
    pub parceiro_id: i32,
    pub venda_id: i32,
    pub percentual: Decimal,
    pub valor_parceiro: Decimal,
    pub pago: bool,
    pub data_pagamento: Option<DateTime<Utc>>,
    pub criado_em: DateTime<Utc>,
}

// Pagamento com venda, peça, cliente e parceiro resolvidos, como a listagem
// administrativa devolve.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagamentoDetalhe {
    pub id: i32,
    pub percentual: Decimal,
    pub valor_parceiro: Decimal,
    pub pago: bool,
    pub data_pagamento: Option<DateTime<Utc>>,
    pub criado_em: DateTime<Utc>,
    pub venda: crate::models::venda::VendaDetalhe,
    pub parceiro: crate::models::peca::ParceiroResumo,
}

/// Comissão do parceiro sobre uma venda, arredondada para centavos.
pub fn calcular_valor_parceiro(valor_vendido: Decimal, percentual: Decimal) -> Decimal {
    (valor_vendido * percentual / Decimal::from(100)).round_dp(2)
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MarcarPagoPayload {
    #[validate(length(min = 1, message = "Informe ao menos um pagamento."))]
    pub ids: Vec<i32>,
}

// --- Recibo (gerado sob demanda, nunca persistido) ---

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParceiroRecibo {
    pub id: i32,
    pub nome: String,
    pub email: String,
    pub telefone: Option<String>,
    pub percentual: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PecaRecibo {
    pub codigo: String,
    pub marca: String,
    pub tamanho: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinhaRecibo {
    pub id: i32,
    pub peca: PecaRecibo,
    pub data_venda: DateTime<Utc>,
    pub valor_vendido: Decimal,
    pub percentual: Decimal,
    pub valor_parceiro: Decimal,
    pub pago: bool,
    pub data_pagamento: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotaisRecibo {
    pub total_pago: Decimal,
    pub total_pendente: Decimal,
    pub total: Decimal,
    pub quantidade_pecas: usize,
}

impl TotaisRecibo {
    pub fn calcular(linhas: &[LinhaRecibo]) -> Self {
        let total_pago: Decimal = linhas
            .iter()
            .filter(|l| l.pago)
            .map(|l| l.valor_parceiro)
            .sum();
        let total_pendente: Decimal = linhas
            .iter()
            .filter(|l| !l.pago)
            .map(|l| l.valor_parceiro)
            .sum();

        TotaisRecibo {
            total_pago,
            total_pendente,
            total: total_pago + total_pendente,
            quantidade_pecas: linhas.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recibo {
    pub parceiro: ParceiroRecibo,
    pub pagamentos: Vec<LinhaRecibo>,
    pub totais: TotaisRecibo,
    pub data_geracao: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linha(valor: Decimal, pago: bool) -> LinhaRecibo {
        LinhaRecibo {
            id: 1,
            peca: PecaRecibo {
                codigo: "MPM-0001".into(),
                marca: "Carter's".into(),
                tamanho: "2 anos".into(),
            },
            data_venda: Utc::now(),
            valor_vendido: valor * Decimal::TWO,
            percentual: Decimal::from(50),
            valor_parceiro: valor,
            pago,
            data_pagamento: None,
        }
    }

    #[test]
    fn comissao_e_arredondada_para_centavos() {
        // 33.33 * 30% = 9.999 -> 10.00
        let valor = calcular_valor_parceiro(Decimal::new(3333, 2), Decimal::from(30));
        assert_eq!(valor, Decimal::new(1000, 2));

        let valor = calcular_valor_parceiro(Decimal::new(5000, 2), Decimal::from(40));
        assert_eq!(valor, Decimal::new(2000, 2));
    }

    #[test]
    fn comissao_de_percentual_zero_e_zero() {
        let valor = calcular_valor_parceiro(Decimal::new(9990, 2), Decimal::ZERO);
        assert_eq!(valor, Decimal::ZERO.round_dp(2));
    }

    #[test]
    fn totais_do_recibo_fecham() {
        let linhas = vec![
            linha(Decimal::new(1000, 2), true),
            linha(Decimal::new(2550, 2), false),
            linha(Decimal::new(500, 2), true),
        ];

        let totais = TotaisRecibo::calcular(&linhas);
        assert_eq!(totais.total_pago, Decimal::new(1500, 2));
        assert_eq!(totais.total_pendente, Decimal::new(2550, 2));
        assert_eq!(totais.total, totais.total_pago + totais.total_pendente);
        assert_eq!(totais.quantidade_pecas, 3);
    }

    #[test]
    fn lista_vazia_de_ids_e_rejeitada() {
        let payload = MarcarPagoPayload { ids: vec![] };
        assert!(payload.validate().is_err());

        let payload = MarcarPagoPayload { ids: vec![1, 2] };
        assert!(payload.validate().is_ok());
    }
}
