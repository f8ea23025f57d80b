use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::{
    common::error::AppError,
    models::{
        cliente::ClienteResumo,
        peca::{Peca, PecaDetalhe, StatusPeca},
    },
};

// Ciclo de vida da sacolinha: aguardando_envio -> enviada -> entregue.
// Não existe estado de cancelamento/devolução; regra de negócio em aberto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "status_sacolinha", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StatusSacolinha {
    AguardandoEnvio,
    Enviada,
    Entregue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcaoSacolinha {
    Enviar,
    Entregar,
}

impl StatusSacolinha {
    pub fn rotulo(self) -> &'static str {
        match self {
            StatusSacolinha::AguardandoEnvio => "aguardando_envio",
            StatusSacolinha::Enviada => "enviada",
            StatusSacolinha::Entregue => "entregue",
        }
    }

    // Uma sacolinha aberta é a única que ainda aceita peças.
    pub fn aberta(self) -> bool {
        self == StatusSacolinha::AguardandoEnvio
    }

    /// Tabela de transições guardadas: estado atual x ação -> próximo estado,
    /// ou `InvalidState` quando a transição não é permitida.
    pub fn transicionar(self, acao: AcaoSacolinha) -> Result<StatusSacolinha, AppError> {
        match (self, acao) {
            (StatusSacolinha::AguardandoEnvio, AcaoSacolinha::Enviar) => {
                Ok(StatusSacolinha::Enviada)
            }
            (StatusSacolinha::Enviada, AcaoSacolinha::Entregar) => Ok(StatusSacolinha::Entregue),
            (atual, AcaoSacolinha::Enviar) => Err(AppError::InvalidState(format!(
                "Não é possível enviar uma sacolinha com status '{}'",
                atual.rotulo()
            ))),
            (atual, AcaoSacolinha::Entregar) => Err(AppError::InvalidState(format!(
                "Não é possível marcar como entregue uma sacolinha com status '{}'",
                atual.rotulo()
            ))),
        }
    }
}

/// Guarda de entrada: uma peça só entra em sacolinha se ainda estiver
/// disponível e fora de qualquer outra sacolinha aberta.
pub fn pode_entrar_em_sacolinha(
    peca: &Peca,
    sacolinha_aberta: Option<i32>,
) -> Result<(), AppError> {
    if peca.status == StatusPeca::Vendida {
        return Err(AppError::InvalidState(format!(
            "A peça '{}' já foi vendida e não pode entrar em sacolinha",
            peca.codigo_etiqueta
        )));
    }
    if let Some(outra) = sacolinha_aberta {
        return Err(AppError::InvalidState(format!(
            "A peça '{}' já está na sacolinha {} (aguardando envio)",
            peca.codigo_etiqueta, outra
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Sacolinha {
    pub id: i32,
    pub cliente_id: i32,
    pub status: StatusSacolinha,
    pub valor_frete: Option<Decimal>,
    pub codigo_rastreio: Option<String>,
    pub observacoes: Option<String>,
    pub data_envio: Option<DateTime<Utc>>,
    pub data_entrega: Option<DateTime<Utc>>,
    pub criado_em: DateTime<Utc>,
}

// Uma peça dentro da sacolinha (linha da tabela de junção, ordem de inserção).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSacolinha {
    pub id: i32,
    pub criado_em: DateTime<Utc>,
    pub peca: PecaDetalhe,
}

// Sacolinha com cliente e peças resolvidos, como as leituras sempre devolvem.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SacolinhaDetalhe {
    pub id: i32,
    pub status: StatusSacolinha,
    pub valor_frete: Option<Decimal>,
    pub codigo_rastreio: Option<String>,
    pub observacoes: Option<String>,
    pub data_envio: Option<DateTime<Utc>>,
    pub data_entrega: Option<DateTime<Utc>>,
    pub criado_em: DateTime<Utc>,
    pub cliente: ClienteResumo,
    pub pecas: Vec<ItemSacolinha>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdicionarPecaPayload {
    pub peca_id: i32,
}

// Campo ausente deixa a coluna como está; null explícito limpa.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EnviarSacolinhaPayload {
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub valor_frete: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub codigo_rastreio: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub observacoes: Option<Option<String>>,
}

// Visão achatada de "compras" de um cliente: cada peça de cada sacolinha.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompraCliente {
    pub id: i32,
    pub data_venda: DateTime<Utc>,
    pub valor_vendido: Decimal,
    pub sacolinha_id: i32,
    pub sacolinha_status: StatusSacolinha,
    pub peca: PecaDetalhe,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fluxo_normal_percorre_os_tres_estados() {
        let status = StatusSacolinha::AguardandoEnvio;
        let status = status.transicionar(AcaoSacolinha::Enviar).unwrap();
        assert_eq!(status, StatusSacolinha::Enviada);
        let status = status.transicionar(AcaoSacolinha::Entregar).unwrap();
        assert_eq!(status, StatusSacolinha::Entregue);
    }

    #[test]
    fn enviar_duas_vezes_falha_na_segunda() {
        let enviada = StatusSacolinha::AguardandoEnvio
            .transicionar(AcaoSacolinha::Enviar)
            .unwrap();
        let erro = enviada.transicionar(AcaoSacolinha::Enviar).unwrap_err();
        assert!(matches!(erro, AppError::InvalidState(_)));
    }

    #[test]
    fn entregar_so_e_permitido_apos_envio() {
        let erro = StatusSacolinha::AguardandoEnvio
            .transicionar(AcaoSacolinha::Entregar)
            .unwrap_err();
        assert!(matches!(erro, AppError::InvalidState(_)));

        let erro = StatusSacolinha::Entregue
            .transicionar(AcaoSacolinha::Entregar)
            .unwrap_err();
        assert!(matches!(erro, AppError::InvalidState(_)));
    }

    #[test]
    fn somente_aguardando_envio_esta_aberta() {
        assert!(StatusSacolinha::AguardandoEnvio.aberta());
        assert!(!StatusSacolinha::Enviada.aberta());
        assert!(!StatusSacolinha::Entregue.aberta());
    }

    #[test]
    fn status_serializa_em_snake_case() {
        assert_eq!(
            serde_json::to_value(StatusSacolinha::AguardandoEnvio).unwrap(),
            "aguardando_envio"
        );
    }

    fn peca(status: StatusPeca) -> Peca {
        Peca {
            id: 7,
            codigo_etiqueta: "MPM-0007".into(),
            nome: "Macacão".into(),
            parceiro_id: 1,
            marca_id: 1,
            tamanho_id: 1,
            tipo_peca_id: 1,
            valor_custo: Decimal::new(1000, 2),
            valor_venda: Decimal::new(2500, 2),
            status,
            observacoes: None,
            fotos: vec![],
            criado_em: Utc::now(),
        }
    }

    #[test]
    fn peca_vendida_nao_entra_em_sacolinha() {
        let erro = pode_entrar_em_sacolinha(&peca(StatusPeca::Vendida), None).unwrap_err();
        assert!(matches!(erro, AppError::InvalidState(_)));
    }

    #[test]
    fn peca_em_outra_sacolinha_aberta_e_rejeitada() {
        let erro =
            pode_entrar_em_sacolinha(&peca(StatusPeca::Disponivel), Some(42)).unwrap_err();
        assert!(matches!(erro, AppError::InvalidState(_)));
    }

    #[test]
    fn peca_disponivel_e_livre_pode_entrar() {
        assert!(pode_entrar_em_sacolinha(&peca(StatusPeca::Disponivel), None).is_ok());
    }

    #[test]
    fn envio_distingue_campo_ausente_de_null() {
        let payload: EnviarSacolinhaPayload =
            serde_json::from_str(r#"{"valorFrete": 15.0, "codigoRastreio": null}"#).unwrap();

        assert_eq!(payload.valor_frete, Some(Some(Decimal::new(150, 1))));
        // null explícito = limpar
        assert_eq!(payload.codigo_rastreio, Some(None));
        // ausente = não mexe
        assert!(payload.observacoes.is_none());
    }
}
