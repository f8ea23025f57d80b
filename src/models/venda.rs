use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use crate::models::{cliente::ClienteResumo, peca::PecaDetalhe};

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Venda {
    pub id: i32,
    pub peca_id: i32,
    pub cliente_id: i32,
    pub valor_vendido: Decimal,
    pub data_venda: DateTime<Utc>,
    pub criado_em: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendaDetalhe {
    pub id: i32,
    pub valor_vendido: Decimal,
    pub data_venda: DateTime<Utc>,
    pub criado_em: DateTime<Utc>,
    pub peca: PecaDetalhe,
    pub cliente: ClienteResumo,
}

// Resultado do registro de uma venda: a venda e o pagamento derivado.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistroVenda {
    pub venda: Venda,
    pub pagamento: crate::models::pagamento::Pagamento,
}

fn validate_nao_negativo(valor: &Decimal) -> Result<(), ValidationError> {
    if valor.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegistrarVendaPayload {
    pub peca_id: i32,
    pub cliente_id: i32,
    #[validate(custom(function = "validate_nao_negativo"))]
    pub valor_vendido: Decimal,
    // Ausente = momento do registro.
    pub data_venda: Option<DateTime<Utc>>,
}
