pub mod auth;
pub mod catalogo;
pub mod cliente;
pub mod pagamento;
pub mod parceiro;
pub mod peca;
pub mod sacolinha;
pub mod venda;

use serde::{Deserialize, Deserializer};

/// Deserializador para campos `Option<Option<T>>` de atualização parcial:
/// campo ausente fica no `None` externo (via `#[serde(default)]`), enquanto
/// `null` explícito vira `Some(None)` e um valor vira `Some(Some(v))`.
pub fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}
