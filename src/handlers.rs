pub mod auth;
pub mod catalogo;
pub mod clientes;
pub mod pagamentos;
pub mod parceiros;
pub mod pecas;
pub mod sacolinhas;
pub mod usuarios;
pub mod vendas;
