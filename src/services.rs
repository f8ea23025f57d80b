pub mod auth;
pub use auth::AuthService;
pub mod parceiro_service;
pub use parceiro_service::ParceiroService;
pub mod sacolinha_service;
pub use sacolinha_service::SacolinhaService;
pub mod venda_service;
pub use venda_service::VendaService;
pub mod pagamento_service;
pub use pagamento_service::PagamentoService;
