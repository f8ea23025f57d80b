pub mod catalogo_repo;
pub use catalogo_repo::CatalogoRepository;
pub mod usuario_repo;
pub use usuario_repo::UsuarioRepository;
pub mod cliente_repo;
pub use cliente_repo::ClienteRepository;
pub mod parceiro_repo;
pub use parceiro_repo::ParceiroRepository;
pub mod peca_repo;
pub use peca_repo::PecaRepository;
pub mod sacolinha_repo;
pub use sacolinha_repo::SacolinhaRepository;
pub mod pagamento_repo;
pub use pagamento_repo::PagamentoRepository;
