use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{env, time::Duration};

use crate::{
    db::{
        CatalogoRepository, ClienteRepository, PagamentoRepository, ParceiroRepository,
        PecaRepository, SacolinhaRepository, UsuarioRepository,
    },
    services::{AuthService, PagamentoService, ParceiroService, SacolinhaService, VendaService},
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub marca_repo: CatalogoRepository,
    pub tamanho_repo: CatalogoRepository,
    pub tipo_peca_repo: CatalogoRepository,
    pub cliente_repo: ClienteRepository,
    pub peca_repo: PecaRepository,
    pub auth_service: AuthService,
    pub parceiro_service: ParceiroService,
    pub sacolinha_service: SacolinhaService,
    pub venda_service: VendaService,
    pub pagamento_service: PagamentoService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let usuario_repo = UsuarioRepository::new(db_pool.clone());
        let cliente_repo = ClienteRepository::new(db_pool.clone());
        let parceiro_repo = ParceiroRepository::new(db_pool.clone());
        let peca_repo = PecaRepository::new(db_pool.clone());
        let sacolinha_repo = SacolinhaRepository::new(db_pool.clone());
        let pagamento_repo = PagamentoRepository::new(db_pool.clone());

        let auth_service =
            AuthService::new(usuario_repo.clone(), jwt_secret, db_pool.clone());
        let parceiro_service =
            ParceiroService::new(parceiro_repo.clone(), usuario_repo, db_pool.clone());
        let sacolinha_service = SacolinhaService::new(
            sacolinha_repo,
            cliente_repo.clone(),
            peca_repo.clone(),
            db_pool.clone(),
        );
        let venda_service = VendaService::new(
            peca_repo.clone(),
            parceiro_repo.clone(),
            pagamento_repo.clone(),
            db_pool.clone(),
        );
        let pagamento_service = PagamentoService::new(pagamento_repo, parceiro_repo);

        Ok(Self {
            marca_repo: CatalogoRepository::marcas(db_pool.clone()),
            tamanho_repo: CatalogoRepository::tamanhos(db_pool.clone()),
            tipo_peca_repo: CatalogoRepository::tipos_peca(db_pool.clone()),
            db_pool,
            cliente_repo,
            peca_repo,
            auth_service,
            parceiro_service,
            sacolinha_service,
            venda_service,
            pagamento_service,
        })
    }
}
