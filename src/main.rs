use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post, put},
};
use tokio::net::TcpListener;

mod common;
mod config;
mod db;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let auth_routes = Router::new()
        .route("/login", post(handlers::auth::login))
        .route(
            "/me",
            get(handlers::auth::me).layer(axum_middleware::from_fn_with_state(
                app_state.clone(),
                auth_guard,
            )),
        );

    let usuario_routes = Router::new()
        .route(
            "/admin",
            get(handlers::usuarios::listar_admins).post(handlers::usuarios::criar_admin),
        )
        .route(
            "/{id}",
            put(handlers::usuarios::atualizar).delete(handlers::usuarios::deletar),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // O cadastro de cliente é público; o restante exige autenticação.
    let cliente_routes = Router::new()
        .route("/", post(handlers::clientes::criar))
        .merge(
            Router::new()
                .route("/", get(handlers::clientes::listar))
                .route(
                    "/{id}",
                    get(handlers::clientes::buscar)
                        .put(handlers::clientes::atualizar)
                        .delete(handlers::clientes::deletar),
                )
                .route("/{id}/sacolinhas", get(handlers::clientes::sacolinhas))
                .route("/{id}/compras", get(handlers::clientes::compras))
                .layer(axum_middleware::from_fn_with_state(
                    app_state.clone(),
                    auth_guard,
                )),
        );

    let parceiro_routes = Router::new()
        .route(
            "/",
            get(handlers::parceiros::listar).post(handlers::parceiros::criar),
        )
        .route(
            "/{id}",
            get(handlers::parceiros::buscar)
                .put(handlers::parceiros::atualizar)
                .delete(handlers::parceiros::deletar),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let peca_routes = Router::new()
        .route("/", get(handlers::pecas::listar).post(handlers::pecas::criar))
        .route(
            "/{id}",
            get(handlers::pecas::buscar)
                .put(handlers::pecas::atualizar)
                .delete(handlers::pecas::deletar),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let sacolinha_routes = Router::new()
        .route("/", get(handlers::sacolinhas::listar))
        .route("/{id}", get(handlers::sacolinhas::buscar))
        .route(
            "/{id}/adicionar-peca",
            post(handlers::sacolinhas::adicionar_peca),
        )
        .route(
            "/{id}/pecas/{peca_id}",
            axum::routing::delete(handlers::sacolinhas::remover_peca),
        )
        .route("/{id}/enviar", post(handlers::sacolinhas::enviar))
        .route("/{id}/entregar", post(handlers::sacolinhas::entregar))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let venda_routes = Router::new()
        .route(
            "/",
            get(handlers::vendas::listar).post(handlers::vendas::registrar),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let pagamento_routes = Router::new()
        .route("/", get(handlers::pagamentos::listar))
        .route("/marcar-pago", post(handlers::pagamentos::marcar_pago))
        .route(
            "/parceiro/{id}",
            get(handlers::pagamentos::listar_por_parceiro),
        )
        .route("/recibo/{id}", get(handlers::pagamentos::recibo))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/usuarios", usuario_routes)
        .nest("/api/clientes", cliente_routes)
        .nest("/api/parceiros", parceiro_routes)
        .nest(
            "/api/marcas",
            handlers::catalogo::router(app_state.marca_repo.clone(), app_state.clone()),
        )
        .nest(
            "/api/tamanhos",
            handlers::catalogo::router(app_state.tamanho_repo.clone(), app_state.clone()),
        )
        .nest(
            "/api/tipos-peca",
            handlers::catalogo::router(app_state.tipo_peca_repo.clone(), app_state.clone()),
        )
        .nest("/api/pecas", peca_routes)
        .nest("/api/sacolinhas", sacolinha_routes)
        .nest("/api/vendas", venda_routes)
        .nest("/api/pagamentos", pagamento_routes)
        .with_state(app_state);

    let porta = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{porta}");
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
