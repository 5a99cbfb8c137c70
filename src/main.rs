// src/main.rs

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post},
};
use tokio::net::TcpListener;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::{auth::auth_guard, tenancy::tenant_guard};

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Rotas de usuário (apenas autenticação)
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Rotas de tenant (apenas autenticação: o escopo nasce aqui)
    let tenancy_routes = Router::new()
        .route(
            "/",
            post(handlers::tenancy::create_tenant).get(handlers::tenancy::list_my_tenants),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Todas as rotas abaixo exigem auth + escopo de tenant resolvido.
    // Ordem das camadas: a última adicionada roda primeiro (auth antes do tenant).

    let catalog_routes = Router::new()
        .route(
            "/products",
            post(handlers::catalog::create_product).get(handlers::catalog::get_all_products),
        )
        .route("/products/{id}", get(handlers::catalog::get_product));

    let sales_routes = Router::new()
        .route(
            "/customers",
            post(handlers::sales::create_customer).get(handlers::sales::get_all_customers),
        )
        .route(
            "/orders",
            post(handlers::sales::create_order).get(handlers::sales::get_all_orders),
        )
        .route("/orders/{id}", get(handlers::sales::get_order))
        .route(
            "/orders/{id}/lines",
            post(handlers::sales::add_line).get(handlers::sales::get_lines),
        )
        .route("/orders/{id}/confirm", post(handlers::sales::confirm_order));

    let purchases_routes = Router::new()
        .route(
            "/vendors",
            post(handlers::purchases::create_vendor).get(handlers::purchases::get_all_vendors),
        )
        .route(
            "/orders",
            post(handlers::purchases::create_order).get(handlers::purchases::get_all_orders),
        )
        .route("/orders/{id}", get(handlers::purchases::get_order))
        .route(
            "/orders/{id}/lines",
            post(handlers::purchases::add_line).get(handlers::purchases::get_lines),
        )
        .route(
            "/orders/{id}/receive",
            post(handlers::purchases::receive_order),
        );

    let leather_routes = Router::new()
        .route(
            "/suppliers",
            post(handlers::leather::create_supplier).get(handlers::leather::get_all_suppliers),
        )
        .route(
            "/types",
            post(handlers::leather::create_leather_type)
                .get(handlers::leather::get_all_leather_types),
        )
        .route(
            "/orders",
            post(handlers::leather::create_order).get(handlers::leather::get_all_orders),
        )
        .route("/orders/{id}", get(handlers::leather::get_order))
        .route(
            "/orders/{id}/lines",
            post(handlers::leather::add_line).get(handlers::leather::get_lines),
        )
        .route(
            "/orders/{id}/receive",
            post(handlers::leather::receive_order),
        );

    let accounting_routes = Router::new()
        .route(
            "/invoices",
            post(handlers::accounting::create_invoice).get(handlers::accounting::get_all_invoices),
        )
        .route("/invoices/{id}", get(handlers::accounting::get_invoice))
        .route(
            "/invoices/{id}/payments",
            get(handlers::accounting::get_invoice_payments),
        )
        .route(
            "/invoices/{id}/pdf",
            get(handlers::documents::generate_invoice_pdf),
        )
        .route("/payments", post(handlers::accounting::create_payment));

    let dashboard_routes = Router::new().route("/summary", get(handlers::dashboard::get_summary));

    let tenant_scoped = Router::new()
        .nest("/catalog", catalog_routes)
        .nest("/sales", sales_routes)
        .nest("/purchases", purchases_routes)
        .nest("/leather", leather_routes)
        .nest("/accounting", accounting_routes)
        .nest("/dashboard", dashboard_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            tenant_guard,
        ))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/tenants", tenancy_routes)
        .nest("/api", tenant_scoped)
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
