// src/config.rs

use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{env, time::Duration};

use crate::{
    db::{
        AccountingRepository, CatalogRepository, DashboardRepository, LeatherRepository,
        PurchasesRepository, SalesRepository, TenantRepository, UserRepository,
    },
    services::{
        accounting_service::AccountingService, auth::AuthService, catalog_service::CatalogService,
        dashboard_service::DashboardService, document_service::DocumentService,
        leather_service::LeatherService, purchases_service::PurchasesService,
        sales_service::SalesService, tenancy_service::TenancyService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub tenancy_service: TenancyService,
    pub catalog_service: CatalogService,
    pub sales_service: SalesService,
    pub purchases_service: PurchasesService,
    pub leather_service: LeatherService,
    pub accounting_service: AccountingService,
    pub dashboard_service: DashboardService,
    pub document_service: DocumentService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let tenant_repo = TenantRepository::new(db_pool.clone());
        let catalog_repo = CatalogRepository::new(db_pool.clone());
        let sales_repo = SalesRepository::new(db_pool.clone());
        let purchases_repo = PurchasesRepository::new(db_pool.clone());
        let leather_repo = LeatherRepository::new(db_pool.clone());
        let accounting_repo = AccountingRepository::new(db_pool.clone());
        let dashboard_repo = DashboardRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo, jwt_secret);
        let tenancy_service = TenancyService::new(tenant_repo, db_pool.clone());
        let catalog_service = CatalogService::new(catalog_repo.clone());
        let sales_service = SalesService::new(
            sales_repo.clone(),
            catalog_repo.clone(),
            accounting_repo.clone(),
        );
        let purchases_service = PurchasesService::new(purchases_repo, catalog_repo.clone());
        let leather_service = LeatherService::new(leather_repo, catalog_repo);
        let accounting_service = AccountingService::new(accounting_repo.clone(), sales_repo);
        let dashboard_service = DashboardService::new(dashboard_repo);
        let document_service = DocumentService::new(accounting_repo);

        Ok(Self {
            db_pool,
            auth_service,
            tenancy_service,
            catalog_service,
            sales_service,
            purchases_service,
            leather_service,
            accounting_service,
            dashboard_service,
            document_service,
        })
    }
}
