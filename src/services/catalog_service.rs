// src/services/catalog_service.rs

use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CatalogRepository,
    models::{catalog::Product, tenancy::TenantScope},
};

#[derive(Clone)]
pub struct CatalogService {
    catalog_repo: CatalogRepository,
}

impl CatalogService {
    pub fn new(catalog_repo: CatalogRepository) -> Self {
        Self { catalog_repo }
    }

    pub async fn create_product<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        name: &str,
        sku: &str,
        description: Option<&str>,
        price: Decimal,
        cost_price: Decimal,
        stock_quantity: i32,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.catalog_repo
            .create_product(
                executor,
                tenant_id,
                name,
                sku,
                description,
                price,
                cost_price,
                stock_quantity,
            )
            .await
    }

    pub async fn list_products<'e, E>(
        &self,
        executor: E,
        scope: TenantScope,
    ) -> Result<Vec<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.catalog_repo.list_products(executor, scope).await
    }

    pub async fn get_product<'e, E>(
        &self,
        executor: E,
        scope: TenantScope,
        product_id: Uuid,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.catalog_repo
            .get_product(executor, scope, product_id)
            .await?
            .ok_or(AppError::NotFound("Produto"))
    }
}
