// src/db/catalog_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{catalog::Product, tenancy::TenantScope},
};

#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leitura
    // ---
    // O padrão `$1::uuid IS NULL OR tenant_id = $1` atende os dois escopos:
    // Scoped filtra pelo tenant, Elevated (bind NULL) enxerga tudo.

    pub async fn list_products<'e, E>(
        &self,
        executor: E,
        scope: TenantScope,
    ) -> Result<Vec<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT * FROM products
            WHERE ($1::uuid IS NULL OR tenant_id = $1)
            ORDER BY name ASC
            "#,
        )
        .bind(scope.tenant_id())
        .fetch_all(executor)
        .await?;
        Ok(products)
    }

    pub async fn get_product<'e, E>(
        &self,
        executor: E,
        scope: TenantScope,
        product_id: Uuid,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT * FROM products
            WHERE id = $2 AND ($1::uuid IS NULL OR tenant_id = $1)
            "#,
        )
        .bind(scope.tenant_id())
        .bind(product_id)
        .fetch_optional(executor)
        .await?;
        Ok(product)
    }

    // ---
    // Escrita
    // ---

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
        sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (tenant_id, name, sku, description, price, cost_price, stock_quantity)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(name)
        .bind(sku)
        .bind(description)
        .bind(price)
        .bind(cost_price)
        .bind(stock_quantity)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::UniqueViolation("SKU");
                }
            }
            e.into()
        })
    }

    /// Aplica um delta (positivo ou negativo) ao estoque de um produto.
    /// Só os serviços de ciclo de vida chamam isto, sempre dentro de uma
    /// transação que já travou a linha do produto.
    pub async fn adjust_stock<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        product_id: Uuid,
        delta: i32,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock_quantity = stock_quantity + $3, updated_at = NOW()
            WHERE tenant_id = $1 AND id = $2
            "#,
        )
        .bind(tenant_id)
        .bind(product_id)
        .bind(delta)
        .execute(executor)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Produto"));
        }
        Ok(())
    }
}
