// src/services/purchases_service.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CatalogRepository, PurchasesRepository},
    models::{
        purchases::{PurchaseOrder, PurchaseOrderLine, PurchaseOrderStatus, Vendor},
        tenancy::TenantScope,
    },
    services::receiving,
};

#[derive(Clone)]
pub struct PurchasesService {
    purchases_repo: PurchasesRepository,
    catalog_repo: CatalogRepository,
}

impl PurchasesService {
    pub fn new(purchases_repo: PurchasesRepository, catalog_repo: CatalogRepository) -> Self {
        Self {
            purchases_repo,
            catalog_repo,
        }
    }

    // --- FORNECEDORES ---

    pub async fn create_vendor<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        name: &str,
        email: Option<&str>,
        phone: Option<&str>,
        address: Option<&str>,
        contact_person: Option<&str>,
    ) -> Result<Vendor, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.purchases_repo
            .create_vendor(executor, tenant_id, name, email, phone, address, contact_person)
            .await
    }

    pub async fn list_vendors<'e, E>(
        &self,
        executor: E,
        scope: TenantScope,
    ) -> Result<Vec<Vendor>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.purchases_repo.list_vendors(executor, scope).await
    }

    // --- PEDIDOS ---

    pub async fn create_order<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        vendor_id: Uuid,
        order_number: &str,
        date: NaiveDate,
        status: PurchaseOrderStatus,
    ) -> Result<PurchaseOrder, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        self.purchases_repo
            .get_vendor(&mut *tx, TenantScope::Scoped(tenant_id), vendor_id)
            .await?
            .ok_or(AppError::NotFound("Fornecedor"))?;

        let order = self
            .purchases_repo
            .create_order(&mut *tx, tenant_id, vendor_id, order_number, date, status)
            .await?;

        tx.commit().await?;
        Ok(order)
    }

    pub async fn list_orders<'e, E>(
        &self,
        executor: E,
        scope: TenantScope,
    ) -> Result<Vec<PurchaseOrder>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.purchases_repo.list_orders(executor, scope).await
    }

    pub async fn get_order<'e, E>(
        &self,
        executor: E,
        scope: TenantScope,
        order_id: Uuid,
    ) -> Result<PurchaseOrder, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.purchases_repo
            .get_order(executor, scope, order_id)
            .await?
            .ok_or(AppError::NotFound("Pedido de compra"))
    }

    /// Sem preço explícito, a linha congela o preço de custo atual do produto.
    pub async fn add_line<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        order_id: Uuid,
        product_id: Uuid,
        quantity: i32,
        unit_price: Option<Decimal>,
    ) -> Result<PurchaseOrderLine, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let product = self
            .catalog_repo
            .get_product(&mut *tx, TenantScope::Scoped(tenant_id), product_id)
            .await?
            .ok_or(AppError::NotFound("Produto"))?;

        let unit_price = unit_price.unwrap_or(product.cost_price);

        let line = self
            .purchases_repo
            .add_line(&mut *tx, tenant_id, order_id, product_id, quantity, unit_price)
            .await?
            .ok_or(AppError::NotFound("Pedido de compra"))?;

        tx.commit().await?;
        Ok(line)
    }

    pub async fn list_lines<'e, E>(
        &self,
        executor: E,
        scope: TenantScope,
        order_id: Uuid,
    ) -> Result<Vec<PurchaseOrderLine>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.purchases_repo
            .list_lines(executor, scope.tenant_id(), order_id)
            .await
    }

    // --- RECEBIMENTO ---

    /// ORDERED -> RECEIVED com entrada de estoque no catálogo.
    pub async fn receive_order<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        order_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        receiving::receive_order(
            executor,
            &self.catalog_repo,
            &self.purchases_repo,
            tenant_id,
            order_id,
        )
        .await
    }
}
