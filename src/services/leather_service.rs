// src/services/leather_service.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CatalogRepository, LeatherRepository},
    models::{
        leather::{
            LeatherPurchaseOrder, LeatherPurchaseOrderLine, LeatherSupplier, LeatherType,
        },
        purchases::PurchaseOrderStatus,
        tenancy::TenantScope,
    },
    services::receiving,
};

#[derive(Clone)]
pub struct LeatherService {
    leather_repo: LeatherRepository,
    catalog_repo: CatalogRepository,
}

impl LeatherService {
    pub fn new(leather_repo: LeatherRepository, catalog_repo: CatalogRepository) -> Self {
        Self {
            leather_repo,
            catalog_repo,
        }
    }

    // --- FORNECEDORES DE COURO ---

    pub async fn create_supplier<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        name: &str,
        email: Option<&str>,
        phone: Option<&str>,
        address: Option<&str>,
        contact_person: Option<&str>,
    ) -> Result<LeatherSupplier, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.leather_repo
            .create_supplier(executor, tenant_id, name, email, phone, address, contact_person)
            .await
    }

    pub async fn list_suppliers<'e, E>(
        &self,
        executor: E,
        scope: TenantScope,
    ) -> Result<Vec<LeatherSupplier>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.leather_repo.list_suppliers(executor, scope).await
    }

    // --- TIPOS DE COURO ---

    pub async fn create_leather_type<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<LeatherType, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.leather_repo
            .create_leather_type(executor, tenant_id, name, description)
            .await
    }

    pub async fn list_leather_types<'e, E>(
        &self,
        executor: E,
        scope: TenantScope,
    ) -> Result<Vec<LeatherType>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.leather_repo.list_leather_types(executor, scope).await
    }

    // --- PEDIDOS DE COURO CRU ---

    pub async fn create_order<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        supplier_id: Uuid,
        order_number: &str,
        date: NaiveDate,
        status: PurchaseOrderStatus,
    ) -> Result<LeatherPurchaseOrder, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        self.leather_repo
            .get_supplier(&mut *tx, TenantScope::Scoped(tenant_id), supplier_id)
            .await?
            .ok_or(AppError::NotFound("Fornecedor de couro"))?;

        let order = self
            .leather_repo
            .create_order(&mut *tx, tenant_id, supplier_id, order_number, date, status)
            .await?;

        tx.commit().await?;
        Ok(order)
    }

    pub async fn list_orders<'e, E>(
        &self,
        executor: E,
        scope: TenantScope,
    ) -> Result<Vec<LeatherPurchaseOrder>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.leather_repo.list_orders(executor, scope).await
    }

    pub async fn get_order<'e, E>(
        &self,
        executor: E,
        scope: TenantScope,
        order_id: Uuid,
    ) -> Result<LeatherPurchaseOrder, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.leather_repo
            .get_order(executor, scope, order_id)
            .await?
            .ok_or(AppError::NotFound("Pedido de couro"))
    }

    /// Couro cru não tem preço de tabela: o preço unitário é obrigatório.
    pub async fn add_line<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        order_id: Uuid,
        leather_type_id: Uuid,
        quantity: i32,
        unit_price: Decimal,
    ) -> Result<LeatherPurchaseOrderLine, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        self.leather_repo
            .get_leather_type(&mut *tx, TenantScope::Scoped(tenant_id), leather_type_id)
            .await?
            .ok_or(AppError::NotFound("Tipo de couro"))?;

        let line = self
            .leather_repo
            .add_line(&mut *tx, tenant_id, order_id, leather_type_id, quantity, unit_price)
            .await?
            .ok_or(AppError::NotFound("Pedido de couro"))?;

        tx.commit().await?;
        Ok(line)
    }

    pub async fn list_lines<'e, E>(
        &self,
        executor: E,
        scope: TenantScope,
        order_id: Uuid,
    ) -> Result<Vec<LeatherPurchaseOrderLine>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.leather_repo
            .list_lines(executor, scope.tenant_id(), order_id)
            .await
    }

    // --- RECEBIMENTO ---

    /// ORDERED -> RECEIVED, sem efeito no catálogo: as quantidades de couro
    /// cru vivem no próprio pedido.
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
            &self.leather_repo,
            tenant_id,
            order_id,
        )
        .await
    }
}
