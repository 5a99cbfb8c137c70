// src/db/purchases_repo.rs

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgConnection, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::receivable::{ReceivableOrderHead, ReceivableOrders, StockLedgerEffect},
    models::{
        purchases::{
            PurchaseOrder, PurchaseOrderLine, PurchaseOrderStatus, StockIncrement, Vendor,
        },
        tenancy::TenantScope,
    },
};

#[derive(Clone)]
pub struct PurchasesRepository {
    pool: PgPool,
}

impl PurchasesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  FORNECEDORES
    // =========================================================================

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
        sqlx::query_as::<_, Vendor>(
            r#"
            INSERT INTO vendors (tenant_id, name, email, phone, address, contact_person)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(address)
        .bind(contact_person)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::UniqueViolation("Nome de fornecedor");
                }
            }
            e.into()
        })
    }

    pub async fn get_vendor<'e, E>(
        &self,
        executor: E,
        scope: TenantScope,
        vendor_id: Uuid,
    ) -> Result<Option<Vendor>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let vendor = sqlx::query_as::<_, Vendor>(
            r#"
            SELECT * FROM vendors
            WHERE id = $2 AND ($1::uuid IS NULL OR tenant_id = $1)
            "#,
        )
        .bind(scope.tenant_id())
        .bind(vendor_id)
        .fetch_optional(executor)
        .await?;
        Ok(vendor)
    }

    pub async fn list_vendors<'e, E>(
        &self,
        executor: E,
        scope: TenantScope,
    ) -> Result<Vec<Vendor>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let vendors = sqlx::query_as::<_, Vendor>(
            r#"
            SELECT * FROM vendors
            WHERE ($1::uuid IS NULL OR tenant_id = $1)
            ORDER BY name ASC
            "#,
        )
        .bind(scope.tenant_id())
        .fetch_all(executor)
        .await?;
        Ok(vendors)
    }

    // =========================================================================
    //  PEDIDOS DE COMPRA
    // =========================================================================

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
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, PurchaseOrder>(
            r#"
            INSERT INTO purchase_orders (tenant_id, vendor_id, order_number, date, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *, 0::NUMERIC(12,2) AS total_amount
            "#,
        )
        .bind(tenant_id)
        .bind(vendor_id)
        .bind(order_number)
        .bind(date)
        .bind(status)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::UniqueViolation("Número de pedido");
                }
            }
            e.into()
        })
    }

    pub async fn list_orders<'e, E>(
        &self,
        executor: E,
        scope: TenantScope,
    ) -> Result<Vec<PurchaseOrder>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let orders = sqlx::query_as::<_, PurchaseOrder>(
            r#"
            SELECT o.*,
                COALESCE((
                    SELECT SUM(l.quantity * l.unit_price)
                    FROM purchase_order_lines l
                    WHERE l.order_id = o.id
                ), 0) AS total_amount
            FROM purchase_orders o
            WHERE ($1::uuid IS NULL OR o.tenant_id = $1)
            ORDER BY o.date DESC, o.order_number DESC
            "#,
        )
        .bind(scope.tenant_id())
        .fetch_all(executor)
        .await?;
        Ok(orders)
    }

    pub async fn get_order<'e, E>(
        &self,
        executor: E,
        scope: TenantScope,
        order_id: Uuid,
    ) -> Result<Option<PurchaseOrder>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, PurchaseOrder>(
            r#"
            SELECT o.*,
                COALESCE((
                    SELECT SUM(l.quantity * l.unit_price)
                    FROM purchase_order_lines l
                    WHERE l.order_id = o.id
                ), 0) AS total_amount
            FROM purchase_orders o
            WHERE o.id = $2 AND ($1::uuid IS NULL OR o.tenant_id = $1)
            "#,
        )
        .bind(scope.tenant_id())
        .bind(order_id)
        .fetch_optional(executor)
        .await?;
        Ok(order)
    }

    pub async fn add_line<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        order_id: Uuid,
        product_id: Uuid,
        quantity: i32,
        unit_price: Decimal,
    ) -> Result<Option<PurchaseOrderLine>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let line = sqlx::query_as::<_, PurchaseOrderLine>(
            r#"
            INSERT INTO purchase_order_lines (order_id, product_id, quantity, unit_price)
            SELECT $2, $3, $4, $5
            WHERE EXISTS (
                SELECT 1 FROM purchase_orders WHERE id = $2 AND tenant_id = $1
            )
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(order_id)
        .bind(product_id)
        .bind(quantity)
        .bind(unit_price)
        .fetch_optional(executor)
        .await?;
        Ok(line)
    }

    pub async fn list_lines<'e, E>(
        &self,
        executor: E,
        tenant_id: Option<Uuid>,
        order_id: Uuid,
    ) -> Result<Vec<PurchaseOrderLine>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lines = sqlx::query_as::<_, PurchaseOrderLine>(
            r#"
            SELECT l.* FROM purchase_order_lines l
            JOIN purchase_orders o ON o.id = l.order_id
            WHERE l.order_id = $2 AND ($1::uuid IS NULL OR o.tenant_id = $1)
            ORDER BY l.created_at ASC
            "#,
        )
        .bind(tenant_id)
        .bind(order_id)
        .fetch_all(executor)
        .await?;
        Ok(lines)
    }
}

// O recebimento de produto acabado incrementa o catálogo compartilhado.
#[async_trait]
impl ReceivableOrders for PurchasesRepository {
    fn stock_effect(&self) -> StockLedgerEffect {
        StockLedgerEffect::CatalogIncrement
    }

    async fn find_for_receive(
        &self,
        conn: &mut PgConnection,
        tenant_id: Uuid,
        order_id: Uuid,
    ) -> Result<Option<ReceivableOrderHead>, AppError> {
        let head = sqlx::query_as::<_, ReceivableOrderHead>(
            r#"
            SELECT id, status FROM purchase_orders
            WHERE tenant_id = $1 AND id = $2
            FOR UPDATE
            "#,
        )
        .bind(tenant_id)
        .bind(order_id)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(head)
    }

    async fn stock_increments(
        &self,
        conn: &mut PgConnection,
        tenant_id: Uuid,
        order_id: Uuid,
    ) -> Result<Vec<StockIncrement>, AppError> {
        let increments = sqlx::query_as::<_, StockIncrement>(
            r#"
            SELECT l.product_id, l.quantity
            FROM purchase_order_lines l
            JOIN products p ON p.id = l.product_id
            WHERE l.order_id = $2 AND p.tenant_id = $1
            ORDER BY l.created_at ASC
            FOR UPDATE OF p
            "#,
        )
        .bind(tenant_id)
        .bind(order_id)
        .fetch_all(&mut *conn)
        .await?;
        Ok(increments)
    }

    async fn mark_received(
        &self,
        conn: &mut PgConnection,
        tenant_id: Uuid,
        order_id: Uuid,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE purchase_orders
            SET status = $3, updated_at = NOW()
            WHERE tenant_id = $1 AND id = $2
            "#,
        )
        .bind(tenant_id)
        .bind(order_id)
        .bind(PurchaseOrderStatus::Received)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }
}
