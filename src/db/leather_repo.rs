// src/db/leather_repo.rs

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgConnection, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::receivable::{ReceivableOrderHead, ReceivableOrders, StockLedgerEffect},
    models::{
        leather::{
            LeatherPurchaseOrder, LeatherPurchaseOrderLine, LeatherSupplier, LeatherType,
        },
        purchases::{PurchaseOrderStatus, StockIncrement},
        tenancy::TenantScope,
    },
};

#[derive(Clone)]
pub struct LeatherRepository {
    pool: PgPool,
}

impl LeatherRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  FORNECEDORES DE COURO
    // =========================================================================

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
        sqlx::query_as::<_, LeatherSupplier>(
            r#"
            INSERT INTO leather_suppliers (tenant_id, name, email, phone, address, contact_person)
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
                    return AppError::UniqueViolation("Nome de fornecedor de couro");
                }
            }
            e.into()
        })
    }

    pub async fn get_supplier<'e, E>(
        &self,
        executor: E,
        scope: TenantScope,
        supplier_id: Uuid,
    ) -> Result<Option<LeatherSupplier>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let supplier = sqlx::query_as::<_, LeatherSupplier>(
            r#"
            SELECT * FROM leather_suppliers
            WHERE id = $2 AND ($1::uuid IS NULL OR tenant_id = $1)
            "#,
        )
        .bind(scope.tenant_id())
        .bind(supplier_id)
        .fetch_optional(executor)
        .await?;
        Ok(supplier)
    }

    pub async fn list_suppliers<'e, E>(
        &self,
        executor: E,
        scope: TenantScope,
    ) -> Result<Vec<LeatherSupplier>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let suppliers = sqlx::query_as::<_, LeatherSupplier>(
            r#"
            SELECT * FROM leather_suppliers
            WHERE ($1::uuid IS NULL OR tenant_id = $1)
            ORDER BY name ASC
            "#,
        )
        .bind(scope.tenant_id())
        .fetch_all(executor)
        .await?;
        Ok(suppliers)
    }

    // =========================================================================
    //  TIPOS DE COURO
    // =========================================================================

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
        sqlx::query_as::<_, LeatherType>(
            r#"
            INSERT INTO leather_types (tenant_id, name, description)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(name)
        .bind(description)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::UniqueViolation("Nome de tipo de couro");
                }
            }
            e.into()
        })
    }

    pub async fn get_leather_type<'e, E>(
        &self,
        executor: E,
        scope: TenantScope,
        leather_type_id: Uuid,
    ) -> Result<Option<LeatherType>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let leather_type = sqlx::query_as::<_, LeatherType>(
            r#"
            SELECT * FROM leather_types
            WHERE id = $2 AND ($1::uuid IS NULL OR tenant_id = $1)
            "#,
        )
        .bind(scope.tenant_id())
        .bind(leather_type_id)
        .fetch_optional(executor)
        .await?;
        Ok(leather_type)
    }

    pub async fn list_leather_types<'e, E>(
        &self,
        executor: E,
        scope: TenantScope,
    ) -> Result<Vec<LeatherType>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let types = sqlx::query_as::<_, LeatherType>(
            r#"
            SELECT * FROM leather_types
            WHERE ($1::uuid IS NULL OR tenant_id = $1)
            ORDER BY name ASC
            "#,
        )
        .bind(scope.tenant_id())
        .fetch_all(executor)
        .await?;
        Ok(types)
    }

    // =========================================================================
    //  PEDIDOS DE COURO CRU
    // =========================================================================

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
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, LeatherPurchaseOrder>(
            r#"
            INSERT INTO leather_purchase_orders (tenant_id, supplier_id, order_number, date, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *, 0::NUMERIC(12,2) AS total_amount
            "#,
        )
        .bind(tenant_id)
        .bind(supplier_id)
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
    ) -> Result<Vec<LeatherPurchaseOrder>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let orders = sqlx::query_as::<_, LeatherPurchaseOrder>(
            r#"
            SELECT o.*,
                COALESCE((
                    SELECT SUM(l.quantity * l.unit_price)
                    FROM leather_purchase_order_lines l
                    WHERE l.order_id = o.id
                ), 0) AS total_amount
            FROM leather_purchase_orders o
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
    ) -> Result<Option<LeatherPurchaseOrder>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, LeatherPurchaseOrder>(
            r#"
            SELECT o.*,
                COALESCE((
                    SELECT SUM(l.quantity * l.unit_price)
                    FROM leather_purchase_order_lines l
                    WHERE l.order_id = o.id
                ), 0) AS total_amount
            FROM leather_purchase_orders o
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
        leather_type_id: Uuid,
        quantity: i32,
        unit_price: Decimal,
    ) -> Result<Option<LeatherPurchaseOrderLine>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let line = sqlx::query_as::<_, LeatherPurchaseOrderLine>(
            r#"
            INSERT INTO leather_purchase_order_lines (order_id, leather_type_id, quantity, unit_price)
            SELECT $2, $3, $4, $5
            WHERE EXISTS (
                SELECT 1 FROM leather_purchase_orders WHERE id = $2 AND tenant_id = $1
            )
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(order_id)
        .bind(leather_type_id)
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
    ) -> Result<Vec<LeatherPurchaseOrderLine>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lines = sqlx::query_as::<_, LeatherPurchaseOrderLine>(
            r#"
            SELECT l.* FROM leather_purchase_order_lines l
            JOIN leather_purchase_orders o ON o.id = l.order_id
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

// Couro cru não movimenta o catálogo: o recebimento é só a transição de status.
#[async_trait]
impl ReceivableOrders for LeatherRepository {
    fn stock_effect(&self) -> StockLedgerEffect {
        StockLedgerEffect::OrderTracked
    }

    async fn find_for_receive(
        &self,
        conn: &mut PgConnection,
        tenant_id: Uuid,
        order_id: Uuid,
    ) -> Result<Option<ReceivableOrderHead>, AppError> {
        let head = sqlx::query_as::<_, ReceivableOrderHead>(
            r#"
            SELECT id, status FROM leather_purchase_orders
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
        _conn: &mut PgConnection,
        _tenant_id: Uuid,
        _order_id: Uuid,
    ) -> Result<Vec<StockIncrement>, AppError> {
        Ok(Vec::new())
    }

    async fn mark_received(
        &self,
        conn: &mut PgConnection,
        tenant_id: Uuid,
        order_id: Uuid,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE leather_purchase_orders
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
