// src/db/sales_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, FromRow, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        sales::{Customer, LineWithProduct, SalesOrder, SalesOrderLine, SalesOrderStatus},
        tenancy::TenantScope,
    },
};

// Projeção mínima do pedido para a transação de confirmação.
// Sem a subquery de total: FOR UPDATE não convive com agregados.
#[derive(Debug, FromRow)]
pub struct SalesOrderForUpdate {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub order_number: String,
    pub status: SalesOrderStatus,
}

#[derive(Clone)]
pub struct SalesRepository {
    pool: PgPool,
}

impl SalesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  CLIENTES
    // =========================================================================

    pub async fn create_customer<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        name: &str,
        email: Option<&str>,
        phone: Option<&str>,
        address: Option<&str>,
    ) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (tenant_id, name, email, phone, address)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(address)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::UniqueViolation("Nome de cliente");
                }
            }
            e.into()
        })
    }

    pub async fn get_customer<'e, E>(
        &self,
        executor: E,
        scope: TenantScope,
        customer_id: Uuid,
    ) -> Result<Option<Customer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT * FROM customers
            WHERE id = $2 AND ($1::uuid IS NULL OR tenant_id = $1)
            "#,
        )
        .bind(scope.tenant_id())
        .bind(customer_id)
        .fetch_optional(executor)
        .await?;
        Ok(customer)
    }

    pub async fn list_customers<'e, E>(
        &self,
        executor: E,
        scope: TenantScope,
    ) -> Result<Vec<Customer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT * FROM customers
            WHERE ($1::uuid IS NULL OR tenant_id = $1)
            ORDER BY name ASC
            "#,
        )
        .bind(scope.tenant_id())
        .fetch_all(executor)
        .await?;
        Ok(customers)
    }

    // =========================================================================
    //  PEDIDOS DE VENDA
    // =========================================================================
    // total_amount é sempre a subquery sobre as linhas. Nunca gravamos o
    // total na tabela: linhas adicionadas depois mudam o total na hora.

    pub async fn create_order<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        customer_id: Uuid,
        order_number: &str,
        date: NaiveDate,
    ) -> Result<SalesOrder, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // Pedido recém-criado não tem linhas, o total é zero por definição.
        sqlx::query_as::<_, SalesOrder>(
            r#"
            INSERT INTO sales_orders (tenant_id, customer_id, order_number, date)
            VALUES ($1, $2, $3, $4)
            RETURNING *, 0::NUMERIC(12,2) AS total_amount
            "#,
        )
        .bind(tenant_id)
        .bind(customer_id)
        .bind(order_number)
        .bind(date)
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
    ) -> Result<Vec<SalesOrder>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let orders = sqlx::query_as::<_, SalesOrder>(
            r#"
            SELECT o.*,
                COALESCE((
                    SELECT SUM(l.quantity * l.unit_price)
                    FROM sales_order_lines l
                    WHERE l.order_id = o.id
                ), 0) AS total_amount
            FROM sales_orders o
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
    ) -> Result<Option<SalesOrder>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, SalesOrder>(
            r#"
            SELECT o.*,
                COALESCE((
                    SELECT SUM(l.quantity * l.unit_price)
                    FROM sales_order_lines l
                    WHERE l.order_id = o.id
                ), 0) AS total_amount
            FROM sales_orders o
            WHERE o.id = $2 AND ($1::uuid IS NULL OR o.tenant_id = $1)
            "#,
        )
        .bind(scope.tenant_id())
        .bind(order_id)
        .fetch_optional(executor)
        .await?;
        Ok(order)
    }

    /// Trava a linha do pedido para a transição de confirmação. Duas
    /// confirmações concorrentes serializam aqui: a perdedora relê o
    /// status já CONFIRMED e falha.
    pub async fn get_order_for_update<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        order_id: Uuid,
    ) -> Result<Option<SalesOrderForUpdate>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, SalesOrderForUpdate>(
            r#"
            SELECT id, customer_id, order_number, status
            FROM sales_orders
            WHERE tenant_id = $1 AND id = $2
            FOR UPDATE
            "#,
        )
        .bind(tenant_id)
        .bind(order_id)
        .fetch_optional(executor)
        .await?;
        Ok(order)
    }

    pub async fn set_order_status<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        order_id: Uuid,
        status: SalesOrderStatus,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE sales_orders
            SET status = $3, updated_at = NOW()
            WHERE tenant_id = $1 AND id = $2
            "#,
        )
        .bind(tenant_id)
        .bind(order_id)
        .bind(status)
        .execute(executor)
        .await?;
        Ok(())
    }

    // =========================================================================
    //  LINHAS
    // =========================================================================

    /// O EXISTS garante que a linha só entra se o pedido pertence ao tenant
    /// do chamador. Sem linha retornada = pedido inexistente ou de outro tenant.
    pub async fn add_line<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        order_id: Uuid,
        product_id: Uuid,
        quantity: i32,
        unit_price: Decimal,
    ) -> Result<Option<SalesOrderLine>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let line = sqlx::query_as::<_, SalesOrderLine>(
            r#"
            INSERT INTO sales_order_lines (order_id, product_id, quantity, unit_price)
            SELECT $2, $3, $4, $5
            WHERE EXISTS (
                SELECT 1 FROM sales_orders WHERE id = $2 AND tenant_id = $1
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
    ) -> Result<Vec<SalesOrderLine>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lines = sqlx::query_as::<_, SalesOrderLine>(
            r#"
            SELECT l.* FROM sales_order_lines l
            JOIN sales_orders o ON o.id = l.order_id
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

    /// Linhas + produtos referenciados, com as linhas de produto travadas
    /// (FOR UPDATE OF p). É o snapshot consistente que a verificação em
    /// duas passadas do confirm exige.
    pub async fn lines_with_products_for_update<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        order_id: Uuid,
    ) -> Result<Vec<LineWithProduct>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lines = sqlx::query_as::<_, LineWithProduct>(
            r#"
            SELECT
                l.product_id,
                p.name AS product_name,
                l.quantity,
                l.unit_price,
                p.stock_quantity
            FROM sales_order_lines l
            JOIN products p ON p.id = l.product_id
            WHERE l.order_id = $2 AND p.tenant_id = $1
            ORDER BY l.created_at ASC
            FOR UPDATE OF p
            "#,
        )
        .bind(tenant_id)
        .bind(order_id)
        .fetch_all(executor)
        .await?;
        Ok(lines)
    }
}
