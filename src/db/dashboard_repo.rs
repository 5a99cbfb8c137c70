// src/db/dashboard_repo.rs

use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::{
        dashboard::{
            DashboardSummary, FinancialMetrics, InventoryMetrics, LowStockItem,
            MonthlySalesPoint, OrderStatusCount, SalesOverview,
        },
        tenancy::TenantScope,
    },
};

// Abaixo disso o produto entra na lista de reposição do painel
const LOW_STOCK_THRESHOLD: i32 = 5;

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Todos os agregados do painel em uma transação só (snapshot
    /// consistente dos dados). Nenhuma mutação acontece aqui.
    pub async fn get_summary<'e, E>(
        &self,
        executor: E,
        scope: TenantScope,
    ) -> Result<DashboardSummary, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;
        let tenant_id = scope.tenant_id();

        // A. Receita faturada (faturas quitadas)
        let total_revenue_invoiced = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(total_amount), 0) FROM invoices
            WHERE status = 'PAID' AND ($1::uuid IS NULL OR tenant_id = $1)
            "#,
        )
        .bind(tenant_id)
        .fetch_one(&mut *tx)
        .await?;

        // B. Caixa coletado (soma direta do razão de pagamentos —
        //    faturas parciais entram pelo valor efetivamente pago)
        let cash_collected = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(amount), 0) FROM payments
            WHERE ($1::uuid IS NULL OR tenant_id = $1)
            "#,
        )
        .bind(tenant_id)
        .fetch_one(&mut *tx)
        .await?;

        // C. A receber (faturas em aberto)
        let pending_income = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(total_amount), 0) FROM invoices
            WHERE status IN ('SENT', 'PARTIALLY_PAID', 'OVERDUE')
              AND ($1::uuid IS NULL OR tenant_id = $1)
            "#,
        )
        .bind(tenant_id)
        .fetch_one(&mut *tx)
        .await?;

        // D. Inventário
        let total_sku_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM products WHERE ($1::uuid IS NULL OR tenant_id = $1)",
        )
        .bind(tenant_id)
        .fetch_one(&mut *tx)
        .await?;

        let low_stock_items = sqlx::query_as::<_, LowStockItem>(
            r#"
            SELECT name, stock_quantity FROM products
            WHERE stock_quantity < $2 AND ($1::uuid IS NULL OR tenant_id = $1)
            ORDER BY stock_quantity ASC, name ASC
            LIMIT 5
            "#,
        )
        .bind(tenant_id)
        .bind(LOW_STOCK_THRESHOLD)
        .fetch_all(&mut *tx)
        .await?;

        // E. Pedidos por status
        let orders_by_status = sqlx::query_as::<_, OrderStatusCount>(
            r#"
            SELECT status, COUNT(*) AS count FROM sales_orders
            WHERE ($1::uuid IS NULL OR tenant_id = $1)
            GROUP BY status
            ORDER BY status
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&mut *tx)
        .await?;

        // F. Tendência mensal de vendas (pedidos confirmados, total derivado
        //    das linhas)
        let monthly_sales_trend = sqlx::query_as::<_, MonthlySalesPoint>(
            r#"
            SELECT
                date_trunc('month', o.date)::date AS month,
                SUM(l.quantity * l.unit_price) AS total
            FROM sales_orders o
            JOIN sales_order_lines l ON l.order_id = o.id
            WHERE o.status = 'CONFIRMED' AND ($1::uuid IS NULL OR o.tenant_id = $1)
            GROUP BY 1
            ORDER BY 1 ASC
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(DashboardSummary {
            financials: FinancialMetrics {
                total_revenue_invoiced,
                cash_collected,
                pending_income,
            },
            inventory: InventoryMetrics {
                total_sku_count,
                low_stock_items,
            },
            sales_overview: SalesOverview {
                orders_by_status,
                monthly_sales_trend,
            },
        })
    }
}
