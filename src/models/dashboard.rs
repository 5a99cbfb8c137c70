// src/models/dashboard.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use crate::models::sales::SalesOrderStatus;

// Agregados somente-leitura. Nenhuma mutação passa por aqui.

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub financials: FinancialMetrics,
    pub inventory: InventoryMetrics,
    pub sales_overview: SalesOverview,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialMetrics {
    pub total_revenue_invoiced: Decimal,
    pub cash_collected: Decimal,
    pub pending_income: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryMetrics {
    pub total_sku_count: i64,
    pub low_stock_items: Vec<LowStockItem>,
}

#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LowStockItem {
    pub name: String,
    pub stock_quantity: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesOverview {
    pub orders_by_status: Vec<OrderStatusCount>,
    pub monthly_sales_trend: Vec<MonthlySalesPoint>,
}

#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusCount {
    pub status: SalesOrderStatus,
    pub count: i64,
}

#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySalesPoint {
    pub month: NaiveDate,
    pub total: Decimal,
}
