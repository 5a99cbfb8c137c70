// src/models/sales.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// --- Clientes ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Pedido de Venda ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "sales_order_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SalesOrderStatus {
    Draft,
    Confirmed,
    Cancelled,
}

impl SalesOrderStatus {
    /// A única transição de saída do rascunho é a confirmação.
    pub fn can_confirm(&self) -> bool {
        matches!(self, SalesOrderStatus::Draft)
    }
}

// total_amount é derivado das linhas em TODA leitura (subquery no SELECT),
// nunca gravado na tabela.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SalesOrder {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub customer_id: Uuid,
    pub order_number: String,
    pub date: NaiveDate,
    pub status: SalesOrderStatus,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SalesOrderLine {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SalesOrderLine {
    pub fn total_price(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }
}

// Linha + dados do produto referenciado, como o confirm enxerga o pedido
// dentro da transação (produtos travados com FOR UPDATE).
#[derive(Debug, Clone, FromRow)]
pub struct LineWithProduct {
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub stock_quantity: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn total_da_linha_e_quantidade_vezes_preco() {
        let line = SalesOrderLine {
            id: Uuid::new_v4(),
            order_id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            quantity: 3,
            unit_price: dec!(25.50),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(line.total_price(), dec!(76.50));
    }

    #[test]
    fn somente_rascunho_pode_confirmar() {
        assert!(SalesOrderStatus::Draft.can_confirm());
        assert!(!SalesOrderStatus::Confirmed.can_confirm());
        assert!(!SalesOrderStatus::Cancelled.can_confirm());
    }
}
