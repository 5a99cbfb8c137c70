// src/models/accounting.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// --- Enums (mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "invoice_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    PartiallyPaid,
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    /// Faturas canceladas não aceitam pagamento; todos os demais estados
    /// são recalculados pela regra de liquidação a cada pagamento.
    pub fn accepts_payments(&self) -> bool {
        !matches!(self, InvoiceStatus::Cancelled)
    }

    pub fn label(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "Rascunho",
            InvoiceStatus::Sent => "Enviada",
            InvoiceStatus::Paid => "Quitada",
            InvoiceStatus::PartiallyPaid => "Parcialmente paga",
            InvoiceStatus::Overdue => "Vencida",
            InvoiceStatus::Cancelled => "Cancelada",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_method", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Bank,
    CreditCard,
    Other,
}

impl PaymentMethod {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Dinheiro",
            PaymentMethod::Bank => "Transferência",
            PaymentMethod::CreditCard => "Cartão de crédito",
            PaymentMethod::Other => "Outro",
        }
    }
}

// --- Structs ---

// total_amount é um snapshot gravado na criação da fatura.
// amount_paid/amount_due são derivados do razão de pagamentos em TODA
// leitura (subquery no SELECT), nunca cacheados.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub customer_id: Uuid,
    pub sales_order_id: Option<Uuid>,
    pub invoice_number: String,
    pub date: NaiveDate,
    pub due_date: NaiveDate,
    pub total_amount: Decimal,
    pub status: InvoiceStatus,
    pub amount_paid: Decimal,
    pub amount_due: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Pagamentos são imutáveis depois de criados: apenas anexados ao razão.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub invoice_id: Uuid,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub method: PaymentMethod,
    pub reference: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancelada_nao_aceita_pagamento() {
        assert!(!InvoiceStatus::Cancelled.accepts_payments());
        assert!(InvoiceStatus::Draft.accepts_payments());
        assert!(InvoiceStatus::Sent.accepts_payments());
        assert!(InvoiceStatus::PartiallyPaid.accepts_payments());
        assert!(InvoiceStatus::Overdue.accepts_payments());
        assert!(InvoiceStatus::Paid.accepts_payments());
    }
}
