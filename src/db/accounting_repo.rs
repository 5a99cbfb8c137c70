// src/db/accounting_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, FromRow, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        accounting::{Invoice, InvoiceStatus, Payment, PaymentMethod},
        tenancy::TenantScope,
    },
};

// Projeção mínima da fatura para a transação de pagamento (FOR UPDATE).
#[derive(Debug, FromRow)]
pub struct InvoiceForUpdate {
    pub id: Uuid,
    pub total_amount: Decimal,
    pub status: InvoiceStatus,
}

#[derive(Clone)]
pub struct AccountingRepository {
    pool: PgPool,
}

impl AccountingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  FATURAS
    // =========================================================================
    // amount_paid/amount_due saem derivados do razão de pagamentos em toda
    // leitura. total_amount é o snapshot gravado na criação.

    pub async fn create_invoice<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        customer_id: Uuid,
        sales_order_id: Option<Uuid>,
        invoice_number: &str,
        date: NaiveDate,
        due_date: NaiveDate,
        total_amount: Decimal,
        status: InvoiceStatus,
    ) -> Result<Invoice, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // Fatura recém-criada não tem pagamentos: pago = 0, devido = total.
        sqlx::query_as::<_, Invoice>(
            r#"
            INSERT INTO invoices (
                tenant_id, customer_id, sales_order_id, invoice_number,
                date, due_date, total_amount, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *, 0::NUMERIC(12,2) AS amount_paid, total_amount AS amount_due
            "#,
        )
        .bind(tenant_id)
        .bind(customer_id)
        .bind(sales_order_id)
        .bind(invoice_number)
        .bind(date)
        .bind(due_date)
        .bind(total_amount)
        .bind(status)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::UniqueViolation("Número de fatura");
                }
            }
            e.into()
        })
    }

    pub async fn list_invoices<'e, E>(
        &self,
        executor: E,
        scope: TenantScope,
    ) -> Result<Vec<Invoice>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let invoices = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT i.*,
                COALESCE((
                    SELECT SUM(p.amount) FROM payments p WHERE p.invoice_id = i.id
                ), 0) AS amount_paid,
                i.total_amount - COALESCE((
                    SELECT SUM(p.amount) FROM payments p WHERE p.invoice_id = i.id
                ), 0) AS amount_due
            FROM invoices i
            WHERE ($1::uuid IS NULL OR i.tenant_id = $1)
            ORDER BY i.date DESC, i.invoice_number DESC
            "#,
        )
        .bind(scope.tenant_id())
        .fetch_all(executor)
        .await?;
        Ok(invoices)
    }

    pub async fn get_invoice<'e, E>(
        &self,
        executor: E,
        scope: TenantScope,
        invoice_id: Uuid,
    ) -> Result<Option<Invoice>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT i.*,
                COALESCE((
                    SELECT SUM(p.amount) FROM payments p WHERE p.invoice_id = i.id
                ), 0) AS amount_paid,
                i.total_amount - COALESCE((
                    SELECT SUM(p.amount) FROM payments p WHERE p.invoice_id = i.id
                ), 0) AS amount_due
            FROM invoices i
            WHERE i.id = $2 AND ($1::uuid IS NULL OR i.tenant_id = $1)
            "#,
        )
        .bind(scope.tenant_id())
        .bind(invoice_id)
        .fetch_optional(executor)
        .await?;
        Ok(invoice)
    }

    /// Trava a linha da fatura para o recálculo de status do pagamento.
    pub async fn get_invoice_for_update<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        invoice_id: Uuid,
    ) -> Result<Option<InvoiceForUpdate>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let invoice = sqlx::query_as::<_, InvoiceForUpdate>(
            r#"
            SELECT id, total_amount, status
            FROM invoices
            WHERE tenant_id = $1 AND id = $2
            FOR UPDATE
            "#,
        )
        .bind(tenant_id)
        .bind(invoice_id)
        .fetch_optional(executor)
        .await?;
        Ok(invoice)
    }

    pub async fn set_invoice_status<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        invoice_id: Uuid,
        status: InvoiceStatus,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE invoices
            SET status = $3, updated_at = NOW()
            WHERE tenant_id = $1 AND id = $2
            "#,
        )
        .bind(tenant_id)
        .bind(invoice_id)
        .bind(status)
        .execute(executor)
        .await?;
        Ok(())
    }

    // =========================================================================
    //  PAGAMENTOS (razão, apenas-anexar)
    // =========================================================================

    pub async fn insert_payment<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        invoice_id: Uuid,
        amount: Decimal,
        date: NaiveDate,
        method: PaymentMethod,
        reference: Option<&str>,
    ) -> Result<Payment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (tenant_id, invoice_id, amount, date, method, reference)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(invoice_id)
        .bind(amount)
        .bind(date)
        .bind(method)
        .bind(reference)
        .fetch_one(executor)
        .await?;
        Ok(payment)
    }

    /// Soma de TODOS os pagamentos já vinculados à fatura (o recém-inserido
    /// incluso). É a entrada da regra de liquidação.
    pub async fn sum_payments<'e, E>(
        &self,
        executor: E,
        invoice_id: Uuid,
    ) -> Result<Decimal, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total = sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(amount), 0) FROM payments WHERE invoice_id = $1",
        )
        .bind(invoice_id)
        .fetch_one(executor)
        .await?;
        Ok(total)
    }

    pub async fn list_payments<'e, E>(
        &self,
        executor: E,
        scope: TenantScope,
        invoice_id: Uuid,
    ) -> Result<Vec<Payment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT * FROM payments
            WHERE invoice_id = $2 AND ($1::uuid IS NULL OR tenant_id = $1)
            ORDER BY date ASC, created_at ASC
            "#,
        )
        .bind(scope.tenant_id())
        .bind(invoice_id)
        .fetch_all(executor)
        .await?;
        Ok(payments)
    }
}
