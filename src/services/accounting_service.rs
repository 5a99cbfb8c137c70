// src/services/accounting_service.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{AccountingRepository, SalesRepository},
    models::{
        accounting::{Invoice, InvoiceStatus, Payment, PaymentMethod},
        tenancy::TenantScope,
    },
};

// ---
// Regra de liquidação (pura, testável sem banco)
// ---

/// O status da fatura é uma função do acumulado pago contra o total:
/// quitou (ou passou) -> PAID; pagou algo -> PARTIALLY_PAID; nada -> SENT
/// (piso teórico: com pagamento > 0 esse ramo não ocorre na prática).
/// Pagamento acima do total é permitido e só trava o status em PAID.
fn settle_status(total_paid: Decimal, total_amount: Decimal) -> InvoiceStatus {
    if total_paid >= total_amount {
        InvoiceStatus::Paid
    } else if total_paid > Decimal::ZERO {
        InvoiceStatus::PartiallyPaid
    } else {
        InvoiceStatus::Sent
    }
}

#[derive(Clone)]
pub struct AccountingService {
    accounting_repo: AccountingRepository,
    sales_repo: SalesRepository,
}

impl AccountingService {
    pub fn new(accounting_repo: AccountingRepository, sales_repo: SalesRepository) -> Self {
        Self {
            accounting_repo,
            sales_repo,
        }
    }

    // --- FATURAS ---

    /// Fatura avulsa (sem pedido de venda de origem). O total informado é
    /// gravado como snapshot e não é recalculado depois.
    pub async fn create_invoice<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        customer_id: Uuid,
        invoice_number: &str,
        date: NaiveDate,
        due_date: NaiveDate,
        total_amount: Decimal,
    ) -> Result<Invoice, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        self.sales_repo
            .get_customer(&mut *tx, TenantScope::Scoped(tenant_id), customer_id)
            .await?
            .ok_or(AppError::NotFound("Cliente"))?;

        let invoice = self
            .accounting_repo
            .create_invoice(
                &mut *tx,
                tenant_id,
                customer_id,
                None,
                invoice_number,
                date,
                due_date,
                total_amount,
                InvoiceStatus::Draft,
            )
            .await?;

        tx.commit().await?;
        Ok(invoice)
    }

    pub async fn list_invoices<'e, E>(
        &self,
        executor: E,
        scope: TenantScope,
    ) -> Result<Vec<Invoice>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.accounting_repo.list_invoices(executor, scope).await
    }

    pub async fn get_invoice<'e, E>(
        &self,
        executor: E,
        scope: TenantScope,
        invoice_id: Uuid,
    ) -> Result<Invoice, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.accounting_repo
            .get_invoice(executor, scope, invoice_id)
            .await?
            .ok_or(AppError::NotFound("Fatura"))
    }

    // --- PAGAMENTOS ---

    /// Registra um pagamento e recalcula o status da fatura, tudo em uma
    /// transação (linha da fatura travada). O recálculo soma TODOS os
    /// pagamentos do razão, o recém-inserido incluso.
    ///
    /// Fatura cancelada não aceita pagamento: sem essa guarda, o recálculo
    /// reverteria silenciosamente o cancelamento.
    pub async fn record_payment<'e, E>(
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
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        if amount <= Decimal::ZERO {
            return Err(AppError::InvalidState(
                "O valor do pagamento deve ser maior que zero.".to_string(),
            ));
        }

        let mut tx = executor.begin().await?;

        // 1. Trava a fatura para o recálculo
        let invoice = self
            .accounting_repo
            .get_invoice_for_update(&mut *tx, tenant_id, invoice_id)
            .await?
            .ok_or(AppError::NotFound("Fatura"))?;

        if !invoice.status.accepts_payments() {
            return Err(AppError::InvalidState(
                "Faturas canceladas não aceitam pagamentos.".to_string(),
            ));
        }

        // 2. Anexa o pagamento ao razão
        let payment = self
            .accounting_repo
            .insert_payment(&mut *tx, tenant_id, invoice_id, amount, date, method, reference)
            .await?;

        // 3. Recalcula o acumulado e aplica a regra de liquidação
        let total_paid = self.accounting_repo.sum_payments(&mut *tx, invoice_id).await?;
        let new_status = settle_status(total_paid, invoice.total_amount);

        // 4. Persiste o novo status
        self.accounting_repo
            .set_invoice_status(&mut *tx, tenant_id, invoice_id, new_status)
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Pagamento de {} registrado na fatura {} (acumulado: {})",
            amount,
            invoice_id,
            total_paid
        );

        Ok(payment)
    }

    pub async fn list_payments<'e, E>(
        &self,
        executor: E,
        scope: TenantScope,
        invoice_id: Uuid,
    ) -> Result<Vec<Payment>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        // Confirma que a fatura está no escopo antes de listar o razão
        self.accounting_repo
            .get_invoice(&mut *tx, scope, invoice_id)
            .await?
            .ok_or(AppError::NotFound("Fatura"))?;

        let payments = self
            .accounting_repo
            .list_payments(&mut *tx, scope, invoice_id)
            .await?;

        tx.commit().await?;
        Ok(payments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn pagamento_integral_quita() {
        assert_eq!(settle_status(dec!(100.00), dec!(100.00)), InvoiceStatus::Paid);
    }

    #[test]
    fn sequencia_de_parciais_ate_quitar() {
        let total = dec!(100.00);
        // 40 + 40 = 80 < 100 -> parcial; + 20 = 100 -> quitada
        assert_eq!(settle_status(dec!(40.00), total), InvoiceStatus::PartiallyPaid);
        assert_eq!(settle_status(dec!(80.00), total), InvoiceStatus::PartiallyPaid);
        assert_eq!(settle_status(dec!(100.00), total), InvoiceStatus::Paid);
    }

    #[test]
    fn duas_metades_quitam() {
        let total = dec!(100.00);
        assert_eq!(settle_status(dec!(50.00), total), InvoiceStatus::PartiallyPaid);
        assert_eq!(settle_status(dec!(100.00), total), InvoiceStatus::Paid);
    }

    #[test]
    fn pagamento_parcial_unico() {
        // 30 de 100: parcial, restando 70 em aberto
        let total = dec!(100.00);
        assert_eq!(settle_status(dec!(30.00), total), InvoiceStatus::PartiallyPaid);
        assert_eq!(total - dec!(30.00), dec!(70.00));
    }

    #[test]
    fn pagamento_acima_do_total_trava_em_paid() {
        // 150 contra 100: PAID, saldo devedor negativo (-50), sem clamp
        let total = dec!(100.00);
        assert_eq!(settle_status(dec!(150.00), total), InvoiceStatus::Paid);
        assert_eq!(total - dec!(150.00), dec!(-50.00));
    }

    #[test]
    fn sem_pagamento_o_piso_e_sent() {
        assert_eq!(settle_status(Decimal::ZERO, dec!(100.00)), InvoiceStatus::Sent);
    }
}
