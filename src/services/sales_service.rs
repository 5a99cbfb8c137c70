// src/services/sales_service.rs

use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{AccountingRepository, CatalogRepository, SalesRepository},
    models::{
        accounting::InvoiceStatus,
        sales::{Customer, LineWithProduct, SalesOrder, SalesOrderLine, SalesOrderStatus},
        tenancy::TenantScope,
    },
};

// Prazo padrão da fatura gerada na confirmação
const INVOICE_DUE_DAYS: i64 = 30;

/// Resultado da confirmação: o que o chamador precisa para seguir o fluxo.
#[derive(Debug)]
pub struct ConfirmedOrder {
    pub invoice_number: String,
}

// ---
// Funções de decisão puras (testáveis sem banco)
// ---

/// Primeira passada da confirmação: TODAS as linhas precisam de saldo antes
/// de qualquer baixa. A primeira linha sem saldo aborta a operação inteira,
/// nomeando o produto e as quantidades.
fn check_stock(lines: &[LineWithProduct]) -> Result<(), AppError> {
    for line in lines {
        if line.stock_quantity < line.quantity {
            return Err(AppError::InsufficientStock {
                product_name: line.product_name.clone(),
                requested: line.quantity,
                available: line.stock_quantity,
            });
        }
    }
    Ok(())
}

/// Total do pedido derivado das linhas: soma de quantidade x preço unitário.
fn order_total(lines: &[LineWithProduct]) -> Decimal {
    lines
        .iter()
        .map(|l| Decimal::from(l.quantity) * l.unit_price)
        .sum()
}

fn invoice_number_for(order_number: &str) -> String {
    format!("INV-{}", order_number)
}

#[derive(Clone)]
pub struct SalesService {
    sales_repo: SalesRepository,
    catalog_repo: CatalogRepository,
    accounting_repo: AccountingRepository,
}

impl SalesService {
    pub fn new(
        sales_repo: SalesRepository,
        catalog_repo: CatalogRepository,
        accounting_repo: AccountingRepository,
    ) -> Self {
        Self {
            sales_repo,
            catalog_repo,
            accounting_repo,
        }
    }

    // --- CLIENTES ---

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
        self.sales_repo
            .create_customer(executor, tenant_id, name, email, phone, address)
            .await
    }

    pub async fn list_customers<'e, E>(
        &self,
        executor: E,
        scope: TenantScope,
    ) -> Result<Vec<Customer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.sales_repo.list_customers(executor, scope).await
    }

    // --- PEDIDOS ---

    pub async fn create_order<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        customer_id: Uuid,
        order_number: &str,
        date: NaiveDate,
    ) -> Result<SalesOrder, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        // O cliente precisa existir no escopo do tenant: id de outro tenant
        // é indistinguível de inexistente.
        self.sales_repo
            .get_customer(&mut *tx, TenantScope::Scoped(tenant_id), customer_id)
            .await?
            .ok_or(AppError::NotFound("Cliente"))?;

        let order = self
            .sales_repo
            .create_order(&mut *tx, tenant_id, customer_id, order_number, date)
            .await?;

        tx.commit().await?;
        Ok(order)
    }

    pub async fn list_orders<'e, E>(
        &self,
        executor: E,
        scope: TenantScope,
    ) -> Result<Vec<SalesOrder>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.sales_repo.list_orders(executor, scope).await
    }

    pub async fn get_order<'e, E>(
        &self,
        executor: E,
        scope: TenantScope,
        order_id: Uuid,
    ) -> Result<SalesOrder, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.sales_repo
            .get_order(executor, scope, order_id)
            .await?
            .ok_or(AppError::NotFound("Pedido de venda"))
    }

    /// Adiciona uma linha ao pedido. Sem preço explícito, congela o preço
    /// de tabela atual do produto na linha (não é reajustado depois).
    pub async fn add_line<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        order_id: Uuid,
        product_id: Uuid,
        quantity: i32,
        unit_price: Option<Decimal>,
    ) -> Result<SalesOrderLine, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let product = self
            .catalog_repo
            .get_product(&mut *tx, TenantScope::Scoped(tenant_id), product_id)
            .await?
            .ok_or(AppError::NotFound("Produto"))?;

        let unit_price = unit_price.unwrap_or(product.price);

        let line = self
            .sales_repo
            .add_line(&mut *tx, tenant_id, order_id, product_id, quantity, unit_price)
            .await?
            .ok_or(AppError::NotFound("Pedido de venda"))?;

        tx.commit().await?;
        Ok(line)
    }

    pub async fn list_lines<'e, E>(
        &self,
        executor: E,
        scope: TenantScope,
        order_id: Uuid,
    ) -> Result<Vec<SalesOrderLine>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.sales_repo
            .list_lines(executor, scope.tenant_id(), order_id)
            .await
    }

    // --- CONFIRMAÇÃO ---
    //
    // A transição DRAFT -> CONFIRMED, em uma única transação:
    // baixa de estoque (verificação integral antes de qualquer mutação),
    // status do pedido e criação da fatura. Qualquer falha desfaz tudo.

    pub async fn confirm_order<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        order_id: Uuid,
    ) -> Result<ConfirmedOrder, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        // 1. Trava o pedido. Confirmações concorrentes serializam aqui.
        let order = self
            .sales_repo
            .get_order_for_update(&mut *tx, tenant_id, order_id)
            .await?
            .ok_or(AppError::NotFound("Pedido de venda"))?;

        if !order.status.can_confirm() {
            return Err(AppError::InvalidState(
                "Apenas pedidos em rascunho (DRAFT) podem ser confirmados.".to_string(),
            ));
        }

        // 2. Snapshot das linhas com os produtos travados (FOR UPDATE)
        let lines = self
            .sales_repo
            .lines_with_products_for_update(&mut *tx, tenant_id, order_id)
            .await?;

        // 3. Primeira passada: verifica TODAS as linhas antes de baixar qualquer uma
        check_stock(&lines)?;

        // 4. Segunda passada: baixa o estoque
        for line in &lines {
            self.catalog_repo
                .adjust_stock(&mut *tx, tenant_id, line.product_id, -line.quantity)
                .await?;
        }

        // 5. Atualiza o status do pedido
        self.sales_repo
            .set_order_status(&mut *tx, tenant_id, order_id, SalesOrderStatus::Confirmed)
            .await?;

        // 6. Cria a fatura com o total derivado das linhas NESTE instante
        //    (snapshot: o total da fatura não acompanha mudanças futuras)
        let today = Utc::now().date_naive();
        let invoice = self
            .accounting_repo
            .create_invoice(
                &mut *tx,
                tenant_id,
                order.customer_id,
                Some(order.id),
                &invoice_number_for(&order.order_number),
                today,
                today + Duration::days(INVOICE_DUE_DAYS),
                order_total(&lines),
                InvoiceStatus::Draft,
            )
            .await?;

        // Só aqui os efeitos ficam visíveis. Um retorno antecipado em
        // qualquer passo acima derruba a transação inteira no drop.
        tx.commit().await?;

        tracing::info!(
            "Pedido {} confirmado, fatura {} criada",
            order.order_number,
            invoice.invoice_number
        );

        Ok(ConfirmedOrder {
            invoice_number: invoice.invoice_number,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn line(name: &str, quantity: i32, unit_price: Decimal, stock: i32) -> LineWithProduct {
        LineWithProduct {
            product_id: Uuid::new_v4(),
            product_name: name.to_string(),
            quantity,
            unit_price,
            stock_quantity: stock,
        }
    }

    #[test]
    fn verificacao_passa_quando_todas_as_linhas_tem_saldo() {
        let lines = vec![
            line("Carteira", 2, dec!(80.00), 10),
            line("Cinto", 5, dec!(45.00), 5),
        ];
        assert!(check_stock(&lines).is_ok());
    }

    #[test]
    fn primeira_linha_sem_saldo_aborta_e_nomeia_o_produto() {
        // A 3a de 4 linhas falha: nada foi baixado (a verificação precede
        // qualquer mutação) e o erro nomeia exatamente essa linha.
        let lines = vec![
            line("Carteira", 2, dec!(80.00), 10),
            line("Cinto", 1, dec!(45.00), 1),
            line("Bolsa", 4, dec!(320.00), 3),
            line("Mochila", 1, dec!(550.00), 0),
        ];

        match check_stock(&lines) {
            Err(AppError::InsufficientStock {
                product_name,
                requested,
                available,
            }) => {
                assert_eq!(product_name, "Bolsa");
                assert_eq!(requested, 4);
                assert_eq!(available, 3);
            }
            other => panic!("esperava InsufficientStock, veio {:?}", other.err()),
        }
    }

    #[test]
    fn saldo_exato_e_suficiente() {
        let lines = vec![line("Carteira", 5, dec!(80.00), 5)];
        assert!(check_stock(&lines).is_ok());
    }

    #[test]
    fn total_do_pedido_soma_as_linhas() {
        let lines = vec![
            line("Carteira", 2, dec!(80.00), 10),
            line("Cinto", 3, dec!(45.50), 10),
        ];
        // 2*80.00 + 3*45.50 = 296.50
        assert_eq!(order_total(&lines), dec!(296.50));
    }

    #[test]
    fn pedido_sem_linhas_tem_total_zero() {
        assert_eq!(order_total(&[]), Decimal::ZERO);
    }

    #[test]
    fn numero_da_fatura_deriva_do_numero_do_pedido() {
        assert_eq!(invoice_number_for("SO-2024-001"), "INV-SO-2024-001");
    }
}
