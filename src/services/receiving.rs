// src/services/receiving.rs

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CatalogRepository, ReceivableOrders, StockLedgerEffect},
};

/// A transição ORDERED -> RECEIVED, única para as duas variantes de pedido
/// de compra. O efeito no estoque vem do repositório: produto acabado
/// incrementa o catálogo, couro cru só muda de status. Tudo em uma
/// transação; a falha de qualquer incremento desfaz a operação inteira.
///
/// Receber só adiciona estoque, então não há verificação de saldo aqui.
pub async fn receive_order<'e, E>(
    executor: E,
    catalog_repo: &CatalogRepository,
    orders: &dyn ReceivableOrders,
    tenant_id: Uuid,
    order_id: Uuid,
) -> Result<(), AppError>
where
    E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
{
    let mut tx = executor.begin().await?;

    // 1. Trava e valida o pedido
    let order = orders
        .find_for_receive(&mut tx, tenant_id, order_id)
        .await?
        .ok_or(AppError::NotFound("Pedido de compra"))?;

    if !order.status.can_receive() {
        return Err(AppError::InvalidState(
            "Apenas pedidos em ORDERED podem ser recebidos.".to_string(),
        ));
    }

    // 2. Entrada de estoque, quando a variante movimenta o catálogo
    if orders.stock_effect() == StockLedgerEffect::CatalogIncrement {
        let increments = orders.stock_increments(&mut tx, tenant_id, order_id).await?;
        for inc in increments {
            catalog_repo
                .adjust_stock(&mut *tx, tenant_id, inc.product_id, inc.quantity)
                .await?;
        }
    }

    // 3. Status
    orders.mark_received(&mut tx, tenant_id, order_id).await?;

    tx.commit().await?;
    Ok(())
}
