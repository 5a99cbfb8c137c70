// src/db/receivable.rs

use async_trait::async_trait;
use sqlx::{FromRow, PgConnection};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::purchases::{PurchaseOrderStatus, StockIncrement},
};

/// O que o recebimento faz com o estoque compartilhado.
/// Pedidos de produto acabado incrementam o catálogo; pedidos de couro cru
/// controlam quantidade no próprio pedido e não tocam o catálogo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockLedgerEffect {
    CatalogIncrement,
    OrderTracked,
}

// Projeção mínima para a transição de recebimento (linha travada FOR UPDATE)
#[derive(Debug, FromRow)]
pub struct ReceivableOrderHead {
    pub id: Uuid,
    pub status: PurchaseOrderStatus,
}

/// A abstração de "pedido recebível": uma única máquina de estados
/// ORDERED -> RECEIVED, parametrizada pelo efeito no estoque. As duas
/// variantes de pedido de compra implementam este seam.
#[async_trait]
pub trait ReceivableOrders: Send + Sync {
    fn stock_effect(&self) -> StockLedgerEffect;

    /// Busca o pedido no escopo do tenant, travando a linha para a transição.
    async fn find_for_receive(
        &self,
        conn: &mut PgConnection,
        tenant_id: Uuid,
        order_id: Uuid,
    ) -> Result<Option<ReceivableOrderHead>, AppError>;

    /// Incrementos que o recebimento aplica ao catálogo (vazio quando o
    /// efeito é OrderTracked). Produtos referenciados saem travados.
    async fn stock_increments(
        &self,
        conn: &mut PgConnection,
        tenant_id: Uuid,
        order_id: Uuid,
    ) -> Result<Vec<StockIncrement>, AppError>;

    async fn mark_received(
        &self,
        conn: &mut PgConnection,
        tenant_id: Uuid,
        order_id: Uuid,
    ) -> Result<(), AppError>;
}
