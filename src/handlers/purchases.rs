// src/handlers/purchases.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::{purchases::PurchaseOrderStatus, tenancy::TenantScope},
};

// =============================================================================
//  FORNECEDORES
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVendorPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub contact_person: Option<String>,
}

pub async fn create_vendor(
    State(app_state): State<AppState>,
    scope: TenantScope,
    Json(payload): Json<CreateVendorPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let tenant_id = scope.require_tenant()?;

    let vendor = app_state
        .purchases_service
        .create_vendor(
            &app_state.db_pool,
            tenant_id,
            &payload.name,
            payload.email.as_deref(),
            payload.phone.as_deref(),
            payload.address.as_deref(),
            payload.contact_person.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(vendor)))
}

pub async fn get_all_vendors(
    State(app_state): State<AppState>,
    scope: TenantScope,
) -> Result<impl IntoResponse, AppError> {
    let vendors = app_state
        .purchases_service
        .list_vendors(&app_state.db_pool, scope)
        .await?;

    Ok((StatusCode::OK, Json(vendors)))
}

// =============================================================================
//  PEDIDOS DE COMPRA
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePurchaseOrderPayload {
    pub vendor_id: Uuid,

    #[validate(length(min = 1, message = "O número do pedido é obrigatório."))]
    pub order_number: String,

    pub date: NaiveDate,

    // DRAFT por padrão; criar já em ORDERED é permitido
    pub status: Option<PurchaseOrderStatus>,
}

pub async fn create_order(
    State(app_state): State<AppState>,
    scope: TenantScope,
    Json(payload): Json<CreatePurchaseOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let tenant_id = scope.require_tenant()?;

    let order = app_state
        .purchases_service
        .create_order(
            &app_state.db_pool,
            tenant_id,
            payload.vendor_id,
            &payload.order_number,
            payload.date,
            payload.status.unwrap_or(PurchaseOrderStatus::Draft),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn get_all_orders(
    State(app_state): State<AppState>,
    scope: TenantScope,
) -> Result<impl IntoResponse, AppError> {
    let orders = app_state
        .purchases_service
        .list_orders(&app_state.db_pool, scope)
        .await?;

    Ok((StatusCode::OK, Json(orders)))
}

pub async fn get_order(
    State(app_state): State<AppState>,
    scope: TenantScope,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let order = app_state
        .purchases_service
        .get_order(&app_state.db_pool, scope, order_id)
        .await?;

    Ok((StatusCode::OK, Json(order)))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddPurchaseLinePayload {
    pub product_id: Uuid,

    #[validate(range(min = 1, message = "A quantidade deve ser maior que zero."))]
    pub quantity: i32,

    // Sem preço explícito, a linha congela o preço de custo do produto
    pub unit_price: Option<Decimal>,
}

pub async fn add_line(
    State(app_state): State<AppState>,
    scope: TenantScope,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<AddPurchaseLinePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let tenant_id = scope.require_tenant()?;

    let line = app_state
        .purchases_service
        .add_line(
            &app_state.db_pool,
            tenant_id,
            order_id,
            payload.product_id,
            payload.quantity,
            payload.unit_price,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(line)))
}

pub async fn get_lines(
    State(app_state): State<AppState>,
    scope: TenantScope,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let lines = app_state
        .purchases_service
        .list_lines(&app_state.db_pool, scope, order_id)
        .await?;

    Ok((StatusCode::OK, Json(lines)))
}

// =============================================================================
//  RECEBIMENTO
// =============================================================================

// POST /api/purchases/orders/{id}/receive
pub async fn receive_order(
    State(app_state): State<AppState>,
    scope: TenantScope,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let tenant_id = scope.require_tenant()?;

    app_state
        .purchases_service
        .receive_order(&app_state.db_pool, tenant_id, order_id)
        .await?;

    Ok((
        StatusCode::OK,
        Json(json!({ "status": "Estoque recebido e inventário atualizado" })),
    ))
}
