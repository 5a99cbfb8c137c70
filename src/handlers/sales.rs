// src/handlers/sales.rs

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
    models::tenancy::TenantScope,
};

// =============================================================================
//  CLIENTES
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

pub async fn create_customer(
    State(app_state): State<AppState>,
    scope: TenantScope,
    Json(payload): Json<CreateCustomerPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let tenant_id = scope.require_tenant()?;

    let customer = app_state
        .sales_service
        .create_customer(
            &app_state.db_pool,
            tenant_id,
            &payload.name,
            payload.email.as_deref(),
            payload.phone.as_deref(),
            payload.address.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(customer)))
}

pub async fn get_all_customers(
    State(app_state): State<AppState>,
    scope: TenantScope,
) -> Result<impl IntoResponse, AppError> {
    let customers = app_state
        .sales_service
        .list_customers(&app_state.db_pool, scope)
        .await?;

    Ok((StatusCode::OK, Json(customers)))
}

// =============================================================================
//  PEDIDOS DE VENDA
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSalesOrderPayload {
    pub customer_id: Uuid,

    #[validate(length(min = 1, message = "O número do pedido é obrigatório."))]
    pub order_number: String,

    pub date: NaiveDate,
}

// Pedidos nascem em DRAFT; a única saída é a confirmação.
pub async fn create_order(
    State(app_state): State<AppState>,
    scope: TenantScope,
    Json(payload): Json<CreateSalesOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let tenant_id = scope.require_tenant()?;

    let order = app_state
        .sales_service
        .create_order(
            &app_state.db_pool,
            tenant_id,
            payload.customer_id,
            &payload.order_number,
            payload.date,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn get_all_orders(
    State(app_state): State<AppState>,
    scope: TenantScope,
) -> Result<impl IntoResponse, AppError> {
    let orders = app_state
        .sales_service
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
        .sales_service
        .get_order(&app_state.db_pool, scope, order_id)
        .await?;

    Ok((StatusCode::OK, Json(order)))
}

// =============================================================================
//  LINHAS
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddSalesLinePayload {
    pub product_id: Uuid,

    #[validate(range(min = 1, message = "A quantidade deve ser maior que zero."))]
    pub quantity: i32,

    // Sem preço explícito, a linha congela o preço de tabela do produto
    pub unit_price: Option<Decimal>,
}

pub async fn add_line(
    State(app_state): State<AppState>,
    scope: TenantScope,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<AddSalesLinePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let tenant_id = scope.require_tenant()?;

    let line = app_state
        .sales_service
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
        .sales_service
        .list_lines(&app_state.db_pool, scope, order_id)
        .await?;

    Ok((StatusCode::OK, Json(lines)))
}

// =============================================================================
//  CONFIRMAÇÃO
// =============================================================================

// POST /api/sales/orders/{id}/confirm
pub async fn confirm_order(
    State(app_state): State<AppState>,
    scope: TenantScope,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let tenant_id = scope.require_tenant()?;

    let confirmed = app_state
        .sales_service
        .confirm_order(&app_state.db_pool, tenant_id, order_id)
        .await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "status": "Pedido confirmado e fatura criada",
            "invoice_number": confirmed.invoice_number,
        })),
    ))
}
