// src/handlers/leather.rs

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
    handlers::validate_not_negative,
    models::{purchases::PurchaseOrderStatus, tenancy::TenantScope},
};

// =============================================================================
//  FORNECEDORES DE COURO
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeatherSupplierPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub contact_person: Option<String>,
}

pub async fn create_supplier(
    State(app_state): State<AppState>,
    scope: TenantScope,
    Json(payload): Json<CreateLeatherSupplierPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let tenant_id = scope.require_tenant()?;

    let supplier = app_state
        .leather_service
        .create_supplier(
            &app_state.db_pool,
            tenant_id,
            &payload.name,
            payload.email.as_deref(),
            payload.phone.as_deref(),
            payload.address.as_deref(),
            payload.contact_person.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(supplier)))
}

pub async fn get_all_suppliers(
    State(app_state): State<AppState>,
    scope: TenantScope,
) -> Result<impl IntoResponse, AppError> {
    let suppliers = app_state
        .leather_service
        .list_suppliers(&app_state.db_pool, scope)
        .await?;

    Ok((StatusCode::OK, Json(suppliers)))
}

// =============================================================================
//  TIPOS DE COURO
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeatherTypePayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    pub description: Option<String>,
}

pub async fn create_leather_type(
    State(app_state): State<AppState>,
    scope: TenantScope,
    Json(payload): Json<CreateLeatherTypePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let tenant_id = scope.require_tenant()?;

    let leather_type = app_state
        .leather_service
        .create_leather_type(
            &app_state.db_pool,
            tenant_id,
            &payload.name,
            payload.description.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(leather_type)))
}

pub async fn get_all_leather_types(
    State(app_state): State<AppState>,
    scope: TenantScope,
) -> Result<impl IntoResponse, AppError> {
    let types = app_state
        .leather_service
        .list_leather_types(&app_state.db_pool, scope)
        .await?;

    Ok((StatusCode::OK, Json(types)))
}

// =============================================================================
//  PEDIDOS DE COURO CRU
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeatherOrderPayload {
    pub supplier_id: Uuid,

    #[validate(length(min = 1, message = "O número do pedido é obrigatório."))]
    pub order_number: String,

    pub date: NaiveDate,

    pub status: Option<PurchaseOrderStatus>,
}

pub async fn create_order(
    State(app_state): State<AppState>,
    scope: TenantScope,
    Json(payload): Json<CreateLeatherOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let tenant_id = scope.require_tenant()?;

    let order = app_state
        .leather_service
        .create_order(
            &app_state.db_pool,
            tenant_id,
            payload.supplier_id,
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
        .leather_service
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
        .leather_service
        .get_order(&app_state.db_pool, scope, order_id)
        .await?;

    Ok((StatusCode::OK, Json(order)))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddLeatherLinePayload {
    pub leather_type_id: Uuid,

    #[validate(range(min = 1, message = "A quantidade deve ser maior que zero."))]
    pub quantity: i32,

    // Couro cru não tem preço de tabela: o preço é obrigatório
    #[validate(custom(function = validate_not_negative))]
    pub unit_price: Decimal,
}

pub async fn add_line(
    State(app_state): State<AppState>,
    scope: TenantScope,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<AddLeatherLinePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let tenant_id = scope.require_tenant()?;

    let line = app_state
        .leather_service
        .add_line(
            &app_state.db_pool,
            tenant_id,
            order_id,
            payload.leather_type_id,
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
        .leather_service
        .list_lines(&app_state.db_pool, scope, order_id)
        .await?;

    Ok((StatusCode::OK, Json(lines)))
}

// =============================================================================
//  RECEBIMENTO
// =============================================================================

// POST /api/leather/orders/{id}/receive
pub async fn receive_order(
    State(app_state): State<AppState>,
    scope: TenantScope,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let tenant_id = scope.require_tenant()?;

    app_state
        .leather_service
        .receive_order(&app_state.db_pool, tenant_id, order_id)
        .await?;

    Ok((
        StatusCode::OK,
        Json(json!({ "status": "Pedido de couro recebido" })),
    ))
}
