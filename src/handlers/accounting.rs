// src/handlers/accounting.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::{validate_not_negative, validate_positive},
    models::{accounting::PaymentMethod, tenancy::TenantScope},
};

// =============================================================================
//  FATURAS
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoicePayload {
    pub customer_id: Uuid,

    #[validate(length(min = 1, message = "O número da fatura é obrigatório."))]
    pub invoice_number: String,

    pub date: NaiveDate,
    pub due_date: NaiveDate,

    // Snapshot: gravado na criação, não recalculado depois
    #[validate(custom(function = validate_not_negative))]
    pub total_amount: Decimal,
}

// Fatura avulsa, sem pedido de venda de origem. Faturas de venda são
// criadas pela confirmação do pedido.
pub async fn create_invoice(
    State(app_state): State<AppState>,
    scope: TenantScope,
    Json(payload): Json<CreateInvoicePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let tenant_id = scope.require_tenant()?;

    let invoice = app_state
        .accounting_service
        .create_invoice(
            &app_state.db_pool,
            tenant_id,
            payload.customer_id,
            &payload.invoice_number,
            payload.date,
            payload.due_date,
            payload.total_amount,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(invoice)))
}

pub async fn get_all_invoices(
    State(app_state): State<AppState>,
    scope: TenantScope,
) -> Result<impl IntoResponse, AppError> {
    let invoices = app_state
        .accounting_service
        .list_invoices(&app_state.db_pool, scope)
        .await?;

    Ok((StatusCode::OK, Json(invoices)))
}

pub async fn get_invoice(
    State(app_state): State<AppState>,
    scope: TenantScope,
    Path(invoice_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let invoice = app_state
        .accounting_service
        .get_invoice(&app_state.db_pool, scope, invoice_id)
        .await?;

    Ok((StatusCode::OK, Json(invoice)))
}

// =============================================================================
//  PAGAMENTOS
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentPayload {
    pub invoice_id: Uuid,

    #[validate(custom(function = validate_positive))]
    pub amount: Decimal,

    pub date: NaiveDate,

    #[serde(default = "default_payment_method")]
    pub method: PaymentMethod,

    pub reference: Option<String>,
}

fn default_payment_method() -> PaymentMethod {
    PaymentMethod::Bank
}

// Criar o pagamento É a operação de liquidação: o status da fatura é
// recalculado na mesma transação.
pub async fn create_payment(
    State(app_state): State<AppState>,
    scope: TenantScope,
    Json(payload): Json<CreatePaymentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let tenant_id = scope.require_tenant()?;

    let payment = app_state
        .accounting_service
        .record_payment(
            &app_state.db_pool,
            tenant_id,
            payload.invoice_id,
            payload.amount,
            payload.date,
            payload.method,
            payload.reference.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(payment)))
}

pub async fn get_invoice_payments(
    State(app_state): State<AppState>,
    scope: TenantScope,
    Path(invoice_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let payments = app_state
        .accounting_service
        .list_payments(&app_state.db_pool, scope, invoice_id)
        .await?;

    Ok((StatusCode::OK, Json(payments)))
}
