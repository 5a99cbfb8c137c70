// src/handlers/catalog.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::validate_not_negative,
    models::tenancy::TenantScope,
};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    #[validate(length(min = 1, message = "O SKU é obrigatório."))]
    pub sku: String,

    pub description: Option<String>,

    #[validate(custom(function = validate_not_negative))]
    #[serde(default)]
    pub price: Decimal,

    #[validate(custom(function = validate_not_negative))]
    #[serde(default)]
    pub cost_price: Decimal,

    #[validate(range(min = 0, message = "O estoque inicial não pode ser negativo."))]
    #[serde(default)]
    pub stock_quantity: i32,
}

pub async fn create_product(
    State(app_state): State<AppState>,
    scope: TenantScope,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let tenant_id = scope.require_tenant()?;

    let product = app_state
        .catalog_service
        .create_product(
            &app_state.db_pool,
            tenant_id,
            &payload.name,
            &payload.sku,
            payload.description.as_deref(),
            payload.price,
            payload.cost_price,
            payload.stock_quantity,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn get_all_products(
    State(app_state): State<AppState>,
    scope: TenantScope,
) -> Result<impl IntoResponse, AppError> {
    let products = app_state
        .catalog_service
        .list_products(&app_state.db_pool, scope)
        .await?;

    Ok((StatusCode::OK, Json(products)))
}

pub async fn get_product(
    State(app_state): State<AppState>,
    scope: TenantScope,
    Path(product_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let product = app_state
        .catalog_service
        .get_product(&app_state.db_pool, scope, product_id)
        .await?;

    Ok((StatusCode::OK, Json(product)))
}
