// src/handlers/dashboard.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::{common::error::AppError, config::AppState, models::tenancy::TenantScope};

// GET /api/dashboard/summary — agregados somente-leitura
pub async fn get_summary(
    State(app_state): State<AppState>,
    scope: TenantScope,
) -> Result<impl IntoResponse, AppError> {
    let summary = app_state
        .dashboard_service
        .get_summary(&app_state.db_pool, scope)
        .await?;

    Ok((StatusCode::OK, Json(summary)))
}
