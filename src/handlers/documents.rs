// src/handlers/documents.rs

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::{common::error::AppError, config::AppState, models::tenancy::TenantScope};

// GET /api/accounting/invoices/{id}/pdf
pub async fn generate_invoice_pdf(
    State(app_state): State<AppState>,
    scope: TenantScope,
    Path(invoice_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let pdf_bytes = app_state
        .document_service
        .generate_invoice_pdf(&app_state.db_pool, scope, invoice_id)
        .await?;

    // Configura os headers para o navegador baixar ou mostrar o PDF
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"fatura_{}.pdf\"", invoice_id),
        ),
    ];

    Ok((headers, pdf_bytes).into_response())
}
