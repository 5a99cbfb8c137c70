// src/middleware/tenancy.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    models::{auth::User, tenancy::TenantScope},
};

// O nome do nosso cabeçalho HTTP customizado
const TENANT_ID_HEADER: &str = "x-tenant-id";

/// Resolve o escopo de tenant UMA vez por requisição e injeta o
/// `TenantScope` nas extensions. Roda depois do auth_guard.
pub async fn tenant_guard(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<User>()
        .cloned()
        .ok_or(AppError::InvalidToken)?;

    // O cabeçalho é opcional: sem ele, o vínculo do usuário decide o escopo
    let requested_tenant = match request.headers().get(TENANT_ID_HEADER) {
        Some(value) => {
            let value_str = value.to_str().map_err(|_| {
                AppError::BadRequest("Cabeçalho x-tenant-id contém caracteres inválidos.".into())
            })?;
            let tenant_id = Uuid::parse_str(value_str).map_err(|_| {
                AppError::BadRequest("Cabeçalho x-tenant-id inválido (não é um UUID).".into())
            })?;
            Some(tenant_id)
        }
        None => None,
    };

    let scope = app_state
        .tenancy_service
        .resolve_scope(&user, requested_tenant)
        .await?;

    request.extensions_mut().insert(scope);
    Ok(next.run(request).await)
}

// Extrator do escopo resolvido, para uso direto nos handlers
impl<S> FromRequestParts<S> for TenantScope
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TenantScope>()
            .copied()
            .ok_or(AppError::Unscoped)
    }
}
