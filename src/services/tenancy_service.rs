// src/services/tenancy_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::TenantRepository,
    models::{
        auth::User,
        tenancy::{Tenant, TenantScope},
    },
};

#[derive(Clone)]
pub struct TenancyService {
    repo: TenantRepository,
    pool: PgPool,
}

impl TenancyService {
    pub fn new(repo: TenantRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    /// Decide o escopo da requisição UMA vez, na borda (tenant_guard).
    /// Dali em diante o escopo viaja como parâmetro explícito — nunca
    /// como estado ambiente.
    pub async fn resolve_scope(
        &self,
        user: &User,
        requested_tenant: Option<Uuid>,
    ) -> Result<TenantScope, AppError> {
        let membership = self.repo.find_membership(user.id).await?;

        match requested_tenant {
            // Cabeçalho presente: admin entra em qualquer tenant; usuário
            // comum só no próprio.
            Some(tenant_id) => {
                if user.is_admin {
                    return Ok(TenantScope::Scoped(tenant_id));
                }
                match membership {
                    Some(m) if m.tenant_id == tenant_id => Ok(TenantScope::Scoped(tenant_id)),
                    _ => Err(AppError::Unscoped),
                }
            }
            // Sem cabeçalho: o vínculo do usuário decide; admin sem vínculo
            // fica com a visão elevada (todos os tenants).
            None => match membership {
                Some(m) => Ok(TenantScope::Scoped(m.tenant_id)),
                None if user.is_admin => Ok(TenantScope::Elevated),
                None => Err(AppError::Unscoped),
            },
        }
    }

    /// Cria o tenant e vincula o criador, atomicamente.
    pub async fn create_tenant_with_owner(
        &self,
        owner_id: Uuid,
        name: &str,
        address: Option<&str>,
    ) -> Result<Tenant, AppError> {
        let mut tx = self.pool.begin().await?;

        let tenant = self.repo.create_tenant(&mut *tx, name, address).await?;
        self.repo
            .assign_user_to_tenant(&mut *tx, owner_id, tenant.id)
            .await?;

        tx.commit().await?;

        tracing::info!("Tenant '{}' criado pelo usuário {}", tenant.name, owner_id);
        Ok(tenant)
    }

    pub async fn list_my_tenants(&self, user_id: Uuid) -> Result<Vec<Tenant>, AppError> {
        self.repo.list_tenants_for_user(user_id).await
    }
}
