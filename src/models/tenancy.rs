// src/models/tenancy.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::common::error::AppError;

// ---
// 1. Tenant (a empresa/curtume)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---
// 2. TenantUser (a ponte usuário -> tenant)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TenantUser {
    pub user_id: Uuid,
    pub tenant_id: Uuid,
    pub created_at: DateTime<Utc>,
}

// ---
// 3. TenantScope (a capacidade decidida na borda)
// ---
// Todo handler/serviço recebe o escopo como parâmetro explícito.
// `Scoped` limita as consultas a um único tenant; `Elevated` é o acesso
// administrativo que enxerga todos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantScope {
    Scoped(Uuid),
    Elevated,
}

impl TenantScope {
    pub fn tenant_id(&self) -> Option<Uuid> {
        match self {
            TenantScope::Scoped(id) => Some(*id),
            TenantScope::Elevated => None,
        }
    }

    /// Operações de escrita exigem um tenant concreto: acesso elevado sem
    /// o cabeçalho `x-tenant-id` não pode criar registros.
    pub fn require_tenant(&self) -> Result<Uuid, AppError> {
        self.tenant_id().ok_or(AppError::Unscoped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_expoe_o_tenant() {
        let id = Uuid::new_v4();
        assert_eq!(TenantScope::Scoped(id).require_tenant().unwrap(), id);
    }

    #[test]
    fn elevated_sem_tenant_explicito_falha() {
        assert!(matches!(
            TenantScope::Elevated.require_tenant(),
            Err(AppError::Unscoped)
        ));
    }
}
