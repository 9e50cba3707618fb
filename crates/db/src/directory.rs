//! PostgreSQL-backed implementations of the core directory traits.

use async_trait::async_trait;
use fieldops_core::directory::{ClientDirectory, ClientProfile, OwnershipSource, UserDirectory};
use fieldops_core::error::CoreError;
use fieldops_core::ownership::{AssignmentCandidate, CoverageCandidate};
use fieldops_core::types::DbId;

use crate::repositories::{AssignmentRepo, ClientRepo, CoverageRepo, UserRepo};
use crate::DbPool;

/// Serves client, user and rule lookups straight from the pool.
#[derive(Clone)]
pub struct PgDirectory {
    pool: DbPool,
}

impl PgDirectory {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn internal(err: sqlx::Error) -> CoreError {
    CoreError::Internal(format!("directory lookup failed: {err}"))
}

#[async_trait]
impl ClientDirectory for PgDirectory {
    async fn find_client(&self, client_id: DbId) -> Result<Option<ClientProfile>, CoreError> {
        let client = ClientRepo::find_by_id(&self.pool, client_id)
            .await
            .map_err(internal)?;
        Ok(client.map(ClientProfile::from))
    }
}

#[async_trait]
impl UserDirectory for PgDirectory {
    async fn display_name(&self, user_id: DbId) -> Result<Option<String>, CoreError> {
        let user = UserRepo::find_by_id(&self.pool, user_id)
            .await
            .map_err(internal)?;
        Ok(user.map(|u| u.display_name))
    }
}

#[async_trait]
impl OwnershipSource for PgDirectory {
    async fn direct_assignments(
        &self,
        client_id: DbId,
    ) -> Result<Vec<AssignmentCandidate>, CoreError> {
        let rules = AssignmentRepo::list_effective_direct(&self.pool, client_id)
            .await
            .map_err(internal)?;
        Ok(rules.iter().map(AssignmentCandidate::from).collect())
    }

    async fn department_assignments(
        &self,
        department: &str,
    ) -> Result<Vec<AssignmentCandidate>, CoreError> {
        let rules = AssignmentRepo::list_effective_for_department(&self.pool, department)
            .await
            .map_err(internal)?;
        Ok(rules.iter().map(AssignmentCandidate::from).collect())
    }

    async fn coverage_rules(&self, department: &str) -> Result<Vec<CoverageCandidate>, CoreError> {
        let rules = CoverageRepo::list_active_for_department(&self.pool, department)
            .await
            .map_err(internal)?;
        Ok(rules.iter().map(CoverageCandidate::from).collect())
    }
}
