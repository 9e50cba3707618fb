//! Read-only capabilities the ownership and closure logic depends on.
//!
//! Clients, users and rule stores are owned by other parts of the platform.
//! The engine only needs narrow lookups, so each is a small object-safe trait
//! implemented by adapters over whatever actually holds the data.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::ownership::{AssignmentCandidate, CoverageCandidate};
use crate::types::DbId;

/// The slice of a client record the engine reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientProfile {
    pub id: DbId,
    pub name: String,
    pub department: Option<String>,
    pub contact_email: Option<String>,
}

/// Client lookups by id.
#[async_trait]
pub trait ClientDirectory: Send + Sync {
    async fn find_client(&self, client_id: DbId) -> Result<Option<ClientProfile>, CoreError>;
}

/// User lookups by id.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Display name of the user, or `None` if no such user exists.
    async fn display_name(&self, user_id: DbId) -> Result<Option<String>, CoreError>;
}

/// Rule lookups used by the ownership resolver.
///
/// Implementations may return inactive or expired rows; the selector filters
/// them again.
#[async_trait]
pub trait OwnershipSource: Send + Sync {
    async fn direct_assignments(
        &self,
        client_id: DbId,
    ) -> Result<Vec<AssignmentCandidate>, CoreError>;

    async fn department_assignments(
        &self,
        department: &str,
    ) -> Result<Vec<AssignmentCandidate>, CoreError>;

    async fn coverage_rules(&self, department: &str) -> Result<Vec<CoverageCandidate>, CoreError>;
}
