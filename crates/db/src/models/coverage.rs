//! Coverage rule models and DTOs.

use fieldops_core::ownership::CoverageCandidate;
use fieldops_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `coverage_rules` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CoverageRule {
    pub id: DbId,
    pub technician_id: DbId,
    pub department: String,
    /// Lower wins.
    pub priority: i32,
    pub active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&CoverageRule> for CoverageCandidate {
    fn from(rule: &CoverageRule) -> Self {
        CoverageCandidate {
            rule_id: rule.id,
            technician_id: rule.technician_id,
            priority: rule.priority,
            active: rule.active,
        }
    }
}

/// DTO for `POST /asignaciones/coberturas`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCoverage {
    pub technician_id: DbId,
    pub department: String,
    pub priority: Option<i32>,
}

/// Query parameters for `GET /asignaciones/coberturas`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoverageListParams {
    pub department: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
}
