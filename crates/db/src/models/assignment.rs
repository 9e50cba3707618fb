//! Assignment rule models and DTOs.
//!
//! Rules are never hard-deleted. Deactivation flips `active` and stamps
//! `valid_until`, so history stays queryable.

use fieldops_core::ownership::{AssignmentCandidate, DEFAULT_COVERAGE_PRIORITY};
use fieldops_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::coverage::CoverageRule;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `assignment_rules` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssignmentRule {
    pub id: DbId,
    /// See [`fieldops_core::ownership::AssignmentKind`] for the discriminants.
    pub kind_id: i16,
    pub client_id: Option<DbId>,
    pub department: Option<String>,
    pub technician_id: DbId,
    pub priority: i32,
    pub active: bool,
    pub valid_from: Timestamp,
    pub valid_until: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl AssignmentRule {
    /// Active and open-ended.
    pub fn is_effective(&self) -> bool {
        self.active && self.valid_until.is_none()
    }
}

impl From<&AssignmentRule> for AssignmentCandidate {
    fn from(rule: &AssignmentRule) -> Self {
        AssignmentCandidate {
            rule_id: rule.id,
            technician_id: rule.technician_id,
            valid_from: rule.valid_from,
            active: rule.active,
            valid_until: rule.valid_until,
        }
    }
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// DTO for `POST /asignaciones/directa`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDirectAssignment {
    pub client_id: DbId,
    pub technician_id: DbId,
}

/// DTO for `POST /asignaciones/departamento`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDepartmentAssignment {
    pub department: String,
    pub technician_id: DbId,
    /// Lower wins. Defaults to [`DEFAULT_COVERAGE_PRIORITY`].
    pub priority: Option<i32>,
}

impl CreateDepartmentAssignment {
    pub fn priority_or_default(&self) -> i32 {
        self.priority.unwrap_or(DEFAULT_COVERAGE_PRIORITY)
    }
}

/// Result of a department assignment: the rule plus the coverage row
/// written alongside it.
#[derive(Debug, Clone, Serialize)]
pub struct DepartmentAssignment {
    pub assignment: AssignmentRule,
    pub coverage: CoverageRule,
}

/// Query parameters for `GET /asignaciones`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssignmentListParams {
    pub client_id: Option<DbId>,
    pub department: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
}
