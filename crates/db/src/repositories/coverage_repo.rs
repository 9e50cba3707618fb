//! Repository for the `coverage_rules` table.
//!
//! Coverage rows are flag-flipped, never deleted.

use fieldops_core::ownership::normalize_department;
use fieldops_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::coverage::{CoverageListParams, CoverageRule};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, technician_id, department, priority, active, created_at, updated_at";

pub struct CoverageRepo;

impl CoverageRepo {
    /// Insert an active coverage rule.
    ///
    /// Generic over the executor so the department-assignment dual write can
    /// run it inside its transaction.
    pub async fn create<'e, E>(
        executor: E,
        technician_id: DbId,
        department: &str,
        priority: i32,
    ) -> Result<CoverageRule, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO coverage_rules (technician_id, department, priority)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CoverageRule>(&query)
            .bind(technician_id)
            .bind(department)
            .bind(priority)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CoverageRule>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM coverage_rules WHERE id = $1");
        sqlx::query_as::<_, CoverageRule>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List coverage rules ordered by department, then priority, then id.
    ///
    /// Inactive rows are included only when `include_inactive` is set.
    pub async fn list(
        pool: &PgPool,
        params: &CoverageListParams,
    ) -> Result<Vec<CoverageRule>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM coverage_rules
             WHERE ($1::TEXT IS NULL OR department = $1)
               AND ($2 OR active = TRUE)
             ORDER BY department, priority, id"
        );
        sqlx::query_as::<_, CoverageRule>(&query)
            .bind(normalize_department(params.department.as_deref()))
            .bind(params.include_inactive)
            .fetch_all(pool)
            .await
    }

    /// Active coverage rules for a department, best first.
    pub async fn list_active_for_department(
        pool: &PgPool,
        department: &str,
    ) -> Result<Vec<CoverageRule>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM coverage_rules
             WHERE department = $1 AND active = TRUE
             ORDER BY priority, id"
        );
        sqlx::query_as::<_, CoverageRule>(&query)
            .bind(department)
            .fetch_all(pool)
            .await
    }

    /// Deactivate a coverage rule. Idempotent for already-inactive rows.
    ///
    /// Returns `None` if no rule with the given ID exists.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<Option<CoverageRule>, sqlx::Error> {
        let query = format!(
            "UPDATE coverage_rules SET active = FALSE
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CoverageRule>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
