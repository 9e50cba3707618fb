//! Repository for the `assignment_rules` table.
//!
//! Provides direct and department rule creation, effective-rule lookups for
//! the ownership resolver, history listing and deactivation.

use fieldops_core::ownership::{normalize_department, AssignmentKind};
use fieldops_core::types::DbId;
use sqlx::PgPool;

use crate::models::assignment::{AssignmentListParams, AssignmentRule, DepartmentAssignment};
use crate::repositories::CoverageRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, kind_id, client_id, department, technician_id, priority, \
                       active, valid_from, valid_until, created_at, updated_at";

/// Predicate for rules that are currently effective.
const EFFECTIVE: &str = "active = TRUE AND valid_until IS NULL";

pub struct AssignmentRepo;

impl AssignmentRepo {
    /// Insert an effective direct rule (`valid_from = NOW()`).
    ///
    /// Multiple direct rules for one client may coexist; the resolver picks
    /// the earliest.
    pub async fn create_direct(
        pool: &PgPool,
        client_id: DbId,
        technician_id: DbId,
    ) -> Result<AssignmentRule, sqlx::Error> {
        let query = format!(
            "INSERT INTO assignment_rules (kind_id, client_id, technician_id)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AssignmentRule>(&query)
            .bind(AssignmentKind::Direct.id())
            .bind(client_id)
            .bind(technician_id)
            .fetch_one(pool)
            .await
    }

    /// Insert an effective department rule and its matching coverage rule in
    /// one transaction. Either both rows exist afterwards or neither does.
    pub async fn create_department_with_coverage(
        pool: &PgPool,
        department: &str,
        technician_id: DbId,
        priority: i32,
    ) -> Result<DepartmentAssignment, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO assignment_rules (kind_id, department, technician_id, priority)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let assignment = sqlx::query_as::<_, AssignmentRule>(&query)
            .bind(AssignmentKind::ByDepartment.id())
            .bind(department)
            .bind(technician_id)
            .bind(priority)
            .fetch_one(&mut *tx)
            .await?;

        let coverage = CoverageRepo::create(&mut *tx, technician_id, department, priority).await?;

        tx.commit().await?;
        Ok(DepartmentAssignment {
            assignment,
            coverage,
        })
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AssignmentRule>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assignment_rules WHERE id = $1");
        sqlx::query_as::<_, AssignmentRule>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Effective direct rules for a client, earliest first.
    pub async fn list_effective_direct(
        pool: &PgPool,
        client_id: DbId,
    ) -> Result<Vec<AssignmentRule>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM assignment_rules
             WHERE kind_id = $1 AND client_id = $2 AND {EFFECTIVE}
             ORDER BY valid_from, id"
        );
        sqlx::query_as::<_, AssignmentRule>(&query)
            .bind(AssignmentKind::Direct.id())
            .bind(client_id)
            .fetch_all(pool)
            .await
    }

    /// Effective department rules, earliest first.
    pub async fn list_effective_for_department(
        pool: &PgPool,
        department: &str,
    ) -> Result<Vec<AssignmentRule>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM assignment_rules
             WHERE kind_id = $1 AND department = $2 AND {EFFECTIVE}
             ORDER BY valid_from, id"
        );
        sqlx::query_as::<_, AssignmentRule>(&query)
            .bind(AssignmentKind::ByDepartment.id())
            .bind(department)
            .fetch_all(pool)
            .await
    }

    /// Rule history, newest first. Inactive rules are included only when
    /// `include_inactive` is set.
    pub async fn list(
        pool: &PgPool,
        params: &AssignmentListParams,
    ) -> Result<Vec<AssignmentRule>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM assignment_rules
             WHERE ($1::BIGINT IS NULL OR client_id = $1)
               AND ($2::TEXT IS NULL OR department = $2)
               AND ($3 OR {EFFECTIVE})
             ORDER BY valid_from DESC, id DESC"
        );
        sqlx::query_as::<_, AssignmentRule>(&query)
            .bind(params.client_id)
            .bind(normalize_department(params.department.as_deref()))
            .bind(params.include_inactive)
            .fetch_all(pool)
            .await
    }

    /// Deactivate a rule: `active = false` and `valid_until` stamped.
    ///
    /// Idempotent: an already-inactive rule keeps its original `valid_until`.
    /// Returns `None` if no rule with the given ID exists.
    pub async fn deactivate(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AssignmentRule>, sqlx::Error> {
        let query = format!(
            "UPDATE assignment_rules SET
                active = FALSE,
                valid_until = COALESCE(valid_until, NOW())
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AssignmentRule>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
