//! Integration tests for assignment and coverage repositories.

use fieldops_core::types::DbId;
use fieldops_db::models::assignment::AssignmentListParams;
use fieldops_db::models::client::CreateClient;
use fieldops_db::models::coverage::CoverageListParams;
use fieldops_db::models::user::CreateUser;
use fieldops_db::repositories::{AssignmentRepo, ClientRepo, CoverageRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn technician(pool: &PgPool, name: &str) -> DbId {
    UserRepo::create(
        pool,
        &CreateUser {
            display_name: name.to_string(),
            email: None,
            role: "technician".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

async fn client(pool: &PgPool, department: Option<&str>) -> DbId {
    ClientRepo::create(
        pool,
        &CreateClient {
            name: "Acme".to_string(),
            department: department.map(str::to_string),
            contact_email: None,
        },
    )
    .await
    .unwrap()
    .id
}

// ---------------------------------------------------------------------------
// Department dual write
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn department_assignment_writes_rule_and_coverage(pool: PgPool) {
    let tech = technician(&pool, "Ana").await;

    let created = AssignmentRepo::create_department_with_coverage(&pool, "North", tech, 30)
        .await
        .unwrap();

    assert_eq!(created.assignment.department.as_deref(), Some("North"));
    assert_eq!(created.assignment.priority, 30);
    assert!(created.assignment.is_effective());
    assert_eq!(created.coverage.technician_id, tech);
    assert_eq!(created.coverage.priority, 30);
    assert!(created.coverage.active);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn department_assignment_is_all_or_nothing(pool: PgPool) {
    let tech = technician(&pool, "Ana").await;

    // Make the second insert of the pair fail.
    sqlx::query("ALTER TABLE coverage_rules ADD CONSTRAINT ck_test_priority CHECK (priority < 0)")
        .execute(&pool)
        .await
        .unwrap();

    let result = AssignmentRepo::create_department_with_coverage(&pool, "North", tech, 30).await;
    assert!(result.is_err());

    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM assignment_rules")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count.0, 0, "assignment rule must be rolled back");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn blank_department_violates_shape_check(pool: PgPool) {
    let tech = technician(&pool, "Ana").await;

    let result = AssignmentRepo::create_department_with_coverage(&pool, "  ", tech, 100).await;
    assert!(result.is_err());
}

// ---------------------------------------------------------------------------
// Effective rules and deactivation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn deactivate_is_idempotent_and_keeps_history(pool: PgPool) {
    let tech = technician(&pool, "Ana").await;
    let client_id = client(&pool, None).await;
    let rule = AssignmentRepo::create_direct(&pool, client_id, tech).await.unwrap();

    let first = AssignmentRepo::deactivate(&pool, rule.id).await.unwrap().unwrap();
    assert!(!first.active);
    let stamped = first.valid_until.expect("valid_until stamped");

    let second = AssignmentRepo::deactivate(&pool, rule.id).await.unwrap().unwrap();
    assert_eq!(second.valid_until, Some(stamped));

    let effective = AssignmentRepo::list_effective_direct(&pool, client_id).await.unwrap();
    assert!(effective.is_empty());

    let history = AssignmentRepo::list(
        &pool,
        &AssignmentListParams {
            client_id: Some(client_id),
            include_inactive: true,
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(history.len(), 1);

    assert!(AssignmentRepo::deactivate(&pool, 9999).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn effective_department_rules_ignore_other_departments(pool: PgPool) {
    let north = technician(&pool, "Ana").await;
    let south = technician(&pool, "Beto").await;
    AssignmentRepo::create_department_with_coverage(&pool, "North", north, 100)
        .await
        .unwrap();
    AssignmentRepo::create_department_with_coverage(&pool, "South", south, 100)
        .await
        .unwrap();

    let rules = AssignmentRepo::list_effective_for_department(&pool, "North")
        .await
        .unwrap();
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].technician_id, north);
}

// ---------------------------------------------------------------------------
// Coverage
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn coverage_list_orders_by_department_then_priority(pool: PgPool) {
    let a = technician(&pool, "Ana").await;
    let b = technician(&pool, "Beto").await;
    CoverageRepo::create(&pool, a, "South", 5).await.unwrap();
    CoverageRepo::create(&pool, a, "North", 50).await.unwrap();
    CoverageRepo::create(&pool, b, "North", 10).await.unwrap();

    let all = CoverageRepo::list(&pool, &CoverageListParams::default())
        .await
        .unwrap();
    let order: Vec<(&str, i32)> = all
        .iter()
        .map(|r| (r.department.as_str(), r.priority))
        .collect();
    assert_eq!(order, vec![("North", 10), ("North", 50), ("South", 5)]);

    let north = CoverageRepo::list(
        &pool,
        &CoverageListParams {
            department: Some("North".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(north.len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn blank_department_filter_lists_everything(pool: PgPool) {
    let a = technician(&pool, "Ana").await;
    let b = technician(&pool, "Beto").await;
    AssignmentRepo::create_department_with_coverage(&pool, "North", a, 100)
        .await
        .unwrap();
    AssignmentRepo::create_department_with_coverage(&pool, "South", b, 100)
        .await
        .unwrap();

    for blank in ["", "   "] {
        let coverage = CoverageRepo::list(
            &pool,
            &CoverageListParams {
                department: Some(blank.to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(coverage.len(), 2, "coverage filter {blank:?}");

        let rules = AssignmentRepo::list(
            &pool,
            &AssignmentListParams {
                department: Some(blank.to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(rules.len(), 2, "assignment filter {blank:?}");
    }

    let padded = CoverageRepo::list(
        &pool,
        &CoverageListParams {
            department: Some(" North ".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(padded.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deactivated_coverage_leaves_resolution_but_not_history(pool: PgPool) {
    let tech = technician(&pool, "Ana").await;
    let rule = CoverageRepo::create(&pool, tech, "North", 10).await.unwrap();

    let off = CoverageRepo::deactivate(&pool, rule.id).await.unwrap().unwrap();
    assert!(!off.active);
    assert!(CoverageRepo::deactivate(&pool, rule.id).await.unwrap().is_some());

    let active = CoverageRepo::list_active_for_department(&pool, "North")
        .await
        .unwrap();
    assert!(active.is_empty());

    let history = CoverageRepo::list(
        &pool,
        &CoverageListParams {
            department: Some("North".to_string()),
            include_inactive: true,
        },
    )
    .await
    .unwrap();
    assert_eq!(history.len(), 1);

    assert!(CoverageRepo::deactivate(&pool, 9999).await.unwrap().is_none());
}
