//! Handlers for `/asignaciones`: assignment rules, coverage rules and owner
//! queries.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use fieldops_core::error::CoreError;
use fieldops_core::ownership::{normalize_department, DEFAULT_COVERAGE_PRIORITY};
use fieldops_core::types::DbId;
use fieldops_db::models::assignment::{
    AssignmentListParams, AssignmentRule, CreateDepartmentAssignment, CreateDirectAssignment,
    DepartmentAssignment,
};
use fieldops_db::models::coverage::{CoverageListParams, CoverageRule, CreateCoverage};
use fieldops_db::repositories::{AssignmentRepo, ClientRepo, CoverageRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireSupervisor;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response for owner queries. `technician_id` is `null` when no rule or
/// fallback applies.
#[derive(Debug, Serialize)]
pub struct OwnerResponse {
    pub client_id: DbId,
    pub technician_id: Option<DbId>,
}

// ---------------------------------------------------------------------------
// Assignment rules
// ---------------------------------------------------------------------------

/// POST /api/v1/asignaciones/directa
pub async fn create_direct(
    RequireSupervisor(user): RequireSupervisor,
    State(state): State<AppState>,
    Json(input): Json<CreateDirectAssignment>,
) -> AppResult<(StatusCode, Json<DataResponse<AssignmentRule>>)> {
    if !ClientRepo::exists(&state.pool, input.client_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Client",
            id: input.client_id,
        }));
    }

    let rule = AssignmentRepo::create_direct(&state.pool, input.client_id, input.technician_id)
        .await?;

    tracing::info!(
        assignment_id = rule.id,
        client_id = input.client_id,
        technician_id = input.technician_id,
        user_id = user.user_id,
        "Direct assignment created",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: rule })))
}

/// POST /api/v1/asignaciones/departamento
///
/// Creates the department rule and its coverage rule in one transaction.
pub async fn create_department(
    RequireSupervisor(user): RequireSupervisor,
    State(state): State<AppState>,
    Json(input): Json<CreateDepartmentAssignment>,
) -> AppResult<(StatusCode, Json<DataResponse<DepartmentAssignment>>)> {
    let department = required_department(&input.department)?;

    let created = AssignmentRepo::create_department_with_coverage(
        &state.pool,
        &department,
        input.technician_id,
        input.priority_or_default(),
    )
    .await?;

    tracing::info!(
        assignment_id = created.assignment.id,
        coverage_id = created.coverage.id,
        department = %department,
        technician_id = input.technician_id,
        user_id = user.user_id,
        "Department assignment created",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET /api/v1/asignaciones
pub async fn list(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<AssignmentListParams>,
) -> AppResult<Json<DataResponse<Vec<AssignmentRule>>>> {
    let rules = AssignmentRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: rules }))
}

/// DELETE /api/v1/asignaciones/{id}
///
/// Idempotent: deactivating an inactive rule keeps its first `valid_until`.
pub async fn deactivate(
    RequireSupervisor(user): RequireSupervisor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    AssignmentRepo::deactivate(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Assignment",
            id,
        }))?;

    tracing::info!(assignment_id = id, user_id = user.user_id, "Assignment deactivated");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Ownership
// ---------------------------------------------------------------------------

/// GET /api/v1/asignaciones/duenio/{client_id}
pub async fn owner(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(client_id): Path<DbId>,
) -> AppResult<Json<DataResponse<OwnerResponse>>> {
    let technician_id = state.resolver.resolve_owner(client_id).await?;
    Ok(Json(DataResponse {
        data: OwnerResponse {
            client_id,
            technician_id,
        },
    }))
}

/// POST /api/v1/asignaciones/recalcular/{client_id}
///
/// Same computation as the owner query; nothing is cached or persisted.
pub async fn recalculate(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(client_id): Path<DbId>,
) -> AppResult<Json<DataResponse<OwnerResponse>>> {
    let technician_id = state.resolver.resolve_owner(client_id).await?;
    tracing::info!(
        client_id,
        technician_id = ?technician_id,
        user_id = auth.user_id,
        "Owner recalculated",
    );
    Ok(Json(DataResponse {
        data: OwnerResponse {
            client_id,
            technician_id,
        },
    }))
}

// ---------------------------------------------------------------------------
// Coverage rules
// ---------------------------------------------------------------------------

/// POST /api/v1/asignaciones/coberturas
pub async fn create_coverage(
    RequireSupervisor(user): RequireSupervisor,
    State(state): State<AppState>,
    Json(input): Json<CreateCoverage>,
) -> AppResult<(StatusCode, Json<DataResponse<CoverageRule>>)> {
    let department = required_department(&input.department)?;
    let priority = input.priority.unwrap_or(DEFAULT_COVERAGE_PRIORITY);

    let rule = CoverageRepo::create(&state.pool, input.technician_id, &department, priority).await?;

    tracing::info!(
        coverage_id = rule.id,
        department = %department,
        technician_id = input.technician_id,
        priority,
        user_id = user.user_id,
        "Coverage rule created",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: rule })))
}

/// GET /api/v1/asignaciones/coberturas
pub async fn list_coverage(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<CoverageListParams>,
) -> AppResult<Json<DataResponse<Vec<CoverageRule>>>> {
    let rules = CoverageRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: rules }))
}

/// DELETE /api/v1/asignaciones/coberturas/{id}
pub async fn deactivate_coverage(
    RequireSupervisor(user): RequireSupervisor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    CoverageRepo::deactivate(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Coverage",
            id,
        }))?;

    tracing::info!(coverage_id = id, user_id = user.user_id, "Coverage rule deactivated");
    Ok(StatusCode::NO_CONTENT)
}

fn required_department(department: &str) -> AppResult<String> {
    normalize_department(Some(department)).ok_or_else(|| {
        AppError::Core(CoreError::Validation(
            "department: department is required".into(),
        ))
    })
}
