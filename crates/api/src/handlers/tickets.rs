//! Handlers for the `/tickets` resource.
//!
//! State-changing operations go through [`TicketLifecycle`](crate::engine::lifecycle::TicketLifecycle);
//! reads call the repositories directly.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use fieldops_core::error::CoreError;
use fieldops_core::types::DbId;
use fieldops_db::models::closure_audit::ClosureAuditRecord;
use fieldops_db::models::ticket::{
    CheckInRequest, CheckOutRequest, CreateTicket, Ticket, TicketListParams, TicketStateOverride,
    UpdateTicket,
};
use fieldops_db::repositories::{ClosureAuditRepo, TicketRepo};

use crate::engine::lifecycle::ClosureResponse;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireSupervisor;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// POST /api/v1/tickets
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateTicket>,
) -> AppResult<(StatusCode, Json<DataResponse<Ticket>>)> {
    let ticket = state.lifecycle.create_ticket(&input).await?;
    tracing::debug!(ticket_id = ticket.id, user_id = auth.user_id, "Ticket created via API");
    Ok((StatusCode::CREATED, Json(DataResponse { data: ticket })))
}

/// GET /api/v1/tickets
pub async fn list(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<TicketListParams>,
) -> AppResult<Json<DataResponse<Vec<Ticket>>>> {
    let tickets = TicketRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: tickets }))
}

/// GET /api/v1/tickets/{id}
pub async fn get_by_id(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Ticket>>> {
    let ticket = find_ticket(&state, id).await?;
    Ok(Json(DataResponse { data: ticket }))
}

/// PUT /api/v1/tickets/{id}
///
/// Administrative update. Returns 204 on success.
pub async fn update(
    RequireSupervisor(user): RequireSupervisor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTicket>,
) -> AppResult<StatusCode> {
    state.lifecycle.update(id, &input, user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/tickets/{id}
pub async fn delete(
    RequireSupervisor(_user): RequireSupervisor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.lifecycle.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// POST /api/v1/tickets/{id}/checkin
pub async fn check_in(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CheckInRequest>,
) -> AppResult<Json<DataResponse<Ticket>>> {
    let ticket = state.lifecycle.check_in(id, &input).await?;
    tracing::debug!(ticket_id = id, user_id = auth.user_id, "Check-in recorded");
    Ok(Json(DataResponse { data: ticket }))
}

/// POST /api/v1/tickets/{id}/checkout
pub async fn check_out(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CheckOutRequest>,
) -> AppResult<Json<DataResponse<ClosureResponse>>> {
    let closure = state.lifecycle.check_out(id, &input).await?;
    tracing::debug!(ticket_id = id, user_id = auth.user_id, "Check-out recorded");
    Ok(Json(DataResponse { data: closure }))
}

/// PUT /api/v1/tickets/{id}/cerrar
pub async fn close(
    RequireSupervisor(user): RequireSupervisor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ClosureResponse>>> {
    let closure = state.lifecycle.close(id).await?;
    tracing::debug!(ticket_id = id, user_id = user.user_id, "Explicit close recorded");
    Ok(Json(DataResponse { data: closure }))
}

// ---------------------------------------------------------------------------
// Audit trails
// ---------------------------------------------------------------------------

/// GET /api/v1/tickets/{id}/closure-audits
pub async fn closure_audits(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ClosureAuditRecord>>>> {
    find_ticket(&state, id).await?;
    let records = ClosureAuditRepo::list_for_ticket(&state.pool, id).await?;
    Ok(Json(DataResponse { data: records }))
}

/// GET /api/v1/tickets/{id}/state-overrides
pub async fn state_overrides(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<TicketStateOverride>>>> {
    find_ticket(&state, id).await?;
    let overrides = TicketRepo::list_overrides(&state.pool, id).await?;
    Ok(Json(DataResponse { data: overrides }))
}

async fn find_ticket(state: &AppState, id: DbId) -> AppResult<Ticket> {
    TicketRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Ticket",
            id,
        }))
}
