//! Ticket models and DTOs.

use fieldops_core::ticket_state::{PriorityId, StateId};
use fieldops_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `tickets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Ticket {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub client_id: DbId,
    pub reported_by_user_id: DbId,
    pub assigned_to_user_id: Option<DbId>,
    pub state_id: StateId,
    pub priority_id: PriorityId,
    pub due_at: Option<Timestamp>,
    pub closed_at: Option<Timestamp>,
    pub check_in_at: Option<Timestamp>,
    pub check_in_lat: Option<f64>,
    pub check_in_lng: Option<f64>,
    pub check_out_at: Option<Timestamp>,
    pub check_out_lat: Option<f64>,
    pub check_out_lng: Option<f64>,
    pub closing_report: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `ticket_state_overrides` table. No `updated_at`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TicketStateOverride {
    pub id: DbId,
    pub ticket_id: DbId,
    pub from_state_id: StateId,
    pub to_state_id: StateId,
    pub changed_by: Option<DbId>,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// DTO for `POST /tickets`.
///
/// Required ids are `Option` so a missing field is reported by validation
/// with the field name instead of a generic deserialization failure.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateTicket {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "title is required"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[validate(required(message = "client_id is required"))]
    pub client_id: Option<DbId>,
    #[validate(required(message = "reported_by_user_id is required"))]
    pub reported_by_user_id: Option<DbId>,
    pub assigned_to_user_id: Option<DbId>,
    pub state_id: Option<StateId>,
    pub priority_id: Option<PriorityId>,
    pub due_at: Option<Timestamp>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Fully resolved insert for the `tickets` table.
///
/// Built by the lifecycle controller once defaults and ownership are applied.
/// A `None` `due_at` is stored as the insert time.
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub title: String,
    pub description: String,
    pub client_id: DbId,
    pub reported_by_user_id: DbId,
    pub assigned_to_user_id: Option<DbId>,
    pub state_id: StateId,
    pub priority_id: PriorityId,
    pub due_at: Option<Timestamp>,
}

/// DTO for `PUT /tickets/{id}`. Every present field is applied verbatim.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTicket {
    pub title: Option<String>,
    pub description: Option<String>,
    pub client_id: Option<DbId>,
    pub reported_by_user_id: Option<DbId>,
    pub assigned_to_user_id: Option<DbId>,
    pub priority_id: Option<PriorityId>,
    pub due_at: Option<Timestamp>,
    pub closed_at: Option<Timestamp>,
    pub state_id: Option<StateId>,
}

/// DTO for `POST /tickets/{id}/checkin`.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckInRequest {
    pub latitude: f64,
    pub longitude: f64,
}

/// DTO for `POST /tickets/{id}/checkout`.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckOutRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub report: Option<String>,
}

/// Query parameters for `GET /tickets`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketListParams {
    pub state_id: Option<StateId>,
    pub assigned_to: Option<DbId>,
    pub client_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
