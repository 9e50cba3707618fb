//! Closure audit records: one immutable row per closure notification attempt.

use fieldops_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `closure_audit_records` table. No `updated_at`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ClosureAuditRecord {
    pub id: DbId,
    pub ticket_id: DbId,
    pub client_contact_address: String,
    pub technician_display_name: String,
    pub subject: String,
    pub body: String,
    pub delivered: bool,
    pub created_at: Timestamp,
}

/// DTO for inserting a closure audit record.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateClosureAudit {
    pub ticket_id: DbId,
    pub client_contact_address: String,
    pub technician_display_name: String,
    pub subject: String,
    pub body: String,
    pub delivered: bool,
}
