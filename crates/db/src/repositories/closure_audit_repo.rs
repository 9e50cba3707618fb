//! Repository for the `closure_audit_records` table (append-only).

use fieldops_core::types::DbId;
use sqlx::PgPool;

use crate::models::closure_audit::{ClosureAuditRecord, CreateClosureAudit};

const COLUMNS: &str = "id, ticket_id, client_contact_address, technician_display_name, \
                       subject, body, delivered, created_at";

pub struct ClosureAuditRepo;

impl ClosureAuditRepo {
    /// Append a closure audit record.
    pub async fn create(
        pool: &PgPool,
        input: &CreateClosureAudit,
    ) -> Result<ClosureAuditRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO closure_audit_records
                (ticket_id, client_contact_address, technician_display_name,
                 subject, body, delivered)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ClosureAuditRecord>(&query)
            .bind(input.ticket_id)
            .bind(&input.client_contact_address)
            .bind(&input.technician_display_name)
            .bind(&input.subject)
            .bind(&input.body)
            .bind(input.delivered)
            .fetch_one(pool)
            .await
    }

    /// All attempts for one ticket, oldest first.
    pub async fn list_for_ticket(
        pool: &PgPool,
        ticket_id: DbId,
    ) -> Result<Vec<ClosureAuditRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM closure_audit_records
             WHERE ticket_id = $1
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, ClosureAuditRecord>(&query)
            .bind(ticket_id)
            .fetch_all(pool)
            .await
    }
}
