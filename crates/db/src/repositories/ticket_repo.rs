//! Repository for the `tickets` and `ticket_state_overrides` tables.
//!
//! Lifecycle mutations (check-in, check-out, close) are single `UPDATE`
//! statements guarded by `state_id = ANY($allowed)`, so the transition check
//! and the write are atomic. They return `None` when the ticket is missing
//! or not in an allowed state; callers use [`TicketRepo::find_by_id`] to tell
//! the two apart.

use fieldops_core::ticket_state::{is_override, StateId, TicketState};
use fieldops_core::types::DbId;
use sqlx::PgPool;

use crate::models::ticket::{NewTicket, Ticket, TicketListParams, TicketStateOverride, UpdateTicket};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, client_id, reported_by_user_id, \
                       assigned_to_user_id, state_id, priority_id, due_at, closed_at, \
                       check_in_at, check_in_lat, check_in_lng, \
                       check_out_at, check_out_lat, check_out_lng, closing_report, \
                       created_at, updated_at";

const OVERRIDE_COLUMNS: &str = "id, ticket_id, from_state_id, to_state_id, changed_by, created_at";

/// Default page size for ticket listing.
const DEFAULT_LIMIT: i64 = 50;

/// Maximum page size for ticket listing.
const MAX_LIMIT: i64 = 200;

pub struct TicketRepo;

impl TicketRepo {
    /// Insert a new ticket. A missing `due_at` defaults to the insert time.
    pub async fn create(pool: &PgPool, input: &NewTicket) -> Result<Ticket, sqlx::Error> {
        let query = format!(
            "INSERT INTO tickets
                (title, description, client_id, reported_by_user_id, assigned_to_user_id,
                 state_id, priority_id, due_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, NOW()))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.client_id)
            .bind(input.reported_by_user_id)
            .bind(input.assigned_to_user_id)
            .bind(input.state_id)
            .bind(input.priority_id)
            .bind(input.due_at)
            .fetch_one(pool)
            .await
    }

    /// Find a ticket by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tickets WHERE id = $1");
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List tickets with optional filters, newest first.
    pub async fn list(pool: &PgPool, params: &TicketListParams) -> Result<Vec<Ticket>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = params.offset.unwrap_or(0).max(0);

        let query = format!(
            "SELECT {COLUMNS} FROM tickets
             WHERE ($1::SMALLINT IS NULL OR state_id = $1)
               AND ($2::BIGINT IS NULL OR assigned_to_user_id = $2)
               AND ($3::BIGINT IS NULL OR client_id = $3)
             ORDER BY created_at DESC, id DESC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(params.state_id)
            .bind(params.assigned_to)
            .bind(params.client_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Stamp the check-in and move the ticket to `InProgress`.
    pub async fn check_in(
        pool: &PgPool,
        id: DbId,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!(
            "UPDATE tickets SET
                check_in_at = NOW(),
                check_in_lat = $2,
                check_in_lng = $3,
                state_id = $4
             WHERE id = $1 AND state_id = ANY($5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .bind(latitude)
            .bind(longitude)
            .bind(TicketState::InProgress.id())
            .bind(allowed_sources(TicketState::InProgress))
            .fetch_optional(pool)
            .await
    }

    /// Stamp the check-out, store the closing report and resolve the ticket.
    pub async fn check_out(
        pool: &PgPool,
        id: DbId,
        latitude: f64,
        longitude: f64,
        closing_report: &str,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!(
            "UPDATE tickets SET
                check_out_at = NOW(),
                check_out_lat = $2,
                check_out_lng = $3,
                closing_report = $4,
                state_id = $5,
                closed_at = NOW()
             WHERE id = $1 AND state_id = ANY($6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .bind(latitude)
            .bind(longitude)
            .bind(closing_report)
            .bind(TicketState::Resolved.id())
            .bind(allowed_sources(TicketState::Resolved))
            .fetch_optional(pool)
            .await
    }

    /// Resolve the ticket without coordinates or report (supervisor close).
    ///
    /// `check_out_at` is only stamped if the ticket was never checked out.
    pub async fn close(pool: &PgPool, id: DbId) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!(
            "UPDATE tickets SET
                state_id = $2,
                check_out_at = COALESCE(check_out_at, NOW()),
                closed_at = NOW()
             WHERE id = $1 AND state_id = ANY($3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .bind(TicketState::Resolved.id())
            .bind(allowed_sources(TicketState::Resolved))
            .fetch_optional(pool)
            .await
    }

    /// Apply an administrative update. Only non-`None` fields are written,
    /// with no transition checks.
    ///
    /// A state change the lifecycle table would reject is recorded in
    /// `ticket_state_overrides` within the same transaction. Returns `None`
    /// if no ticket with the given ID exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTicket,
        changed_by: Option<DbId>,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let current: Option<(StateId,)> =
            sqlx::query_as("SELECT state_id FROM tickets WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((from_state,)) = current else {
            return Ok(None);
        };

        let query = format!(
            "UPDATE tickets SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                client_id = COALESCE($4, client_id),
                reported_by_user_id = COALESCE($5, reported_by_user_id),
                assigned_to_user_id = COALESCE($6, assigned_to_user_id),
                priority_id = COALESCE($7, priority_id),
                due_at = COALESCE($8, due_at),
                closed_at = COALESCE($9, closed_at),
                state_id = COALESCE($10, state_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let ticket = sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.client_id)
            .bind(input.reported_by_user_id)
            .bind(input.assigned_to_user_id)
            .bind(input.priority_id)
            .bind(input.due_at)
            .bind(input.closed_at)
            .bind(input.state_id)
            .fetch_one(&mut *tx)
            .await?;

        if is_override(from_state, ticket.state_id) {
            sqlx::query(
                "INSERT INTO ticket_state_overrides (ticket_id, from_state_id, to_state_id, changed_by)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(id)
            .bind(from_state)
            .bind(ticket.state_id)
            .bind(changed_by)
            .execute(&mut *tx)
            .await?;
            tracing::info!(
                ticket_id = id,
                from_state,
                to_state = ticket.state_id,
                "Ticket state overridden",
            );
        }

        tx.commit().await?;
        Ok(Some(ticket))
    }

    /// State overrides recorded for a ticket, oldest first.
    pub async fn list_overrides(
        pool: &PgPool,
        ticket_id: DbId,
    ) -> Result<Vec<TicketStateOverride>, sqlx::Error> {
        let query = format!(
            "SELECT {OVERRIDE_COLUMNS} FROM ticket_state_overrides
             WHERE ticket_id = $1
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, TicketStateOverride>(&query)
            .bind(ticket_id)
            .fetch_all(pool)
            .await
    }

    /// Permanently delete a ticket. Audit rows cascade.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tickets WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn allowed_sources(target: TicketState) -> Vec<StateId> {
    target.allowed_sources().into_iter().map(TicketState::id).collect()
}
