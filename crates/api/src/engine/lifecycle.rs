//! Ticket lifecycle controller.
//!
//! Check-in, check-out and close are guarded by the transition table in
//! [`fieldops_core::ticket_state`]; the repository applies the guard inside
//! the `UPDATE` itself. `update` is the administrative override and is not
//! guarded.

use std::sync::Arc;

use fieldops_core::error::CoreError;
use fieldops_core::geo::validate_coordinates;
use fieldops_core::ticket_state::{
    closing_report_or_placeholder, initial_priority, initial_state, validate_transition,
    TicketPriority, TicketState,
};
use fieldops_core::types::DbId;
use fieldops_db::models::ticket::{
    CheckInRequest, CheckOutRequest, CreateTicket, NewTicket, Ticket, UpdateTicket,
};
use fieldops_db::repositories::TicketRepo;
use fieldops_db::DbPool;
use serde::Serialize;
use validator::Validate;

use crate::engine::closure::ClosureNotifier;
use crate::engine::resolver::OwnershipResolver;
use crate::error::{AppError, AppResult};

/// Result of a transition into `Resolved`.
#[derive(Debug, Serialize)]
pub struct ClosureResponse {
    pub ticket: Ticket,
    /// Address the report was sent to, or the no-contact marker.
    pub notified_contact: String,
    pub delivered: bool,
}

pub struct TicketLifecycle {
    pool: DbPool,
    resolver: Arc<OwnershipResolver>,
    notifier: ClosureNotifier,
}

impl TicketLifecycle {
    pub fn new(pool: DbPool, resolver: Arc<OwnershipResolver>, notifier: ClosureNotifier) -> Self {
        Self {
            pool,
            resolver,
            notifier,
        }
    }

    /// Validate and insert a ticket, resolving the assignee when none is given.
    pub async fn create_ticket(&self, input: &CreateTicket) -> AppResult<Ticket> {
        input.validate()?;

        let (Some(client_id), Some(reported_by_user_id)) =
            (input.client_id, input.reported_by_user_id)
        else {
            return Err(CoreError::Validation(
                "client_id and reported_by_user_id are required".into(),
            )
            .into());
        };
        let state = initial_state(input.state_id).map_err(CoreError::Validation)?;
        let priority = initial_priority(input.priority_id).map_err(CoreError::Validation)?;

        let assigned_to_user_id = match input.assigned_to_user_id {
            Some(user_id) => Some(user_id),
            None => self.resolver.resolve_owner(client_id).await?,
        };

        let ticket = TicketRepo::create(
            &self.pool,
            &NewTicket {
                title: input.title.clone(),
                description: input.description.clone(),
                client_id,
                reported_by_user_id,
                assigned_to_user_id,
                state_id: state.id(),
                priority_id: priority.id(),
                due_at: input.due_at,
            },
        )
        .await?;

        tracing::info!(
            ticket_id = ticket.id,
            client_id,
            technician_id = ?ticket.assigned_to_user_id,
            "Ticket created",
        );
        Ok(ticket)
    }

    /// Record arrival on site and move the ticket to `InProgress`.
    pub async fn check_in(&self, id: DbId, input: &CheckInRequest) -> AppResult<Ticket> {
        validate_coordinates(input.latitude, input.longitude).map_err(CoreError::Validation)?;

        let Some(ticket) =
            TicketRepo::check_in(&self.pool, id, input.latitude, input.longitude).await?
        else {
            return Err(self.rejection(id, TicketState::InProgress).await);
        };

        tracing::info!(ticket_id = id, "Ticket checked in");
        Ok(ticket)
    }

    /// Record departure, store the report, resolve the ticket and notify the
    /// client.
    pub async fn check_out(&self, id: DbId, input: &CheckOutRequest) -> AppResult<ClosureResponse> {
        validate_coordinates(input.latitude, input.longitude).map_err(CoreError::Validation)?;
        let report = closing_report_or_placeholder(input.report.as_deref());

        let Some(ticket) =
            TicketRepo::check_out(&self.pool, id, input.latitude, input.longitude, &report).await?
        else {
            return Err(self.rejection(id, TicketState::Resolved).await);
        };

        tracing::info!(ticket_id = id, "Ticket checked out");
        Ok(self.notify(ticket).await)
    }

    /// Resolve the ticket without a site visit and notify the client.
    pub async fn close(&self, id: DbId) -> AppResult<ClosureResponse> {
        let Some(ticket) = TicketRepo::close(&self.pool, id).await? else {
            return Err(self.rejection(id, TicketState::Resolved).await);
        };

        tracing::info!(ticket_id = id, "Ticket closed");
        Ok(self.notify(ticket).await)
    }

    /// Administrative update. Unknown state or priority ids are rejected;
    /// transition legality is not checked.
    pub async fn update(
        &self,
        id: DbId,
        input: &UpdateTicket,
        changed_by: DbId,
    ) -> AppResult<Ticket> {
        if let Some(state_id) = input.state_id {
            if TicketState::from_id(state_id).is_none() {
                return Err(CoreError::Validation(format!("Unknown state_id {state_id}")).into());
            }
        }
        if let Some(priority_id) = input.priority_id {
            if TicketPriority::from_id(priority_id).is_none() {
                return Err(
                    CoreError::Validation(format!("Unknown priority_id {priority_id}")).into(),
                );
            }
        }
        if input.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(CoreError::Validation("title: title is required".into()).into());
        }

        let ticket = TicketRepo::update(&self.pool, id, input, Some(changed_by))
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Ticket",
                id,
            })?;

        tracing::info!(ticket_id = id, user_id = changed_by, "Ticket updated");
        Ok(ticket)
    }

    pub async fn delete(&self, id: DbId) -> AppResult<()> {
        if !TicketRepo::delete(&self.pool, id).await? {
            return Err(CoreError::NotFound {
                entity: "Ticket",
                id,
            }
            .into());
        }
        tracing::info!(ticket_id = id, "Ticket deleted");
        Ok(())
    }

    async fn notify(&self, ticket: Ticket) -> ClosureResponse {
        let outcome = self.notifier.notify(&ticket).await;
        ClosureResponse {
            ticket,
            notified_contact: outcome.contact,
            delivered: outcome.delivered,
        }
    }

    /// Explain why a guarded update touched no row: the ticket is missing
    /// (404) or its current state cannot move to `target` (409).
    async fn rejection(&self, id: DbId, target: TicketState) -> AppError {
        let current = match TicketRepo::find_by_id(&self.pool, id).await {
            Ok(ticket) => ticket,
            Err(e) => return e.into(),
        };
        let Some(ticket) = current else {
            return CoreError::NotFound {
                entity: "Ticket",
                id,
            }
            .into();
        };

        let message = match TicketState::from_id(ticket.state_id) {
            Some(from) => match validate_transition(from, target) {
                Err(msg) => msg,
                // Raced with a concurrent update that has since moved it back.
                Ok(()) => format!("Ticket {id} changed state concurrently, retry"),
            },
            None => format!("Ticket {id} has unknown state {}", ticket.state_id),
        };
        CoreError::Conflict(message).into()
    }
}
