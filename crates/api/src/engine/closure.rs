//! Best-effort client notification when a ticket is closed.
//!
//! Every closure attempt leaves exactly one `closure_audit_records` row,
//! whether or not the email went out. Nothing here fails the caller: the
//! state transition is already committed when the notifier runs.

use std::sync::Arc;
use std::time::Duration;

use fieldops_core::closure_report::{
    compose, usable_contact, ClosureContext, ComposedReport, NO_CONTACT_MARKER,
    UNASSIGNED_TECHNICIAN, UNKNOWN_CLIENT,
};
use fieldops_core::directory::{ClientDirectory, UserDirectory};
use fieldops_core::types::DbId;
use fieldops_db::models::closure_audit::CreateClosureAudit;
use fieldops_db::models::ticket::Ticket;
use fieldops_db::repositories::ClosureAuditRepo;
use fieldops_db::DbPool;
use fieldops_notify::{OutgoingReport, ReportSender};

/// Report content plus the recipient, before any delivery attempt.
#[derive(Debug, Clone)]
pub struct PreparedClosure {
    /// `None` when the client has no usable address.
    pub contact: Option<String>,
    pub technician_name: String,
    pub report: ComposedReport,
}

/// What happened to the notification for one closure.
#[derive(Debug, Clone)]
pub struct ClosureOutcome {
    /// The address written to the audit row (or the no-contact marker).
    pub contact: String,
    pub delivered: bool,
}

pub struct ClosureNotifier {
    pool: DbPool,
    clients: Arc<dyn ClientDirectory>,
    users: Arc<dyn UserDirectory>,
    sender: Arc<dyn ReportSender>,
    send_timeout: Duration,
}

impl ClosureNotifier {
    pub fn new(
        pool: DbPool,
        clients: Arc<dyn ClientDirectory>,
        users: Arc<dyn UserDirectory>,
        sender: Arc<dyn ReportSender>,
        send_timeout: Duration,
    ) -> Self {
        Self {
            pool,
            clients,
            users,
            sender,
            send_timeout,
        }
    }

    /// Notify the client about a closed ticket and record the attempt.
    pub async fn notify(&self, ticket: &Ticket) -> ClosureOutcome {
        let prepared = self.prepare(ticket).await;

        let delivered = match prepared.contact.as_deref() {
            Some(to) => self.deliver(ticket.id, to, &prepared.report).await,
            None => {
                tracing::info!(
                    ticket_id = ticket.id,
                    client_id = ticket.client_id,
                    "Client has no contact address, closure report not sent",
                );
                false
            }
        };

        let contact = prepared
            .contact
            .unwrap_or_else(|| NO_CONTACT_MARKER.to_string());

        let audit = CreateClosureAudit {
            ticket_id: ticket.id,
            client_contact_address: contact.clone(),
            technician_display_name: prepared.technician_name,
            subject: prepared.report.subject,
            body: prepared.report.body,
            delivered,
        };
        if let Err(e) = ClosureAuditRepo::create(&self.pool, &audit).await {
            tracing::error!(
                ticket_id = ticket.id,
                error = %e,
                "Failed to persist closure audit record",
            );
        }

        ClosureOutcome { contact, delivered }
    }

    /// Look up the client and technician and compose the report.
    ///
    /// Lookup failures degrade to the placeholder names.
    pub async fn prepare(&self, ticket: &Ticket) -> PreparedClosure {
        let client = match self.clients.find_client(ticket.client_id).await {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!(ticket_id = ticket.id, error = %e, "Client lookup failed");
                None
            }
        };

        let technician = match ticket.assigned_to_user_id {
            Some(user_id) => match self.users.display_name(user_id).await {
                Ok(name) => name,
                Err(e) => {
                    tracing::warn!(ticket_id = ticket.id, error = %e, "Technician lookup failed");
                    None
                }
            },
            None => None,
        };
        let technician_name = technician.unwrap_or_else(|| UNASSIGNED_TECHNICIAN.to_string());

        let client_name = client.as_ref().map_or(UNKNOWN_CLIENT, |c| c.name.as_str());
        let report = compose(&ClosureContext {
            ticket_id: ticket.id,
            title: &ticket.title,
            client_name,
            technician_name: &technician_name,
            created_at: ticket.created_at,
            check_in_at: ticket.check_in_at,
            check_in_lat: ticket.check_in_lat,
            check_in_lng: ticket.check_in_lng,
            check_out_at: ticket.check_out_at,
            check_out_lat: ticket.check_out_lat,
            check_out_lng: ticket.check_out_lng,
            closed_at: ticket.closed_at,
            closing_report: ticket.closing_report.as_deref(),
        });

        let contact = client.and_then(|c| usable_contact(c.contact_email.as_deref()));

        PreparedClosure {
            contact,
            technician_name,
            report,
        }
    }

    /// Send the report, bounded by the configured timeout. Returns whether
    /// the sender accepted it.
    pub async fn deliver(&self, ticket_id: DbId, to: &str, report: &ComposedReport) -> bool {
        let outgoing = OutgoingReport {
            to: to.to_string(),
            subject: report.subject.clone(),
            body: report.body.clone(),
        };

        match tokio::time::timeout(self.send_timeout, self.sender.send(&outgoing)).await {
            Ok(Ok(())) => {
                tracing::info!(ticket_id, to, "Closure report delivered");
                true
            }
            Ok(Err(e)) => {
                tracing::warn!(ticket_id, to, error = %e, "Closure report delivery failed");
                false
            }
            Err(_) => {
                tracing::warn!(
                    ticket_id,
                    to,
                    timeout_secs = self.send_timeout.as_secs(),
                    "Closure report delivery timed out",
                );
                false
            }
        }
    }
}
