//! Composition of the visit report sent to a client when a ticket closes.
//!
//! Pure formatting only. Delivery and the audit trail live in the API
//! crate's closure notifier.

use crate::types::{DbId, Timestamp};

/// Stored as the contact address when the client has no usable email.
pub const NO_CONTACT_MARKER: &str = "sin contacto";

/// Client name used when the client record cannot be found.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Technician name used when the ticket has no assignee or the user is gone.
pub const UNASSIGNED_TECHNICIAN: &str = "unassigned";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

/// Everything the report mentions about a closed visit.
#[derive(Debug, Clone)]
pub struct ClosureContext<'a> {
    pub ticket_id: DbId,
    pub title: &'a str,
    pub client_name: &'a str,
    pub technician_name: &'a str,
    pub created_at: Timestamp,
    pub check_in_at: Option<Timestamp>,
    pub check_in_lat: Option<f64>,
    pub check_in_lng: Option<f64>,
    pub check_out_at: Option<Timestamp>,
    pub check_out_lat: Option<f64>,
    pub check_out_lng: Option<f64>,
    pub closed_at: Option<Timestamp>,
    pub closing_report: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedReport {
    pub subject: String,
    pub body: String,
}

/// Return the client's contact address if it looks deliverable.
pub fn usable_contact(address: Option<&str>) -> Option<String> {
    address
        .map(str::trim)
        .filter(|a| !a.is_empty() && a.contains('@'))
        .map(str::to_string)
}

/// Build the subject line and plain-text body for a closed ticket.
pub fn compose(ctx: &ClosureContext<'_>) -> ComposedReport {
    let subject = format!("Visita #{} finalizada: {}", ctx.ticket_id, ctx.title);

    let body = format!(
        "Cliente: {client}\n\
         Técnico: {tech}\n\
         Ticket: #{id} {title}\n\
         Creado: {created}\n\
         Check-in: {check_in} ({check_in_pos})\n\
         Check-out: {check_out} ({check_out_pos})\n\
         Cerrado: {closed}\n\
         \n\
         Reporte:\n{report}\n",
        client = ctx.client_name,
        tech = ctx.technician_name,
        id = ctx.ticket_id,
        title = ctx.title,
        created = format_timestamp(Some(ctx.created_at)),
        check_in = format_timestamp(ctx.check_in_at),
        check_in_pos = format_position(ctx.check_in_lat, ctx.check_in_lng),
        check_out = format_timestamp(ctx.check_out_at),
        check_out_pos = format_position(ctx.check_out_lat, ctx.check_out_lng),
        closed = format_timestamp(ctx.closed_at),
        report = ctx.closing_report.unwrap_or("-"),
    );

    ComposedReport { subject, body }
}

fn format_timestamp(ts: Option<Timestamp>) -> String {
    ts.map(|t| t.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn format_position(lat: Option<f64>, lng: Option<f64>) -> String {
    match (lat, lng) {
        (Some(lat), Some(lng)) => format!("{lat:.6}, {lng:.6}"),
        _ => "sin ubicación".to_string(),
    }
}
