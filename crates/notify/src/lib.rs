//! Outbound delivery of closure reports.
//!
//! - [`ReportSender`] -- the send primitive the closure notifier depends on.
//! - [`EmailDelivery`] -- SMTP implementation over `lettre`.
//! - [`DisabledSender`] -- used when no mail transport is configured; every
//!   send fails without touching the network.

pub mod email;

use async_trait::async_trait;

pub use email::{EmailConfig, EmailDelivery};

/// Error type for report delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),

    /// No delivery channel is configured.
    #[error("Report delivery is disabled")]
    Disabled,
}

/// A plain-text report addressed to one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingReport {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Sends one report. Implementations must not retry; the caller records the
/// outcome.
#[async_trait]
pub trait ReportSender: Send + Sync {
    async fn send(&self, report: &OutgoingReport) -> Result<(), SendError>;
}

/// Sender used when delivery is not configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledSender;

#[async_trait]
impl ReportSender for DisabledSender {
    async fn send(&self, report: &OutgoingReport) -> Result<(), SendError> {
        tracing::debug!(to = %report.to, "Report delivery disabled, skipping send");
        Err(SendError::Disabled)
    }
}
