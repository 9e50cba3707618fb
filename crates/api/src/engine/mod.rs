//! Request-scoped business services shared through [`AppState`](crate::state::AppState).
//!
//! - [`resolver::OwnershipResolver`] -- computes the owning technician for a client.
//! - [`lifecycle::TicketLifecycle`] -- guarded ticket state changes.
//! - [`closure::ClosureNotifier`] -- best-effort client report plus audit row.

pub mod closure;
pub mod lifecycle;
pub mod resolver;
