//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod assignment_repo;
pub mod client_repo;
pub mod closure_audit_repo;
pub mod coverage_repo;
pub mod ticket_repo;
pub mod user_repo;

pub use assignment_repo::AssignmentRepo;
pub use client_repo::ClientRepo;
pub use closure_audit_repo::ClosureAuditRepo;
pub use coverage_repo::CoverageRepo;
pub use ticket_repo::TicketRepo;
pub use user_repo::UserRepo;
