//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the caller from a JWT Bearer token.
//! - [`rbac::RequireSupervisor`] -- Requires the `supervisor` or `admin` role.

pub mod auth;
pub mod rbac;
