//! Well-known role name constants.
//!
//! Roles arrive as an opaque claim on the caller's access token. These must
//! match the values the identity service writes into `users.role`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_SUPERVISOR: &str = "supervisor";
pub const ROLE_TECHNICIAN: &str = "technician";

/// Whether the role may manage assignments, coverage and ticket overrides.
pub fn can_supervise(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_SUPERVISOR
}
