//! Caller identity.
//!
//! Tokens are issued by the identity service. This server only validates
//! them ([`jwt`]) and reads the `sub` and `role` claims.

pub mod jwt;
