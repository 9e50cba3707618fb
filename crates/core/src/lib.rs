//! Domain logic for field-service ticket ownership and lifecycle.
//!
//! This crate has no internal dependencies so it can be shared by the
//! repository layer, the HTTP server and any future tooling.

pub mod closure_report;
pub mod directory;
pub mod error;
pub mod geo;
pub mod ownership;
pub mod roles;
pub mod ticket_state;
pub mod types;
