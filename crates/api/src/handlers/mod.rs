pub mod assignments;
pub mod tickets;
