//! CLI command implementations.

pub mod aggregate;
pub mod check;
pub mod verify;
