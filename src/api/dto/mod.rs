//! Data Transfer Objects for API requests and responses.
//!
//! Query DTOs are validated with `validator` and converted into domain types
//! once, at the boundary.

pub mod charts;
pub mod health;
pub mod lookups;
