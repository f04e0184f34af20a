//! HTTP request handlers for API endpoints.

pub mod charts;
pub mod health;
pub mod lookups;

pub use charts::chart_handler;
pub use health::health_handler;
pub use lookups::{age_brackets_handler, age_groups_handler, quarters_handler, regions_handler};
