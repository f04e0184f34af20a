//! Application layer: per-request orchestration.
//!
//! Services consume repository traits and expose the operations the HTTP
//! handlers, the web pages and the admin CLI call.
//!
//! # Available Services
//!
//! - [`services::chart_service::ChartService`] - Quarter lists, lookups and chart payloads

pub mod services;
