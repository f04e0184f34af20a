//! Infrastructure layer: concrete record sources.
//!
//! # Modules
//!
//! - [`files`] - CSV directory
//! - [`persistence`] - PostgreSQL
//! - [`memory`] - In-memory data, used by tests and embedders

pub mod files;
pub mod memory;
pub mod persistence;
