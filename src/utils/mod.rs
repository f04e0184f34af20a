//! Small shared helpers.

pub mod stats;
