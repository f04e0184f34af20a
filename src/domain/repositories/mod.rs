//! Repository trait definitions for the domain layer.
//!
//! # Available Repositories
//!
//! - [`SurveyRepository`] - Read-only access to survey buckets and lookup tables
//!
//! Implementations live in `crate::infrastructure`; a mock is generated via
//! `mockall` for unit tests.

pub mod survey_repository;

pub use survey_repository::SurveyRepository;

#[cfg(test)]
pub use survey_repository::MockSurveyRepository;
