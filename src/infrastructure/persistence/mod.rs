//! PostgreSQL repository implementations.
//!
//! # Repositories
//!
//! - [`PgSurveyRepository`] - Survey buckets aggregated from individual responses

pub mod pg_survey_repository;

pub use pg_survey_repository::PgSurveyRepository;
