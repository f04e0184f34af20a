//! In-process repository implementations.

pub mod in_memory_survey_repository;

pub use in_memory_survey_repository::InMemorySurveyRepository;
