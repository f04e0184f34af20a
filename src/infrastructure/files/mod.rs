//! File-backed repository implementations.
//!
//! - [`CsvSurveyRepository`] - Survey buckets and lookup tables from a CSV directory

pub mod csv_survey_repository;

pub use csv_survey_repository::{
    AGE_GROUPS_FILE, BUCKETS_FILE, CsvSurveyRepository, REGIONS_FILE,
};
