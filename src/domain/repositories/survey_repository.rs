//! Repository trait for survey data access.

use crate::domain::entities::{AgeGroup, RegionOption, SurveyBucket};
use crate::error::AppError;
use async_trait::async_trait;

/// Read-only record source behind every chart.
///
/// Implementations are re-queried on every request; nothing is cached.
///
/// # Implementations
///
/// - [`crate::infrastructure::files::CsvSurveyRepository`] - CSV directory
/// - [`crate::infrastructure::persistence::PgSurveyRepository`] - PostgreSQL
/// - [`crate::infrastructure::memory::InMemorySurveyRepository`] - fixed data
///
/// # Examples
///
/// See integration tests: `tests/repository_csv.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SurveyRepository: Send + Sync {
    /// Loads every survey bucket, unfiltered.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::SourceUnavailable`] when the source cannot be read.
    async fn load_buckets(&self) -> Result<Vec<SurveyBucket>, AppError>;

    /// Region lookup table, including the "all regions" entry when the
    /// source has one.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::SourceUnavailable`] when the source cannot be read.
    async fn list_regions(&self) -> Result<Vec<RegionOption>, AppError>;

    /// Age groups plotted by the by-age chart.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::SourceUnavailable`] when the source cannot be read.
    async fn list_age_groups(&self) -> Result<Vec<AgeGroup>, AppError>;

    /// Checks that the source is reachable.
    async fn ping(&self) -> Result<(), AppError>;
}
