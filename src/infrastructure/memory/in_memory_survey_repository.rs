//! Survey repository over data held in memory.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::entities::{
    AgeGroup, RegionOption, RegionSelection, SurveyBucket, SurveyRecord,
};
use crate::domain::repositories::SurveyRepository;
use crate::error::AppError;

/// Serves a fixed, shared, read-only bucket set.
///
/// Used by the test suites and by embedders that already hold the data.
#[derive(Debug, Clone)]
pub struct InMemorySurveyRepository {
    buckets: Arc<[SurveyBucket]>,
    regions: Arc<[RegionOption]>,
    age_groups: Arc<[AgeGroup]>,
}

impl InMemorySurveyRepository {
    pub fn new(buckets: Vec<SurveyBucket>) -> Self {
        Self {
            buckets: buckets.into(),
            regions: vec![RegionOption::new(RegionSelection::All, "All regions")].into(),
            age_groups: AgeGroup::defaults().into(),
        }
    }

    /// Buckets individual records first.
    pub fn from_records(records: &[SurveyRecord]) -> Self {
        Self::new(SurveyBucket::from_records(records))
    }

    pub fn with_regions(mut self, regions: Vec<RegionOption>) -> Self {
        self.regions = regions.into();
        self
    }

    pub fn with_age_groups(mut self, age_groups: Vec<AgeGroup>) -> Self {
        self.age_groups = age_groups.into();
        self
    }
}

#[async_trait]
impl SurveyRepository for InMemorySurveyRepository {
    async fn load_buckets(&self) -> Result<Vec<SurveyBucket>, AppError> {
        Ok(self.buckets.to_vec())
    }

    async fn list_regions(&self) -> Result<Vec<RegionOption>, AppError> {
        Ok(self.regions.to_vec())
    }

    async fn list_age_groups(&self) -> Result<Vec<AgeGroup>, AppError> {
        Ok(self.age_groups.to_vec())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
