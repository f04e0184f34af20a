//! Chart orchestration service.

use std::sync::Arc;
use tracing::debug;

use crate::domain::aggregation::GenderSlice;
use crate::domain::chart::{self, ChartContext, ChartPayload, ChartVariant};
use crate::domain::entities::{AgeGroup, RegionOption};
use crate::domain::filter::AggregationFilter;
use crate::domain::period::{self, QuarterPeriod};
use crate::domain::repositories::SurveyRepository;
use crate::error::AppError;

/// Loads survey data and turns it into chart payloads.
///
/// Every call re-reads the record source; no state is kept between requests.
pub struct ChartService<R: SurveyRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: SurveyRepository + ?Sized> ChartService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Sorted distinct quarters of the whole data set.
    ///
    /// Positions in this list are what date-range filters refer to.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::SourceUnavailable`] if the source cannot be read.
    pub async fn quarters(&self) -> Result<Vec<QuarterPeriod>, AppError> {
        let buckets = self.repository.load_buckets().await?;
        Ok(period::distinct_quarters(&buckets))
    }

    pub async fn regions(&self) -> Result<Vec<RegionOption>, AppError> {
        self.repository.list_regions().await
    }

    pub async fn age_groups(&self) -> Result<Vec<AgeGroup>, AppError> {
        self.repository.list_age_groups().await
    }

    /// Builds the payload of one chart variant.
    ///
    /// `gender` only affects [`ChartVariant::UnemploymentByAge`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::SourceUnavailable`] if the source cannot be read.
    pub async fn chart(
        &self,
        variant: ChartVariant,
        filter: &AggregationFilter,
        gender: GenderSlice,
    ) -> Result<ChartPayload, AppError> {
        let (buckets, regions, age_groups) = tokio::try_join!(
            self.repository.load_buckets(),
            self.repository.list_regions(),
            self.repository.list_age_groups(),
        )?;

        let ctx = ChartContext {
            regions,
            age_groups,
            gender,
        };
        let payload = chart::render(variant, &buckets, filter, &ctx)?;

        debug!(
            chart = %variant,
            regions = %filter.regions(),
            buckets = buckets.len(),
            traces = payload.data.len(),
            "Chart built"
        );
        Ok(payload)
    }

    /// Checks that the record source is reachable.
    pub async fn health(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{BucketCounts, RegionSelection, SurveyBucket};
    use crate::domain::repositories::MockSurveyRepository;
    use serde_json::json;

    fn bucket(year: i32, month: u32, region: u8) -> SurveyBucket {
        SurveyBucket::new(
            year,
            month,
            region,
            2,
            BucketCounts {
                working_age: 100,
                male_working_age: 50,
                female_working_age: 50,
                workforce: 60,
                male_workforce: 30,
                female_workforce: 30,
                unemployed: 6,
                male_unemployed: 3,
                female_unemployed: 3,
                ..Default::default()
            },
        )
    }

    fn mock_with_buckets(buckets: Vec<SurveyBucket>) -> MockSurveyRepository {
        let mut mock_repo = MockSurveyRepository::new();
        mock_repo
            .expect_load_buckets()
            .times(1)
            .returning(move || Ok(buckets.clone()));
        mock_repo
    }

    #[tokio::test]
    async fn test_quarters_sorted() {
        let mock_repo = mock_with_buckets(vec![bucket(2020, 2, 1), bucket(2019, 12, 1)]);
        let service = ChartService::new(Arc::new(mock_repo));

        let quarters = service.quarters().await.unwrap();

        let labels: Vec<String> = quarters.iter().map(QuarterPeriod::label).collect();
        assert_eq!(labels, vec!["Q4 2019", "Q1 2020"]);
    }

    #[tokio::test]
    async fn test_chart_uses_region_names() {
        let mut mock_repo = mock_with_buckets(vec![bucket(2020, 1, 7)]);
        mock_repo.expect_list_regions().times(1).returning(|| {
            Ok(vec![RegionOption::new(
                RegionSelection::single(7).unwrap(),
                "Maule",
            )])
        });
        mock_repo
            .expect_list_age_groups()
            .times(1)
            .returning(|| Ok(AgeGroup::defaults()));

        let service = ChartService::new(Arc::new(mock_repo));
        let filter = AggregationFilter::all().with_regions(RegionSelection::single(7).unwrap());

        let payload = service
            .chart(ChartVariant::Unemployment, &filter, GenderSlice::All)
            .await
            .unwrap();

        assert_eq!(payload.layout.title.text, "Region: Maule, age: 15-70+");
        assert_eq!(payload.data.len(), 6);
    }

    #[tokio::test]
    async fn test_chart_propagates_source_errors() {
        let mut mock_repo = MockSurveyRepository::new();
        mock_repo.expect_load_buckets().returning(|| {
            Err(AppError::source_unavailable("down", json!({})))
        });
        mock_repo.expect_list_regions().returning(|| Ok(vec![]));
        mock_repo.expect_list_age_groups().returning(|| Ok(vec![]));

        let service = ChartService::new(Arc::new(mock_repo));

        let result = service
            .chart(ChartVariant::Participation, &AggregationFilter::all(), GenderSlice::All)
            .await;

        assert!(matches!(result, Err(AppError::SourceUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_health_pings_source() {
        let mut mock_repo = MockSurveyRepository::new();
        mock_repo.expect_ping().times(1).returning(|| Ok(()));

        let service = ChartService::new(Arc::new(mock_repo));

        assert!(service.health().await.is_ok());
    }
}
