//! Request-scoped aggregation filter.

use serde::Serialize;
use serde_json::json;

use crate::domain::entities::{AgeRange, RegionSelection};
use crate::error::AppError;

/// Inclusive index range over the sorted distinct-quarter list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: usize,
    end: usize,
}

impl DateRange {
    /// # Errors
    ///
    /// Returns [`AppError::InvalidFilter`] when `start > end`.
    pub fn new(start: usize, end: usize) -> Result<Self, AppError> {
        if start > end {
            return Err(AppError::invalid_filter(
                "Date range start exceeds end",
                json!({ "start": start, "end": end }),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }
}

/// Region, age and date restrictions applied by the aggregator.
///
/// Fields are only reachable through validating constructors, so an
/// `AggregationFilter` value is always well formed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AggregationFilter {
    regions: RegionSelection,
    age_range: AgeRange,
    date_range: Option<DateRange>,
}

impl AggregationFilter {
    pub fn new(
        regions: RegionSelection,
        age_range: AgeRange,
        date_range: Option<DateRange>,
    ) -> Self {
        Self {
            regions,
            age_range,
            date_range,
        }
    }

    /// All regions, all working-age brackets, every quarter.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_regions(mut self, regions: RegionSelection) -> Self {
        self.regions = regions;
        self
    }

    pub fn with_age_range(mut self, age_range: AgeRange) -> Self {
        self.age_range = age_range;
        self
    }

    pub fn with_date_range(mut self, date_range: Option<DateRange>) -> Self {
        self.date_range = date_range;
        self
    }

    pub fn regions(&self) -> &RegionSelection {
        &self.regions
    }

    pub fn age_range(&self) -> AgeRange {
        self.age_range
    }

    pub fn date_range(&self) -> Option<DateRange> {
        self.date_range
    }

    pub fn accepts(&self, region: u8, age_bracket: u8) -> bool {
        self.regions.contains(region) && self.age_range.contains(age_bracket)
    }
}
