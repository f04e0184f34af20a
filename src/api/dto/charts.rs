//! Query parameters shared by the chart endpoints.

use serde::Deserialize;
use serde_json::json;
use serde_with::{DisplayFromStr, serde_as};
use validator::Validate;

use crate::domain::aggregation::GenderSlice;
use crate::domain::entities::age::{MAX_BRACKET, MIN_BRACKET};
use crate::domain::entities::{AgeRange, RegionSelection};
use crate::domain::filter::{AggregationFilter, DateRange};
use crate::error::AppError;

/// Chart filter as sent by the dashboard.
///
/// Every field is optional; omitted fields select everything.
///
/// - `regions`: `all`, `0`, a code, or a list such as `1,2` / `[1, 2]`
/// - `age_min` / `age_max`: bracket bounds, `1..=12`
/// - `date_from` / `date_to`: positions in `/api/quarters`, given together
/// - `gender`: `all`, `male` or `female` (by-age chart only)
#[serde_as]
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ChartQuery {
    #[validate(length(min = 1, max = 64))]
    pub regions: Option<String>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    #[validate(range(min = 1, max = 12))]
    pub age_min: Option<u8>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    #[validate(range(min = 1, max = 12))]
    pub age_max: Option<u8>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub date_from: Option<usize>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub date_to: Option<usize>,

    #[serde(default)]
    pub gender: GenderSlice,
}

impl ChartQuery {
    /// Validates the parameters and builds the aggregation filter.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidFilter`] for out-of-range brackets, a
    /// malformed region list, an inverted range or a half-specified date range.
    pub fn to_filter(&self) -> Result<AggregationFilter, AppError> {
        self.validate()?;

        let regions = match &self.regions {
            Some(text) => text.parse::<RegionSelection>()?,
            None => RegionSelection::All,
        };

        let age_range = AgeRange::new(
            self.age_min.unwrap_or(MIN_BRACKET),
            self.age_max.unwrap_or(MAX_BRACKET),
        )?;

        let date_range = match (self.date_from, self.date_to) {
            (Some(start), Some(end)) => Some(DateRange::new(start, end)?),
            (None, None) => None,
            (from, to) => {
                return Err(AppError::invalid_filter(
                    "date_from and date_to must be given together",
                    json!({ "date_from": from, "date_to": to }),
                ));
            }
        };

        Ok(AggregationFilter::new(regions, age_range, date_range))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_selects_everything() {
        let filter = ChartQuery::default().to_filter().unwrap();
        assert_eq!(filter, AggregationFilter::all());
    }

    #[test]
    fn test_full_query() {
        let query = ChartQuery {
            regions: Some("[1, 13]".to_string()),
            age_min: Some(2),
            age_max: Some(5),
            date_from: Some(3),
            date_to: Some(8),
            gender: GenderSlice::Male,
        };

        let filter = query.to_filter().unwrap();

        assert!(filter.regions().contains(13));
        assert!(!filter.regions().contains(2));
        assert_eq!(filter.age_range(), AgeRange::new(2, 5).unwrap());
        assert_eq!(filter.date_range(), Some(DateRange::new(3, 8).unwrap()));
    }

    #[test]
    fn test_half_date_range_is_rejected() {
        let query = ChartQuery {
            date_from: Some(2),
            ..Default::default()
        };
        assert!(matches!(
            query.to_filter(),
            Err(AppError::InvalidFilter { .. })
        ));
    }

    #[test]
    fn test_out_of_range_bracket_is_rejected() {
        let query = ChartQuery {
            age_max: Some(13),
            ..Default::default()
        };
        assert!(matches!(
            query.to_filter(),
            Err(AppError::InvalidFilter { .. })
        ));
    }

    #[test]
    fn test_inverted_age_range_is_rejected() {
        let query = ChartQuery {
            age_min: Some(6),
            age_max: Some(2),
            ..Default::default()
        };
        assert!(query.to_filter().is_err());
    }

    #[test]
    fn test_region_expression_is_rejected() {
        let query = ChartQuery {
            regions: Some("__import__('os')".to_string()),
            ..Default::default()
        };
        assert!(query.to_filter().is_err());
    }
}
