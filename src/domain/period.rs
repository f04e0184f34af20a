//! Quarter labeling.
//!
//! Months are grouped into calendar quarters for display. Chronological order
//! is carried by [`QuarterPeriod::ordering_key`], never by the label text:
//! `"Q4 2019"` sorts after `"Q1 2020"` as a string.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use crate::domain::entities::SurveyBucket;

/// A calendar quarter of a given year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct QuarterPeriod {
    year: i32,
    quarter: u8,
}

impl QuarterPeriod {
    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn quarter(&self) -> u8 {
        self.quarter
    }

    /// Monotonic in (year, quarter).
    pub fn ordering_key(&self) -> i64 {
        i64::from(self.year) * 4 + i64::from(self.quarter)
    }

    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for QuarterPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{} {}", self.quarter, self.year)
    }
}

impl Ord for QuarterPeriod {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ordering_key().cmp(&other.ordering_key())
    }
}

impl PartialOrd for QuarterPeriod {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Maps a (year, month) pair to its quarter; `None` when the month is not a
/// calendar month.
pub fn label(year: i32, month: u32) -> Option<QuarterPeriod> {
    let date = NaiveDate::from_ymd_opt(year, month, 1)?;
    Some(QuarterPeriod {
        year: date.year(),
        quarter: (date.month0() / 3 + 1) as u8,
    })
}

/// Sorted distinct quarters present in `buckets`.
///
/// This is the list that date-range indices refer to.
pub fn distinct_quarters(buckets: &[SurveyBucket]) -> Vec<QuarterPeriod> {
    buckets
        .iter()
        .filter_map(|b| label(b.year, b.month))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::BucketCounts;

    #[test]
    fn test_quarter_is_ceil_of_month_over_three() {
        for month in 1..=12u32 {
            let period = label(2020, month).unwrap();
            assert_eq!(u32::from(period.quarter()), month.div_ceil(3), "month {month}");
            assert_eq!(period.year(), 2020);
        }
    }

    #[test]
    fn test_invalid_month_has_no_quarter() {
        assert!(label(2020, 0).is_none());
        assert!(label(2020, 13).is_none());
    }

    #[test]
    fn test_label_format() {
        assert_eq!(label(2019, 11).unwrap().label(), "Q4 2019");
        assert_eq!(label(2021, 2).unwrap().to_string(), "Q1 2021");
    }

    #[test]
    fn test_ordering_crosses_year_boundary() {
        let q4_2019 = label(2019, 12).unwrap();
        let q1_2020 = label(2020, 1).unwrap();

        assert!(q4_2019 < q1_2020);
        assert!(q4_2019.ordering_key() < q1_2020.ordering_key());
        // Text order would get this wrong.
        assert!(q4_2019.label() > q1_2020.label());
    }

    #[test]
    fn test_ordering_keys_strictly_increase() {
        let mut previous = None;
        for year in 2010..2025 {
            for month in [1, 4, 7, 10] {
                let key = label(year, month).unwrap().ordering_key();
                if let Some(prev) = previous {
                    assert!(key > prev);
                }
                previous = Some(key);
            }
        }
    }

    #[test]
    fn test_distinct_quarters_sorted_and_deduplicated() {
        let bucket = |year, month| SurveyBucket::new(year, month, 1, 1, BucketCounts::default());
        let buckets = vec![
            bucket(2020, 2),
            bucket(2019, 12),
            bucket(2020, 1),
            bucket(2019, 10),
            bucket(2020, 13),
        ];

        let labels: Vec<String> = distinct_quarters(&buckets)
            .iter()
            .map(QuarterPeriod::label)
            .collect();
        assert_eq!(labels, vec!["Q4 2019", "Q1 2020"]);
    }
}
