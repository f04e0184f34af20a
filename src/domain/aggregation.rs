//! Survey aggregation engine.
//!
//! Turns pre-aggregated survey buckets into a quarterly time series. Every
//! chart variant feeds the same engine; variants differ only in the list of
//! [`MeasureSpec`]s they request.
//!
//! # Pipeline
//!
//! 1. Drop buckets outside the filter's regions and age range
//! 2. Sum counts per (year, month), per measure
//! 3. Label each month with its [`QuarterPeriod`]
//! 4. Average the monthly values inside each quarter (mean of sums)
//! 5. Derive ratios, monthly or quarterly depending on [`RatioBasis`]
//! 6. Order rows chronologically and apply the positional date range

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

use crate::domain::entities::{
    BucketCounts, CountField, Gender, RegionSelection, SurveyBucket,
};
use crate::domain::filter::{AggregationFilter, DateRange};
use crate::domain::period::{self, QuarterPeriod};
use crate::error::AppError;
use crate::utils::stats::{self, mean_defined};

/// Names of the measures produced by [`Aggregator::standard`].
pub mod names {
    pub const WORKING_AGE: &str = "working_age";
    pub const WORKFORCE: &str = "workforce";
    pub const EMPLOYED: &str = "employed";
    pub const UNEMPLOYED: &str = "unemployed";
    pub const UNEMPLOYMENT_RATE: &str = "unemployment_rate";
    pub const UNEMPLOYMENT_RATE_MALE: &str = "unemployment_rate_male";
    pub const UNEMPLOYMENT_RATE_FEMALE: &str = "unemployment_rate_female";
    pub const PARTICIPATION_RATE: &str = "participation_rate";
    pub const PARTICIPATION_RATE_MALE: &str = "participation_rate_male";
    pub const PARTICIPATION_RATE_FEMALE: &str = "participation_rate_female";
    pub const WORKFORCE_SHARE_MALE: &str = "workforce_share_male";
    pub const WORKFORCE_SHARE_FEMALE: &str = "workforce_share_female";
}

/// Granularity at which a ratio is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RatioBasis {
    /// Ratio per month, then the mean of the defined monthly ratios.
    #[default]
    Monthly,
    /// Mean numerator over mean denominator for the whole quarter.
    Quarterly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureKind {
    Count(CountField),
    Ratio {
        numerator: CountField,
        denominator: CountField,
        basis: RatioBasis,
    },
}

/// Population slice selected by the gender control of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenderSlice {
    #[default]
    All,
    Male,
    Female,
}

impl GenderSlice {
    pub fn label(&self) -> &'static str {
        match self {
            GenderSlice::All => "all population",
            GenderSlice::Male => "male",
            GenderSlice::Female => "female",
        }
    }
}

/// A named measure computed for every quarter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasureSpec {
    pub name: String,
    pub kind: MeasureKind,
    /// Optional bracket subset, applied on top of the filter's age range.
    pub brackets: Option<BTreeSet<u8>>,
}

impl MeasureSpec {
    pub fn count(name: impl Into<String>, field: CountField) -> Self {
        Self {
            name: name.into(),
            kind: MeasureKind::Count(field),
            brackets: None,
        }
    }

    pub fn ratio(name: impl Into<String>, numerator: CountField, denominator: CountField) -> Self {
        Self {
            name: name.into(),
            kind: MeasureKind::Ratio {
                numerator,
                denominator,
                basis: RatioBasis::default(),
            },
            brackets: None,
        }
    }

    /// Unemployed over workforce.
    pub fn unemployment_rate(name: impl Into<String>, slice: GenderSlice) -> Self {
        let (numerator, denominator) = match slice {
            GenderSlice::All => (CountField::Unemployed, CountField::Workforce),
            GenderSlice::Male => (CountField::MaleUnemployed, CountField::MaleWorkforce),
            GenderSlice::Female => (CountField::FemaleUnemployed, CountField::FemaleWorkforce),
        };
        Self::ratio(name, numerator, denominator)
    }

    /// Workforce over working-age population.
    pub fn participation_rate(name: impl Into<String>, slice: GenderSlice) -> Self {
        let (numerator, denominator) = match slice {
            GenderSlice::All => (CountField::Workforce, CountField::WorkingAge),
            GenderSlice::Male => (CountField::MaleWorkforce, CountField::MaleWorkingAge),
            GenderSlice::Female => (CountField::FemaleWorkforce, CountField::FemaleWorkingAge),
        };
        Self::ratio(name, numerator, denominator)
    }

    /// Share of one gender in the workforce.
    pub fn workforce_share(name: impl Into<String>, gender: Gender) -> Self {
        let numerator = match gender {
            Gender::Male => CountField::MaleWorkforce,
            Gender::Female => CountField::FemaleWorkforce,
        };
        Self::ratio(name, numerator, CountField::Workforce)
    }

    pub fn with_basis(mut self, basis: RatioBasis) -> Self {
        if let MeasureKind::Ratio { basis: b, .. } = &mut self.kind {
            *b = basis;
        }
        self
    }

    pub fn restricted_to<I: IntoIterator<Item = u8>>(mut self, brackets: I) -> Self {
        self.brackets = Some(brackets.into_iter().collect());
        self
    }

    fn month_counts(&self, by_bracket: &BTreeMap<u8, BucketCounts>) -> BucketCounts {
        by_bracket
            .iter()
            .filter(|(bracket, _)| {
                self.brackets
                    .as_ref()
                    .is_none_or(|set| set.contains(bracket))
            })
            .fold(BucketCounts::default(), |acc, (_, counts)| acc + *counts)
    }
}

/// One quarter of the aggregated series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesRow {
    pub period: QuarterPeriod,
    /// One entry per measure, `None` where the value is undefined.
    pub values: Vec<Option<f64>>,
}

/// Chronologically ordered quarterly series; every row has every measure.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AggregatedSeries {
    measures: Vec<String>,
    rows: Vec<SeriesRow>,
}

impl AggregatedSeries {
    /// Builds a series from prepared rows, sorting them chronologically.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if a row does not carry exactly one
    /// value per measure.
    pub fn new(measures: Vec<String>, mut rows: Vec<SeriesRow>) -> Result<Self, AppError> {
        if let Some(bad) = rows.iter().find(|r| r.values.len() != measures.len()) {
            return Err(AppError::internal(
                "Series row does not match its measures",
                json!({
                    "period": bad.period.label(),
                    "values": bad.values.len(),
                    "measures": measures.len(),
                }),
            ));
        }
        rows.sort_by_key(|r| r.period);
        Ok(Self { measures, rows })
    }

    pub fn measures(&self) -> &[String] {
        &self.measures
    }

    pub fn rows(&self) -> &[SeriesRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn periods(&self) -> Vec<QuarterPeriod> {
        self.rows.iter().map(|r| r.period).collect()
    }

    pub fn labels(&self) -> Vec<String> {
        self.rows.iter().map(|r| r.period.label()).collect()
    }

    /// Values of one measure across all rows.
    pub fn column(&self, measure: &str) -> Option<Vec<Option<f64>>> {
        let idx = self.measures.iter().position(|m| m == measure)?;
        Some(self.rows.iter().map(|r| r.values[idx]).collect())
    }

    /// Mean of the defined values of one measure.
    pub fn column_mean(&self, measure: &str) -> Option<f64> {
        mean_defined(&self.column(measure)?)
    }
}

#[derive(Debug, Clone, Default)]
struct MeasureAccumulator {
    months: usize,
    values: Vec<f64>,
    numerator_sum: f64,
    denominator_sum: f64,
}

impl MeasureAccumulator {
    fn push_month(&mut self, kind: MeasureKind, counts: &BucketCounts) {
        self.months += 1;
        match kind {
            MeasureKind::Count(field) => self.values.push(counts.get(field) as f64),
            MeasureKind::Ratio {
                numerator,
                denominator,
                ..
            } => {
                let n = counts.get(numerator) as f64;
                let d = counts.get(denominator) as f64;
                self.numerator_sum += n;
                self.denominator_sum += d;
                if let Some(r) = stats::ratio(n, d) {
                    self.values.push(r);
                }
            }
        }
    }

    fn finish(&self, kind: MeasureKind) -> Option<f64> {
        match kind {
            MeasureKind::Count(_)
            | MeasureKind::Ratio {
                basis: RatioBasis::Monthly,
                ..
            } => stats::mean(self.values.iter().copied()),
            MeasureKind::Ratio {
                basis: RatioBasis::Quarterly,
                ..
            } => {
                let months = self.months as f64;
                stats::ratio(self.numerator_sum / months, self.denominator_sum / months)
            }
        }
    }
}

/// Aggregates survey buckets into a quarterly series for a fixed measure list.
#[derive(Debug, Clone)]
pub struct Aggregator {
    measures: Vec<MeasureSpec>,
}

impl Aggregator {
    pub fn new(measures: Vec<MeasureSpec>) -> Self {
        Self { measures }
    }

    /// Headcounts plus unemployment and participation rates for the whole
    /// population, men and women.
    pub fn standard() -> Self {
        use names::*;
        Self::new(vec![
            MeasureSpec::count(WORKING_AGE, CountField::WorkingAge),
            MeasureSpec::count(WORKFORCE, CountField::Workforce),
            MeasureSpec::count(EMPLOYED, CountField::Employed),
            MeasureSpec::count(UNEMPLOYED, CountField::Unemployed),
            MeasureSpec::unemployment_rate(UNEMPLOYMENT_RATE, GenderSlice::All),
            MeasureSpec::unemployment_rate(UNEMPLOYMENT_RATE_MALE, GenderSlice::Male),
            MeasureSpec::unemployment_rate(UNEMPLOYMENT_RATE_FEMALE, GenderSlice::Female),
            MeasureSpec::participation_rate(PARTICIPATION_RATE, GenderSlice::All),
            MeasureSpec::participation_rate(PARTICIPATION_RATE_MALE, GenderSlice::Male),
            MeasureSpec::participation_rate(PARTICIPATION_RATE_FEMALE, GenderSlice::Female),
        ])
    }

    pub fn measures(&self) -> &[MeasureSpec] {
        &self.measures
    }

    pub fn aggregate(&self, buckets: &[SurveyBucket], filter: &AggregationFilter) -> AggregatedSeries {
        let window = quarter_window(buckets, filter.date_range());

        let mut months: BTreeMap<(i32, u32), BTreeMap<u8, BucketCounts>> = BTreeMap::new();
        let mut skipped = 0usize;
        for bucket in buckets {
            if !filter.accepts(bucket.region, bucket.age_bracket) {
                continue;
            }
            if !(1..=12).contains(&bucket.month) {
                skipped += 1;
                continue;
            }
            *months
                .entry((bucket.year, bucket.month))
                .or_default()
                .entry(bucket.age_bracket)
                .or_default() += bucket.counts;
        }
        if skipped > 0 {
            warn!(skipped, "Skipped survey buckets with an invalid month");
        }

        let mut quarters: BTreeMap<QuarterPeriod, Vec<MeasureAccumulator>> = BTreeMap::new();
        for ((year, month), by_bracket) in &months {
            let Some(period) = period::label(*year, *month) else {
                continue;
            };
            if window.as_ref().is_some_and(|w| !w.contains(&period)) {
                continue;
            }

            let accumulators = quarters
                .entry(period)
                .or_insert_with(|| vec![MeasureAccumulator::default(); self.measures.len()]);
            for (acc, measure) in accumulators.iter_mut().zip(&self.measures) {
                acc.push_month(measure.kind, &measure.month_counts(by_bracket));
            }
        }

        let rows: Vec<SeriesRow> = quarters
            .into_iter()
            .map(|(period, accumulators)| SeriesRow {
                period,
                values: accumulators
                    .iter()
                    .zip(&self.measures)
                    .map(|(acc, measure)| acc.finish(measure.kind))
                    .collect(),
            })
            .collect();

        debug!(
            buckets = buckets.len(),
            months = months.len(),
            rows = rows.len(),
            "Aggregated survey buckets"
        );

        AggregatedSeries {
            measures: self.measures.iter().map(|m| m.name.clone()).collect(),
            rows,
        }
    }

    /// Runs the pipeline once per region present in the filtered data.
    ///
    /// Date-range indices still refer to the quarter list of all `buckets`.
    pub fn aggregate_by_region(
        &self,
        buckets: &[SurveyBucket],
        filter: &AggregationFilter,
    ) -> Vec<(u8, AggregatedSeries)> {
        let regions: BTreeSet<u8> = buckets
            .iter()
            .filter(|b| filter.accepts(b.region, b.age_bracket))
            .map(|b| b.region)
            .collect();

        regions
            .into_iter()
            .map(|region| {
                let single = filter
                    .clone()
                    .with_regions(RegionSelection::Codes(BTreeSet::from([region])));
                (region, self.aggregate(buckets, &single))
            })
            .collect()
    }
}

/// Aggregates with the standard measure set.
pub fn aggregate(buckets: &[SurveyBucket], filter: &AggregationFilter) -> AggregatedSeries {
    Aggregator::standard().aggregate(buckets, filter)
}

/// Quarters selected by a positional date range, or `None` for no restriction.
///
/// The end index is clamped to the last quarter; a start past the end of the
/// list selects nothing.
fn quarter_window(
    buckets: &[SurveyBucket],
    date_range: Option<DateRange>,
) -> Option<BTreeSet<QuarterPeriod>> {
    let range = date_range?;
    let all = period::distinct_quarters(buckets);
    let end = range.end().min(all.len().saturating_sub(1));
    Some(
        all.get(range.start()..=end)
            .map(|slice| slice.iter().copied().collect())
            .unwrap_or_default(),
    )
}
