//! The dashboard's chart variants.
//!
//! A variant is configuration: which measures to aggregate and how to style
//! them. All of them run through the same aggregator and payload builder.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use super::{BarSeries, ChartPayload, DisplayParams, SHARE_RANGE, SeriesStyle, ValueRange};
use crate::domain::aggregation::{
    AggregatedSeries, Aggregator, GenderSlice, MeasureSpec, SeriesRow,
};
use crate::domain::entities::{
    AgeGroup, AgeRange, Gender, RegionOption, RegionSelection, SurveyBucket, region_name,
};
use crate::domain::filter::AggregationFilter;
use crate::error::AppError;

const TOTAL_COLOR: &str = "rgb(153, 0, 102)";
const MALE_COLOR: &str = "rgb(0, 153, 153)";
const FEMALE_COLOR: &str = "rgb(255, 153, 0)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartVariant {
    Unemployment,
    UnemploymentByAge,
    Participation,
    GenderShare,
    ParticipationByRegion,
    RegionAverage,
}

impl ChartVariant {
    pub const ALL: [ChartVariant; 6] = [
        ChartVariant::Unemployment,
        ChartVariant::UnemploymentByAge,
        ChartVariant::Participation,
        ChartVariant::GenderShare,
        ChartVariant::ParticipationByRegion,
        ChartVariant::RegionAverage,
    ];

    /// Path segment used by the API and the CLI.
    pub fn slug(&self) -> &'static str {
        match self {
            ChartVariant::Unemployment => "unemployment",
            ChartVariant::UnemploymentByAge => "unemployment-by-age",
            ChartVariant::Participation => "participation",
            ChartVariant::GenderShare => "gender-share",
            ChartVariant::ParticipationByRegion => "participation-by-region",
            ChartVariant::RegionAverage => "region-average",
        }
    }
}

impl fmt::Display for ChartVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ChartVariant {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartVariant::ALL
            .into_iter()
            .find(|v| v.slug() == s)
            .ok_or_else(|| {
                AppError::not_found(
                    "Unknown chart",
                    json!({
                        "chart": s,
                        "available": ChartVariant::ALL.map(|v| v.slug()),
                    }),
                )
            })
    }
}

/// Lookup data a variant needs besides the buckets.
#[derive(Debug, Clone, Default)]
pub struct ChartContext {
    pub regions: Vec<RegionOption>,
    pub age_groups: Vec<AgeGroup>,
    pub gender: GenderSlice,
}

/// Aggregates `buckets` and builds the payload for one variant.
pub fn render(
    variant: ChartVariant,
    buckets: &[SurveyBucket],
    filter: &AggregationFilter,
    ctx: &ChartContext,
) -> Result<ChartPayload, AppError> {
    match variant {
        ChartVariant::Unemployment => unemployment(buckets, filter, ctx),
        ChartVariant::UnemploymentByAge => unemployment_by_age(buckets, filter, ctx),
        ChartVariant::Participation => participation(buckets, filter),
        ChartVariant::GenderShare => gender_share(buckets, filter),
        ChartVariant::ParticipationByRegion => participation_by_region(buckets, filter, ctx),
        ChartVariant::RegionAverage => region_average(buckets, filter, ctx),
    }
}

fn gender_styles(prefix: &str, names: [&str; 3]) -> Vec<SeriesStyle> {
    let [total, male, female] = names;
    vec![
        SeriesStyle::new(format!("{prefix}_all"), total)
            .color(TOTAL_COLOR)
            .width(4.0),
        SeriesStyle::new(format!("{prefix}_male"), male)
            .color(MALE_COLOR)
            .width(3.0),
        SeriesStyle::new(format!("{prefix}_female"), female)
            .color(FEMALE_COLOR)
            .width(3.0),
    ]
}

fn per_gender<F>(prefix: &str, measure: F) -> Aggregator
where
    F: Fn(String, GenderSlice) -> MeasureSpec,
{
    Aggregator::new(
        [
            ("all", GenderSlice::All),
            ("male", GenderSlice::Male),
            ("female", GenderSlice::Female),
        ]
        .into_iter()
        .map(|(suffix, slice)| measure(format!("{prefix}_{suffix}"), slice))
        .collect(),
    )
}

fn unemployment(
    buckets: &[SurveyBucket],
    filter: &AggregationFilter,
    ctx: &ChartContext,
) -> Result<ChartPayload, AppError> {
    let series = per_gender("unemployment", |name, slice| {
        MeasureSpec::unemployment_rate(name, slice)
    })
    .aggregate(buckets, filter);
    let title = format!(
        "Region: {}, age: {}",
        region_name(&ctx.regions, filter.regions()),
        filter.age_range().label()
    );
    let params = DisplayParams::new(
        title,
        gender_styles("unemployment", ["all population", "men", "women"]),
    )
    .with_averages()
    .grouped_legend();
    super::build(&series, &params)
}

fn unemployment_by_age(
    buckets: &[SurveyBucket],
    filter: &AggregationFilter,
    ctx: &ChartContext,
) -> Result<ChartPayload, AppError> {
    let groups = if ctx.age_groups.is_empty() {
        AgeGroup::defaults()
    } else {
        ctx.age_groups.clone()
    };

    let aggregator = Aggregator::new(
        groups
            .iter()
            .map(|g| {
                MeasureSpec::unemployment_rate(g.label.clone(), ctx.gender)
                    .restricted_to(g.brackets.iter().copied())
            })
            .collect(),
    );
    // Groups define their own brackets; the request's age range does not apply.
    let filter = filter.clone().with_age_range(AgeRange::full());
    let series = aggregator.aggregate(buckets, &filter);

    let title = format!(
        "Unemployment rate for {}, {}",
        ctx.gender.label(),
        region_name(&ctx.regions, filter.regions())
    );
    let styles = groups
        .iter()
        .map(|g| SeriesStyle::new(g.label.clone(), g.label.clone()).width(3.0))
        .collect();
    super::build(&series, &DisplayParams::new(title, styles))
}

fn participation(
    buckets: &[SurveyBucket],
    filter: &AggregationFilter,
) -> Result<ChartPayload, AppError> {
    let series = per_gender("participation", |name, slice| {
        MeasureSpec::participation_rate(name, slice)
    })
    .aggregate(buckets, filter);
    let params = DisplayParams::new(
        "Workforce participation in population over 15 years",
        gender_styles("participation", ["total", "male", "female"]),
    )
    .value_range(ValueRange::Fixed(SHARE_RANGE));
    super::build(&series, &params)
}

fn gender_share(
    buckets: &[SurveyBucket],
    filter: &AggregationFilter,
) -> Result<ChartPayload, AppError> {
    let series = Aggregator::new(vec![
        MeasureSpec::workforce_share("share_male", Gender::Male),
        MeasureSpec::workforce_share("share_female", Gender::Female),
    ])
    .aggregate(buckets, filter);
    let params = DisplayParams::new(
        "Gender shares in workforce",
        vec![
            SeriesStyle::new("share_male", "male").color(MALE_COLOR),
            SeriesStyle::new("share_female", "female").color(FEMALE_COLOR),
        ],
    )
    .value_range(ValueRange::Fixed(SHARE_RANGE));
    super::build(&series, &params)
}

fn single_region_name(regions: &[RegionOption], code: u8) -> String {
    region_name(regions, &RegionSelection::Codes(BTreeSet::from([code])))
}

fn participation_by_region(
    buckets: &[SurveyBucket],
    filter: &AggregationFilter,
    ctx: &ChartContext,
) -> Result<ChartPayload, AppError> {
    let aggregator = Aggregator::new(vec![MeasureSpec::participation_rate(
        "participation",
        GenderSlice::All,
    )]);
    let per_region = aggregator.aggregate_by_region(buckets, filter);

    // One column per region over the union of their quarters.
    let measures: Vec<String> = per_region.iter().map(|(code, _)| code.to_string()).collect();
    let mut rows: BTreeMap<_, Vec<Option<f64>>> = BTreeMap::new();
    for (i, (_, series)) in per_region.iter().enumerate() {
        for row in series.rows() {
            let values = rows
                .entry(row.period)
                .or_insert_with(|| vec![None; measures.len()]);
            values[i] = row.values[0];
        }
    }
    let combined = AggregatedSeries::new(
        measures,
        rows.into_iter()
            .map(|(period, values)| SeriesRow { period, values })
            .collect(),
    )?;

    let styles = per_region
        .iter()
        .map(|(code, _)| SeriesStyle::new(code.to_string(), single_region_name(&ctx.regions, *code)))
        .collect();
    let params = DisplayParams::new("Workforce participation by region", styles)
        .value_range(ValueRange::Fixed(SHARE_RANGE));
    super::build(&combined, &params)
}

fn region_average(
    buckets: &[SurveyBucket],
    filter: &AggregationFilter,
    ctx: &ChartContext,
) -> Result<ChartPayload, AppError> {
    let aggregator = per_gender("participation", |name, slice| {
        MeasureSpec::participation_rate(name, slice)
    });
    let mut averages: Vec<(String, [Option<f64>; 3])> = aggregator
        .aggregate_by_region(buckets, filter)
        .into_iter()
        .map(|(code, series)| {
            let means = ["all", "male", "female"]
                .map(|suffix| series.column_mean(&format!("participation_{suffix}")));
            (single_region_name(&ctx.regions, code), means)
        })
        .collect();

    // Highest total first; regions without a defined total go last.
    averages.sort_by(|a, b| match (a.1[0], b.1[0]) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    let categories: Vec<String> = averages.iter().map(|(name, _)| name.clone()).collect();
    let bars: Vec<BarSeries> = ["all population", "male", "female"]
        .into_iter()
        .enumerate()
        .map(|(i, name)| BarSeries {
            name: name.to_string(),
            values: averages.iter().map(|(_, means)| means[i]).collect(),
        })
        .collect();

    super::build_bars(
        "Average participation by region",
        &categories,
        &bars,
        ValueRange::Fixed(SHARE_RANGE),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chart::{AxisValues, TraceKind};
    use crate::domain::entities::{AgeRange, BucketCounts};

    fn counts(workforce: u64, unemployed: u64, working_age: u64) -> BucketCounts {
        BucketCounts {
            working_age,
            male_working_age: working_age / 2,
            female_working_age: working_age - working_age / 2,
            workforce,
            male_workforce: workforce / 2,
            female_workforce: workforce - workforce / 2,
            unemployed,
            male_unemployed: unemployed / 2,
            female_unemployed: unemployed - unemployed / 2,
            ..Default::default()
        }
    }

    fn buckets() -> Vec<SurveyBucket> {
        vec![
            SurveyBucket::new(2020, 1, 1, 1, counts(100, 20, 200)),
            SurveyBucket::new(2020, 1, 1, 9, counts(100, 4, 200)),
            SurveyBucket::new(2020, 1, 2, 1, counts(100, 10, 125)),
            SurveyBucket::new(2020, 4, 1, 1, counts(100, 10, 200)),
            SurveyBucket::new(2020, 4, 2, 1, counts(100, 10, 125)),
        ]
    }

    fn ctx() -> ChartContext {
        ChartContext {
            regions: vec![
                RegionOption::new(RegionSelection::All, "Whole country"),
                RegionOption::new(RegionSelection::single(1).unwrap(), "North"),
                RegionOption::new(RegionSelection::single(2).unwrap(), "South"),
            ],
            age_groups: vec![],
            gender: GenderSlice::All,
        }
    }

    fn ys(payload: &ChartPayload, i: usize) -> Vec<Option<f64>> {
        match &payload.data[i].y {
            AxisValues::Numbers(v) => v.clone(),
            AxisValues::Labels(_) => panic!("expected numbers"),
        }
    }

    #[test]
    fn test_variant_slugs_parse() {
        for v in ChartVariant::ALL {
            assert_eq!(v.slug().parse::<ChartVariant>().unwrap(), v);
        }
        assert!(matches!(
            "pie".parse::<ChartVariant>(),
            Err(AppError::NotFound { .. })
        ));
    }

    #[test]
    fn test_unemployment_chart() {
        let filter = AggregationFilter::all().with_age_range(AgeRange::new(1, 3).unwrap());
        let chart = render(ChartVariant::Unemployment, &buckets(), &filter, &ctx()).unwrap();

        assert_eq!(chart.layout.title.text, "Region: Whole country, age: 15-30");
        // three rates plus three averages
        assert_eq!(chart.data.len(), 6);
        assert_eq!(chart.data[0].name, "all population");
        let total = ys(&chart, 0);
        assert!((total[0].unwrap() - 0.15).abs() < 1e-9);
        assert!((total[1].unwrap() - 0.1).abs() < 1e-9);
        assert_eq!(chart.data[3].name, "average");
    }

    #[test]
    fn test_unemployment_by_age_uses_groups() {
        let mut ctx = ctx();
        ctx.gender = GenderSlice::Female;
        let filter = AggregationFilter::all().with_regions(RegionSelection::single(1).unwrap());

        let chart = render(ChartVariant::UnemploymentByAge, &buckets(), &filter, &ctx).unwrap();

        assert_eq!(chart.layout.title.text, "Unemployment rate for female, North");
        assert_eq!(chart.data.len(), AgeGroup::defaults().len());
        assert_eq!(chart.data[0].name, "15-24");
        assert!((ys(&chart, 0)[0].unwrap() - 0.2).abs() < 1e-9);
        assert_eq!(ys(&chart, 1), vec![None, None]);
        assert!((ys(&chart, 4)[0].unwrap() - 0.04).abs() < 1e-9);
    }

    #[test]
    fn test_participation_has_fixed_range() {
        let chart =
            render(ChartVariant::Participation, &buckets(), &AggregationFilter::all(), &ctx())
                .unwrap();
        assert_eq!(chart.layout.yaxis.range, Some(SHARE_RANGE));
        assert_eq!(chart.data.len(), 3);
    }

    #[test]
    fn test_gender_share_sums_to_one() {
        let chart =
            render(ChartVariant::GenderShare, &buckets(), &AggregationFilter::all(), &ctx())
                .unwrap();
        let male = ys(&chart, 0);
        let female = ys(&chart, 1);
        for (m, f) in male.iter().zip(&female) {
            assert!((m.unwrap() + f.unwrap() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_participation_by_region_one_trace_per_region() {
        let chart = render(
            ChartVariant::ParticipationByRegion,
            &buckets(),
            &AggregationFilter::all(),
            &ctx(),
        )
        .unwrap();

        let names: Vec<&str> = chart.data.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["North", "South"]);
        assert!((ys(&chart, 1)[0].unwrap() - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_region_average_sorted_descending() {
        let chart =
            render(ChartVariant::RegionAverage, &buckets(), &AggregationFilter::all(), &ctx())
                .unwrap();

        assert!(chart.data.iter().all(|t| t.kind == TraceKind::Bar));
        assert_eq!(
            chart.data[0].y,
            AxisValues::Labels(vec!["South".to_string(), "North".to_string()])
        );
        let totals = match &chart.data[0].x {
            AxisValues::Numbers(v) => v.clone(),
            AxisValues::Labels(_) => panic!("expected numbers"),
        };
        assert!(totals[0].unwrap() >= totals[1].unwrap());
    }
}
