//! CSV implementation of the survey repository.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::domain::entities::{
    AgeGroup, BucketCounts, RegionOption, RegionSelection, SurveyBucket,
};
use crate::domain::repositories::SurveyRepository;
use crate::error::AppError;

pub const BUCKETS_FILE: &str = "survey_buckets.csv";
pub const REGIONS_FILE: &str = "regions.csv";
pub const AGE_GROUPS_FILE: &str = "age_ranges.csv";

/// Reads pre-aggregated buckets and lookup tables from a directory.
///
/// Files are re-read on every call, so replacing them takes effect on the
/// next request. Parsing runs on the blocking thread pool.
///
/// Expected files:
///
/// - `survey_buckets.csv` - `year,month,region,age_bracket` plus count columns
/// - `regions.csv` - `id,name`, where `id` is `[0]` for all regions or a list such as `[1,2]`
/// - `age_ranges.csv` - `range,label`, where `range` is a bracket list such as `[1,2]`
///
/// The lookup files are optional; without them the repository falls back to
/// an "All regions" entry and the default age groups.
#[derive(Debug, Clone)]
pub struct CsvSurveyRepository {
    dir: PathBuf,
}

impl CsvSurveyRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }
}

#[derive(Debug, Deserialize)]
struct BucketRecord {
    year: i32,
    month: u32,
    region: u8,
    #[serde(alias = "tramo_edad")]
    age_bracket: u8,
    #[serde(default)]
    total: u64,
    #[serde(default, alias = "under_15")]
    under_working_age: u64,
    #[serde(alias = "over_15")]
    working_age: u64,
    #[serde(alias = "male_over_15")]
    male_working_age: u64,
    #[serde(alias = "female_over_15")]
    female_working_age: u64,
    #[serde(default)]
    employed: u64,
    unemployed: u64,
    #[serde(alias = "is_workforce")]
    workforce: u64,
    male_workforce: u64,
    female_workforce: u64,
    male_unemployed: u64,
    female_unemployed: u64,
    #[serde(default, alias = "not_workforce")]
    not_in_workforce: u64,
}

impl From<BucketRecord> for SurveyBucket {
    fn from(r: BucketRecord) -> Self {
        SurveyBucket::new(
            r.year,
            r.month,
            r.region,
            r.age_bracket,
            BucketCounts {
                total: r.total,
                under_working_age: r.under_working_age,
                working_age: r.working_age,
                male_working_age: r.male_working_age,
                female_working_age: r.female_working_age,
                employed: r.employed,
                unemployed: r.unemployed,
                workforce: r.workforce,
                male_workforce: r.male_workforce,
                female_workforce: r.female_workforce,
                male_unemployed: r.male_unemployed,
                female_unemployed: r.female_unemployed,
                not_in_workforce: r.not_in_workforce,
            },
        )
    }
}

#[derive(Debug, Deserialize)]
struct RegionRecord {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct AgeGroupRecord {
    range: String,
    label: String,
}

/// Parses a bracket list such as `[1,2]` or `3, 4`.
fn parse_brackets(text: &str) -> Result<BTreeSet<u8>, AppError> {
    let trimmed = text.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(trimmed);

    let brackets = inner
        .split(',')
        .map(|part| {
            part.trim().parse::<u8>().map_err(|_| {
                AppError::source_unavailable(
                    "Malformed age bracket list",
                    json!({ "file": AGE_GROUPS_FILE, "value": text }),
                )
            })
        })
        .collect::<Result<BTreeSet<u8>, AppError>>()?;
    Ok(brackets)
}

fn read_buckets(path: &Path) -> Result<Vec<SurveyBucket>, AppError> {
    let mut reader = csv::Reader::from_path(path)?;
    let buckets = reader
        .deserialize::<BucketRecord>()
        .map(|row| row.map(SurveyBucket::from))
        .collect::<Result<Vec<_>, csv::Error>>()?;
    Ok(buckets)
}

fn read_regions(path: &Path) -> Result<Vec<RegionOption>, AppError> {
    if !path.exists() {
        debug!(path = %path.display(), "No region table, using fallback");
        return Ok(vec![RegionOption::new(RegionSelection::All, "All regions")]);
    }

    let mut reader = csv::Reader::from_path(path)?;
    let mut options = Vec::new();
    for row in reader.deserialize::<RegionRecord>() {
        let row = row?;
        match row.id.parse::<RegionSelection>() {
            Ok(selection) => options.push(RegionOption::new(selection, row.name)),
            Err(e) => warn!(id = %row.id, error = %e, "Skipping malformed region entry"),
        }
    }
    Ok(options)
}

fn read_age_groups(path: &Path) -> Result<Vec<AgeGroup>, AppError> {
    if !path.exists() {
        debug!(path = %path.display(), "No age group table, using defaults");
        return Ok(AgeGroup::defaults());
    }

    let mut reader = csv::Reader::from_path(path)?;
    reader
        .deserialize::<AgeGroupRecord>()
        .map(|row| {
            let row = row?;
            Ok(AgeGroup::new(row.label, parse_brackets(&row.range)?))
        })
        .collect()
}

async fn blocking<T, F>(f: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        AppError::source_unavailable("CSV reader task failed", json!({ "reason": e.to_string() }))
    })?
}

#[async_trait]
impl SurveyRepository for CsvSurveyRepository {
    async fn load_buckets(&self) -> Result<Vec<SurveyBucket>, AppError> {
        let path = self.path(BUCKETS_FILE);
        let buckets = blocking(move || read_buckets(&path)).await?;
        debug!(rows = buckets.len(), dir = %self.dir.display(), "Loaded survey buckets");
        Ok(buckets)
    }

    async fn list_regions(&self) -> Result<Vec<RegionOption>, AppError> {
        let path = self.path(REGIONS_FILE);
        blocking(move || read_regions(&path)).await
    }

    async fn list_age_groups(&self) -> Result<Vec<AgeGroup>, AppError> {
        let path = self.path(AGE_GROUPS_FILE);
        blocking(move || read_age_groups(&path)).await
    }

    async fn ping(&self) -> Result<(), AppError> {
        let path = self.path(BUCKETS_FILE);
        let meta = tokio::fs::metadata(&path).await?;
        if !meta.is_file() {
            return Err(AppError::source_unavailable(
                "Survey data is not a file",
                json!({ "path": path.display().to_string() }),
            ));
        }
        Ok(())
    }
}
