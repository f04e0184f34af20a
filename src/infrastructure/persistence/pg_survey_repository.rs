//! PostgreSQL implementation of the survey repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::warn;

use crate::domain::entities::{
    AgeGroup, BucketCounts, RegionOption, RegionSelection, SurveyBucket,
};
use crate::domain::repositories::SurveyRepository;
use crate::error::AppError;

/// Display name of the synthetic "all regions" lookup entry.
pub const ALL_REGIONS_NAME: &str = "All regions";

/// Reads individual responses from the `ene` table and aggregates them into
/// buckets in SQL.
///
/// Status codes in `activ`: `1` employed, `2` unemployed, `3` outside the
/// workforce, `NULL` under working age. `sexo`: `1` male, `2` female.
pub struct PgSurveyRepository {
    pool: Arc<PgPool>,
}

impl PgSurveyRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BucketRow {
    year: i32,
    month: i32,
    region: i32,
    age_bracket: i32,
    total: i64,
    under_working_age: i64,
    working_age: i64,
    male_working_age: i64,
    female_working_age: i64,
    employed: i64,
    unemployed: i64,
    workforce: i64,
    male_workforce: i64,
    female_workforce: i64,
    male_unemployed: i64,
    female_unemployed: i64,
    not_in_workforce: i64,
}

fn count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

impl BucketRow {
    fn into_bucket(self) -> Option<SurveyBucket> {
        let month = u32::try_from(self.month).ok()?;
        let region = u8::try_from(self.region).ok()?;
        let age_bracket = u8::try_from(self.age_bracket).ok()?;
        Some(SurveyBucket::new(
            self.year,
            month,
            region,
            age_bracket,
            BucketCounts {
                total: count(self.total),
                under_working_age: count(self.under_working_age),
                working_age: count(self.working_age),
                male_working_age: count(self.male_working_age),
                female_working_age: count(self.female_working_age),
                employed: count(self.employed),
                unemployed: count(self.unemployed),
                workforce: count(self.workforce),
                male_workforce: count(self.male_workforce),
                female_workforce: count(self.female_workforce),
                male_unemployed: count(self.male_unemployed),
                female_unemployed: count(self.female_unemployed),
                not_in_workforce: count(self.not_in_workforce),
            },
        ))
    }
}

#[derive(sqlx::FromRow)]
struct RegionRow {
    id: i32,
    name: String,
}

#[async_trait]
impl SurveyRepository for PgSurveyRepository {
    async fn load_buckets(&self) -> Result<Vec<SurveyBucket>, AppError> {
        let rows = sqlx::query_as::<_, BucketRow>(
            r#"
            SELECT ano_trimestre AS year,
                   mes_central AS month,
                   region_15 AS region,
                   COALESCE(tramo_edad, 0) AS age_bracket,
                   COUNT(*)::BIGINT AS total,
                   SUM(CASE WHEN activ IS NULL THEN 1 ELSE 0 END)::BIGINT AS under_working_age,
                   SUM(CASE WHEN activ IS NOT NULL THEN 1 ELSE 0 END)::BIGINT AS working_age,
                   SUM(CASE WHEN activ IS NOT NULL AND sexo = 1 THEN 1 ELSE 0 END)::BIGINT AS male_working_age,
                   SUM(CASE WHEN activ IS NOT NULL AND sexo = 2 THEN 1 ELSE 0 END)::BIGINT AS female_working_age,
                   SUM(CASE WHEN activ = 1 THEN 1 ELSE 0 END)::BIGINT AS employed,
                   SUM(CASE WHEN activ = 2 THEN 1 ELSE 0 END)::BIGINT AS unemployed,
                   SUM(CASE WHEN activ IN (1, 2) THEN 1 ELSE 0 END)::BIGINT AS workforce,
                   SUM(CASE WHEN activ IN (1, 2) AND sexo = 1 THEN 1 ELSE 0 END)::BIGINT AS male_workforce,
                   SUM(CASE WHEN activ IN (1, 2) AND sexo = 2 THEN 1 ELSE 0 END)::BIGINT AS female_workforce,
                   SUM(CASE WHEN activ = 2 AND sexo = 1 THEN 1 ELSE 0 END)::BIGINT AS male_unemployed,
                   SUM(CASE WHEN activ = 2 AND sexo = 2 THEN 1 ELSE 0 END)::BIGINT AS female_unemployed,
                   SUM(CASE WHEN activ = 3 THEN 1 ELSE 0 END)::BIGINT AS not_in_workforce
            FROM ene
            GROUP BY ano_trimestre, mes_central, region_15, COALESCE(tramo_edad, 0)
            ORDER BY 1, 2, 3, 4
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        let fetched = rows.len();
        let buckets: Vec<SurveyBucket> = rows.into_iter().filter_map(BucketRow::into_bucket).collect();
        if buckets.len() < fetched {
            warn!(
                skipped = fetched - buckets.len(),
                "Skipped survey rows with out-of-range codes"
            );
        }
        Ok(buckets)
    }

    async fn list_regions(&self) -> Result<Vec<RegionOption>, AppError> {
        let rows = sqlx::query_as::<_, RegionRow>("SELECT id, name FROM ene_region ORDER BY id")
            .fetch_all(self.pool.as_ref())
            .await?;

        let mut options = vec![RegionOption::new(RegionSelection::All, ALL_REGIONS_NAME)];
        for row in rows {
            let selection = u8::try_from(row.id)
                .map_err(|_| ())
                .and_then(|code| RegionSelection::single(code).map_err(|_| ()));
            match selection {
                Ok(selection) => options.push(RegionOption::new(selection, row.name)),
                Err(()) => warn!(id = row.id, "Skipping region with out-of-range id"),
            }
        }
        Ok(options)
    }

    async fn list_age_groups(&self) -> Result<Vec<AgeGroup>, AppError> {
        Ok(AgeGroup::defaults())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
