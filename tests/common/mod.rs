#![allow(dead_code)]

use axum::{Router, routing::get};
use ene_analytics::api;
use ene_analytics::api::handlers::health_handler;
use ene_analytics::domain::entities::{BucketCounts, RegionOption, RegionSelection, SurveyBucket};
use ene_analytics::infrastructure::memory::InMemorySurveyRepository;
use ene_analytics::state::AppState;
use ene_analytics::web;
use std::sync::Arc;

/// Bucket with an even male/female split.
pub fn bucket(
    year: i32,
    month: u32,
    region: u8,
    age_bracket: u8,
    working_age: u64,
    workforce: u64,
    unemployed: u64,
) -> SurveyBucket {
    SurveyBucket::new(
        year,
        month,
        region,
        age_bracket,
        BucketCounts {
            total: working_age,
            working_age,
            male_working_age: working_age / 2,
            female_working_age: working_age - working_age / 2,
            employed: workforce - unemployed,
            unemployed,
            workforce,
            male_workforce: workforce / 2,
            female_workforce: workforce - workforce / 2,
            male_unemployed: unemployed / 2,
            female_unemployed: unemployed - unemployed / 2,
            not_in_workforce: working_age - workforce,
            ..BucketCounts::default()
        },
    )
}

/// Two regions over the first half of 2020.
///
/// Region 1: unemployment 10% in Q1 and 20% in Q2, participation 50%.
/// Region 2: unemployment 10% in both quarters, participation 50%.
pub fn sample_buckets() -> Vec<SurveyBucket> {
    let mut buckets = Vec::new();
    for month in 1..=6 {
        let unemployed = if month <= 3 { 10 } else { 20 };
        buckets.push(bucket(2020, month, 1, 3, 200, 100, unemployed));
        buckets.push(bucket(2020, month, 2, 3, 100, 50, 5));
    }
    buckets
}

pub fn sample_regions() -> Vec<RegionOption> {
    vec![
        RegionOption::new(RegionSelection::All, "All regions"),
        RegionOption::new(RegionSelection::single(1).unwrap(), "North"),
        RegionOption::new(RegionSelection::single(2).unwrap(), "South"),
    ]
}

pub fn create_test_state() -> AppState {
    let repo = InMemorySurveyRepository::new(sample_buckets()).with_regions(sample_regions());
    AppState::new(Arc::new(repo), "memory")
}

pub fn create_test_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api::routes::routes())
        .nest("/dashboard", web::routes::routes())
        .with_state(state)
}

pub fn assert_close(actual: &serde_json::Value, expected: f64) {
    let actual = actual
        .as_f64()
        .unwrap_or_else(|| panic!("expected a number, got {actual}"));
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
