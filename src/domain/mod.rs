//! Domain layer: survey entities, aggregation and chart building.
//!
//! Everything here is synchronous and free of I/O. Data access is described by
//! the [`repositories`] traits and implemented in `crate::infrastructure`.
//!
//! # Architecture
//!
//! - [`entities`] - Survey records, buckets, region and age selections
//! - [`filter`] - Validated per-request aggregation filter
//! - [`period`] - Month to quarter labeling and chronological ordering
//! - [`aggregation`] - Quarterly series from survey buckets
//! - [`chart`] - Plotly payloads and the dashboard's chart variants
//! - [`repositories`] - Record source trait
//!
//! # Request Flow
//!
//! 1. Query parameters become an [`filter::AggregationFilter`]
//! 2. Buckets are loaded via [`repositories::SurveyRepository`]
//! 3. [`aggregation::Aggregator`] produces an [`aggregation::AggregatedSeries`]
//! 4. [`chart::build`] turns the series into a [`chart::ChartPayload`]

pub mod aggregation;
pub mod chart;
pub mod entities;
pub mod filter;
pub mod period;
pub mod repositories;
