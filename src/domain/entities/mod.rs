//! Core domain entities of the labor-force survey.
//!
//! Entities are plain data structures; the only behavior they carry is
//! validation at construction and small lookups.
//!
//! # Entity Types
//!
//! - [`SurveyRecord`] / [`SurveyBucket`] - raw and pre-aggregated survey rows
//! - [`RegionSelection`] / [`RegionOption`] - region filter and lookup table
//! - [`AgeRange`] / [`AgeGroup`] - age bracket filter and grouping table

pub mod age;
pub mod region;
pub mod survey;

pub use age::{AgeGroup, AgeRange, age_label};
pub use region::{MAX_REGION_CODE, RegionOption, RegionSelection, region_name};
pub use survey::{BucketCounts, CountField, EmploymentStatus, Gender, SurveyBucket, SurveyRecord};
