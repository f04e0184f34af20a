//! Age brackets, age ranges and age groups.
//!
//! The survey codes ages in twelve five-year brackets starting at 15; bracket
//! [`OPEN_BRACKET`] is open-ended (70 and older). Bracket `0` marks
//! respondents under working age and never takes part in an [`AgeRange`].

use crate::error::AppError;
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeSet;

pub const MIN_BRACKET: u8 = 1;
pub const MAX_BRACKET: u8 = 12;

/// The open-ended "70+" bracket.
pub const OPEN_BRACKET: u8 = MAX_BRACKET;

/// Inclusive range of age brackets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AgeRange {
    min: u8,
    max: u8,
}

impl AgeRange {
    /// # Errors
    ///
    /// Returns [`AppError::InvalidFilter`] when either bound lies outside
    /// `1..=12` or `min > max`.
    pub fn new(min: u8, max: u8) -> Result<Self, AppError> {
        for bound in [min, max] {
            if !(MIN_BRACKET..=MAX_BRACKET).contains(&bound) {
                return Err(AppError::invalid_filter(
                    "Age bracket out of range",
                    json!({ "bracket": bound, "min": MIN_BRACKET, "max": MAX_BRACKET }),
                ));
            }
        }
        if min > max {
            return Err(AppError::invalid_filter(
                "Age range minimum exceeds maximum",
                json!({ "min": min, "max": max }),
            ));
        }
        Ok(Self { min, max })
    }

    /// Every bracket from 15 to 70+.
    pub fn full() -> Self {
        Self {
            min: MIN_BRACKET,
            max: MAX_BRACKET,
        }
    }

    pub fn min(&self) -> u8 {
        self.min
    }

    pub fn max(&self) -> u8 {
        self.max
    }

    pub fn contains(&self, bracket: u8) -> bool {
        (self.min..=self.max).contains(&bracket)
    }

    pub fn label(&self) -> String {
        age_label(self.min, self.max)
    }
}

impl Default for AgeRange {
    fn default() -> Self {
        Self::full()
    }
}

/// Human-readable label for a bracket range.
///
/// ```
/// use ene_analytics::domain::entities::age_label;
///
/// assert_eq!(age_label(12, 12), "70+");
/// assert_eq!(age_label(1, 12), "15-70+");
/// assert_eq!(age_label(3, 5), "25-40");
/// ```
pub fn age_label(min: u8, max: u8) -> String {
    let lower = 10 + u32::from(min) * 5;
    if min == OPEN_BRACKET {
        "70+".to_string()
    } else if max == OPEN_BRACKET {
        format!("{lower}-70+")
    } else {
        format!("{}-{}", lower, 15 + u32::from(max) * 5)
    }
}

/// A named set of brackets plotted as one series in the by-age chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgeGroup {
    pub label: String,
    pub brackets: BTreeSet<u8>,
}

impl AgeGroup {
    pub fn new<I: IntoIterator<Item = u8>>(label: impl Into<String>, brackets: I) -> Self {
        Self {
            label: label.into(),
            brackets: brackets.into_iter().collect(),
        }
    }

    /// Ten-year groups used when the source has no age-group table.
    pub fn defaults() -> Vec<AgeGroup> {
        vec![
            AgeGroup::new("15-24", [1, 2]),
            AgeGroup::new("25-34", [3, 4]),
            AgeGroup::new("35-44", [5, 6]),
            AgeGroup::new("45-54", [7, 8]),
            AgeGroup::new("55-64", [9, 10]),
            AgeGroup::new("65+", [11, 12]),
        ]
    }
}
