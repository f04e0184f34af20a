//! DTOs for the lookup endpoints feeding the dashboard controls.

use serde::Serialize;

use crate::domain::entities::{RegionOption, RegionSelection, age_label};
use crate::domain::period::QuarterPeriod;

/// One position of the date slider.
#[derive(Debug, Serialize)]
pub struct QuarterItem {
    pub index: usize,
    pub label: String,
    /// Chronological ordering key.
    pub key: i64,
    /// Whether the slider shows a tick label at this position.
    pub mark: bool,
}

impl QuarterItem {
    /// Marks every fourth quarter and the last one.
    pub fn from_periods(periods: &[QuarterPeriod]) -> Vec<QuarterItem> {
        let last = periods.len().saturating_sub(1);
        periods
            .iter()
            .enumerate()
            .map(|(index, period)| QuarterItem {
                index,
                label: period.label(),
                key: period.ordering_key(),
                mark: index % 4 == 0 || index == last,
            })
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct RegionItem {
    /// Value to send back in the `regions` query parameter.
    pub value: String,
    /// Region codes, empty for "all regions".
    pub codes: Vec<u8>,
    pub name: String,
}

impl From<RegionOption> for RegionItem {
    fn from(option: RegionOption) -> Self {
        let codes = match &option.selection {
            RegionSelection::All => vec![],
            RegionSelection::Codes(codes) => codes.iter().copied().collect(),
        };
        Self {
            value: option.selection.to_string(),
            codes,
            name: option.name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AgeBracketItem {
    pub bracket: u8,
    pub label: String,
}

impl AgeBracketItem {
    pub fn new(bracket: u8) -> Self {
        Self {
            bracket,
            label: age_label(bracket, bracket),
        }
    }
}
