//! Region selections and the region lookup table.

use crate::error::AppError;
use serde::{Serialize, Serializer};
use serde_json::json;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Highest region code known to the survey.
pub const MAX_REGION_CODE: u8 = 16;

/// Which regions a request covers.
///
/// Parsed once at the input boundary from the textual forms used by the
/// dashboard (`all`, `0`, `[0]`, `7`, `1,2,3`, `[1, 2, 3]`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum RegionSelection {
    #[default]
    All,
    Codes(BTreeSet<u8>),
}

impl RegionSelection {
    /// Builds a selection from explicit codes, validating each one.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidFilter`] for an empty list or a code outside
    /// `1..=MAX_REGION_CODE`.
    pub fn from_codes<I: IntoIterator<Item = u8>>(codes: I) -> Result<Self, AppError> {
        let codes: BTreeSet<u8> = codes.into_iter().collect();
        if codes.is_empty() {
            return Err(AppError::invalid_filter(
                "Region list must not be empty",
                json!({}),
            ));
        }
        if let Some(bad) = codes
            .iter()
            .find(|c| **c == 0 || **c > MAX_REGION_CODE)
        {
            return Err(AppError::invalid_filter(
                "Region code out of range",
                json!({ "code": bad, "min": 1, "max": MAX_REGION_CODE }),
            ));
        }
        Ok(RegionSelection::Codes(codes))
    }

    pub fn single(code: u8) -> Result<Self, AppError> {
        Self::from_codes([code])
    }

    pub fn contains(&self, region: u8) -> bool {
        match self {
            RegionSelection::All => true,
            RegionSelection::Codes(codes) => codes.contains(&region),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, RegionSelection::All)
    }
}

impl FromStr for RegionSelection {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let inner = trimmed
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .unwrap_or(trimmed)
            .trim();

        if inner.is_empty() {
            return Err(AppError::invalid_filter(
                "Region list must not be empty",
                json!({ "value": s }),
            ));
        }
        if inner.eq_ignore_ascii_case("all") {
            return Ok(RegionSelection::All);
        }

        let codes = inner
            .split(',')
            .map(|part| {
                part.trim().parse::<u8>().map_err(|_| {
                    AppError::invalid_filter(
                        "Region list must contain integer codes",
                        json!({ "value": s, "item": part.trim() }),
                    )
                })
            })
            .collect::<Result<Vec<u8>, AppError>>()?;

        if codes == [0] {
            return Ok(RegionSelection::All);
        }

        Self::from_codes(codes)
    }
}

impl fmt::Display for RegionSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionSelection::All => f.write_str("all"),
            RegionSelection::Codes(codes) => {
                let parts: Vec<String> = codes.iter().map(u8::to_string).collect();
                f.write_str(&parts.join(","))
            }
        }
    }
}

impl Serialize for RegionSelection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One entry of the region lookup table: a selection and its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionOption {
    pub selection: RegionSelection,
    pub name: String,
}

impl RegionOption {
    pub fn new(selection: RegionSelection, name: impl Into<String>) -> Self {
        Self {
            selection,
            name: name.into(),
        }
    }
}

/// Resolves the display name of a selection, falling back to a generated one
/// when the lookup table has no matching entry.
pub fn region_name(options: &[RegionOption], selection: &RegionSelection) -> String {
    if let Some(option) = options.iter().find(|o| &o.selection == selection) {
        return option.name.clone();
    }

    match selection {
        RegionSelection::All => "All regions".to_string(),
        RegionSelection::Codes(codes) if codes.len() == 1 => {
            format!("Region {}", selection)
        }
        RegionSelection::Codes(codes) => {
            let parts: Vec<String> = codes.iter().map(u8::to_string).collect();
            format!("Regions {}", parts.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_forms() {
        for text in ["all", "ALL", "0", "[0]", " [ 0 ] "] {
            assert_eq!(text.parse::<RegionSelection>().unwrap(), RegionSelection::All);
        }
    }

    #[test]
    fn test_parse_code_lists() {
        let expected = RegionSelection::from_codes([1, 2, 3]).unwrap();
        assert_eq!("1,2,3".parse::<RegionSelection>().unwrap(), expected);
        assert_eq!("[1, 2, 3]".parse::<RegionSelection>().unwrap(), expected);
        assert_eq!("[3,1,2,2]".parse::<RegionSelection>().unwrap(), expected);
        assert_eq!(
            "13".parse::<RegionSelection>().unwrap(),
            RegionSelection::single(13).unwrap()
        );
    }

    #[test]
    fn test_parse_rejects_expressions() {
        for text in ["", "[]", "__import__('os')", "1+1", "[1,,2]", "a,b", "-1"] {
            let err = text.parse::<RegionSelection>().unwrap_err();
            assert!(matches!(err, AppError::InvalidFilter { .. }), "{text}");
        }
    }

    #[test]
    fn test_parse_rejects_out_of_range_codes() {
        assert!("17".parse::<RegionSelection>().is_err());
        assert!("0,3".parse::<RegionSelection>().is_err());
        assert!("300".parse::<RegionSelection>().is_err());
    }

    #[test]
    fn test_contains() {
        let sel = RegionSelection::from_codes([4, 5]).unwrap();
        assert!(sel.contains(4));
        assert!(!sel.contains(6));
        assert!(RegionSelection::All.contains(6));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let sel = RegionSelection::from_codes([2, 9]).unwrap();
        assert_eq!(sel.to_string(), "2,9");
        assert_eq!(sel.to_string().parse::<RegionSelection>().unwrap(), sel);
    }

    #[test]
    fn test_region_name_lookup_and_fallback() {
        let options = vec![
            RegionOption::new(RegionSelection::All, "Whole country"),
            RegionOption::new(RegionSelection::single(13).unwrap(), "Metropolitana"),
        ];

        assert_eq!(region_name(&options, &RegionSelection::All), "Whole country");
        assert_eq!(
            region_name(&options, &RegionSelection::single(13).unwrap()),
            "Metropolitana"
        );
        assert_eq!(
            region_name(&options, &RegionSelection::single(5).unwrap()),
            "Region 5"
        );
        assert_eq!(
            region_name(&options, &RegionSelection::from_codes([1, 2]).unwrap()),
            "Regions 1, 2"
        );
        assert_eq!(region_name(&[], &RegionSelection::All), "All regions");
    }
}
