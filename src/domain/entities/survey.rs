//! Survey records and pre-aggregated count buckets.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::{Add, AddAssign};

/// Respondent gender as coded by the survey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Decodes the survey's numeric gender code (`1` male, `2` female).
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Gender::Male),
            2 => Some(Gender::Female),
            _ => None,
        }
    }
}

/// Labor-force status of a working-age respondent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    Employed,
    Unemployed,
    NotInWorkforce,
}

impl EmploymentStatus {
    /// Decodes the survey's activity code (`1` employed, `2` unemployed,
    /// `3` outside the labor force).
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(EmploymentStatus::Employed),
            2 => Some(EmploymentStatus::Unemployed),
            3 => Some(EmploymentStatus::NotInWorkforce),
            _ => None,
        }
    }

    pub fn in_workforce(self) -> bool {
        matches!(
            self,
            EmploymentStatus::Employed | EmploymentStatus::Unemployed
        )
    }
}

/// One surveyed individual in one month.
///
/// `employment_status` is `None` for respondents under working age, which is
/// also how they are recognized when tallied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyRecord {
    pub year: i32,
    pub month: u32,
    pub region: u8,
    /// `0` for respondents under working age, `1..=12` otherwise.
    pub age_bracket: u8,
    pub gender: Gender,
    pub employment_status: Option<EmploymentStatus>,
}

/// Names one count column of the record-source contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CountField {
    Total,
    UnderWorkingAge,
    WorkingAge,
    MaleWorkingAge,
    FemaleWorkingAge,
    Employed,
    Unemployed,
    Workforce,
    MaleWorkforce,
    FemaleWorkforce,
    MaleUnemployed,
    FemaleUnemployed,
    NotInWorkforce,
}

/// Count columns shared by every bucket row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BucketCounts {
    pub total: u64,
    pub under_working_age: u64,
    pub working_age: u64,
    pub male_working_age: u64,
    pub female_working_age: u64,
    pub employed: u64,
    pub unemployed: u64,
    pub workforce: u64,
    pub male_workforce: u64,
    pub female_workforce: u64,
    pub male_unemployed: u64,
    pub female_unemployed: u64,
    pub not_in_workforce: u64,
}

impl BucketCounts {
    pub fn get(&self, field: CountField) -> u64 {
        match field {
            CountField::Total => self.total,
            CountField::UnderWorkingAge => self.under_working_age,
            CountField::WorkingAge => self.working_age,
            CountField::MaleWorkingAge => self.male_working_age,
            CountField::FemaleWorkingAge => self.female_working_age,
            CountField::Employed => self.employed,
            CountField::Unemployed => self.unemployed,
            CountField::Workforce => self.workforce,
            CountField::MaleWorkforce => self.male_workforce,
            CountField::FemaleWorkforce => self.female_workforce,
            CountField::MaleUnemployed => self.male_unemployed,
            CountField::FemaleUnemployed => self.female_unemployed,
            CountField::NotInWorkforce => self.not_in_workforce,
        }
    }

    /// Adds one individual to the counts.
    pub fn tally(&mut self, record: &SurveyRecord) {
        self.total += 1;

        let Some(status) = record.employment_status else {
            self.under_working_age += 1;
            return;
        };

        let male = record.gender == Gender::Male;
        self.working_age += 1;
        if male {
            self.male_working_age += 1;
        } else {
            self.female_working_age += 1;
        }

        match status {
            EmploymentStatus::Employed => self.employed += 1,
            EmploymentStatus::Unemployed => {
                self.unemployed += 1;
                if male {
                    self.male_unemployed += 1;
                } else {
                    self.female_unemployed += 1;
                }
            }
            EmploymentStatus::NotInWorkforce => self.not_in_workforce += 1,
        }

        if status.in_workforce() {
            self.workforce += 1;
            if male {
                self.male_workforce += 1;
            } else {
                self.female_workforce += 1;
            }
        }
    }
}

impl AddAssign for BucketCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.total += rhs.total;
        self.under_working_age += rhs.under_working_age;
        self.working_age += rhs.working_age;
        self.male_working_age += rhs.male_working_age;
        self.female_working_age += rhs.female_working_age;
        self.employed += rhs.employed;
        self.unemployed += rhs.unemployed;
        self.workforce += rhs.workforce;
        self.male_workforce += rhs.male_workforce;
        self.female_workforce += rhs.female_workforce;
        self.male_unemployed += rhs.male_unemployed;
        self.female_unemployed += rhs.female_unemployed;
        self.not_in_workforce += rhs.not_in_workforce;
    }
}

impl Add for BucketCounts {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

/// Pre-aggregated counts for one (year, month, region, age bracket) cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyBucket {
    pub year: i32,
    pub month: u32,
    pub region: u8,
    pub age_bracket: u8,
    pub counts: BucketCounts,
}

impl SurveyBucket {
    pub fn new(year: i32, month: u32, region: u8, age_bracket: u8, counts: BucketCounts) -> Self {
        Self {
            year,
            month,
            region,
            age_bracket,
            counts,
        }
    }

    /// Groups individual records into buckets, ordered by
    /// (year, month, region, age bracket).
    pub fn from_records<'a, I>(records: I) -> Vec<SurveyBucket>
    where
        I: IntoIterator<Item = &'a SurveyRecord>,
    {
        let mut cells: BTreeMap<(i32, u32, u8, u8), BucketCounts> = BTreeMap::new();
        for record in records {
            cells
                .entry((record.year, record.month, record.region, record.age_bracket))
                .or_default()
                .tally(record);
        }

        cells
            .into_iter()
            .map(|((year, month, region, age_bracket), counts)| {
                SurveyBucket::new(year, month, region, age_bracket, counts)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(gender: Gender, status: Option<EmploymentStatus>) -> SurveyRecord {
        SurveyRecord {
            year: 2020,
            month: 1,
            region: 13,
            age_bracket: if status.is_some() { 3 } else { 0 },
            gender,
            employment_status: status,
        }
    }

    #[test]
    fn test_tally_counts_follow_status() {
        let mut counts = BucketCounts::default();
        counts.tally(&record(Gender::Male, Some(EmploymentStatus::Employed)));
        counts.tally(&record(Gender::Female, Some(EmploymentStatus::Unemployed)));
        counts.tally(&record(Gender::Female, Some(EmploymentStatus::NotInWorkforce)));
        counts.tally(&record(Gender::Male, None));

        assert_eq!(counts.total, 4);
        assert_eq!(counts.under_working_age, 1);
        assert_eq!(counts.working_age, 3);
        assert_eq!(counts.male_working_age, 1);
        assert_eq!(counts.female_working_age, 2);
        assert_eq!(counts.employed, 1);
        assert_eq!(counts.unemployed, 1);
        assert_eq!(counts.female_unemployed, 1);
        assert_eq!(counts.male_unemployed, 0);
        assert_eq!(counts.workforce, 2);
        assert_eq!(counts.male_workforce, 1);
        assert_eq!(counts.female_workforce, 1);
        assert_eq!(counts.not_in_workforce, 1);
    }

    #[test]
    fn test_from_records_groups_by_cell() {
        let mut a = record(Gender::Male, Some(EmploymentStatus::Employed));
        let b = a.clone();
        let mut c = a.clone();
        c.month = 2;
        a.region = 5;

        let buckets = SurveyBucket::from_records(&[c, b, a]);

        assert_eq!(buckets.len(), 3);
        assert_eq!((buckets[0].month, buckets[0].region), (1, 5));
        assert_eq!((buckets[1].month, buckets[1].region), (1, 13));
        assert_eq!(buckets[2].month, 2);
        assert!(buckets.iter().all(|b| b.counts.total == 1));
    }

    #[test]
    fn test_counts_add() {
        let one = BucketCounts {
            total: 2,
            workforce: 1,
            ..Default::default()
        };
        let sum = one + one;
        assert_eq!(sum.total, 4);
        assert_eq!(sum.get(CountField::Workforce), 2);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(EmploymentStatus::from_code(2), Some(EmploymentStatus::Unemployed));
        assert_eq!(EmploymentStatus::from_code(9), None);
        assert_eq!(Gender::from_code(2), Some(Gender::Female));
    }
}
