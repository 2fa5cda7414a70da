use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while parsing months or assembling a period.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PeriodError {
    #[error("invalid month '{0}', expected YYYY-MM")]
    InvalidMonth(String),
    #[error("period start {start} is after end {end}")]
    Reversed { start: YearMonth, end: YearMonth },
}

/// A calendar month, written `YYYY-MM` on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth(NaiveDate);

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, PeriodError> {
        if !(0..=9999).contains(&year) {
            return Err(PeriodError::InvalidMonth(format!("{}-{}", year, month)));
        }
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self)
            .ok_or_else(|| PeriodError::InvalidMonth(format!("{}-{}", year, month)))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// First day of the month.
    pub fn first_day(&self) -> NaiveDate {
        self.0
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for YearMonth {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        let invalid = || PeriodError::InvalidMonth(s.to_string());
        let (year, month) = value.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

impl TryFrom<String> for YearMonth {
    type Error = PeriodError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

/// The time filter of a trade query: one month, or an inclusive range of months.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Month(YearMonth),
    Range { start: YearMonth, end: YearMonth },
}

impl Period {
    /// Builds a range, rejecting a start that falls after the end.
    pub fn range(start: YearMonth, end: YearMonth) -> Result<Self, PeriodError> {
        if start > end {
            return Err(PeriodError::Reversed { start, end });
        }
        Ok(Period::Range { start, end })
    }

    /// Parses a single `YYYY-MM` month.
    pub fn parse_month(month: &str) -> Result<Self, PeriodError> {
        Ok(Period::Month(month.parse()?))
    }

    /// Parses a `YYYY-MM` start and end pair.
    pub fn parse_range(start: &str, end: &str) -> Result<Self, PeriodError> {
        Self::range(start.parse()?, end.parse()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_year_month() {
        let ym: YearMonth = "2010-01".parse().unwrap();
        assert_eq!(ym.year(), 2010);
        assert_eq!(ym.month(), 1);
        assert_eq!(ym.to_string(), "2010-01");
        assert_eq!(ym.first_day(), NaiveDate::from_ymd_opt(2010, 1, 1).unwrap());
    }

    #[test]
    fn test_parse_year_month_rejects_bad_shapes() {
        for bad in ["2010-1", "2010-13", "201001", "10-01", "2010-00", "abcd-ef", ""] {
            assert!(
                matches!(bad.parse::<YearMonth>(), Err(PeriodError::InvalidMonth(_))),
                "{} should not parse",
                bad
            );
        }
    }

    #[test]
    fn test_range_rejects_reversed() {
        let result = Period::parse_range("2014-01", "2013-01");
        assert!(matches!(result, Err(PeriodError::Reversed { .. })));
        assert!(Period::parse_range("2013-01", "2013-01").is_ok());
    }
}
