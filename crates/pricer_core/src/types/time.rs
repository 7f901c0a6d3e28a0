//! Dates and day count conventions.
//!
//! This module provides:
//! - `Date`: Type-safe date wrapper around chrono::NaiveDate
//! - `DayCountConvention`: The accrual conventions used for bond coupons
//!
//! # Examples
//!
//! ```
//! use pricer_core::types::time::{Date, DayCountConvention};
//!
//! let start = Date::from_ymd(2024, 1, 1).unwrap();
//! let end = Date::from_ymd(2024, 7, 1).unwrap();
//!
//! let yf = DayCountConvention::Actual365Fixed.year_fraction(start, end);
//! assert!((yf - 182.0 / 365.0).abs() < 1e-12);
//! ```

use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

use super::error::DateError;

/// Type-safe date wrapper around chrono::NaiveDate.
///
/// # Examples
///
/// ```
/// use pricer_core::types::time::Date;
///
/// let date = Date::from_ymd(2024, 6, 15).unwrap();
/// let parsed: Date = "2024-06-15".parse().unwrap();
/// assert_eq!(date, parsed);
///
/// let later = Date::from_ymd(2024, 6, 25).unwrap();
/// assert_eq!(later - date, 10);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a Date from year, month, and day components.
    ///
    /// # Errors
    /// `DateError::InvalidDate` when the components do not name a real day.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or(DateError::InvalidDate { year, month, day })
    }

    /// Parses an ISO 8601 date (YYYY-MM-DD).
    pub fn parse(s: &str) -> Result<Self, DateError> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Date)
            .map_err(|e| DateError::ParseError(format!("{}: {}", s, e)))
    }

    /// Returns the underlying NaiveDate.
    pub fn into_inner(self) -> NaiveDate {
        self.0
    }

    /// Returns the year component.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day component (1-31).
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Returns true if the date falls in a leap year.
    pub fn is_leap_year(&self) -> bool {
        is_leap(self.year())
    }
}

impl Sub for Date {
    type Output = i64;

    /// Number of calendar days from `other` to `self`.
    fn sub(self, other: Date) -> i64 {
        (self.0 - other.0).num_days()
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for Date {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Date::parse(s)
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Date(date)
    }
}

fn is_leap(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Day count conventions for coupon accrual.
///
/// | Convention | Year fraction |
/// |------------|---------------|
/// | 30/360 | US bond basis day count / 360 |
/// | ACT/360 | actual days / 360 |
/// | ACT/365 | actual days / 365 |
/// | ACT/ACT | ISDA: days in each calendar year over that year's length |
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DayCountConvention {
    /// 30/360 US bond basis.
    #[default]
    Thirty360,
    /// Actual/360.
    Actual360,
    /// Actual/365 Fixed.
    Actual365Fixed,
    /// Actual/Actual (ISDA).
    ActualActual,
}

impl DayCountConvention {
    /// Market name of the convention.
    pub fn name(&self) -> &'static str {
        match self {
            DayCountConvention::Thirty360 => "30/360",
            DayCountConvention::Actual360 => "ACT/360",
            DayCountConvention::Actual365Fixed => "ACT/365",
            DayCountConvention::ActualActual => "ACT/ACT",
        }
    }

    /// Day count between two dates under this convention.
    ///
    /// For the actual conventions this is the calendar day difference.
    pub fn day_count(&self, start: Date, end: Date) -> i64 {
        match self {
            DayCountConvention::Thirty360 => thirty_360_days(start, end),
            _ => end - start,
        }
    }

    /// Year fraction between two dates.
    ///
    /// Negative when `end` precedes `start`.
    pub fn year_fraction(&self, start: Date, end: Date) -> f64 {
        match self {
            DayCountConvention::Thirty360 => thirty_360_days(start, end) as f64 / 360.0,
            DayCountConvention::Actual360 => (end - start) as f64 / 360.0,
            DayCountConvention::Actual365Fixed => (end - start) as f64 / 365.0,
            DayCountConvention::ActualActual => {
                if end < start {
                    return -actual_actual_isda(end, start);
                }
                actual_actual_isda(start, end)
            }
        }
    }
}

impl fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for DayCountConvention {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_uppercase();
        match normalised.as_str() {
            "30360" | "THIRTY360" => Ok(DayCountConvention::Thirty360),
            "ACT360" | "ACTUAL360" => Ok(DayCountConvention::Actual360),
            "ACT365" | "ACTUAL365" | "ACT365F" => Ok(DayCountConvention::Actual365Fixed),
            "ACTACT" | "ACTUALACTUAL" => Ok(DayCountConvention::ActualActual),
            _ => Err(DateError::ParseError(format!(
                "Unknown day count convention: {}",
                s
            ))),
        }
    }
}

fn thirty_360_days(start: Date, end: Date) -> i64 {
    let mut d1 = start.day() as i64;
    let mut d2 = end.day() as i64;
    if d1 == 31 {
        d1 = 30;
    }
    if d2 == 31 && d1 == 30 {
        d2 = 30;
    }
    360 * (end.year() - start.year()) as i64
        + 30 * (end.month() as i64 - start.month() as i64)
        + (d2 - d1)
}

fn actual_actual_isda(start: Date, end: Date) -> f64 {
    if start.year() == end.year() {
        return (end - start) as f64 / year_length(start.year());
    }
    let mut fraction = 0.0;
    let mut cursor = start;
    for year in start.year()..end.year() {
        // First day of the following year always exists.
        let next = match Date::from_ymd(year + 1, 1, 1) {
            Ok(date) => date,
            Err(_) => break,
        };
        fraction += (next - cursor) as f64 / year_length(year);
        cursor = next;
    }
    fraction + (end - cursor) as f64 / year_length(end.year())
}

fn year_length(year: i32) -> f64 {
    if is_leap(year) {
        366.0
    } else {
        365.0
    }
}
