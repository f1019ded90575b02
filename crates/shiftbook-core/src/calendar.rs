//! Work calendar types and pure date utilities.
//!
//! A [`Calendar`] maps calendar dates to the hours worked on them. Keys are
//! `chrono::NaiveDate` and serialize as zero-padded `YYYY-MM-DD` strings,
//! so a calendar round-trips through JSON objects keyed by ISO dates.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Hours worked on a single date. `hours == 0.0` marks a rest day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkRecord {
    #[serde(default)]
    pub hours: f64,
    /// Overtime hours; only payroll reads this.
    #[serde(default, alias = "overtime")]
    pub overtime_hours: f64,
}

impl WorkRecord {
    pub fn new(hours: f64) -> Self {
        Self {
            hours,
            overtime_hours: 0.0,
        }
    }

    pub fn with_overtime(hours: f64, overtime_hours: f64) -> Self {
        Self {
            hours,
            overtime_hours,
        }
    }

    /// A rest day (no hours).
    pub fn rest() -> Self {
        Self::default()
    }

    pub fn is_work_day(&self) -> bool {
        self.hours > 0.0
    }
}

/// Date-ordered mapping from calendar date to [`WorkRecord`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Calendar {
    records: BTreeMap<NaiveDate, WorkRecord>,
}

impl Calendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the record for `date`.
    pub fn insert(&mut self, date: NaiveDate, record: WorkRecord) -> Option<WorkRecord> {
        self.records.insert(date, record)
    }

    pub fn get(&self, date: &NaiveDate) -> Option<&WorkRecord> {
        self.records.get(date)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Hours recorded for `date`, `0.0` when there is no record.
    pub fn hours_on(&self, date: NaiveDate) -> f64 {
        self.records.get(&date).map_or(0.0, |r| r.hours)
    }

    /// Records in ascending date order.
    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &WorkRecord)> {
        self.records.iter()
    }
}

impl FromIterator<(NaiveDate, WorkRecord)> for Calendar {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, WorkRecord)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Calendar {
    type Item = (&'a NaiveDate, &'a WorkRecord);
    type IntoIter = std::collections::btree_map::Iter<'a, NaiveDate, WorkRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Number of days in `month` of `year`, accounting for leap years.
///
/// Returns `None` when `month` is outside `1..=12`.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    u32::try_from((next - first).num_days()).ok()
}

/// Every date of `(year, month)` in order; empty for an invalid month.
pub fn month_dates(year: i32, month: u32) -> Vec<NaiveDate> {
    let Some(days) = days_in_month(year, month) else {
        return Vec::new();
    };
    (1..=days)
        .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day))
        .collect()
}

/// Zero-padded ISO key (`YYYY-MM-DD`) for a date.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a `YYYY-MM-DD` date key.
pub fn parse_date(s: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(s.to_string()))
}

/// Parse a `YYYY-MM` month into `(year, month)`.
pub fn parse_month(s: &str) -> Result<(i32, u32), ValidationError> {
    let invalid = || ValidationError::InvalidMonth(s.to_string());
    let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((year, month))
}
