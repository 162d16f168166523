//! Whole-record-set snapshots and reporting windows.

use std::fmt;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{category::Category, profile::Profile, transaction::Transaction};

/// The categories, transactions and profile of one user, as a single value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordSet {
    pub categories: Vec<Category>,
    pub transactions: Vec<Transaction>,
    pub profile: Profile,
}

impl RecordSet {
    pub fn new(categories: Vec<Category>, transactions: Vec<Transaction>, profile: Profile) -> Self {
        Self {
            categories,
            transactions,
            profile,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Half-open `[start, end)` date range used to scope dashboard totals.
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateWindowError> {
        if end <= start {
            return Err(DateWindowError::InvalidRange);
        }
        Ok(Self { start, end })
    }

    /// The calendar month containing `date`.
    pub fn month_of(date: NaiveDate) -> Result<Self, DateWindowError> {
        let start = date.with_day(1).ok_or(DateWindowError::OutOfRange)?;
        let end = start
            .checked_add_months(Months::new(1))
            .ok_or(DateWindowError::OutOfRange)?;
        Self::new(start, end)
    }

    /// The calendar year containing `date`.
    pub fn year_of(date: NaiveDate) -> Result<Self, DateWindowError> {
        let start =
            NaiveDate::from_ymd_opt(date.year(), 1, 1).ok_or(DateWindowError::OutOfRange)?;
        let end = NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
            .ok_or(DateWindowError::OutOfRange)?;
        Self::new(start, end)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Errors that can occur when constructing [`DateWindow`] values.
pub enum DateWindowError {
    InvalidRange,
    OutOfRange,
}

impl fmt::Display for DateWindowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateWindowError::InvalidRange => f.write_str("date window end must be after start"),
            DateWindowError::OutOfRange => f.write_str("date window falls outside the calendar"),
        }
    }
}

impl std::error::Error for DateWindowError {}
