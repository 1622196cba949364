use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ProcessingError, Result};

/// Calendar month. Ordering follows the calendar (Jan < Feb < ... < Dec),
/// never the alphabetical order of the abbreviations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
    ];

    /// Month from its 1-based calendar number
    pub fn from_number(number: u32) -> Option<Self> {
        number
            .checked_sub(1)
            .and_then(|index| Self::ALL.get(index as usize).copied())
    }

    pub fn of(date: NaiveDate) -> Self {
        // month0() is always 0..=11
        Self::ALL[date.month0() as usize]
    }

    pub fn number(self) -> u32 {
        self as u32 + 1
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn abbreviation(self) -> &'static str {
        match self {
            Month::Jan => "Jan",
            Month::Feb => "Feb",
            Month::Mar => "Mar",
            Month::Apr => "Apr",
            Month::May => "May",
            Month::Jun => "Jun",
            Month::Jul => "Jul",
            Month::Aug => "Aug",
            Month::Sep => "Sep",
            Month::Oct => "Oct",
            Month::Nov => "Nov",
            Month::Dec => "Dec",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.abbreviation().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

/// Month-day label used to line different years up on one axis, e.g. "Jan 01"
pub fn month_day_label(date: NaiveDate) -> String {
    date.format("%b %d").to_string()
}

/// Check that a checkpoint label names a real month-day ("Feb 29" is accepted)
pub fn validate_month_day_label(label: &str) -> Result<()> {
    let (month, day) = label.trim().split_once(' ').ok_or_else(|| {
        ProcessingError::InvalidFormat(format!(
            "Checkpoint '{}' must look like 'Jan 01'",
            label
        ))
    })?;

    let month = Month::parse(month).ok_or_else(|| {
        ProcessingError::InvalidFormat(format!("Unknown month in checkpoint '{}'", label))
    })?;

    if day.len() != 2 {
        return Err(ProcessingError::InvalidFormat(format!(
            "Checkpoint '{}' must use a two-digit day",
            label
        )));
    }

    let day = day.parse::<u32>().map_err(|_| {
        ProcessingError::InvalidFormat(format!("Invalid day in checkpoint '{}'", label))
    })?;

    // 2000 is a leap year, so every real month-day exists in it
    NaiveDate::from_ymd_opt(2000, month.number(), day)
        .map(|_| ())
        .ok_or_else(|| {
            ProcessingError::InvalidFormat(format!("Checkpoint '{}' is not a calendar day", label))
        })
}
