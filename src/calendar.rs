// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Calendar input: half-open ranges of civil days and their local start.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{AlmanacError, Result};

/// A half-open range of calendar days, `[start, end)`.
///
/// # Examples
///
/// ```
/// use lunar_almanac::DateRange;
///
/// let feb = DateRange::month(2024, 2).unwrap();
/// assert_eq!(feb.len(), 29);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "RawRange")
)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Range from `start` (inclusive) to `end` (exclusive); `end` must come
    /// after `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end <= start {
            return Err(AlmanacError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Every day of `year`.
    pub fn year(year: i32) -> Result<Self> {
        let start = first_of_month(year, 1)?;
        let end = first_of_month(year + 1, 1)?;
        Self::new(start, end)
    }

    /// Every day of `month` (1–12) in `year`.
    pub fn month(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(AlmanacError::InvalidMonth(month));
        }
        let start = first_of_month(year, month)?;
        let end = if month == 12 {
            first_of_month(year + 1, 1)?
        } else {
            first_of_month(year, month + 1)?
        };
        Self::new(start, end)
    }

    /// First day of the range.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// First day after the range.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days in the range.
    pub fn len(&self) -> usize {
        (self.end - self.start).num_days().max(0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    /// Each day of the range in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d < end)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Unchecked wire form, validated through [`DateRange::new`].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[cfg(feature = "serde")]
impl TryFrom<RawRange> for DateRange {
    type Error = AlmanacError;

    fn try_from(raw: RawRange) -> Result<Self> {
        Self::new(raw.start, raw.end)
    }
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or(AlmanacError::OutOfRange { year, month })
}

/// Step used to search past a skipped local midnight.
const DST_STEP_MINUTES: i64 = 15;
/// Furthest a day start may drift from midnight.
const DST_MAX_MINUTES: i64 = 60;

/// The instant `date` begins in `tz`.
///
/// An ambiguous midnight resolves to its earliest instant.  A skipped one
/// (a DST jump at 00:00) resolves to the first valid quarter hour after it,
/// up to 01:00.
pub fn day_start<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Result<DateTime<Tz>> {
    let midnight = date.and_time(NaiveTime::MIN);
    (0..=DST_MAX_MINUTES)
        .step_by(DST_STEP_MINUTES as usize)
        .find_map(|minutes| {
            tz.from_local_datetime(&(midnight + Duration::minutes(minutes)))
                .earliest()
        })
        .ok_or(AlmanacError::NonexistentLocalMidnight { date })
}
