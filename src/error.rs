// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

use chrono::NaiveDate;
use thiserror::Error;

use crate::instant::TimeIndex;
use crate::position::Body;

/// Errors that abort an almanac run.
///
/// None of these are retried internally: the ephemeris is deterministic, so
/// a failing query fails again with the same inputs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AlmanacError {
    /// The position provider reported a failure.
    #[error("ephemeris failure for {body} at {index}: {message}")]
    Provider {
        body: Body,
        index: TimeIndex,
        message: String,
    },
    /// The position provider returned a NaN or infinite longitude.
    #[error("ephemeris returned a non-finite longitude for {body} at {index}")]
    NonFiniteLongitude { body: Body, index: TimeIndex },
    /// A time index has no representable calendar instant.
    #[error("{index} cannot be converted to a calendar instant")]
    Conversion { index: TimeIndex },
    /// A year/month pair outside the representable calendar.
    #[error("{year}-{month:02} is outside the supported calendar range")]
    OutOfRange { year: i32, month: u32 },
    /// The time zone skips local midnight and the following hour for this day.
    #[error("no local start of day exists for {date}")]
    NonexistentLocalMidnight { date: NaiveDate },
    /// A date range whose end does not come after its start.
    #[error("invalid date range: {start} to {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
    /// A month number outside 1..=12.
    #[error("invalid month: {0}")]
    InvalidMonth(u32),
    /// Bisection did not shrink below the tolerance.
    #[error("bisection did not converge after {iterations} iterations")]
    NoConvergence { iterations: u32 },
}

pub type Result<T> = std::result::Result<T, AlmanacError>;
