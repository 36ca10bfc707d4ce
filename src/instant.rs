// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Continuous astronomical time index and its calendar converters.
//!
//! [`TimeIndex`] is a Julian Day on the **TT** axis stored as a single
//! [`Days`] quantity.  It is the unit every evaluator bisects over and the
//! key the [`PositionCache`](crate::PositionCache) memoizes on.
//!
//! Calendar instants enter and leave the index through a [`TimeConverter`].
//! The default [`DeltaTConverter`] treats UTC as Universal Time and applies
//! the epoch-dependent **ΔT = TT − UT** correction; [`UniversalConverter`]
//! skips it and yields JD(UT) directly.

use chrono::{DateTime, Utc};
use qtty::*;
use std::ops::{Add, AddAssign, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::delta_t::{delta_t_seconds_from_ut, ut_from_tt};
use crate::error::{AlmanacError, Result};

/// JD of the Unix epoch (1970-01-01T00:00:00Z).
const UNIX_EPOCH_JD: Days = Days::new(2_440_587.5);

// ═══════════════════════════════════════════════════════════════════════════
// TimeIndex
// ═══════════════════════════════════════════════════════════════════════════

/// A point on the continuous Julian Day axis.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct TimeIndex {
    quantity: Days,
}

impl TimeIndex {
    /// J2000.0 epoch: 2000-01-01T12:00:00 TT  (JD 2 451 545.0).
    pub const J2000: Self = Self::new(2_451_545.0);

    /// One Julian century expressed in days.
    pub const JULIAN_CENTURY: Days = Days::new(36_525.0);

    /// Create from a raw Julian Day number.
    #[inline]
    pub const fn new(value: f64) -> Self {
        Self {
            quantity: Days::new(value),
        }
    }

    /// Create from a [`Days`] quantity.
    #[inline]
    pub const fn from_days(days: Days) -> Self {
        Self { quantity: days }
    }

    /// The underlying quantity in days.
    #[inline]
    pub const fn quantity(&self) -> Days {
        self.quantity
    }

    /// The underlying Julian Day number.
    #[inline]
    pub const fn value(&self) -> f64 {
        self.quantity.value()
    }

    /// Midpoint between two indices.
    #[inline]
    pub const fn mean(self, other: Self) -> Self {
        Self::from_days(self.quantity.const_add(other.quantity).const_div(2.0))
    }

    /// Julian centuries since J2000.0, the argument of the mean-element series.
    #[inline]
    pub fn julian_centuries(&self) -> f64 {
        ((*self - Self::J2000) / Self::JULIAN_CENTURY)
            .simplify()
            .value()
    }

    /// Bit pattern of the Julian Day, used as an exact memoization key.
    #[inline]
    pub(crate) fn key(&self) -> u64 {
        self.value().to_bits()
    }
}

impl std::fmt::Display for TimeIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JD {}", self.value())
    }
}

impl Add<Days> for TimeIndex {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Days) -> Self::Output {
        Self::from_days(self.quantity + rhs)
    }
}

impl AddAssign<Days> for TimeIndex {
    #[inline]
    fn add_assign(&mut self, rhs: Days) {
        self.quantity += rhs;
    }
}

impl Sub<Days> for TimeIndex {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Days) -> Self::Output {
        Self::from_days(self.quantity - rhs)
    }
}

impl Sub for TimeIndex {
    type Output = Days;
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        self.quantity - rhs.quantity
    }
}

impl From<Days> for TimeIndex {
    #[inline]
    fn from(days: Days) -> Self {
        Self::from_days(days)
    }
}

impl From<TimeIndex> for Days {
    #[inline]
    fn from(index: TimeIndex) -> Self {
        index.quantity
    }
}

#[cfg(feature = "serde")]
impl Serialize for TimeIndex {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.value())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for TimeIndex {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = f64::deserialize(deserializer)?;
        Ok(Self::new(v))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Converters
// ═══════════════════════════════════════════════════════════════════════════

/// Round-trip pair between calendar instants and the time index.
///
/// Implementations must be deterministic: identical inputs yield identical
/// outputs, which is what makes exact-key memoization sound.
pub trait TimeConverter {
    /// Convert a UTC instant to the time index.
    fn to_index(&self, instant: DateTime<Utc>) -> Result<TimeIndex>;

    /// Convert a time index back to a UTC instant.
    fn to_utc(&self, index: TimeIndex) -> Result<DateTime<Utc>>;
}

/// UTC ↔ JD(TT), with ΔT from Meeus ch. 9.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct DeltaTConverter;

impl TimeConverter for DeltaTConverter {
    fn to_index(&self, instant: DateTime<Utc>) -> Result<TimeIndex> {
        let jd_ut = jd_ut_from_utc(instant);
        let dt = delta_t_seconds_from_ut(jd_ut).to::<Day>();
        Ok(TimeIndex::from_days(jd_ut + dt))
    }

    fn to_utc(&self, index: TimeIndex) -> Result<DateTime<Utc>> {
        let jd_ut = ut_from_tt(index.quantity());
        utc_from_jd_ut(jd_ut).ok_or(AlmanacError::Conversion { index })
    }
}

/// UTC ↔ JD(UT), without any ΔT correction.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct UniversalConverter;

impl TimeConverter for UniversalConverter {
    fn to_index(&self, instant: DateTime<Utc>) -> Result<TimeIndex> {
        Ok(TimeIndex::from_days(jd_ut_from_utc(instant)))
    }

    fn to_utc(&self, index: TimeIndex) -> Result<DateTime<Utc>> {
        utc_from_jd_ut(index.quantity()).ok_or(AlmanacError::Conversion { index })
    }
}

fn jd_ut_from_utc(instant: DateTime<Utc>) -> Days {
    let seconds_since_epoch = Seconds::new(instant.timestamp() as f64);
    let nanos = Seconds::new(instant.timestamp_subsec_nanos() as f64 / 1e9);
    UNIX_EPOCH_JD + (seconds_since_epoch + nanos).to::<Day>()
}

fn utc_from_jd_ut(jd_ut: Days) -> Option<DateTime<Utc>> {
    let seconds_since_epoch = (jd_ut - UNIX_EPOCH_JD).to::<Second>().value();
    if !seconds_since_epoch.is_finite() {
        return None;
    }
    let secs = seconds_since_epoch.floor() as i64;
    let nanos = ((seconds_since_epoch - secs as f64) * 1e9) as u32;
    DateTime::<Utc>::from_timestamp(secs, nanos.min(999_999_999))
}
