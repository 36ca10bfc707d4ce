// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Lunar almanac
//!
//! Day-by-day Moon phase and zodiac sign, the exact instants those change,
//! and the personal-care recommendation scores derived from them.
//!
//! # Core types
//!
//! - [`Almanac`]: evaluates calendar days in any `chrono` time zone.
//! - [`PositionProvider`]: source of Sun/Moon ecliptic longitudes.
//! - [`PositionCache`]: exact-key memoization in front of the provider.
//! - [`TimeIndex`]: Julian Day (TT) the searches bisect over.
//! - [`DailyValue<T>`]: bucket at the start and end of a day plus the
//!   transition [`Event`] between them.
//! - [`Entry`] / [`Row`]: scoring snapshots and their five [`Status`]es.
//!
//! # Pipeline
//!
//! | Stage | Output |
//! |-------|--------|
//! | [`day_start`] | local midnight of a date, as an instant |
//! | [`phase_for_day`] | `DailyValue<PhaseBucket>`, New/Full located by bisection |
//! | [`sign_for_day`] | `DailyValue<ZodiacSign>`, ingress located by bisection |
//! | [`merge`] | one or two ordered [`Entry`] values |
//! | [`Entry::scores`] | [`Scores`] for each [`Activity`] |
//!
//! # ΔT (Delta T)
//!
//! Calendar instants are UTC treated as Universal Time.  The default
//! [`DeltaTConverter`] adds **ΔT = TT − UT** before querying the provider,
//! so ephemerides tabulated in TT line up with civil days.  Providers that
//! work in UT can be paired with [`UniversalConverter`].

mod almanac;
mod bisect;
mod calendar;
mod config;
mod daily;
mod delta_t;
mod error;
pub(crate) mod instant;
mod mean_elements;
mod merge;
mod phase;
mod position;
mod sign;
mod status;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use almanac::{Almanac, Day, Row};
pub use bisect::{Bisection, Crossing, Keep, Sample};
pub use calendar::{day_start, DateRange};
pub use config::AlmanacConfig;
pub use daily::{DailyValue, Event};
pub use error::{AlmanacError, Result};
pub use instant::{DeltaTConverter, TimeConverter, TimeIndex, UniversalConverter};
pub use mean_elements::MeanElements;
pub use merge::{merge, DayEvents};
pub use phase::{phase_at, phase_for_day, PhaseAngle, PhaseBucket, ANGLE_EPSILON};
pub use position::{Body, CelestialPosition, PositionCache, PositionProvider};
pub use sign::{moon_sign_at, sign_for_day, ZodiacSign};
pub use status::{Activity, Entry, Scores, Status};
