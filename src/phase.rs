// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Lunar phase: the signed Moon−Sun elongation and its eight buckets.
//!
//! | Bucket | Phase angle |
//! |--------|-------------|
//! | [`New`](PhaseBucket::New) | exactly 0 |
//! | [`Waxing1`](PhaseBucket::Waxing1) | (0, 60] |
//! | [`Waxing2`](PhaseBucket::Waxing2) | (60, 120] |
//! | [`Waxing3`](PhaseBucket::Waxing3) | (120, 180) |
//! | [`Full`](PhaseBucket::Full) | exactly 180 |
//! | [`Waning1`](PhaseBucket::Waning1) | (−180, −120] |
//! | [`Waning2`](PhaseBucket::Waning2) | (−120, −60] |
//! | [`Waning3`](PhaseBucket::Waning3) | (−60, 0) |
//!
//! Only conjunction and opposition produce a dated event; the boundaries
//! between the waxing (or waning) sub-buckets pass without one.

use chrono::{DateTime, Duration, Utc};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bisect::{Bisection, Keep, Sample};
use crate::daily::{DailyValue, Event};
use crate::error::Result;
use crate::instant::{TimeConverter, TimeIndex};
use crate::position::{Body, PositionCache, PositionProvider};

/// Magnitudes below this are floating-point noise around an exact conjunction.
pub const ANGLE_EPSILON: f64 = 1e-13;

/// Signed Moon−Sun ecliptic elongation in degrees, always in `(−180, 180]`.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PhaseAngle(f64);

impl PhaseAngle {
    /// Normalize any longitude difference into `(−180, 180]`.
    pub fn new(degrees: f64) -> Self {
        let mut angle = degrees.rem_euclid(360.0);
        if angle > 180.0 {
            angle -= 360.0;
        }
        if angle.abs() < ANGLE_EPSILON {
            angle = 0.0;
        }
        Self(angle)
    }

    pub fn from_longitudes(sun: f64, moon: f64) -> Self {
        Self::new(moon - sun)
    }

    pub const fn degrees(self) -> f64 {
        self.0
    }

    pub fn bucket(self) -> PhaseBucket {
        PhaseBucket::from_angle(self)
    }
}

/// The eight phase buckets, in synodic order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PhaseBucket {
    New,
    Waxing1,
    Waxing2,
    Waxing3,
    Full,
    Waning1,
    Waning2,
    Waning3,
}

impl PhaseBucket {
    pub const ALL: [PhaseBucket; 8] = [
        PhaseBucket::New,
        PhaseBucket::Waxing1,
        PhaseBucket::Waxing2,
        PhaseBucket::Waxing3,
        PhaseBucket::Full,
        PhaseBucket::Waning1,
        PhaseBucket::Waning2,
        PhaseBucket::Waning3,
    ];

    pub fn from_angle(angle: PhaseAngle) -> Self {
        match angle.degrees() {
            a if a == 0.0 => PhaseBucket::New,
            a if a > 0.0 && a <= 60.0 => PhaseBucket::Waxing1,
            a if a > 60.0 && a <= 120.0 => PhaseBucket::Waxing2,
            a if a > 120.0 && a < 180.0 => PhaseBucket::Waxing3,
            a if a == 180.0 => PhaseBucket::Full,
            a if a > -180.0 && a <= -120.0 => PhaseBucket::Waning1,
            a if a > -120.0 && a <= -60.0 => PhaseBucket::Waning2,
            a if a > -60.0 && a < 0.0 => PhaseBucket::Waning3,
            a => unreachable!("phase angle {a} outside (-180, 180]"),
        }
    }

    pub const fn is_waxing(self) -> bool {
        matches!(
            self,
            PhaseBucket::Waxing1 | PhaseBucket::Waxing2 | PhaseBucket::Waxing3
        )
    }

    pub const fn is_waning(self) -> bool {
        matches!(
            self,
            PhaseBucket::Waning1 | PhaseBucket::Waning2 | PhaseBucket::Waning3
        )
    }

    /// Coarse display name shared by the three sub-buckets of each half.
    pub const fn name(self) -> &'static str {
        match self {
            PhaseBucket::New => "New",
            PhaseBucket::Waxing1 | PhaseBucket::Waxing2 | PhaseBucket::Waxing3 => "Waxing",
            PhaseBucket::Full => "Full",
            PhaseBucket::Waning1 | PhaseBucket::Waning2 | PhaseBucket::Waning3 => "Waning",
        }
    }

    pub const fn symbol(self) -> char {
        match self {
            PhaseBucket::New => '🌑',
            PhaseBucket::Waxing1 => '🌒',
            PhaseBucket::Waxing2 => '🌓',
            PhaseBucket::Waxing3 => '🌔',
            PhaseBucket::Full => '🌕',
            PhaseBucket::Waning1 => '🌖',
            PhaseBucket::Waning2 => '🌗',
            PhaseBucket::Waning3 => '🌘',
        }
    }
}

impl std::fmt::Display for PhaseBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Phase angle at `index`, from the cached Sun and Moon longitudes.
pub fn phase_at<P: PositionProvider>(
    cache: &mut PositionCache<P>,
    index: TimeIndex,
) -> Result<Sample<PhaseAngle>> {
    let sun = cache.resolve(index, Body::Sun)?.longitude;
    let moon = cache.resolve(index, Body::Moon)?.longitude;
    Ok(Sample::new(index, PhaseAngle::from_longitudes(sun, moon)))
}

/// Narrowing rule towards a conjunction (angle rising through 0) or an
/// opposition (angle wrapping from +180 to −180).
fn keep_towards(target: PhaseBucket, mid: PhaseAngle) -> Keep {
    let angle = mid.degrees();
    if angle == 0.0 {
        return Keep::Point;
    }
    match (target, angle < 0.0) {
        (PhaseBucket::New, true) | (PhaseBucket::Full, false) => Keep::Upper,
        _ => Keep::Lower,
    }
}

/// Phase buckets at both ends of the day starting at `day_start`, plus the
/// New or Full instant if one falls inside it.
pub fn phase_for_day<P, C>(
    cache: &mut PositionCache<P>,
    converter: &C,
    bisection: &Bisection,
    day_start: DateTime<Utc>,
) -> Result<DailyValue<PhaseBucket>>
where
    P: PositionProvider,
    C: TimeConverter,
{
    let start = phase_at(cache, converter.to_index(day_start)?)?;
    let end = phase_at(cache, converter.to_index(day_start + Duration::days(1))?)?;

    let (ph0, ph1) = (start.value.degrees(), end.value.degrees());
    let target = if ph0 <= 0.0 && ph1 > 0.0 {
        Some(PhaseBucket::New)
    } else if ph0 > 0.0 && ph1 < 0.0 {
        Some(PhaseBucket::Full)
    } else {
        None
    };

    let event = match target {
        Some(target) => {
            let crossing = bisection.run(
                start,
                end,
                |index| phase_at(cache, index),
                |_, mid| keep_towards(target, mid.value),
            )?;
            let time = converter.to_utc(crossing.sample.index)?;
            debug!(
                %day_start,
                phase = %target,
                %time,
                iterations = crossing.iterations,
                "located phase event"
            );
            Some(Event::new(time, target))
        }
        None => None,
    };

    Ok(DailyValue::new(start.value.bucket(), end.value.bucket(), event))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn normalize_wraps_into_half_open_range() {
        assert_eq!(PhaseAngle::new(0.0).degrees(), 0.0);
        assert_eq!(PhaseAngle::new(360.0).degrees(), 0.0);
        assert_eq!(PhaseAngle::new(180.0).degrees(), 180.0);
        assert_eq!(PhaseAngle::new(-180.0).degrees(), 180.0);
        assert_eq!(PhaseAngle::new(190.0).degrees(), -170.0);
        assert_eq!(PhaseAngle::new(-90.0).degrees(), -90.0);
        assert_eq!(PhaseAngle::new(725.0).degrees(), 5.0);
    }

    #[test]
    fn normalize_snaps_noise_to_zero() {
        assert_eq!(PhaseAngle::new(1e-14).degrees(), 0.0);
        assert_eq!(PhaseAngle::new(-1e-14).degrees(), 0.0);
        assert_eq!(PhaseAngle::new(360.0 - 1e-14).degrees(), 0.0);
        assert_eq!(PhaseAngle::from_longitudes(123.4, 123.4).bucket(), PhaseBucket::New);
    }

    #[test]
    fn bucket_boundaries() {
        let cases = [
            (0.0, PhaseBucket::New),
            (0.001, PhaseBucket::Waxing1),
            (60.0, PhaseBucket::Waxing1),
            (60.001, PhaseBucket::Waxing2),
            (120.0, PhaseBucket::Waxing2),
            (179.999, PhaseBucket::Waxing3),
            (180.0, PhaseBucket::Full),
            (-179.999, PhaseBucket::Waning1),
            (-120.0, PhaseBucket::Waning1),
            (-60.0, PhaseBucket::Waning2),
            (-59.999, PhaseBucket::Waning3),
            (-0.001, PhaseBucket::Waning3),
        ];
        for (angle, expected) in cases {
            assert_eq!(PhaseAngle::new(angle).bucket(), expected, "angle {angle}");
        }
    }

    #[test]
    fn waxing_and_waning_partition_the_non_singletons() {
        for bucket in PhaseBucket::ALL {
            let singleton = matches!(bucket, PhaseBucket::New | PhaseBucket::Full);
            assert_eq!(bucket.is_waxing() || bucket.is_waning(), !singleton);
            assert!(!(bucket.is_waxing() && bucket.is_waning()));
        }
    }

    #[test]
    fn narrowing_rules() {
        let new = PhaseBucket::New;
        let full = PhaseBucket::Full;
        assert_eq!(keep_towards(new, PhaseAngle::new(-3.0)), Keep::Upper);
        assert_eq!(keep_towards(new, PhaseAngle::new(3.0)), Keep::Lower);
        assert_eq!(keep_towards(new, PhaseAngle::new(0.0)), Keep::Point);
        assert_eq!(keep_towards(full, PhaseAngle::new(178.0)), Keep::Upper);
        assert_eq!(keep_towards(full, PhaseAngle::new(-178.0)), Keep::Lower);
    }

    proptest! {
        #[test]
        fn normalized_angle_is_in_range(deg in -1.0e6f64..1.0e6) {
            let a = PhaseAngle::new(deg).degrees();
            prop_assert!(a > -180.0 && a <= 180.0, "{} -> {}", deg, a);
        }

        #[test]
        fn classification_is_total(deg in -1.0e6f64..1.0e6) {
            // Must not hit the unreachable arm.
            let _ = PhaseAngle::new(deg).bucket();
        }

        #[test]
        fn normalization_is_idempotent(deg in -720.0f64..720.0) {
            let once = PhaseAngle::new(deg);
            prop_assert_eq!(PhaseAngle::new(once.degrees()), once);
        }
    }
}
