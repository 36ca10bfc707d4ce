// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! ΔT = TT − UT, the piecewise model of Meeus, *Astronomical Algorithms*
//! (2nd ed. 1998), chapter 9.
//!
//! Used by [`DeltaTConverter`](crate::DeltaTConverter) to move civil
//! instants onto the uniform TT axis that ephemerides are tabulated on.
//! Typical uncertainty is ≤ ±2 s before 1800 CE and ≤ ±0.5 s since 1900,
//! well below the 30 s bisection tolerance.

use qtty::{Day, Days, Seconds, Simplify};

const JULIAN_CENTURY: Days = Days::new(36_525.0);

/// Total number of tabulated terms (biennial 1620–1992).
const TERMS: usize = 187;

/// Biennial ΔT table from 1620 to 1992 (in seconds), compiled by J. Meeus.
#[rustfmt::skip]
const DELTA_T: [Seconds; TERMS] = qtty::qtty_vec!(
    Seconds;
    124.0,115.0,106.0, 98.0, 91.0, 85.0, 79.0, 74.0, 70.0, 65.0,
     62.0, 58.0, 55.0, 53.0, 50.0, 48.0, 46.0, 44.0, 42.0, 40.0,
     37.0, 35.0, 33.0, 31.0, 28.0, 26.0, 24.0, 22.0, 20.0, 18.0,
     16.0, 14.0, 13.0, 12.0, 11.0, 10.0,  9.0,  9.0,  9.0,  9.0,
      9.0,  9.0,  9.0,  9.0, 10.0, 10.0, 10.0, 10.0, 10.0, 11.0,
     11.0, 11.0, 11.0, 11.0, 11.0, 11.0, 12.0, 12.0, 12.0, 12.0,
     12.0, 12.0, 13.0, 13.0, 13.0, 13.0, 14.0, 14.0, 14.0, 15.0,
     15.0, 15.0, 15.0, 16.0, 16.0, 16.0, 16.0, 16.0, 17.0, 17.0,
     17.0, 17.0, 17.0, 17.0, 17.0, 17.0, 16.0, 16.0, 15.0, 14.0,
     13.7, 13.1, 12.7, 12.5, 12.5, 12.5, 12.5, 12.5, 12.5, 12.3,
     12.0, 11.4, 10.6,  9.6,  8.6,  7.5,  6.6,  6.0,  5.7,  5.6,
      5.7,  5.9,  6.2,  6.5,  6.8,  7.1,  7.3,  7.5,  7.7,  7.8,
      7.9,  7.5,  6.4,  5.4,  2.9,  1.6, -1.0, -2.7, -3.6, -4.7,
     -5.4, -5.2, -5.5, -5.6, -5.8, -5.9, -6.2, -6.4, -6.1, -4.7,
     -2.7,  0.0,  2.6,  5.4,  7.7, 10.5, 13.4, 16.0, 18.2, 20.2,
     21.2, 22.4, 23.5, 23.9, 24.3, 24.0, 23.9, 23.9, 23.7, 24.0,
     24.3, 25.3, 26.2, 27.3, 28.2, 29.1, 30.0, 30.7, 31.4, 32.2,
     33.1, 34.0, 35.0, 36.5, 38.3, 40.2, 42.2, 44.5, 46.5, 48.5,
     50.5, 52.2, 53.8, 54.9, 55.8, 56.9, 58.3,
);

/// Era boundaries on the UT axis.
const JD_948: Days = Days::new(2_067_314.5);
const JD_1600: Days = Days::new(2_305_447.5);
const JD_1992: Days = Days::new(2_448_622.5);
const JD_2010: Days = Days::new(2_455_197.5);

#[inline]
fn ratio(num: Days, den: Days) -> f64 {
    (num / den).simplify().value()
}

/// Stephenson & Houlden (1986), years before 948 CE.
fn ancient(jd_ut: Days) -> Seconds {
    let c = ratio(jd_ut - JD_948, JULIAN_CENTURY);
    Seconds::new(1_830.0) + Seconds::new(-405.0) * c + Seconds::new(46.5) * c * c
}

/// Stephenson & Houlden (1986), 948–1600 CE.
fn medieval(jd_ut: Days) -> Seconds {
    const JD_1850: Days = Days::new(2_396_758.5);
    let c = ratio(jd_ut - JD_1850, JULIAN_CENTURY);
    Seconds::new(22.5) * c * c
}

/// Quadratic interpolation in the biennial table, 1600–1992.
fn tabulated(jd_ut: Days) -> Seconds {
    const JD_1620: Days = Days::new(2_312_752.5);
    const STEP: Days = Days::new(730.5);

    let i = (ratio(jd_ut - JD_1620, STEP).max(0.0) as usize).min(TERMS - 3);
    let a = DELTA_T[i + 1] - DELTA_T[i];
    let b = DELTA_T[i + 2] - DELTA_T[i + 1];
    let c = a - b;
    let n = ratio(jd_ut - (JD_1620 + STEP * i as f64), STEP);
    DELTA_T[i + 1] + n / 2.0 * (a + b + n * c)
}

/// Interpolation over Meeus's 1990/2000/2010 estimates.
fn recent(jd_ut: Days) -> Seconds {
    const DT: [Seconds; 3] = [Seconds::new(56.86), Seconds::new(63.83), Seconds::new(70.0)];
    const JD_2000: Days = Days::new(2_451_544.5);
    const DECADE: Days = Days::new(3_652.5);

    let a = DT[1] - DT[0];
    let b = DT[2] - DT[1];
    let c = b - a;
    let n = ratio(jd_ut - JD_2000, DECADE);
    DT[1] + n / 2.0 * (a + b + n * c)
}

/// Meeus eq. 9.1 extrapolation, after 2010.
fn extrapolated(jd_ut: Days) -> Seconds {
    const JD_1810: Days = Days::new(2_382_148.0);
    let t = ratio(jd_ut - JD_1810, Days::new(1.0));
    Seconds::new(-15.0) + Seconds::new((t * t) / 41_048_480.0)
}

/// ΔT in seconds for a Julian Day on the UT axis.
pub(crate) fn delta_t_seconds_from_ut(jd_ut: Days) -> Seconds {
    match jd_ut {
        jd if jd < JD_948 => ancient(jd),
        jd if jd < JD_1600 => medieval(jd),
        jd if jd < JD_1992 => tabulated(jd),
        jd if jd <= JD_2010 => recent(jd),
        jd => extrapolated(jd),
    }
}

/// Invert `tt = ut + ΔT(ut)` by fixed-point iteration.
///
/// dΔT/dJD is of order 1e-8, so three steps reach sub-microsecond accuracy.
pub(crate) fn ut_from_tt(jd_tt: Days) -> Days {
    let mut ut = jd_tt;
    for _ in 0..3 {
        ut = jd_tt - delta_t_seconds_from_ut(ut).to::<Day>();
    }
    ut
}
