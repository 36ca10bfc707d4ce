// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Low-precision analytical Sun and Moon positions.
//!
//! Sun: geometric mean longitude plus the equation of centre, corrected for
//! aberration and the dominant nutation term (Meeus, *Astronomical
//! Algorithms*, ch. 25).
//!
//! Moon: mean longitude plus the 25 largest periodic terms in longitude,
//! the 8 largest in latitude and 5 in distance from Meeus ch. 47,
//! Tables 47.A/47.B, with eccentricity damping of solar-anomaly terms.
//!
//! Accuracy is about 0.01° for the Sun and a few hundredths of a degree for
//! the Moon, i.e. event instants within a few minutes.  Plug a full
//! ephemeris behind [`PositionProvider`] when better is needed.

use crate::error::Result;
use crate::instant::TimeIndex;
use crate::position::{Body, CelestialPosition, PositionProvider};

const AU_KM: f64 = 149_597_870.7;

/// Built-in [`PositionProvider`] for the Sun and the Moon.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct MeanElements;

impl PositionProvider for MeanElements {
    fn position(&self, index: TimeIndex, body: Body) -> Result<CelestialPosition> {
        let t = index.julian_centuries();
        let (longitude, latitude, distance) = match body {
            Body::Sun => sun(t),
            Body::Moon => moon(t),
        };
        Ok(CelestialPosition {
            longitude,
            latitude,
            distance,
            index,
        })
    }
}

fn normalize_deg(deg: f64) -> f64 {
    let r = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}

/// Apparent solar longitude, latitude (0) and distance in km.
fn sun(t: f64) -> (f64, f64, f64) {
    let l0 = 280.46646 + 36_000.76983 * t + 0.000_3032 * t * t;
    let m = (357.52911 + 35_999.05029 * t - 0.000_1537 * t * t).to_radians();
    let c = (1.914_602 - 0.004_817 * t - 0.000_014 * t * t) * m.sin()
        + (0.019_993 - 0.000_101 * t) * (2.0 * m).sin()
        + 0.000_289 * (3.0 * m).sin();
    let omega = (125.04 - 1_934.136 * t).to_radians();
    let longitude = l0 + c - 0.005_69 - 0.004_78 * omega.sin();

    let e = 0.016_708_634 - 0.000_042_037 * t;
    let nu = m + c.to_radians();
    let r_au = 1.000_001_018 * (1.0 - e * e) / (1.0 + e * nu.cos());

    (normalize_deg(longitude), 0.0, r_au * AU_KM)
}

/// Delaunay-style arguments of Meeus ch. 47, in radians: `[D, M, M', F]`.
fn lunar_arguments(t: f64) -> [f64; 4] {
    let d = 297.850_192_1 + 445_267.111_403_4 * t - 0.001_881_9 * t * t;
    let m = 357.529_109_2 + 35_999.050_290_9 * t - 0.000_153_6 * t * t;
    let mp = 134.963_396_4 + 477_198.867_505_5 * t + 0.008_741_4 * t * t;
    let f = 93.272_095_0 + 483_202.017_523_3 * t - 0.003_653_9 * t * t;
    [
        d.to_radians(),
        m.to_radians(),
        mp.to_radians(),
        f.to_radians(),
    ]
}

/// Sum of `coefficient × trig(nD·D + nM·M + nM'·M' + nF·F)`, damping each
/// term by `E^|nM|`.
fn series(terms: &[[f64; 5]], args: &[f64; 4], e: f64, trig: fn(f64) -> f64) -> f64 {
    terms
        .iter()
        .map(|[nd, nm, nmp, nf, coefficient]| {
            let angle = nd * args[0] + nm * args[1] + nmp * args[2] + nf * args[3];
            let damping = e.powi(nm.abs() as i32);
            coefficient * damping * trig(angle)
        })
        .sum()
}

/// Geocentric lunar longitude, latitude and distance in km.
fn moon(t: f64) -> (f64, f64, f64) {
    // Table 47.A, longitude: [nD, nM, nM', nF, Σl coefficient (1e-6 deg)]
    #[rustfmt::skip]
    static LONGITUDE: [[f64; 5]; 25] = [
        [0.0,  0.0,  1.0,  0.0, 6_288_774.0],
        [2.0,  0.0, -1.0,  0.0, 1_274_027.0],
        [2.0,  0.0,  0.0,  0.0,   658_314.0],
        [0.0,  0.0,  2.0,  0.0,   213_618.0],
        [0.0,  1.0,  0.0,  0.0,  -185_116.0],
        [0.0,  0.0,  0.0,  2.0,  -114_332.0],
        [2.0,  0.0, -2.0,  0.0,    58_793.0],
        [2.0, -1.0, -1.0,  0.0,    57_066.0],
        [2.0,  0.0,  1.0,  0.0,    53_322.0],
        [2.0, -1.0,  0.0,  0.0,    45_758.0],
        [0.0,  1.0, -1.0,  0.0,   -40_923.0],
        [1.0,  0.0,  0.0,  0.0,   -34_720.0],
        [0.0,  1.0,  1.0,  0.0,   -30_383.0],
        [2.0,  0.0,  0.0, -2.0,    15_327.0],
        [0.0,  0.0,  1.0,  2.0,   -12_528.0],
        [0.0,  0.0,  1.0, -2.0,    10_980.0],
        [4.0,  0.0, -1.0,  0.0,    10_675.0],
        [0.0,  0.0,  3.0,  0.0,    10_034.0],
        [4.0,  0.0, -2.0,  0.0,     8_548.0],
        [2.0,  1.0, -1.0,  0.0,    -7_888.0],
        [2.0,  1.0,  0.0,  0.0,    -6_766.0],
        [1.0,  0.0, -1.0,  0.0,    -5_163.0],
        [1.0,  1.0,  0.0,  0.0,     4_987.0],
        [2.0, -1.0,  1.0,  0.0,     4_036.0],
        [2.0,  0.0,  2.0,  0.0,     3_994.0],
    ];

    // Table 47.B, latitude: [nD, nM, nM', nF, Σb coefficient (1e-6 deg)]
    #[rustfmt::skip]
    static LATITUDE: [[f64; 5]; 8] = [
        [0.0, 0.0,  0.0,  1.0, 5_128_122.0],
        [0.0, 0.0,  1.0,  1.0,   280_602.0],
        [0.0, 0.0,  1.0, -1.0,   277_693.0],
        [2.0, 0.0,  0.0, -1.0,   173_237.0],
        [2.0, 0.0, -1.0,  1.0,    55_413.0],
        [2.0, 0.0, -1.0, -1.0,    46_271.0],
        [2.0, 0.0,  0.0,  1.0,    32_573.0],
        [0.0, 0.0,  2.0,  1.0,    17_198.0],
    ];

    // Table 47.A, distance: [nD, nM, nM', nF, Σr coefficient (1e-3 km)]
    #[rustfmt::skip]
    static DISTANCE: [[f64; 5]; 5] = [
        [0.0, 0.0,  1.0, 0.0, -20_905_355.0],
        [2.0, 0.0, -1.0, 0.0,  -3_699_111.0],
        [2.0, 0.0,  0.0, 0.0,  -2_955_968.0],
        [0.0, 0.0,  2.0, 0.0,    -569_925.0],
        [0.0, 1.0,  0.0, 0.0,      48_888.0],
    ];

    let mean_longitude = 218.316_447_7 + 481_267.881_234_21 * t - 0.001_578_6 * t * t;
    let args = lunar_arguments(t);
    let e = 1.0 - 0.002_516 * t - 0.000_007_4 * t * t;

    let longitude = mean_longitude + series(&LONGITUDE, &args, e, f64::sin) / 1e6;
    let latitude = series(&LATITUDE, &args, e, f64::sin) / 1e6;
    let distance = 385_000.56 + series(&DISTANCE, &args, e, f64::cos) / 1e3;

    (normalize_deg(longitude), latitude, distance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sun_matches_meeus_example_25a() {
        // 1992-10-13 0h TD: apparent λ = 199.909°, R = 0.99766 AU
        let p = MeanElements
            .position(TimeIndex::new(2_448_908.5), Body::Sun)
            .unwrap();
        assert!((p.longitude - 199.909).abs() < 0.01, "λ = {}", p.longitude);
        assert!((p.distance / AU_KM - 0.997_66).abs() < 1e-4);
        assert_eq!(p.latitude, 0.0);
    }

    #[test]
    fn moon_matches_meeus_example_47a() {
        // 1992-04-12 0h TD: λ = 133.167°, β = -3.229°, Δ = 368 409.7 km
        let p = MeanElements
            .position(TimeIndex::new(2_448_724.5), Body::Moon)
            .unwrap();
        assert!((p.longitude - 133.167).abs() < 0.1, "λ = {}", p.longitude);
        assert!((p.latitude - -3.229).abs() < 0.1, "β = {}", p.latitude);
        assert!((p.distance - 368_409.7).abs() < 500.0, "Δ = {}", p.distance);
    }

    #[test]
    fn longitudes_stay_in_range() {
        for i in 0..400 {
            let t = TimeIndex::new(2_451_545.0 + i as f64 * 3.7);
            for body in [Body::Sun, Body::Moon] {
                let lon = MeanElements.position(t, body).unwrap().longitude;
                assert!((0.0..360.0).contains(&lon), "{body} λ = {lon}");
            }
        }
    }

    #[test]
    fn moon_outpaces_sun() {
        let a = TimeIndex::new(2_460_000.0);
        let b = TimeIndex::new(2_460_000.25);
        let moon_rate = MeanElements.position(b, Body::Moon).unwrap().longitude
            - MeanElements.position(a, Body::Moon).unwrap().longitude;
        let sun_rate = MeanElements.position(b, Body::Sun).unwrap().longitude
            - MeanElements.position(a, Body::Sun).unwrap().longitude;
        assert!(moon_rate.rem_euclid(360.0) > 2.0);
        assert!(sun_rate.rem_euclid(360.0) < 0.5);
    }
}
