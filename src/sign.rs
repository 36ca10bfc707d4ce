// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Zodiac sign of the Moon: twelve 30° slices of ecliptic longitude.

use chrono::{DateTime, Duration, Utc};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bisect::{Bisection, Keep, Sample};
use crate::daily::{DailyValue, Event};
use crate::error::Result;
use crate::instant::{TimeConverter, TimeIndex};
use crate::position::{Body, PositionCache, PositionProvider};

/// Zodiac signs in ecliptic order, Aries starting at longitude 0°.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    pub const ALL: [ZodiacSign; 12] = [
        ZodiacSign::Aries,
        ZodiacSign::Taurus,
        ZodiacSign::Gemini,
        ZodiacSign::Cancer,
        ZodiacSign::Leo,
        ZodiacSign::Virgo,
        ZodiacSign::Libra,
        ZodiacSign::Scorpio,
        ZodiacSign::Sagittarius,
        ZodiacSign::Capricorn,
        ZodiacSign::Aquarius,
        ZodiacSign::Pisces,
    ];

    /// Angular width of one sign, in degrees.
    pub const WIDTH: f64 = 30.0;

    /// Sign containing `longitude` (degrees, any range).
    pub fn from_longitude(longitude: f64) -> Self {
        let slot = (longitude / Self::WIDTH).floor().rem_euclid(12.0) as usize;
        Self::from_index(slot)
    }

    /// Position in `0..12`.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % 12]
    }

    pub const fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub const fn prev(self) -> Self {
        Self::from_index(self.index() + 11)
    }

    pub const fn name(self) -> &'static str {
        match self {
            ZodiacSign::Aries => "Aries",
            ZodiacSign::Taurus => "Taurus",
            ZodiacSign::Gemini => "Gemini",
            ZodiacSign::Cancer => "Cancer",
            ZodiacSign::Leo => "Leo",
            ZodiacSign::Virgo => "Virgo",
            ZodiacSign::Libra => "Libra",
            ZodiacSign::Scorpio => "Scorpio",
            ZodiacSign::Sagittarius => "Sagittarius",
            ZodiacSign::Capricorn => "Capricorn",
            ZodiacSign::Aquarius => "Aquarius",
            ZodiacSign::Pisces => "Pisces",
        }
    }

    pub const fn symbol(self) -> char {
        match self {
            ZodiacSign::Aries => '♈',
            ZodiacSign::Taurus => '♉',
            ZodiacSign::Gemini => '♊',
            ZodiacSign::Cancer => '♋',
            ZodiacSign::Leo => '♌',
            ZodiacSign::Virgo => '♍',
            ZodiacSign::Libra => '♎',
            ZodiacSign::Scorpio => '♏',
            ZodiacSign::Sagittarius => '♐',
            ZodiacSign::Capricorn => '♑',
            ZodiacSign::Aquarius => '♒',
            ZodiacSign::Pisces => '♓',
        }
    }
}

impl std::fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Sign of the Moon at `index`.
pub fn moon_sign_at<P: PositionProvider>(
    cache: &mut PositionCache<P>,
    index: TimeIndex,
) -> Result<Sample<ZodiacSign>> {
    let moon = cache.resolve(index, Body::Moon)?;
    Ok(Sample::new(index, ZodiacSign::from_longitude(moon.longitude)))
}

/// Moon sign at both ends of the day starting at `day_start`, plus the
/// ingress instant when the two differ.
pub fn sign_for_day<P, C>(
    cache: &mut PositionCache<P>,
    converter: &C,
    bisection: &Bisection,
    day_start: DateTime<Utc>,
) -> Result<DailyValue<ZodiacSign>>
where
    P: PositionProvider,
    C: TimeConverter,
{
    let start = moon_sign_at(cache, converter.to_index(day_start)?)?;
    let end = moon_sign_at(cache, converter.to_index(day_start + Duration::days(1))?)?;

    let event = if start.value != end.value {
        let crossing = bisection.run(
            start,
            end,
            |index| moon_sign_at(cache, index),
            |start, mid| {
                if mid.value != start.value {
                    Keep::Lower
                } else {
                    Keep::Upper
                }
            },
        )?;
        let time = converter.to_utc(crossing.sample.index)?;
        debug!(
            %day_start,
            sign = %crossing.sample.value,
            %time,
            iterations = crossing.iterations,
            "located sign ingress"
        );
        Some(Event::new(time, crossing.sample.value))
    } else {
        None
    };

    Ok(DailyValue::new(start.value, end.value, event))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn slices_of_thirty_degrees() {
        assert_eq!(ZodiacSign::from_longitude(0.0), ZodiacSign::Aries);
        assert_eq!(ZodiacSign::from_longitude(29.999), ZodiacSign::Aries);
        assert_eq!(ZodiacSign::from_longitude(30.0), ZodiacSign::Taurus);
        assert_eq!(ZodiacSign::from_longitude(125.0), ZodiacSign::Leo);
        assert_eq!(ZodiacSign::from_longitude(275.0), ZodiacSign::Capricorn);
        assert_eq!(ZodiacSign::from_longitude(359.999), ZodiacSign::Pisces);
    }

    #[test]
    fn out_of_range_longitudes_wrap() {
        assert_eq!(ZodiacSign::from_longitude(360.0), ZodiacSign::Aries);
        assert_eq!(ZodiacSign::from_longitude(-1.0), ZodiacSign::Pisces);
        assert_eq!(ZodiacSign::from_longitude(-1e-15), ZodiacSign::Pisces);
        assert_eq!(ZodiacSign::from_longitude(400.0), ZodiacSign::Taurus);
    }

    #[test]
    fn neighbours_wrap_around() {
        assert_eq!(ZodiacSign::Aries.prev(), ZodiacSign::Pisces);
        assert_eq!(ZodiacSign::Pisces.next(), ZodiacSign::Aries);
        assert_eq!(ZodiacSign::Leo.next(), ZodiacSign::Virgo);
        for sign in ZodiacSign::ALL {
            assert_eq!(sign.next().prev(), sign);
        }
    }

    #[test]
    fn index_matches_table_position() {
        for (i, sign) in ZodiacSign::ALL.iter().enumerate() {
            assert_eq!(sign.index(), i);
            assert_eq!(ZodiacSign::from_index(i), *sign);
        }
    }

    #[test]
    fn symbols_are_distinct() {
        let mut symbols: Vec<char> = ZodiacSign::ALL.iter().map(|s| s.symbol()).collect();
        symbols.dedup();
        assert_eq!(symbols.len(), 12);
        assert_eq!(ZodiacSign::Capricorn.to_string(), "Capricorn");
    }

    proptest! {
        #[test]
        fn bucket_is_floor_of_longitude_over_thirty(lon in 0.0f64..360.0) {
            let sign = ZodiacSign::from_longitude(lon);
            prop_assert_eq!(sign.index(), ((lon / 30.0).floor() as usize) % 12);
        }
    }
}
