// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! The day-by-day engine tying the evaluators, the merger and the rules
//! together.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::calendar::{day_start, DateRange};
use crate::config::AlmanacConfig;
use crate::daily::DailyValue;
use crate::error::Result;
use crate::instant::{DeltaTConverter, TimeConverter, TimeIndex};
use crate::merge::merge;
use crate::phase::{self, PhaseBucket};
use crate::position::{PositionCache, PositionProvider};
use crate::sign::{self, ZodiacSign};
use crate::status::{Entry, Scores};

/// Owns the position cache for one run and evaluates days against it.
///
/// # Examples
///
/// ```
/// use chrono::{NaiveDate, Utc};
/// use lunar_almanac::{Almanac, MeanElements};
///
/// let mut almanac = Almanac::new(MeanElements);
/// let day = almanac
///     .day(NaiveDate::from_ymd_opt(2024, 1, 11).unwrap(), &Utc)
///     .unwrap();
/// assert!(day.phase.event.is_some());
/// ```
#[derive(Debug)]
pub struct Almanac<P, C = DeltaTConverter> {
    cache: PositionCache<P>,
    converter: C,
    config: AlmanacConfig,
}

impl<P: PositionProvider> Almanac<P> {
    pub fn new(provider: P) -> Self {
        Self::with_converter(provider, DeltaTConverter)
    }
}

impl<P: PositionProvider, C: TimeConverter> Almanac<P, C> {
    pub fn with_converter(provider: P, converter: C) -> Self {
        Self {
            cache: PositionCache::new(provider),
            converter,
            config: AlmanacConfig::default(),
        }
    }

    pub fn with_config(mut self, config: AlmanacConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &AlmanacConfig {
        &self.config
    }

    pub fn converter(&self) -> &C {
        &self.converter
    }

    pub fn cache(&self) -> &PositionCache<P> {
        &self.cache
    }

    pub fn into_cache(self) -> PositionCache<P> {
        self.cache
    }

    /// Phase bucket at a single time index.
    pub fn phase_at(&mut self, index: TimeIndex) -> Result<PhaseBucket> {
        Ok(phase::phase_at(&mut self.cache, index)?.value.bucket())
    }

    /// Moon sign at a single time index.
    pub fn moon_sign_at(&mut self, index: TimeIndex) -> Result<ZodiacSign> {
        Ok(sign::moon_sign_at(&mut self.cache, index)?.value)
    }

    pub fn phase_for_day<Tz: TimeZone>(
        &mut self,
        start: &DateTime<Tz>,
    ) -> Result<DailyValue<PhaseBucket>> {
        phase::phase_for_day(
            &mut self.cache,
            &self.converter,
            &self.config.bisection(),
            start.with_timezone(&Utc),
        )
    }

    pub fn sign_for_day<Tz: TimeZone>(
        &mut self,
        start: &DateTime<Tz>,
    ) -> Result<DailyValue<ZodiacSign>> {
        sign::sign_for_day(
            &mut self.cache,
            &self.converter,
            &self.config.bisection(),
            start.with_timezone(&Utc),
        )
    }

    /// Evaluate one calendar day as seen from `tz`.
    pub fn day<Tz: TimeZone>(&mut self, date: NaiveDate, tz: &Tz) -> Result<Day<Tz>> {
        let start = day_start(date, tz)?;
        let phase = self.phase_for_day(&start)?;
        let sign = self.sign_for_day(&start)?;
        debug!(%date, %phase, %sign, "evaluated day");
        Ok(Day {
            date,
            start,
            phase,
            sign,
        })
    }

    /// Evaluate every day of `range`; the first failure aborts the run.
    pub fn days<Tz: TimeZone>(&mut self, range: &DateRange, tz: &Tz) -> Result<Vec<Day<Tz>>> {
        let days = range
            .days()
            .map(|date| self.day(date, tz))
            .collect::<Result<Vec<_>>>()?;
        info!(
            %range,
            days = days.len(),
            positions = self.cache.len(),
            "almanac run complete"
        );
        Ok(days)
    }
}

/// Phase and sign of one calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct Day<Tz: TimeZone> {
    pub date: NaiveDate,
    /// Local start of the day.
    pub start: DateTime<Tz>,
    pub phase: DailyValue<PhaseBucket>,
    pub sign: DailyValue<ZodiacSign>,
}

impl<Tz: TimeZone> Day<Tz> {
    /// One or two scoring entries, times local to the day's zone.
    pub fn entries(&self) -> Vec<Entry> {
        merge(self.date, &self.start.timezone(), &self.phase, &self.sign)
    }

    pub fn rows(&self) -> Vec<Row> {
        self.entries().into_iter().map(Row::from).collect()
    }
}

/// A scored entry, ready for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Row {
    pub entry: Entry,
    pub scores: Scores,
}

impl From<Entry> for Row {
    fn from(entry: Entry) -> Self {
        Self {
            scores: entry.scores(),
            entry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AlmanacError;
    use crate::instant::UniversalConverter;
    use crate::position::{Body, CelestialPosition};
    use crate::status::Status;

    /// Sun fixed at 0°, Moon moving 12° per day from `moon0` at JD 0.
    struct Linear {
        moon0: f64,
    }

    impl PositionProvider for Linear {
        fn position(&self, index: TimeIndex, body: Body) -> Result<CelestialPosition> {
            let longitude = match body {
                Body::Sun => 0.0,
                Body::Moon => (self.moon0 + 12.0 * index.value()).rem_euclid(360.0),
            };
            Ok(CelestialPosition {
                longitude,
                latitude: 0.0,
                distance: 1.0,
                index,
            })
        }
    }

    struct Broken;

    impl PositionProvider for Broken {
        fn position(&self, index: TimeIndex, body: Body) -> Result<CelestialPosition> {
            Err(AlmanacError::Provider {
                body,
                index,
                message: "out of ephemeris range".into(),
            })
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    /// Linear provider whose Moon sits at `lon` at the start of 2024-01-01 UT.
    fn linear_at_new_year(lon: f64) -> Almanac<Linear, UniversalConverter> {
        let jd = 2_460_310.5;
        Almanac::with_converter(
            Linear {
                moon0: lon - 12.0 * jd,
            },
            UniversalConverter,
        )
    }

    #[test]
    fn quiet_day_has_one_all_day_row() {
        // 100° → 112°: Waxing2, Cancer, no boundary crossed
        let mut almanac = linear_at_new_year(100.0);
        let day = almanac.day(date(1), &Utc).unwrap();
        assert_eq!(day.phase.curr, PhaseBucket::Waxing2);
        assert_eq!(day.sign.curr, ZodiacSign::Cancer);
        assert!(day.phase.event.is_none() && day.sign.event.is_none());

        let rows = day.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].entry.time, None);
        assert_eq!(rows[0].scores.haircut, Status::VeryNegative);
    }

    #[test]
    fn sign_ingress_is_located_within_tolerance() {
        // 84° → 96°: Gemini into Cancer at 84 + 12·0.5, i.e. noon
        let mut almanac = linear_at_new_year(84.0);
        let day = almanac.day(date(1), &Utc).unwrap();
        let event = day.sign.event.unwrap();
        assert_eq!(event.value, ZodiacSign::Cancer);
        let noon = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let error = (event.time - noon).num_seconds().abs();
        assert!(error <= 30, "ingress off by {error} s");
        assert!(event.time >= noon - chrono::Duration::seconds(1));
    }

    #[test]
    fn new_moon_is_found_and_merged_with_ingress() {
        // 357° → 9°: conjunction at 06:00, Pisces into Aries at the same instant
        let mut almanac = linear_at_new_year(357.0);
        let day = almanac.day(date(1), &Utc).unwrap();
        let phase_event = day.phase.event.unwrap();
        let sign_event = day.sign.event.unwrap();
        assert_eq!(phase_event.value, PhaseBucket::New);
        assert_eq!(sign_event.value, ZodiacSign::Aries);
        let six = Utc.with_ymd_and_hms(2024, 1, 1, 6, 0, 0).unwrap();
        assert!((phase_event.time - six).num_seconds().abs() <= 30);

        // Both searches bracket the same root over the same samples.
        assert_eq!(phase_event.time, sign_event.time);
        assert_eq!(day.entries().len(), 1);
    }

    #[test]
    fn full_moon_is_found() {
        // 174° → 186°: opposition at 12:00
        let mut almanac = linear_at_new_year(174.0);
        let day = almanac.day(date(1), &Utc).unwrap();
        let event = day.phase.event.unwrap();
        assert_eq!(event.value, PhaseBucket::Full);
        assert_eq!(day.phase.curr, PhaseBucket::Waxing3);
        assert_eq!(day.phase.next, PhaseBucket::Waning1);
        assert_eq!(day.sign.curr, ZodiacSign::Virgo);

        let noon = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let late = (event.time - noon).num_milliseconds();
        assert!((-1..=30_000).contains(&late), "opposition off by {late} ms");

        // Within one tolerance of Moon motion (12°/day) past opposition.
        let index = almanac.converter().to_index(event.time).unwrap();
        let angle = phase::phase_at(&mut almanac.cache, index).unwrap().value;
        let max_drift = 12.0 * 30.0 / 86_400.0;
        assert!(
            180.0 - angle.degrees().abs() <= max_drift,
            "angle {} at the event",
            angle.degrees()
        );
    }

    #[test]
    fn sub_bucket_boundaries_raise_no_phase_event() {
        // 55° → 67°: Waxing1 into Waxing2 silently
        let mut almanac = linear_at_new_year(55.0);
        let day = almanac.day(date(1), &Utc).unwrap();
        assert_eq!(day.phase.curr, PhaseBucket::Waxing1);
        assert_eq!(day.phase.next, PhaseBucket::Waxing2);
        assert!(day.phase.event.is_none());
    }

    #[test]
    fn consecutive_days_share_boundary_positions() {
        // 91° → 103° → 115°: two quiet days in Cancer
        let mut almanac = linear_at_new_year(91.0);
        let range = DateRange::new(date(1), date(3)).unwrap();
        let days = almanac.days(&range, &Utc).unwrap();
        assert_eq!(days.len(), 2);
        // 3 boundaries × 2 bodies, nothing bisected.
        assert_eq!(almanac.cache().misses(), 6);
        assert_eq!(days[1].phase.curr, days[0].phase.next);
    }

    #[test]
    fn provider_failure_aborts_the_run() {
        let mut almanac = Almanac::new(Broken);
        let range = DateRange::month(2024, 1).unwrap();
        let err = almanac.days(&range, &Utc).unwrap_err();
        assert!(matches!(err, AlmanacError::Provider { .. }));
    }

    #[test]
    fn tighter_tolerance_needs_more_iterations() {
        let mut coarse = linear_at_new_year(84.0);
        let mut fine = linear_at_new_year(84.0)
            .with_config(AlmanacConfig::default().with_tolerance(qtty::Seconds::new(1.0)));
        coarse.day(date(1), &Utc).unwrap();
        fine.day(date(1), &Utc).unwrap();
        assert!(fine.cache().misses() > coarse.cache().misses());
    }
}
