// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Celestial positions and the memoizing cache in front of the provider.
//!
//! The almanac never computes a longitude itself: it asks a
//! [`PositionProvider`] through a [`PositionCache`], which stores every
//! answer keyed by the exact `(TimeIndex, Body)` pair.  Bisection revisits
//! day boundaries (each day's end is the next day's start), so a run of
//! `n` days issues far fewer than `n × (2 + iterations)` provider calls.

use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{AlmanacError, Result};
use crate::instant::TimeIndex;

/// Bodies the almanac tracks.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Body {
    Sun,
    Moon,
}

impl Body {
    pub const fn name(self) -> &'static str {
        match self {
            Body::Sun => "Sun",
            Body::Moon => "Moon",
        }
    }
}

impl std::fmt::Display for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Geocentric ecliptic position of a body at one time index.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CelestialPosition {
    /// Ecliptic longitude in degrees, `[0, 360)`.
    pub longitude: f64,
    /// Ecliptic latitude in degrees.
    pub latitude: f64,
    /// Distance from the geocentre in kilometres.
    pub distance: f64,
    /// The time index the position was computed at.
    pub index: TimeIndex,
}

/// Source of celestial positions, usually a full ephemeris.
///
/// Must be a pure function of its inputs.  Failures (missing data range,
/// invalid index) are reported as [`AlmanacError::Provider`] and abort the run.
pub trait PositionProvider {
    fn position(&self, index: TimeIndex, body: Body) -> Result<CelestialPosition>;
}

impl<P: PositionProvider + ?Sized> PositionProvider for &P {
    fn position(&self, index: TimeIndex, body: Body) -> Result<CelestialPosition> {
        (**self).position(index, body)
    }
}

impl<P: PositionProvider + ?Sized> PositionProvider for Box<P> {
    fn position(&self, index: TimeIndex, body: Body) -> Result<CelestialPosition> {
        (**self).position(index, body)
    }
}

/// Exact-key memoization over a [`PositionProvider`].
///
/// Entries are never evicted; the cache lives as long as the run that owns
/// it.  Not synchronized: evaluating days in parallel needs one cache per
/// worker or an external lock.
#[derive(Debug)]
pub struct PositionCache<P> {
    provider: P,
    entries: HashMap<(u64, Body), CelestialPosition>,
    misses: usize,
}

impl<P: PositionProvider> PositionCache<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            entries: HashMap::new(),
            misses: 0,
        }
    }

    /// Position of `body` at `index`, querying the provider at most once per key.
    pub fn resolve(&mut self, index: TimeIndex, body: Body) -> Result<CelestialPosition> {
        let key = (index.key(), body);
        if let Some(position) = self.entries.get(&key) {
            return Ok(*position);
        }

        trace!(%index, %body, "position cache miss");
        let position = self.provider.position(index, body)?;
        if !position.longitude.is_finite() {
            return Err(AlmanacError::NonFiniteLongitude { body, index });
        }
        self.misses += 1;
        self.entries.insert(key, position);
        Ok(position)
    }

    /// Number of memoized positions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of provider calls made so far.
    pub fn misses(&self) -> usize {
        self.misses
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn into_provider(self) -> P {
        self.provider
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Counting {
        calls: Cell<usize>,
        longitude: f64,
    }

    impl PositionProvider for Counting {
        fn position(&self, index: TimeIndex, _body: Body) -> Result<CelestialPosition> {
            self.calls.set(self.calls.get() + 1);
            Ok(CelestialPosition {
                longitude: self.longitude,
                latitude: 0.0,
                distance: 1.0,
                index,
            })
        }
    }

    struct Failing;

    impl PositionProvider for Failing {
        fn position(&self, index: TimeIndex, body: Body) -> Result<CelestialPosition> {
            Err(AlmanacError::Provider {
                body,
                index,
                message: "no ephemeris data".into(),
            })
        }
    }

    fn counting(longitude: f64) -> Counting {
        Counting {
            calls: Cell::new(0),
            longitude,
        }
    }

    #[test]
    fn second_lookup_is_served_from_cache() {
        let mut cache = PositionCache::new(counting(42.0));
        let t = TimeIndex::new(2_460_000.5);

        let first = cache.resolve(t, Body::Moon).unwrap();
        let second = cache.resolve(t, Body::Moon).unwrap();

        assert_eq!(first, second);
        assert_eq!(cache.provider().calls.get(), 1);
        assert_eq!(cache.misses(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn key_includes_body_and_exact_index() {
        let mut cache = PositionCache::new(counting(10.0));
        let t = TimeIndex::new(2_460_000.5);

        cache.resolve(t, Body::Sun).unwrap();
        cache.resolve(t, Body::Moon).unwrap();
        cache.resolve(TimeIndex::new(2_460_000.500_001), Body::Moon).unwrap();

        assert_eq!(cache.provider().calls.get(), 3);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn provider_failure_propagates_and_is_not_cached() {
        let mut cache = PositionCache::new(Failing);
        let err = cache.resolve(TimeIndex::J2000, Body::Sun).unwrap_err();
        assert!(matches!(err, AlmanacError::Provider { body: Body::Sun, .. }));
        assert!(cache.is_empty());
    }

    #[test]
    fn non_finite_longitude_is_rejected() {
        let mut cache = PositionCache::new(counting(f64::NAN));
        let err = cache.resolve(TimeIndex::J2000, Body::Moon).unwrap_err();
        assert_eq!(
            err,
            AlmanacError::NonFiniteLongitude {
                body: Body::Moon,
                index: TimeIndex::J2000
            }
        );
    }

    #[test]
    fn borrowed_provider_is_a_provider() {
        let provider = counting(1.0);
        let mut cache = PositionCache::new(&provider);
        cache.resolve(TimeIndex::J2000, Body::Sun).unwrap();
        assert_eq!(provider.calls.get(), 1);
    }
}
