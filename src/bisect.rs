// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Interval-halving search for the instant a bucketed quantity changes.
//!
//! Both evaluators bracket a crossing between two samples on the time-index
//! axis and repeatedly split the bracket at its midpoint.  What differs is
//! only the rule deciding which half still straddles the crossing, so the
//! loop lives here and the rule is passed in as a closure.

use qtty::{Day, Days, Seconds};

use crate::error::{AlmanacError, Result};
use crate::instant::TimeIndex;

/// A quantity evaluated at one time index.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sample<T> {
    pub index: TimeIndex,
    pub value: T,
}

impl<T> Sample<T> {
    pub const fn new(index: TimeIndex, value: T) -> Self {
        Self { index, value }
    }
}

/// Which part of `[start, end]` keeps bracketing the crossing once the
/// midpoint has been evaluated.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Keep {
    /// `[start, mid]`
    Lower,
    /// `[mid, end]`
    Upper,
    /// The midpoint sits exactly on the crossing: `[mid, mid]`.
    Point,
}

/// Result of a converged search.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Crossing<T> {
    /// Later endpoint of the final bracket, the first sample past the crossing.
    pub sample: Sample<T>,
    /// Number of midpoint evaluations performed.
    pub iterations: u32,
}

/// Bisection settings: stop once the bracket is narrower than `tolerance`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bisection {
    pub tolerance: Days,
    pub max_iterations: u32,
}

impl Default for Bisection {
    fn default() -> Self {
        Self::new(Seconds::new(30.0), 64)
    }
}

impl Bisection {
    pub fn new(tolerance: Seconds, max_iterations: u32) -> Self {
        Self {
            tolerance: tolerance.to::<Day>(),
            max_iterations,
        }
    }

    /// Narrow `[start, end]` until it is shorter than the tolerance.
    ///
    /// `sample` evaluates the tracked quantity at an index; `keep` receives the
    /// current start and the fresh midpoint and picks the half to retain.
    /// The midpoint is always evaluated at least once, even when the initial
    /// bracket is already narrow.
    pub fn run<T, F, K>(
        &self,
        mut start: Sample<T>,
        mut end: Sample<T>,
        mut sample: F,
        mut keep: K,
    ) -> Result<Crossing<T>>
    where
        T: Copy,
        F: FnMut(TimeIndex) -> Result<Sample<T>>,
        K: FnMut(&Sample<T>, &Sample<T>) -> Keep,
    {
        for iterations in 1..=self.max_iterations {
            let mid = sample(start.index.mean(end.index))?;
            match keep(&start, &mid) {
                Keep::Lower => end = mid,
                Keep::Upper => start = mid,
                Keep::Point => {
                    start = mid;
                    end = mid;
                }
            }
            if end.index - start.index < self.tolerance {
                return Ok(Crossing {
                    sample: end,
                    iterations,
                });
            }
        }
        Err(AlmanacError::NoConvergence {
            iterations: self.max_iterations,
        })
    }

    /// Bisection over a predicate that is `false` before the crossing and
    /// `true` after it.
    pub fn run_until<T, F, P>(
        &self,
        start: Sample<T>,
        end: Sample<T>,
        sample: F,
        mut crossed: P,
    ) -> Result<Crossing<T>>
    where
        T: Copy,
        F: FnMut(TimeIndex) -> Result<Sample<T>>,
        P: FnMut(&Sample<T>) -> bool,
    {
        self.run(start, end, sample, |_, mid| {
            if crossed(mid) {
                Keep::Lower
            } else {
                Keep::Upper
            }
        })
    }
}
