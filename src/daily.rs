// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Per-day snapshot of a bucketed quantity.

use chrono::{DateTime, Utc};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A precise bucket transition.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Event<T> {
    pub time: DateTime<Utc>,
    pub value: T,
}

impl<T> Event<T> {
    pub const fn new(time: DateTime<Utc>, value: T) -> Self {
        Self { time, value }
    }
}

/// Bucket at the start of a day (`curr`), at the start of the following day
/// (`next`), and the transition found in between, if any.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DailyValue<T> {
    pub curr: T,
    pub next: T,
    pub event: Option<Event<T>>,
}

impl<T: Copy> DailyValue<T> {
    pub const fn new(curr: T, next: T, event: Option<Event<T>>) -> Self {
        Self { curr, next, event }
    }

    /// The event's bucket when there is one, otherwise `curr`.
    pub fn value(&self) -> T {
        self.event.map_or(self.curr, |e| e.value)
    }

    pub fn has_event(&self) -> bool {
        self.event.is_some()
    }
}

impl<T: std::fmt::Display> std::fmt::Display for DailyValue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.event {
            Some(event) => write!(
                f,
                "{}->{} ({})->{}",
                self.curr,
                event.value,
                event.time.format("%H:%M"),
                self.next
            ),
            None => write!(f, "{}", self.curr),
        }
    }
}
