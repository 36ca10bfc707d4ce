// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Combining a day's phase and sign transitions into ordered entries.
//!
//! | Events on the day | Entries |
//! |-------------------|---------|
//! | none | one all-day entry: `curr` phase, `curr` sign |
//! | phase only | phase event, `curr` sign |
//! | sign only | `curr` phase, sign event |
//! | phase before sign | phase event with `curr` sign, then sign event with no phase |
//! | sign before phase | sign event alone, then phase event with the new sign |
//! | both at one instant | a single entry carrying both events |

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::daily::{DailyValue, Event};
use crate::phase::PhaseBucket;
use crate::sign::ZodiacSign;
use crate::status::Entry;

/// Which transitions a day holds, and in what order.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DayEvents {
    Quiet,
    PhaseOnly(Event<PhaseBucket>),
    SignOnly(Event<ZodiacSign>),
    PhaseFirst(Event<PhaseBucket>, Event<ZodiacSign>),
    SignFirst(Event<ZodiacSign>, Event<PhaseBucket>),
    Simultaneous(Event<PhaseBucket>, Event<ZodiacSign>),
}

impl DayEvents {
    pub fn classify(phase: &DailyValue<PhaseBucket>, sign: &DailyValue<ZodiacSign>) -> Self {
        match (phase.event, sign.event) {
            (None, None) => DayEvents::Quiet,
            (Some(p), None) => DayEvents::PhaseOnly(p),
            (None, Some(s)) => DayEvents::SignOnly(s),
            (Some(p), Some(s)) if p.time < s.time => DayEvents::PhaseFirst(p, s),
            (Some(p), Some(s)) if s.time < p.time => DayEvents::SignFirst(s, p),
            (Some(p), Some(s)) => DayEvents::Simultaneous(p, s),
        }
    }
}

/// Entries for `date`, with event times expressed in `tz`.
pub fn merge<Tz: TimeZone>(
    date: NaiveDate,
    tz: &Tz,
    phase: &DailyValue<PhaseBucket>,
    sign: &DailyValue<ZodiacSign>,
) -> Vec<Entry> {
    let at = |time: Option<DateTime<Utc>>, phase: Option<PhaseBucket>, sign: ZodiacSign| Entry {
        date,
        time: time.map(|t| t.with_timezone(tz).time()),
        phase,
        sign,
    };

    match DayEvents::classify(phase, sign) {
        DayEvents::Quiet => vec![at(None, Some(phase.curr), sign.curr)],
        DayEvents::PhaseOnly(p) => vec![at(Some(p.time), Some(p.value), sign.curr)],
        DayEvents::SignOnly(s) => vec![at(Some(s.time), Some(phase.curr), s.value)],
        DayEvents::PhaseFirst(p, s) => vec![
            at(Some(p.time), Some(p.value), sign.curr),
            at(Some(s.time), None, s.value),
        ],
        DayEvents::SignFirst(s, p) => vec![
            at(Some(s.time), None, s.value),
            at(Some(p.time), Some(p.value), s.value),
        ],
        DayEvents::Simultaneous(p, s) => vec![at(Some(p.time), Some(p.value), s.value)],
    }
}
