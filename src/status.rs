// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Personal-care recommendation rules.
//!
//! Every rule is a pure function of an [`Entry`]: its Moon sign, its phase
//! bucket (absent on the second row of a phase-then-sign day) and the
//! weekday of its date.
//!
//! | Activity | Rule |
//! |----------|------|
//! | Haircut | Leo/Virgo +2; Capricorn while waning −1; Cancer/Pisces −2 |
//! | Nails cut | Cancer/Gemini/Pisces −1; Friday +1 (a resulting 0 is a warning); Saturday −1 |
//! | Epilation | waning +1, waxing −1; Capricorn while waning +1; Leo/Virgo −1 (a resulting 0 is a warning) |
//! | Facial cleansing | waxing −1 (Leo −1 more); Full −2; waning in Aries/Capricorn +1 |
//! | Face mask | waxing +1; Aries +1 |

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::phase::PhaseBucket;
use crate::sign::ZodiacSign;

/// Recommendation level for one activity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Status {
    VeryNegative,
    Negative,
    Neutral,
    Positive,
    VeryPositive,
    /// Positive and negative influences cancelled out exactly.
    Warning,
}

impl Status {
    /// Numeric score in `-2..=2`; `None` for [`Status::Warning`].
    pub const fn score(self) -> Option<i8> {
        match self {
            Status::VeryNegative => Some(-2),
            Status::Negative => Some(-1),
            Status::Neutral => Some(0),
            Status::Positive => Some(1),
            Status::VeryPositive => Some(2),
            Status::Warning => None,
        }
    }

    /// Status for a running total; totals past ±2 saturate.
    pub const fn from_score(score: i8) -> Self {
        match score {
            i8::MIN..=-2 => Status::VeryNegative,
            -1 => Status::Negative,
            0 => Status::Neutral,
            1 => Status::Positive,
            2..=i8::MAX => Status::VeryPositive,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.score() {
            Some(score) => write!(f, "{score:+}"),
            None => f.write_str("!"),
        }
    }
}

/// The scored activities, in table column order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Activity {
    Haircut,
    NailsCut,
    Epilation,
    FacialCleansing,
    FaceMask,
}

impl Activity {
    pub const ALL: [Activity; 5] = [
        Activity::Haircut,
        Activity::NailsCut,
        Activity::Epilation,
        Activity::FacialCleansing,
        Activity::FaceMask,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Activity::Haircut => "Haircut",
            Activity::NailsCut => "Nails cut",
            Activity::Epilation => "Epilation",
            Activity::FacialCleansing => "Facial cleansing",
            Activity::FaceMask => "Face mask",
        }
    }
}

impl std::fmt::Display for Activity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One scoring snapshot of a day.
///
/// `time` is the local time-of-day of the transition the entry starts at,
/// or `None` for an entry covering the whole day.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Entry {
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub phase: Option<PhaseBucket>,
    pub sign: ZodiacSign,
}

impl Entry {
    fn is_waxing(&self) -> bool {
        self.phase.is_some_and(PhaseBucket::is_waxing)
    }

    fn is_waning(&self) -> bool {
        self.phase.is_some_and(PhaseBucket::is_waning)
    }

    pub fn status(&self, activity: Activity) -> Status {
        match activity {
            Activity::Haircut => self.haircut(),
            Activity::NailsCut => self.nails_cut(),
            Activity::Epilation => self.epilation(),
            Activity::FacialCleansing => self.facial_cleansing(),
            Activity::FaceMask => self.face_mask(),
        }
    }

    pub fn haircut(&self) -> Status {
        match self.sign {
            ZodiacSign::Leo | ZodiacSign::Virgo => Status::VeryPositive,
            ZodiacSign::Capricorn if self.is_waning() => Status::Negative,
            ZodiacSign::Cancer | ZodiacSign::Pisces => Status::VeryNegative,
            _ => Status::Neutral,
        }
    }

    pub fn nails_cut(&self) -> Status {
        let mut score = 0;
        if matches!(
            self.sign,
            ZodiacSign::Cancer | ZodiacSign::Gemini | ZodiacSign::Pisces
        ) {
            score -= 1;
        }
        match self.date.weekday() {
            Weekday::Fri => {
                score += 1;
                if score == 0 {
                    return Status::Warning;
                }
            }
            Weekday::Sat => score -= 1,
            _ => {}
        }
        Status::from_score(score)
    }

    pub fn epilation(&self) -> Status {
        let mut score = 0;
        if self.is_waning() {
            score += 1;
        } else if self.is_waxing() {
            score -= 1;
        }
        match self.sign {
            ZodiacSign::Capricorn if self.is_waning() => score += 1,
            ZodiacSign::Leo | ZodiacSign::Virgo => {
                score -= 1;
                if score == 0 {
                    return Status::Warning;
                }
            }
            _ => {}
        }
        Status::from_score(score)
    }

    pub fn facial_cleansing(&self) -> Status {
        let score = match self.phase {
            Some(PhaseBucket::Full) => -2,
            Some(p) if p.is_waxing() => {
                if self.sign == ZodiacSign::Leo {
                    -2
                } else {
                    -1
                }
            }
            Some(p) if p.is_waning() => {
                if matches!(self.sign, ZodiacSign::Aries | ZodiacSign::Capricorn) {
                    1
                } else {
                    0
                }
            }
            _ => 0,
        };
        Status::from_score(score)
    }

    pub fn face_mask(&self) -> Status {
        let mut score = 0;
        if self.is_waxing() {
            score += 1;
        }
        if self.sign == ZodiacSign::Aries {
            score += 1;
        }
        Status::from_score(score)
    }

    pub fn scores(&self) -> Scores {
        Scores {
            haircut: self.haircut(),
            nails_cut: self.nails_cut(),
            epilation: self.epilation(),
            facial_cleansing: self.facial_cleansing(),
            face_mask: self.face_mask(),
        }
    }
}

/// All five statuses of one entry.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Scores {
    pub haircut: Status,
    pub nails_cut: Status,
    pub epilation: Status,
    pub facial_cleansing: Status,
    pub face_mask: Status,
}

impl Scores {
    pub fn get(&self, activity: Activity) -> Status {
        match activity {
            Activity::Haircut => self.haircut,
            Activity::NailsCut => self.nails_cut,
            Activity::Epilation => self.epilation,
            Activity::FacialCleansing => self.facial_cleansing,
            Activity::FaceMask => self.face_mask,
        }
    }

    /// Statuses in [`Activity::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Activity, Status)> + '_ {
        Activity::ALL.into_iter().map(move |a| (a, self.get(a)))
    }
}
