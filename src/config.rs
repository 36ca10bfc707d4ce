// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

use qtty::Seconds;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bisect::Bisection;

/// Tuning knobs of an almanac run.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(from = "ConfigRepr", into = "ConfigRepr")
)]
pub struct AlmanacConfig {
    /// Width below which an event bracket counts as located.
    pub tolerance: Seconds,
    /// Hard cap on midpoint evaluations per event.
    pub max_iterations: u32,
}

impl Default for AlmanacConfig {
    fn default() -> Self {
        Self {
            tolerance: Seconds::new(30.0),
            max_iterations: 64,
        }
    }
}

impl AlmanacConfig {
    pub fn with_tolerance(mut self, tolerance: Seconds) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn bisection(&self) -> Bisection {
        Bisection::new(self.tolerance, self.max_iterations)
    }
}

/// Wire form: the tolerance travels as plain seconds.
#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct ConfigRepr {
    tolerance_seconds: f64,
    max_iterations: u32,
}

#[cfg(feature = "serde")]
impl From<ConfigRepr> for AlmanacConfig {
    fn from(repr: ConfigRepr) -> Self {
        Self {
            tolerance: Seconds::new(repr.tolerance_seconds),
            max_iterations: repr.max_iterations,
        }
    }
}

#[cfg(feature = "serde")]
impl From<AlmanacConfig> for ConfigRepr {
    fn from(config: AlmanacConfig) -> Self {
        Self {
            tolerance_seconds: config.tolerance.value(),
            max_iterations: config.max_iterations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qtty::Days;

    #[test]
    fn default_is_thirty_seconds() {
        let bisection = AlmanacConfig::default().bisection();
        assert!((bisection.tolerance - Days::new(30.0 / 86_400.0)).abs() < Days::new(1e-15));
        assert_eq!(bisection.max_iterations, 64);
    }

    #[test]
    fn builders_override_fields() {
        let config = AlmanacConfig::default()
            .with_tolerance(Seconds::new(1.0))
            .with_max_iterations(10);
        assert_eq!(config.tolerance, Seconds::new(1.0));
        assert_eq!(config.max_iterations, 10);
        assert_eq!(config.bisection(), Bisection::new(Seconds::new(1.0), 10));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_uses_plain_seconds() {
        let json = serde_json::to_string(&AlmanacConfig::default()).unwrap();
        assert_eq!(json, r#"{"tolerance_seconds":30.0,"max_iterations":64}"#);
        let back: AlmanacConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, AlmanacConfig::default());
    }
}
