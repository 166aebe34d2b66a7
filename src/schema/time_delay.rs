//! Time delays attached to temporal gradual patterns.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::pattern::round3;

const SECONDS_PER_YEAR: f64 = 3.154e7;
const SECONDS_PER_MONTH: f64 = 2.628e6;
const SECONDS_PER_WEEK: f64 = 604_800.0;
const SECONDS_PER_DAY: f64 = 86_400.0;
const SECONDS_PER_HOUR: f64 = 3_600.0;
const SECONDS_PER_MINUTE: f64 = 60.0;

/// Unit a delay magnitude is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
    Years,
}

impl TimeUnit {
    pub fn name(self) -> &'static str {
        match self {
            Self::Seconds => "seconds",
            Self::Minutes => "minutes",
            Self::Hours => "hours",
            Self::Days => "days",
            Self::Weeks => "weeks",
            Self::Months => "months",
            Self::Years => "years",
        }
    }
}

/// A signed delay (seconds) with the support it was observed at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeDelay {
    /// Delay in seconds; negative means earlier.
    pub timestamp: f64,
    /// Confidence of the delay, rounded to 3 decimals.
    pub support: f64,
}

impl Default for TimeDelay {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl TimeDelay {
    pub fn new(timestamp: f64, support: f64) -> Self {
        Self {
            timestamp,
            support: round3(support),
        }
    }

    /// A zero delay carries no information.
    pub fn is_valid(&self) -> bool {
        self.timestamp != 0.0
    }

    pub fn sign(&self) -> char {
        if self.timestamp < 0.0 { '-' } else { '+' }
    }

    /// Magnitude in the largest unit whose truncated value is at least one.
    pub fn formatted(&self) -> Option<(f64, TimeUnit)> {
        if !self.is_valid() {
            return None;
        }
        let secs = self.timestamp.abs();
        let units = [
            (SECONDS_PER_YEAR, TimeUnit::Years),
            (SECONDS_PER_MONTH, TimeUnit::Months),
            (SECONDS_PER_WEEK, TimeUnit::Weeks),
            (SECONDS_PER_DAY, TimeUnit::Days),
            (SECONDS_PER_HOUR, TimeUnit::Hours),
            (SECONDS_PER_MINUTE, TimeUnit::Minutes),
        ];
        let (value, unit) = units
            .iter()
            .map(|&(scale, unit)| (secs / scale, unit))
            .find(|(value, _)| value.trunc() >= 1.0)
            .unwrap_or((secs, TimeUnit::Seconds));
        Some((value.round_ties_even(), unit))
    }

    /// Short form used inside temporal patterns, e.g. `"+2 hours"`.
    ///
    /// The magnitude is always a whole number of units.
    pub fn describe(&self) -> String {
        match self.formatted() {
            Some((value, unit)) => format!("{}{:.0} {}", self.sign(), value, unit.name()),
            None => "no delay".to_string(),
        }
    }
}

impl fmt::Display for TimeDelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "~ {} : {}", self.describe(), self.support)
        } else {
            write!(f, "No time lag found!")
        }
    }
}
