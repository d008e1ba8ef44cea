use chrono::{DateTime, Duration, Utc};
use serde::*;

/// Closed time interval `[start, end]` in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// True when `t` lies inside the window, bounds included.
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t <= self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Window length in fractional hours.
    pub fn duration_hours(&self) -> f64 {
        self.duration().num_seconds() as f64 / 3600.0
    }

    /// Distance in hours from `t` to the nearest bound, zero when inside.
    pub fn hours_outside(&self, t: DateTime<Utc>) -> f64 {
        let seconds = if t < self.start {
            (self.start - t).num_seconds()
        } else if t > self.end {
            (t - self.end).num_seconds()
        } else {
            0
        };
        seconds as f64 / 3600.0
    }
}
