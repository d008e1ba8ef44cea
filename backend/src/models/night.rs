//! Per-night inputs: sun/moon almanac data and weather aggregates.
//!
//! Both records are produced upstream (ephemeris and weather sources) and are
//! consumed read-only.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::time::TimeWindow;

/// Qualitative seeing forecast bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeeingRating {
    Excellent,
    Good,
    Average,
    Poor,
    Bad,
}

/// Atmospheric seeing forecast for the night.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeeingForecast {
    pub seeing_arcsec: f64,
    pub rating: SeeingRating,
}

/// Almanac snapshot for a single calendar night.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NightInfo {
    pub date: NaiveDate,
    pub sunset: DateTime<Utc>,
    pub sunrise: DateTime<Utc>,
    pub astronomical_dusk: DateTime<Utc>,
    pub astronomical_dawn: DateTime<Utc>,
    /// 0 = new, 0.5 = full
    pub moon_phase: f64,
    /// Percentage, 0-100
    pub moon_illumination: f64,
    #[serde(default)]
    pub moon_rise: Option<DateTime<Utc>>,
    #[serde(default)]
    pub moon_set: Option<DateTime<Utc>>,
    #[serde(default)]
    pub seeing_forecast: Option<SeeingForecast>,
}

impl NightInfo {
    /// Astronomical darkness, dusk to dawn.
    pub fn dark_window(&self) -> TimeWindow {
        TimeWindow::new(self.astronomical_dusk, self.astronomical_dawn)
    }

    /// True when `t` falls in evening or morning twilight (sun down, sky not yet dark).
    pub fn is_twilight(&self, t: DateTime<Utc>) -> bool {
        let evening = self.sunset <= t && t < self.astronomical_dusk;
        let morning = self.astronomical_dawn < t && t <= self.sunrise;
        evening || morning
    }
}

/// Barometric tendency over the night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PressureTrend {
    Rising,
    Steady,
    Falling,
}

/// A stretch of the night with sustained low cloud cover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClearWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub avg_cloud_cover: f64,
}

/// Weather aggregates over astronomical night. Percentages are 0-100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NightWeather {
    pub date: NaiveDate,
    pub avg_cloud_cover: f64,
    pub min_cloud_cover: f64,
    pub max_cloud_cover: f64,
    #[serde(default)]
    pub clear_duration_hours: f64,
    #[serde(default)]
    pub clear_windows: Vec<ClearWindow>,
    #[serde(default)]
    pub transparency_score: Option<f64>,
    /// Air temperature minus dew point, in °C
    #[serde(default)]
    pub dew_margin_c: Option<f64>,
    #[serde(default)]
    pub max_wind_gust_kmh: Option<f64>,
    #[serde(default)]
    pub avg_aerosol_optical_depth: Option<f64>,
    #[serde(default)]
    pub max_precip_probability: Option<f64>,
    #[serde(default)]
    pub pressure_trend: Option<PressureTrend>,
    #[serde(default)]
    pub best_window: Option<ClearWindow>,
}

impl NightWeather {
    /// Weather with only cloud statistics known; every optional field empty.
    pub fn from_cloud_cover(date: NaiveDate, avg: f64, min: f64, max: f64) -> Self {
        Self {
            date,
            avg_cloud_cover: avg,
            min_cloud_cover: min,
            max_cloud_cover: max,
            clear_duration_hours: 0.0,
            clear_windows: Vec::new(),
            transparency_score: None,
            dew_margin_c: None,
            max_wind_gust_kmh: None,
            avg_aerosol_optical_depth: None,
            max_precip_probability: None,
            pressure_trend: None,
            best_window: None,
        }
    }
}
