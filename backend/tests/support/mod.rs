//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::collections::HashSet;
use std::f64::consts::PI;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use nightseek_core::error::PropagationError;
use nightseek_core::models::{
    ElementSet, LookAngles, NightInfo, NoradId, ObjectCategory, ObjectVisibility,
    ObserverLocation, ScoreBreakdown, ScoredObject,
};
use nightseek_core::services::Propagator;

pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, hour, minute, 0).unwrap()
}

pub fn observer() -> ObserverLocation {
    ObserverLocation {
        latitude: 40.4,
        longitude: -3.7,
        elevation_m: 650.0,
    }
}

/// Winter night starting on `date`: dusk 18:30, dawn 06:30 the next morning.
pub fn night(date: NaiveDate, moon_illumination: f64) -> NightInfo {
    let day = Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap());
    NightInfo {
        date,
        sunset: day + Duration::minutes(17 * 60),
        sunrise: day + Duration::minutes(31 * 60 + 45),
        astronomical_dusk: day + Duration::minutes(18 * 60 + 30),
        astronomical_dawn: day + Duration::minutes(30 * 60 + 30),
        moon_phase: moon_illumination / 200.0,
        moon_illumination,
        moon_rise: None,
        moon_set: None,
        seeing_forecast: None,
    }
}

pub fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, day).unwrap()
}

/// Synthetic, structurally valid element set for `norad_id`.
pub fn element_set(norad_id: u32, name: &str) -> ElementSet {
    let line1 = format!(
        "1 {:05}U 98067A   26015.50000000  .00016717  00000-0  10270-3 0  9005",
        norad_id
    );
    let line2 = format!(
        "2 {:05}  51.6400 208.9163 0006317  69.9862  25.2906 15.50000000 00001",
        norad_id
    );
    ElementSet::parse(name, &line1, &line2).unwrap()
}

pub fn visibility(name: &str, category: ObjectCategory, max_altitude: f64) -> ObjectVisibility {
    ObjectVisibility {
        object_name: name.to_string(),
        category,
        is_visible: true,
        max_altitude,
        max_altitude_time: None,
        azimuth_at_max: None,
        min_altitude: None,
        above_45: None,
        above_60: None,
        above_75: None,
        meridian_transit: None,
        moon_separation: None,
        imaging_window: None,
        angular_size_arcmin: 0.0,
        min_airmass: None,
        magnitude: None,
    }
}

/// Scored object with a fixed total; the breakdown carries it as altitude.
pub fn scored(name: &str, category: ObjectCategory, subtype: &str, total: f64) -> ScoredObject {
    ScoredObject {
        object_name: name.to_string(),
        category,
        subtype: subtype.to_string(),
        total_score: total,
        score_breakdown: ScoreBreakdown {
            altitude: total,
            ..ScoreBreakdown::default()
        },
        reason: "High in the sky".to_string(),
        magnitude: None,
        visibility: visibility(name, category, 60.0),
    }
}

/// Satellite whose elevation follows a sine wave: above the horizon for the
/// first half of every period, peaking at `peak_elevation`.
#[derive(Debug, Clone, Copy)]
pub struct SineOrbit {
    pub norad_id: NoradId,
    pub epoch: DateTime<Utc>,
    pub period_minutes: f64,
    pub peak_elevation: f64,
}

impl SineOrbit {
    pub fn elevation_at(&self, t: DateTime<Utc>) -> f64 {
        let minutes = (t - self.epoch).num_seconds() as f64 / 60.0;
        let phase = 2.0 * PI * minutes / self.period_minutes;
        self.peak_elevation * phase.sin()
    }
}

/// Deterministic propagator built from sine orbits. Satellites listed in
/// `failing` return an error for every instant.
#[derive(Debug, Clone, Default)]
pub struct SinePropagator {
    pub orbits: Vec<SineOrbit>,
    pub failing: HashSet<NoradId>,
}

impl SinePropagator {
    pub fn with_orbit(mut self, orbit: SineOrbit) -> Self {
        self.orbits.push(orbit);
        self
    }

    pub fn failing_for(mut self, norad_id: NoradId) -> Self {
        self.failing.insert(norad_id);
        self
    }
}

impl Propagator for SinePropagator {
    fn look_angles(
        &self,
        element_set: &ElementSet,
        _observer: &ObserverLocation,
        at: DateTime<Utc>,
    ) -> Result<LookAngles, PropagationError> {
        if self.failing.contains(&element_set.norad_id) {
            return Err(PropagationError::new("element set decayed"));
        }
        let orbit = self
            .orbits
            .iter()
            .find(|o| o.norad_id == element_set.norad_id)
            .ok_or_else(|| PropagationError::new("unknown satellite"))?;
        let minutes = (at - orbit.epoch).num_seconds() as f64 / 60.0;
        let azimuth = (minutes / orbit.period_minutes * 180.0).rem_euclid(360.0);
        Ok(LookAngles::new(azimuth, orbit.elevation_at(at)))
    }
}
