//! Satellite pass detection.
//!
//! Look angles are sampled on a fixed time grid across each night window and fed
//! through a small state machine ([`PassState`]): a satellite is `Idle` until a
//! sample reaches the elevation threshold, `Tracking` while it stays above, and
//! the pass is `Closed` on the first sample back below (or at the window end).
//!
//! Propagation itself is external and reached through the [`Propagator`] trait.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::PassSettings;
use crate::error::{AdvisorError, AdvisorResult, PropagationError};
use crate::models::{ElementSet, LookAngles, NoradId, ObserverLocation, SatellitePass, TimeWindow};

/// Magnitudes added between the zenith reference and the 10° floor.
const HORIZON_DIMMING_MAG: f64 = 2.0;
const MAGNITUDE_FLOOR_ELEVATION: f64 = 10.0;

const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Source of topocentric look angles for an element set.
pub trait Propagator: Send + Sync {
    fn look_angles(
        &self,
        element_set: &ElementSet,
        observer: &ObserverLocation,
        at: DateTime<Utc>,
    ) -> Result<LookAngles, PropagationError>;
}

/// One point on the sampling grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassSample {
    pub time: DateTime<Utc>,
    pub azimuth: f64,
    pub elevation: f64,
}

impl PassSample {
    pub fn new(time: DateTime<Utc>, azimuth: f64, elevation: f64) -> Self {
        Self {
            time,
            azimuth,
            elevation,
        }
    }
}

/// Geometry accumulated while a satellite is above the threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassInProgress {
    pub rise_time: DateTime<Utc>,
    pub rise_azimuth: f64,
    pub max_elevation: f64,
    pub max_time: DateTime<Utc>,
    pub max_azimuth: f64,
}

impl PassInProgress {
    fn begin(sample: &PassSample) -> Self {
        Self {
            rise_time: sample.time,
            rise_azimuth: sample.azimuth,
            max_elevation: sample.elevation,
            max_time: sample.time,
            max_azimuth: sample.azimuth,
        }
    }

    fn observe(&mut self, sample: &PassSample) {
        if sample.elevation > self.max_elevation {
            self.max_elevation = sample.elevation;
            self.max_time = sample.time;
            self.max_azimuth = sample.azimuth;
        }
    }

    fn close(self, set_time: DateTime<Utc>, set_azimuth: f64, truncated: bool) -> PassGeometry {
        PassGeometry {
            rise_time: self.rise_time,
            rise_azimuth: self.rise_azimuth,
            max_elevation: self.max_elevation,
            max_time: self.max_time,
            max_azimuth: self.max_azimuth,
            set_time,
            set_azimuth,
            truncated,
        }
    }
}

/// Finished pass geometry, before magnitude estimation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassGeometry {
    pub rise_time: DateTime<Utc>,
    pub rise_azimuth: f64,
    pub max_elevation: f64,
    pub max_time: DateTime<Utc>,
    pub max_azimuth: f64,
    pub set_time: DateTime<Utc>,
    pub set_azimuth: f64,
    /// Closed at the window end rather than on a horizon crossing
    pub truncated: bool,
}

impl PassGeometry {
    pub fn duration_seconds(&self) -> i64 {
        (self.set_time - self.rise_time).num_seconds()
    }
}

/// Per-satellite scan state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PassState {
    #[default]
    Idle,
    Tracking(PassInProgress),
    Closed(PassGeometry),
}

impl PassState {
    /// Feed one sample. A `Closed` state behaves like `Idle`; callers collect the
    /// closed pass with [`take_closed`](Self::take_closed) before advancing.
    pub fn advance(self, sample: &PassSample, threshold: f64) -> PassState {
        let above = sample.elevation >= threshold;
        match self {
            PassState::Idle | PassState::Closed(_) => {
                if above {
                    PassState::Tracking(PassInProgress::begin(sample))
                } else {
                    PassState::Idle
                }
            }
            PassState::Tracking(mut pass) => {
                if above {
                    pass.observe(sample);
                    PassState::Tracking(pass)
                } else {
                    PassState::Closed(pass.close(sample.time, sample.azimuth, false))
                }
            }
        }
    }

    /// Close a pass still being tracked when the window ends. The set azimuth
    /// is unknown there, so the azimuth at maximum stands in for it.
    pub fn truncate(self, window_end: DateTime<Utc>) -> PassState {
        match self {
            PassState::Tracking(pass) => {
                let azimuth = pass.max_azimuth;
                PassState::Closed(pass.close(window_end, azimuth, true))
            }
            other => other,
        }
    }

    /// Remove a closed pass, leaving the state `Idle`.
    pub fn take_closed(&mut self) -> Option<PassGeometry> {
        match *self {
            PassState::Closed(geometry) => {
                *self = PassState::Idle;
                Some(geometry)
            }
            _ => None,
        }
    }

    pub fn is_tracking(&self) -> bool {
        matches!(self, PassState::Tracking(_))
    }
}

/// Run the state machine over an already sampled series.
pub fn passes_from_samples(
    samples: &[PassSample],
    threshold: f64,
    window_end: DateTime<Utc>,
) -> Vec<PassGeometry> {
    let mut state = PassState::Idle;
    let mut passes = Vec::new();
    for sample in samples {
        state = state.advance(sample, threshold);
        if let Some(pass) = state.take_closed() {
            passes.push(pass);
        }
    }
    state = state.truncate(window_end);
    if let Some(pass) = state.take_closed() {
        passes.push(pass);
    }
    passes
}

/// Estimate the visual magnitude of a pass from its peak elevation.
///
/// Linear between `zenith_magnitude` at 90° and two magnitudes dimmer at 10°,
/// rounded to 0.1. Elevations outside [10, 90] are clamped.
pub fn estimate_magnitude(elevation_deg: f64, zenith_magnitude: f64) -> f64 {
    let elevation = elevation_deg.clamp(MAGNITUDE_FLOOR_ELEVATION, 90.0);
    let factor = (90.0 - elevation) / (90.0 - MAGNITUDE_FLOOR_ELEVATION);
    round_tenth(zenith_magnitude + factor * HORIZON_DIMMING_MAG)
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// 16-point compass label for an azimuth in degrees (any real value, taken mod 360).
pub fn azimuth_to_compass(azimuth_deg: f64) -> &'static str {
    let index = (azimuth_deg.rem_euclid(360.0) / 22.5).round() as usize % COMPASS_POINTS.len();
    COMPASS_POINTS[index]
}

/// Result of scanning many satellites.
#[derive(Debug, Default)]
pub struct PassBatch {
    /// Visible passes of every satellite that propagated cleanly, by rise time
    pub passes: Vec<SatellitePass>,
    /// One entry per omitted satellite
    pub failures: Vec<AdvisorError>,
}

impl PassBatch {
    pub fn failed_ids(&self) -> Vec<NoradId> {
        self.failures
            .iter()
            .filter_map(|e| match e {
                AdvisorError::Propagation { norad_id, .. } => Some(*norad_id),
                _ => None,
            })
            .collect()
    }
}

/// Pass detector bound to one observer, propagator and settings.
pub struct PassDetector<'a, P: Propagator> {
    propagator: &'a P,
    observer: ObserverLocation,
    settings: &'a PassSettings,
}

impl<'a, P: Propagator> PassDetector<'a, P> {
    pub fn new(propagator: &'a P, observer: ObserverLocation, settings: &'a PassSettings) -> Self {
        Self {
            propagator,
            observer,
            settings,
        }
    }

    fn step(&self) -> Duration {
        Duration::seconds(i64::from(self.settings.sample_step_seconds.max(1)))
    }

    /// Sample one window and return the raw pass geometry found in it.
    pub fn scan_window(
        &self,
        element_set: &ElementSet,
        window: &TimeWindow,
    ) -> Result<Vec<PassGeometry>, PropagationError> {
        let threshold = self.settings.min_elevation_deg;
        let step = self.step();
        let mut state = PassState::Idle;
        let mut passes = Vec::new();

        let mut t = window.start;
        while t <= window.end {
            let angles = self.propagator.look_angles(element_set, &self.observer, t)?;
            let sample = PassSample::new(t, angles.azimuth_deg, angles.elevation_deg);
            state = state.advance(&sample, threshold);
            if let Some(pass) = state.take_closed() {
                passes.push(pass);
            }
            t += step;
        }

        state = state.truncate(window.end);
        if let Some(pass) = state.take_closed() {
            passes.push(pass);
        }
        Ok(passes)
    }

    /// All passes of one satellite over the given windows, by rise time.
    ///
    /// Every pass is returned with its `is_visible` flag set; nothing is dropped
    /// for dimness here. The first propagation failure aborts this satellite.
    pub fn detect_passes(
        &self,
        element_set: &ElementSet,
        windows: &[TimeWindow],
    ) -> AdvisorResult<Vec<SatellitePass>> {
        let zenith = self.settings.zenith_magnitude(element_set.norad_id);
        let mut passes = Vec::new();
        for window in windows {
            let geometry = self.scan_window(element_set, window).map_err(|e| {
                AdvisorError::Propagation {
                    norad_id: element_set.norad_id,
                    message: e.message,
                }
            })?;
            passes.extend(
                geometry
                    .into_iter()
                    .map(|g| self.finish_pass(element_set, &g, zenith)),
            );
        }
        passes.sort_by_key(|p| p.rise_time);
        Ok(passes)
    }

    fn finish_pass(&self, element_set: &ElementSet, g: &PassGeometry, zenith: f64) -> SatellitePass {
        let magnitude = estimate_magnitude(g.max_elevation, zenith);
        SatellitePass {
            satellite_name: element_set.name.clone(),
            norad_id: element_set.norad_id,
            rise_time: g.rise_time,
            rise_azimuth: g.rise_azimuth,
            max_altitude: g.max_elevation,
            max_time: g.max_time,
            max_azimuth: g.max_azimuth,
            set_time: g.set_time,
            set_azimuth: g.set_azimuth,
            duration: g.duration_seconds(),
            magnitude,
            is_visible: magnitude <= self.settings.display_magnitude_limit,
        }
    }

    /// Scan many satellites, merge their passes by rise time and drop the dim ones.
    ///
    /// A satellite whose propagation fails is left out entirely and reported in
    /// [`PassBatch::failures`]; the rest of the batch is unaffected.
    pub fn detect_passes_batch(
        &self,
        element_sets: &[ElementSet],
        windows: &[TimeWindow],
    ) -> PassBatch {
        #[cfg(feature = "parallel")]
        let results: Vec<AdvisorResult<Vec<SatellitePass>>> = element_sets
            .par_iter()
            .map(|set| self.detect_passes(set, windows))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let results: Vec<AdvisorResult<Vec<SatellitePass>>> = element_sets
            .iter()
            .map(|set| self.detect_passes(set, windows))
            .collect();

        let mut batch = PassBatch::default();
        for result in results {
            match result {
                Ok(passes) => batch.passes.extend(passes),
                Err(e) => {
                    log::warn!("Satellite omitted from pass batch: {}", e);
                    batch.failures.push(e);
                }
            }
        }

        batch.passes.sort_by_key(|p| p.rise_time);
        let found = batch.passes.len();
        batch.passes.retain(|p| p.is_visible);

        log::info!(
            "Scanned {} satellites over {} windows: {} passes, {} visible, {} failed",
            element_sets.len(),
            windows.len(),
            found,
            batch.passes.len(),
            batch.failures.len()
        );
        batch
    }
}

/// Propagator replaying precomputed look-angle tables, one per satellite.
///
/// Lookups between two table entries are interpolated linearly (azimuth along
/// the shorter arc). Instants outside a table, or satellites without one, fail.
#[derive(Debug, Clone, Default)]
pub struct TabulatedPropagator {
    tables: HashMap<NoradId, Vec<(DateTime<Utc>, LookAngles)>>,
}

impl TabulatedPropagator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, norad_id: NoradId, mut samples: Vec<(DateTime<Utc>, LookAngles)>) {
        samples.sort_by_key(|(t, _)| *t);
        self.tables.insert(norad_id, samples);
    }
}

impl Propagator for TabulatedPropagator {
    fn look_angles(
        &self,
        element_set: &ElementSet,
        _observer: &ObserverLocation,
        at: DateTime<Utc>,
    ) -> Result<LookAngles, PropagationError> {
        let table = self.tables.get(&element_set.norad_id).ok_or_else(|| {
            PropagationError::new(format!("no look-angle table for {}", element_set.name))
        })?;

        let idx = table.partition_point(|(t, _)| *t < at);
        if let Some((t, angles)) = table.get(idx) {
            if *t == at {
                return Ok(*angles);
            }
        }
        if idx == 0 || idx >= table.len() {
            return Err(PropagationError::new(format!(
                "{} is outside the look-angle table",
                at
            )));
        }

        let (t0, a0) = table[idx - 1];
        let (t1, a1) = table[idx];
        let span = (t1 - t0).num_milliseconds() as f64;
        let frac = (at - t0).num_milliseconds() as f64 / span;
        let mut d_az = a1.azimuth_deg - a0.azimuth_deg;
        if d_az > 180.0 {
            d_az -= 360.0;
        } else if d_az < -180.0 {
            d_az += 360.0;
        }
        Ok(LookAngles {
            azimuth_deg: (a0.azimuth_deg + d_az * frac).rem_euclid(360.0),
            elevation_deg: a0.elevation_deg + (a1.elevation_deg - a0.elevation_deg) * frac,
            range_km: match (a0.range_km, a1.range_km) {
                (Some(r0), Some(r1)) => Some(r0 + (r1 - r0) * frac),
                _ => None,
            },
        })
    }
}
