//! Imaging window quality.
//!
//! Four factors, each on a 0-100 scale and weighted equally: object altitude,
//! airmass, moon interference and cloud cover.

use chrono::{DateTime, Utc};

use crate::error::AdvisorResult;
use crate::models::{ImagingWindow, WindowFactors};

/// Quality of one point on an object's track through the night.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackPoint {
    pub time: DateTime<Utc>,
    pub altitude: f64,
    pub cloud_cover: f64,
}

/// Moon conditions for the night.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoonConditions {
    pub separation: Option<f64>,
    pub illumination: f64,
    /// Degrees; a moon below the horizon does not interfere
    pub altitude: f64,
}

pub fn altitude_quality(altitude: f64) -> f64 {
    if altitude < 20.0 {
        0.0
    } else if altitude < 30.0 {
        30.0
    } else if altitude < 45.0 {
        50.0
    } else if altitude < 60.0 {
        70.0
    } else if altitude < 75.0 {
        85.0
    } else {
        100.0
    }
}

/// Plane-parallel airmass bands.
pub fn airmass_quality(altitude: f64) -> f64 {
    if altitude <= 0.0 {
        return 0.0;
    }
    let airmass = 1.0 / altitude.to_radians().sin();
    if airmass <= 1.1 {
        100.0
    } else if airmass <= 1.3 {
        90.0
    } else if airmass <= 1.5 {
        75.0
    } else if airmass <= 2.0 {
        50.0
    } else if airmass <= 3.0 {
        25.0
    } else {
        0.0
    }
}

pub fn moon_quality(moon: &MoonConditions) -> f64 {
    if moon.altitude <= 0.0 {
        return 100.0;
    }
    if moon.illumination < 20.0 {
        return 95.0;
    }
    let Some(separation) = moon.separation else {
        return 50.0;
    };
    let separation_factor = (separation / 90.0).min(1.0);
    let illumination_factor = 1.0 - moon.illumination / 100.0;
    ((separation_factor * 0.6 + illumination_factor * 0.4) * 100.0).round()
}

pub fn cloud_quality(cloud_cover: f64) -> f64 {
    if cloud_cover <= 10.0 {
        100.0
    } else if cloud_cover <= 20.0 {
        90.0
    } else if cloud_cover <= 30.0 {
        75.0
    } else if cloud_cover <= 50.0 {
        50.0
    } else if cloud_cover <= 70.0 {
        25.0
    } else {
        0.0
    }
}

pub fn window_factors(avg_altitude: f64, avg_cloud_cover: f64, moon: &MoonConditions) -> WindowFactors {
    WindowFactors {
        altitude: altitude_quality(avg_altitude),
        airmass: airmass_quality(avg_altitude),
        moon: moon_quality(moon),
        cloud: cloud_quality(avg_cloud_cover),
    }
}

/// Rate a window from its average altitude and cloud cover.
pub fn evaluate_window(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    avg_altitude: f64,
    avg_cloud_cover: f64,
    moon: &MoonConditions,
) -> AdvisorResult<ImagingWindow> {
    let factors = window_factors(avg_altitude, avg_cloud_cover, moon);
    ImagingWindow::new(start, end, factors.mean(), factors)
}

/// Longest run of consecutive track points whose own quality reaches
/// `min_quality`, rated on the run's averages. Runs need at least two points.
pub fn find_imaging_window(
    track: &[TrackPoint],
    moon: &MoonConditions,
    min_quality: f64,
) -> AdvisorResult<Option<ImagingWindow>> {
    let good: Vec<bool> = track
        .iter()
        .map(|p| window_factors(p.altitude, p.cloud_cover, moon).mean() >= min_quality)
        .collect();

    let mut best: Option<(usize, usize)> = None;
    let mut run_start: Option<usize> = None;
    for idx in 0..=track.len() {
        let is_good = good.get(idx).copied().unwrap_or(false);
        match (is_good, run_start) {
            (true, None) => run_start = Some(idx),
            (false, Some(start)) => {
                let len = idx - start;
                let best_len = best.map_or(0, |(s, e)| e - s);
                if len >= 2 && len > best_len {
                    best = Some((start, idx));
                }
                run_start = None;
            }
            _ => {}
        }
    }

    let Some((start, end)) = best else {
        return Ok(None);
    };
    let run = &track[start..end];
    let n = run.len() as f64;
    let avg_altitude = run.iter().map(|p| p.altitude).sum::<f64>() / n;
    let avg_cloud = run.iter().map(|p| p.cloud_cover).sum::<f64>() / n;
    evaluate_window(run[0].time, run[run.len() - 1].time, avg_altitude, avg_cloud, moon).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WindowQuality;
    use chrono::{Duration, TimeZone};

    fn dark_moon() -> MoonConditions {
        MoonConditions {
            separation: None,
            illumination: 5.0,
            altitude: 20.0,
        }
    }

    #[test]
    fn test_factor_bands() {
        assert_eq!(altitude_quality(80.0), 100.0);
        assert_eq!(altitude_quality(19.9), 0.0);
        assert_eq!(airmass_quality(90.0), 100.0);
        assert_eq!(airmass_quality(35.0), 50.0);
        assert_eq!(airmass_quality(-5.0), 0.0);
        assert_eq!(cloud_quality(10.0), 100.0);
        assert_eq!(cloud_quality(85.0), 0.0);
    }

    #[test]
    fn test_moon_quality() {
        let mut moon = dark_moon();
        assert_eq!(moon_quality(&moon), 95.0);
        moon.illumination = 100.0;
        assert_eq!(moon_quality(&moon), 50.0);
        moon.separation = Some(90.0);
        assert_eq!(moon_quality(&moon), 60.0);
        moon.altitude = -10.0;
        assert_eq!(moon_quality(&moon), 100.0);
    }

    #[test]
    fn test_evaluate_window_averages_factors() {
        let start = Utc.with_ymd_and_hms(2026, 1, 15, 21, 0, 0).unwrap();
        let window =
            evaluate_window(start, start + Duration::hours(2), 80.0, 5.0, &dark_moon()).unwrap();
        assert_eq!(window.quality_score, (100.0 + 100.0 + 95.0 + 100.0) / 4.0);
        assert_eq!(window.quality, WindowQuality::Excellent);
    }

    #[test]
    fn test_find_longest_good_run() {
        let t0 = Utc.with_ymd_and_hms(2026, 1, 15, 20, 0, 0).unwrap();
        let altitudes = [10.0, 50.0, 65.0, 70.0, 15.0, 60.0];
        let track: Vec<TrackPoint> = altitudes
            .iter()
            .enumerate()
            .map(|(i, &altitude)| TrackPoint {
                time: t0 + Duration::hours(i as i64),
                altitude,
                cloud_cover: 5.0,
            })
            .collect();

        let window = find_imaging_window(&track, &dark_moon(), 60.0)
            .unwrap()
            .expect("a run of three good hours exists");
        assert_eq!(window.start, t0 + Duration::hours(1));
        assert_eq!(window.end, t0 + Duration::hours(3));
    }

    #[test]
    fn test_single_good_point_is_not_a_window() {
        let t0 = Utc.with_ymd_and_hms(2026, 1, 15, 20, 0, 0).unwrap();
        let track = vec![
            TrackPoint { time: t0, altitude: 70.0, cloud_cover: 0.0 },
            TrackPoint { time: t0 + Duration::hours(1), altitude: 5.0, cloud_cover: 0.0 },
        ];
        assert!(find_imaging_window(&track, &dark_moon(), 60.0).unwrap().is_none());
    }
}
