//! Reduce hourly weather samples to per-night aggregates.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{ClearWindow, NightWeather, PressureTrend, TimeWindow};

/// Cloud cover below which an hour counts toward a clear window.
pub const CLEAR_WINDOW_THRESHOLD: f64 = 40.0;
/// Minimum consecutive hours for a clear window.
pub const CLEAR_WINDOW_MIN_HOURS: usize = 2;
/// Cloud cover below which an hour counts as fully clear.
const CLEAR_HOUR_THRESHOLD: f64 = 20.0;
/// Pressure change (hPa) over the night that counts as a trend.
const PRESSURE_TREND_HPA: f64 = 1.0;

/// One hourly forecast sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyWeather {
    pub time: DateTime<Utc>,
    pub cloud_cover: f64,
    #[serde(default)]
    pub transparency: Option<f64>,
    #[serde(default)]
    pub dew_margin_c: Option<f64>,
    #[serde(default)]
    pub wind_gust_kmh: Option<f64>,
    #[serde(default)]
    pub aerosol_optical_depth: Option<f64>,
    #[serde(default)]
    pub precip_probability: Option<f64>,
    #[serde(default)]
    pub pressure_hpa: Option<f64>,
}

/// Runs of consecutive samples below `threshold` lasting at least `min_hours` samples.
/// Samples must be in time order.
pub fn find_clear_windows(
    hourly: &[(DateTime<Utc>, f64)],
    threshold: f64,
    min_hours: usize,
) -> Vec<ClearWindow> {
    let mut windows = Vec::new();
    let mut run: Vec<(DateTime<Utc>, f64)> = Vec::new();

    let mut close = |run: &mut Vec<(DateTime<Utc>, f64)>| {
        if run.len() >= min_hours && !run.is_empty() {
            let avg = run.iter().map(|(_, c)| c).sum::<f64>() / run.len() as f64;
            windows.push(ClearWindow {
                start: run[0].0,
                end: run[run.len() - 1].0,
                avg_cloud_cover: avg,
            });
        }
        run.clear();
    };

    for &(time, cloud) in hourly {
        if cloud < threshold {
            run.push((time, cloud));
        } else {
            close(&mut run);
        }
    }
    close(&mut run);
    windows
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Aggregate the samples that fall inside `dark` into a [`NightWeather`].
/// Returns `None` when no sample covers the night.
pub fn summarize_night_weather(
    date: NaiveDate,
    dark: &TimeWindow,
    hourly: &[HourlyWeather],
) -> Option<NightWeather> {
    let mut night: Vec<&HourlyWeather> = hourly.iter().filter(|h| dark.contains(h.time)).collect();
    if night.is_empty() {
        return None;
    }
    night.sort_by_key(|h| h.time);

    let clouds: Vec<f64> = night.iter().map(|h| h.cloud_cover).collect();
    let avg = mean(clouds.iter().copied())?;
    let min = clouds.iter().copied().fold(f64::INFINITY, f64::min);
    let max = clouds.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let clear_hours = clouds.iter().filter(|c| **c < CLEAR_HOUR_THRESHOLD).count();

    let series: Vec<(DateTime<Utc>, f64)> = night.iter().map(|h| (h.time, h.cloud_cover)).collect();
    let clear_windows = find_clear_windows(&series, CLEAR_WINDOW_THRESHOLD, CLEAR_WINDOW_MIN_HOURS);
    let best_window = clear_windows
        .iter()
        .min_by(|a, b| a.avg_cloud_cover.total_cmp(&b.avg_cloud_cover))
        .cloned();

    let pressures: Vec<f64> = night.iter().filter_map(|h| h.pressure_hpa).collect();
    let pressure_trend = match (pressures.first(), pressures.last()) {
        (Some(first), Some(last)) if pressures.len() >= 2 => {
            let change = last - first;
            Some(if change > PRESSURE_TREND_HPA {
                PressureTrend::Rising
            } else if change < -PRESSURE_TREND_HPA {
                PressureTrend::Falling
            } else {
                PressureTrend::Steady
            })
        }
        _ => None,
    };

    Some(NightWeather {
        date,
        avg_cloud_cover: avg,
        min_cloud_cover: min,
        max_cloud_cover: max,
        clear_duration_hours: clear_hours as f64,
        clear_windows,
        transparency_score: mean(night.iter().filter_map(|h| h.transparency)),
        dew_margin_c: night
            .iter()
            .filter_map(|h| h.dew_margin_c)
            .reduce(f64::min),
        max_wind_gust_kmh: night
            .iter()
            .filter_map(|h| h.wind_gust_kmh)
            .reduce(f64::max),
        avg_aerosol_optical_depth: mean(night.iter().filter_map(|h| h.aerosol_optical_depth)),
        max_precip_probability: night
            .iter()
            .filter_map(|h| h.precip_probability)
            .reduce(f64::max),
        pressure_trend,
        best_window,
    })
}
