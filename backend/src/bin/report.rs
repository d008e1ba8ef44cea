//! NightSeek report binary
//!
//! Reads a JSON snapshot of upstream data (observer, per-night ephemeris and
//! weather, satellite element sets with precomputed look-angle tracks) and
//! prints the ranked forecast report as JSON.
//!
//! # Usage
//!
//! ```bash
//! nightseek-report snapshot.json
//! nightseek-report snapshot.json --config nightseek.toml
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::fs;

use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use nightseek_core::api::{ForecastReport, NightReport, ObjectRow, PickRow};
use nightseek_core::models::{ElementSet, LookAngles, ObserverLocation, ScoredObject, TimeWindow};
use nightseek_core::services::quick_filter::{apply_filters, parse_filters};
use nightseek_core::services::{
    build_night_forecast, select_best_nights, select_tonight_picks, sort_objects, NightInput,
    PassDetector, SortField, TabulatedPropagator,
};
use nightseek_core::AdvisorConfig;

#[derive(Debug, Deserialize)]
struct TrackSample {
    time: DateTime<Utc>,
    azimuth_deg: f64,
    elevation_deg: f64,
    #[serde(default)]
    range_km: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SatelliteInput {
    #[serde(default)]
    name: String,
    line1: String,
    line2: String,
    #[serde(default)]
    track: Vec<TrackSample>,
}

#[derive(Debug, Deserialize)]
struct Snapshot {
    observer: ObserverLocation,
    nights: Vec<NightInput>,
    #[serde(default)]
    satellites: Vec<SatelliteInput>,
}

fn load_config(path: Option<&str>) -> anyhow::Result<AdvisorConfig> {
    match path {
        Some(p) => AdvisorConfig::from_file(p).with_context(|| format!("loading config {}", p)),
        None => match AdvisorConfig::from_default_location()
            .context("loading nightseek.toml from the default locations")?
        {
            Some(config) => Ok(config),
            None => {
                info!("No nightseek.toml found, using default configuration");
                Ok(AdvisorConfig::default())
            }
        },
    }
}

fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(snapshot_path) = args.first() else {
        bail!("usage: nightseek-report <snapshot.json> [--config <nightseek.toml>]");
    };
    let config_path = args
        .iter()
        .position(|a| a == "--config")
        .and_then(|i| args.get(i + 1))
        .map(String::as_str);

    let config = load_config(config_path)?;
    let content = fs::read_to_string(snapshot_path)
        .with_context(|| format!("reading snapshot {}", snapshot_path))?;
    let snapshot: Snapshot = serde_json::from_str(&content).context("parsing snapshot JSON")?;
    info!(
        "Loaded {} nights and {} satellites",
        snapshot.nights.len(),
        snapshot.satellites.len()
    );

    let mut propagator = TabulatedPropagator::new();
    let mut element_sets = Vec::new();
    for sat in snapshot.satellites {
        match ElementSet::parse(&sat.name, &sat.line1, &sat.line2) {
            Ok(set) => {
                let table = sat
                    .track
                    .into_iter()
                    .map(|s| {
                        let angles = LookAngles {
                            azimuth_deg: s.azimuth_deg,
                            elevation_deg: s.elevation_deg,
                            range_km: s.range_km,
                        };
                        (s.time, angles)
                    })
                    .collect();
                propagator.insert(set.norad_id, table);
                element_sets.push(set);
            }
            Err(e) => warn!("Skipping satellite: {}", e),
        }
    }

    let windows: Vec<TimeWindow> = snapshot
        .nights
        .iter()
        .map(|n| n.night.dark_window())
        .collect();
    let detector = PassDetector::new(&propagator, snapshot.observer, &config.passes);
    let batch = detector.detect_passes_batch(&element_sets, &windows);

    let fov = config.equipment.field_of_view();
    let forecasts: Vec<_> = snapshot
        .nights
        .iter()
        .map(|input| build_night_forecast(input, fov, &batch.passes))
        .collect();

    let filters = parse_filters(&config.display.active_filters);
    let sort_field = SortField::parse_or_default(&config.display.sort_field);

    let mut nights = Vec::with_capacity(forecasts.len());
    for forecast in &forecasts {
        let objects: Vec<ScoredObject> = forecast.all_objects().into_iter().cloned().collect();
        let mut report = NightReport::header(forecast);
        report.tonight_picks = select_tonight_picks(&objects)
            .iter()
            .map(PickRow::from)
            .collect();

        let mut shown = apply_filters(&objects, &filters);
        sort_objects(&mut shown, sort_field, fov);
        report.objects = shown.into_iter().map(ObjectRow::from).collect();
        nights.push(report);
    }

    let report = ForecastReport {
        best_nights: select_best_nights(&forecasts, config.nights.best_night_count),
        nights,
        failed_satellites: batch.failures.iter().map(|e| e.to_string()).collect(),
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("serializing report")?
    );
    Ok(())
}
