//! Public API surface for the presentation layer.
//!
//! Re-exports the display models and defines the flattened, owned report rows
//! the command line report serializes. All types derive Serialize for JSON output.

pub use crate::models::ImagingWindow;
pub use crate::models::NightForecast;
pub use crate::models::NightQuality;
pub use crate::models::ObjectCategory;
pub use crate::models::SatellitePass;
pub use crate::models::ScoreBreakdown;
pub use crate::models::ScoreTier;
pub use crate::models::ScoredObject;
pub use crate::models::SkyEvent;
pub use crate::models::TonightPick;
pub use crate::services::night_quality::ObservingQuality;
pub use crate::services::quick_filter::QuickFilter;
pub use crate::services::secondary_sort::SortField;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::models::NoradId;
use crate::services::night_quality::{cloud_cover_description, observing_quality};

/// One row of the ranked object list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectRow {
    pub object_name: String,
    pub category: ObjectCategory,
    pub subtype: String,
    pub total_score: f64,
    pub tier: ScoreTier,
    pub reason: String,
    pub magnitude: Option<f64>,
    pub max_altitude: f64,
}

impl From<&ScoredObject> for ObjectRow {
    fn from(o: &ScoredObject) -> Self {
        ObjectRow {
            object_name: o.object_name.clone(),
            category: o.category,
            subtype: o.subtype.clone(),
            total_score: (o.total_score * 10.0).round() / 10.0,
            tier: o.tier(),
            reason: o.reason.clone(),
            magnitude: o.magnitude,
            max_altitude: o.visibility.max_altitude,
        }
    }
}

/// Owned copy of a tonight pick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PickRow {
    pub category_label: String,
    pub object_name: String,
    pub total_score: f64,
    pub reason: String,
    pub display_stat: String,
}

impl From<&TonightPick<'_>> for PickRow {
    fn from(p: &TonightPick<'_>) -> Self {
        PickRow {
            category_label: p.category_label.to_string(),
            object_name: p.object.object_name.clone(),
            total_score: (p.object.total_score * 10.0).round() / 10.0,
            reason: p.reason.clone(),
            display_stat: p.display_stat.clone(),
        }
    }
}

/// Satellite pass with compass directions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassRow {
    pub satellite_name: String,
    pub norad_id: NoradId,
    pub rise_time: DateTime<Utc>,
    pub rise_direction: &'static str,
    pub max_altitude: f64,
    pub max_time: DateTime<Utc>,
    pub set_direction: &'static str,
    pub duration_seconds: i64,
    pub magnitude: f64,
}

impl From<&SatellitePass> for PassRow {
    fn from(p: &SatellitePass) -> Self {
        PassRow {
            satellite_name: p.satellite_name.clone(),
            norad_id: p.norad_id,
            rise_time: p.rise_time,
            rise_direction: p.rise_direction(),
            max_altitude: (p.max_altitude * 10.0).round() / 10.0,
            max_time: p.max_time,
            set_direction: p.set_direction(),
            duration_seconds: p.duration,
            magnitude: p.magnitude,
        }
    }
}

/// Report section for one night.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NightReport {
    pub date: NaiveDate,
    pub quality: NightQuality,
    pub observing_quality: ObservingQuality,
    pub cloud_description: Option<&'static str>,
    pub tonight_picks: Vec<PickRow>,
    pub objects: Vec<ObjectRow>,
    pub satellite_passes: Vec<PassRow>,
    pub events: Vec<SkyEvent>,
}

impl NightReport {
    /// Header fields from the forecast; list sections start empty.
    pub fn header(forecast: &NightForecast) -> Self {
        let cloud = forecast.weather.as_ref().map(|w| w.avg_cloud_cover);
        NightReport {
            date: forecast.date(),
            quality: forecast.quality,
            observing_quality: observing_quality(forecast.night.moon_illumination, cloud),
            cloud_description: cloud.map(cloud_cover_description),
            tonight_picks: Vec::new(),
            objects: Vec::new(),
            satellite_passes: forecast.satellite_passes.iter().map(PassRow::from).collect(),
            events: forecast.events.clone(),
        }
    }
}

/// Whole forecast-window report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastReport {
    pub best_nights: Vec<NaiveDate>,
    pub nights: Vec<NightReport>,
    /// Satellites left out because propagation failed
    pub failed_satellites: Vec<String>,
}
