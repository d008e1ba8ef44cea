//! Celestial object models: supplied visibility geometry, catalog traits and
//! the scored result handed to the presentation layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::forecast::ScoreTier;
use super::time::TimeWindow;
use crate::error::{AdvisorError, AdvisorResult};

/// Object category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectCategory {
    Planet,
    Dso,
    Comet,
    DwarfPlanet,
    Asteroid,
    Moon,
}

impl ObjectCategory {
    /// Declared maximum total score. Point-like categories have no field-of-view component.
    pub fn max_score(&self) -> f64 {
        if self.is_point_like() {
            ScoreBreakdown::MAX_POSITIVE - ScoreBreakdown::FIELD_OF_VIEW_MAX
        } else {
            ScoreBreakdown::MAX_POSITIVE
        }
    }

    /// Planets and the Moon never fill a sensor frame meaningfully.
    pub fn is_point_like(&self) -> bool {
        matches!(self, ObjectCategory::Planet | ObjectCategory::Moon)
    }

    /// Long-exposure targets that suffer most from haze and moonlight.
    pub fn is_deep_sky(&self) -> bool {
        matches!(self, ObjectCategory::Dso | ObjectCategory::Comet)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectCategory::Planet => "planet",
            ObjectCategory::Dso => "dso",
            ObjectCategory::Comet => "comet",
            ObjectCategory::DwarfPlanet => "dwarf_planet",
            ObjectCategory::Asteroid => "asteroid",
            ObjectCategory::Moon => "moon",
        }
    }
}

impl std::fmt::Display for ObjectCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Qualitative imaging window bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowQuality {
    Excellent,
    Good,
    Acceptable,
    Poor,
}

impl WindowQuality {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            WindowQuality::Excellent
        } else if score >= 60.0 {
            WindowQuality::Good
        } else if score >= 40.0 {
            WindowQuality::Acceptable
        } else {
            WindowQuality::Poor
        }
    }
}

/// The four equally weighted factors behind an imaging window's quality (each 0-100).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WindowFactors {
    pub altitude: f64,
    pub airmass: f64,
    pub moon: f64,
    pub cloud: f64,
}

impl WindowFactors {
    pub fn mean(&self) -> f64 {
        (self.altitude + self.airmass + self.moon + self.cloud) / 4.0
    }
}

/// Sub-interval of the night judged favorable for photographing one object.
///
/// Deserialization goes through [`ImagingWindow::new`]; a supplied `quality`
/// is ignored and recomputed from `quality_score`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawImagingWindow")]
pub struct ImagingWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub quality: WindowQuality,
    pub quality_score: f64,
    pub factors: WindowFactors,
}

impl ImagingWindow {
    /// Build a window, checking `start < end` and `quality_score` in [0, 100].
    pub fn new(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        quality_score: f64,
        factors: WindowFactors,
    ) -> AdvisorResult<Self> {
        if start >= end {
            return Err(AdvisorError::InvalidImagingWindow(format!(
                "start {} is not before end {}",
                start, end
            )));
        }
        if !(0.0..=100.0).contains(&quality_score) {
            return Err(AdvisorError::InvalidImagingWindow(format!(
                "quality score {} outside [0, 100]",
                quality_score
            )));
        }
        Ok(Self {
            start,
            end,
            quality: WindowQuality::from_score(quality_score),
            quality_score,
            factors,
        })
    }

    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start, self.end)
    }
}

#[derive(Deserialize)]
struct RawImagingWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    quality_score: f64,
    #[serde(default)]
    factors: WindowFactors,
}

impl TryFrom<RawImagingWindow> for ImagingWindow {
    type Error = AdvisorError;

    fn try_from(raw: RawImagingWindow) -> AdvisorResult<Self> {
        ImagingWindow::new(raw.start, raw.end, raw.quality_score, raw.factors)
    }
}

fn deserialize_moon_separation<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let separation = Option::<f64>::deserialize(deserializer)?;
    match separation {
        Some(deg) if !(0.0..=180.0).contains(&deg) => Err(serde::de::Error::custom(format!(
            "moon separation {} outside [0, 180]",
            deg
        ))),
        other => Ok(other),
    }
}

/// Horizon-relative visibility of one object on one night (supplied by the ephemeris source).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectVisibility {
    pub object_name: String,
    pub category: ObjectCategory,
    pub is_visible: bool,
    pub max_altitude: f64,
    #[serde(default)]
    pub max_altitude_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub azimuth_at_max: Option<f64>,
    #[serde(default)]
    pub min_altitude: Option<f64>,
    #[serde(default)]
    pub above_45: Option<TimeWindow>,
    #[serde(default)]
    pub above_60: Option<TimeWindow>,
    #[serde(default)]
    pub above_75: Option<TimeWindow>,
    #[serde(default)]
    pub meridian_transit: Option<DateTime<Utc>>,
    /// Degrees, 0-180
    #[serde(default, deserialize_with = "deserialize_moon_separation")]
    pub moon_separation: Option<f64>,
    #[serde(default)]
    pub imaging_window: Option<ImagingWindow>,
    /// Arcminutes
    #[serde(default)]
    pub angular_size_arcmin: f64,
    #[serde(default)]
    pub min_airmass: Option<f64>,
    #[serde(default)]
    pub magnitude: Option<f64>,
}

/// Event flags raised upstream for the current night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransientFlags {
    pub at_opposition: bool,
    pub at_greatest_elongation: bool,
    pub near_perihelion: bool,
    pub supermoon: bool,
    pub venus_peak_brightness: bool,
}

/// Catalog traits of an object that are independent of tonight's geometry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectProfile {
    /// e.g. "galaxy", "emission_nebula", "outer"
    pub subtype: String,
    pub common_name: String,
    pub ra_hours: f64,
    /// mag/arcsec²
    pub surface_brightness: Option<f64>,
    pub is_interstellar: bool,
    pub transients: TransientFlags,
}

/// Sensor field of view in arcminutes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldOfView {
    pub width_arcmin: f64,
    pub height_arcmin: f64,
}

impl FieldOfView {
    pub fn new(width_arcmin: f64, height_arcmin: f64) -> Self {
        Self {
            width_arcmin,
            height_arcmin,
        }
    }

    pub fn short_side(&self) -> f64 {
        self.width_arcmin.min(self.height_arcmin)
    }
}

/// Name of one additive score component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreComponent {
    Altitude,
    Moon,
    Timing,
    Weather,
    SurfaceBrightness,
    Magnitude,
    TypeSuitability,
    Transient,
    Seasonal,
    Novelty,
    TwilightPenalty,
    Seeing,
    DewPenalty,
    ImagingWindow,
    FieldOfView,
}

/// Score contributions, one field per component.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub altitude: f64,
    pub moon: f64,
    pub timing: f64,
    pub weather: f64,
    pub surface_brightness: f64,
    pub magnitude: f64,
    pub type_suitability: f64,
    pub transient: f64,
    pub seasonal: f64,
    pub novelty: f64,
    pub twilight_penalty: f64,
    pub seeing: f64,
    pub dew_penalty: f64,
    pub imaging_window: f64,
    pub field_of_view: f64,
}

impl ScoreBreakdown {
    pub const ALTITUDE_MAX: f64 = 40.0;
    pub const MOON_MAX: f64 = 30.0;
    pub const TIMING_MAX: f64 = 15.0;
    pub const WEATHER_MAX: f64 = 15.0;
    pub const SURFACE_BRIGHTNESS_MAX: f64 = 20.0;
    pub const MAGNITUDE_MAX: f64 = 15.0;
    pub const TYPE_SUITABILITY_MAX: f64 = 15.0;
    pub const TRANSIENT_MAX: f64 = 25.0;
    pub const SEASONAL_MAX: f64 = 15.0;
    pub const NOVELTY_MAX: f64 = 10.0;
    pub const TWILIGHT_PENALTY_MIN: f64 = -10.0;
    pub const SEEING_MAX: f64 = 10.0;
    pub const DEW_PENALTY_MIN: f64 = -5.0;
    pub const IMAGING_WINDOW_MAX: f64 = 10.0;
    pub const FIELD_OF_VIEW_MAX: f64 = 10.0;

    /// Sum of every positive component's ceiling.
    pub const MAX_POSITIVE: f64 = Self::ALTITUDE_MAX
        + Self::MOON_MAX
        + Self::TIMING_MAX
        + Self::WEATHER_MAX
        + Self::SURFACE_BRIGHTNESS_MAX
        + Self::MAGNITUDE_MAX
        + Self::TYPE_SUITABILITY_MAX
        + Self::TRANSIENT_MAX
        + Self::SEASONAL_MAX
        + Self::NOVELTY_MAX
        + Self::SEEING_MAX
        + Self::IMAGING_WINDOW_MAX
        + Self::FIELD_OF_VIEW_MAX;

    /// All components in declaration order.
    pub fn components(&self) -> [(ScoreComponent, f64); 15] {
        [
            (ScoreComponent::Altitude, self.altitude),
            (ScoreComponent::Moon, self.moon),
            (ScoreComponent::Timing, self.timing),
            (ScoreComponent::Weather, self.weather),
            (ScoreComponent::SurfaceBrightness, self.surface_brightness),
            (ScoreComponent::Magnitude, self.magnitude),
            (ScoreComponent::TypeSuitability, self.type_suitability),
            (ScoreComponent::Transient, self.transient),
            (ScoreComponent::Seasonal, self.seasonal),
            (ScoreComponent::Novelty, self.novelty),
            (ScoreComponent::TwilightPenalty, self.twilight_penalty),
            (ScoreComponent::Seeing, self.seeing),
            (ScoreComponent::DewPenalty, self.dew_penalty),
            (ScoreComponent::ImagingWindow, self.imaging_window),
            (ScoreComponent::FieldOfView, self.field_of_view),
        ]
    }

    /// Ceiling of a positive component, `None` for penalties.
    pub fn ceiling(component: ScoreComponent) -> Option<f64> {
        match component {
            ScoreComponent::Altitude => Some(Self::ALTITUDE_MAX),
            ScoreComponent::Moon => Some(Self::MOON_MAX),
            ScoreComponent::Timing => Some(Self::TIMING_MAX),
            ScoreComponent::Weather => Some(Self::WEATHER_MAX),
            ScoreComponent::SurfaceBrightness => Some(Self::SURFACE_BRIGHTNESS_MAX),
            ScoreComponent::Magnitude => Some(Self::MAGNITUDE_MAX),
            ScoreComponent::TypeSuitability => Some(Self::TYPE_SUITABILITY_MAX),
            ScoreComponent::Transient => Some(Self::TRANSIENT_MAX),
            ScoreComponent::Seasonal => Some(Self::SEASONAL_MAX),
            ScoreComponent::Novelty => Some(Self::NOVELTY_MAX),
            ScoreComponent::Seeing => Some(Self::SEEING_MAX),
            ScoreComponent::ImagingWindow => Some(Self::IMAGING_WINDOW_MAX),
            ScoreComponent::FieldOfView => Some(Self::FIELD_OF_VIEW_MAX),
            ScoreComponent::TwilightPenalty | ScoreComponent::DewPenalty => None,
        }
    }

    /// Unweighted sum of every component.
    pub fn sum(&self) -> f64 {
        self.components().iter().map(|(_, v)| v).sum()
    }
}

/// One object scored for one night. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredObject {
    pub object_name: String,
    pub category: ObjectCategory,
    pub subtype: String,
    pub total_score: f64,
    pub score_breakdown: ScoreBreakdown,
    pub reason: String,
    pub magnitude: Option<f64>,
    pub visibility: ObjectVisibility,
}

impl ScoredObject {
    /// Total as a percentage of the category's declared maximum.
    pub fn score_percentage(&self) -> f64 {
        self.total_score / self.category.max_score() * 100.0
    }

    pub fn tier(&self) -> ScoreTier {
        ScoreTier::from_percentage(self.score_percentage())
    }

    pub fn is_galaxy(&self) -> bool {
        self.category == ObjectCategory::Dso && self.subtype.starts_with("galaxy")
    }

    pub fn is_nebula(&self) -> bool {
        self.category == ObjectCategory::Dso
            && (self.subtype.contains("nebula")
                || self.subtype == "hii_region"
                || self.subtype == "supernova_remnant")
    }

    pub fn is_cluster(&self) -> bool {
        self.category == ObjectCategory::Dso && self.subtype.ends_with("cluster")
    }
}
