//! Per-night aggregate handed to the presentation layer, and the derived
//! display records built from it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::night::{NightInfo, NightWeather};
use super::object::ScoredObject;
use super::satellite::SatellitePass;

/// Five-level qualitative bucket used for color coding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTier {
    Poor,
    Fair,
    Good,
    VeryGood,
    Excellent,
}

impl ScoreTier {
    /// Fixed breakpoint lookup on a 0-100 percentage.
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 75.0 {
            ScoreTier::Excellent
        } else if percentage >= 50.0 {
            ScoreTier::VeryGood
        } else if percentage >= 35.0 {
            ScoreTier::Good
        } else if percentage >= 20.0 {
            ScoreTier::Fair
        } else {
            ScoreTier::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreTier::Excellent => "Excellent",
            ScoreTier::VeryGood => "Very Good",
            ScoreTier::Good => "Good",
            ScoreTier::Fair => "Fair",
            ScoreTier::Poor => "Poor",
        }
    }
}

/// Rating summary for one night.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NightQuality {
    /// Star count, 1-5
    pub rating: u8,
    pub tier: ScoreTier,
    /// Continuous 0-100 quality score
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkyEventKind {
    Conjunction,
    MeteorShower,
    Opposition,
    Elongation,
    Eclipse,
    Other,
}

/// Event detected upstream and carried along with the night.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkyEvent {
    pub kind: SkyEventKind,
    pub description: String,
    #[serde(default)]
    pub time: Option<DateTime<Utc>>,
}

/// Everything known about one night, grouped by object category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NightForecast {
    pub night: NightInfo,
    pub weather: Option<NightWeather>,
    pub quality: NightQuality,
    pub planets: Vec<ScoredObject>,
    pub dsos: Vec<ScoredObject>,
    pub comets: Vec<ScoredObject>,
    pub dwarf_planets: Vec<ScoredObject>,
    pub asteroids: Vec<ScoredObject>,
    pub moon: Option<ScoredObject>,
    pub satellite_passes: Vec<SatellitePass>,
    pub events: Vec<SkyEvent>,
}

impl NightForecast {
    pub fn date(&self) -> NaiveDate {
        self.night.date
    }

    /// Every scored object of the night, category lists concatenated.
    pub fn all_objects(&self) -> Vec<&ScoredObject> {
        self.planets
            .iter()
            .chain(self.dsos.iter())
            .chain(self.comets.iter())
            .chain(self.dwarf_planets.iter())
            .chain(self.asteroids.iter())
            .chain(self.moon.iter())
            .collect()
    }
}

/// Highlighted object for one pick rule. Borrows from the night's object list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TonightPick<'a> {
    pub category_label: &'static str,
    pub object: &'a ScoredObject,
    pub reason: String,
    pub display_stat: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_breakpoints() {
        assert_eq!(ScoreTier::from_percentage(75.0), ScoreTier::Excellent);
        assert_eq!(ScoreTier::from_percentage(74.9), ScoreTier::VeryGood);
        assert_eq!(ScoreTier::from_percentage(50.0), ScoreTier::VeryGood);
        assert_eq!(ScoreTier::from_percentage(35.0), ScoreTier::Good);
        assert_eq!(ScoreTier::from_percentage(20.0), ScoreTier::Fair);
        assert_eq!(ScoreTier::from_percentage(19.99), ScoreTier::Poor);
        assert_eq!(ScoreTier::from_percentage(0.0), ScoreTier::Poor);
    }

    #[test]
    fn test_tier_serializes_snake_case() {
        let json = serde_json::to_string(&ScoreTier::VeryGood).unwrap();
        assert_eq!(json, "\"very_good\"");
    }
}
