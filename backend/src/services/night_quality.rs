//! Night quality: star rating, continuous quality score and display labels.

use serde::{Deserialize, Serialize};

use crate::models::{NightInfo, NightQuality, NightWeather, ScoreTier};

/// Star rating (1-5) from moon illumination and cloud cover, both percentages.
///
/// Starts at five stars and subtracts stepped penalties for each factor.
pub fn calculate_night_rating(moon_illumination: f64, cloud_cover: f64) -> u8 {
    let mut rating: f64 = 5.0;

    if moon_illumination > 80.0 {
        rating -= 2.0;
    } else if moon_illumination > 50.0 {
        rating -= 1.0;
    } else if moon_illumination > 30.0 {
        rating -= 0.5;
    }

    if cloud_cover > 70.0 {
        rating -= 2.0;
    } else if cloud_cover > 50.0 {
        rating -= 1.5;
    } else if cloud_cover > 30.0 {
        rating -= 1.0;
    } else if cloud_cover > 15.0 {
        rating -= 0.5;
    }

    rating.clamp(1.0, 5.0).round() as u8
}

/// Continuous 0-100 quality, clouds weighted 0.7 and moonlight 0.3.
pub fn night_quality_score(moon_illumination: f64, cloud_cover: f64) -> f64 {
    (100.0 - (cloud_cover * 0.7 + moon_illumination * 0.3)).clamp(0.0, 100.0)
}

/// Rating, tier and score for one night. Missing weather counts as clear.
pub fn assess_night(night: &NightInfo, weather: Option<&NightWeather>) -> NightQuality {
    let cloud = weather.map(|w| w.avg_cloud_cover).unwrap_or(0.0);
    let score = night_quality_score(night.moon_illumination, cloud);
    NightQuality {
        rating: calculate_night_rating(night.moon_illumination, cloud),
        tier: ScoreTier::from_percentage(score),
        score,
    }
}

/// Plain-language cloud cover summary.
pub fn cloud_cover_description(avg_cloud_cover: f64) -> &'static str {
    if avg_cloud_cover < 20.0 {
        "Clear"
    } else if avg_cloud_cover < 40.0 {
        "Mostly Clear"
    } else if avg_cloud_cover < 60.0 {
        "Partly Cloudy"
    } else if avg_cloud_cover < 80.0 {
        "Mostly Cloudy"
    } else {
        "Cloudy"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservingLevel {
    Excellent,
    Good,
    Fair,
    Poor,
}

/// Headline observing conditions for a night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ObservingQuality {
    pub level: ObservingLevel,
    pub description: &'static str,
}

impl ObservingQuality {
    fn new(level: ObservingLevel, description: &'static str) -> Self {
        Self { level, description }
    }
}

/// Combined moon and cloud assessment; moon only when cloud cover is unknown.
pub fn observing_quality(moon_illumination: f64, avg_cloud_cover: Option<f64>) -> ObservingQuality {
    use ObservingLevel::*;

    let Some(cloud) = avg_cloud_cover else {
        return if moon_illumination < 20.0 {
            ObservingQuality::new(Excellent, "Excellent (DSO) - No weather data")
        } else if moon_illumination < 40.0 {
            ObservingQuality::new(Good, "Good (DSO) - No weather data")
        } else if moon_illumination < 70.0 {
            ObservingQuality::new(Fair, "Fair (Planets) - No weather data")
        } else {
            ObservingQuality::new(Poor, "Poor (DSO) - No weather data")
        };
    };

    let combined = cloud * 0.7 + moon_illumination * 0.3;
    if combined < 20.0 {
        ObservingQuality::new(Excellent, "Excellent - Dark & Clear")
    } else if combined < 35.0 {
        if cloud < 30.0 {
            ObservingQuality::new(Good, "Good - Clear skies")
        } else {
            ObservingQuality::new(Good, "Good - Some clouds")
        }
    } else if combined < 55.0 {
        if cloud > 60.0 {
            ObservingQuality::new(Fair, "Fair - Cloudy")
        } else if moon_illumination > 60.0 {
            ObservingQuality::new(Fair, "Fair - Bright moon")
        } else {
            ObservingQuality::new(Fair, "Fair")
        }
    } else if cloud > 70.0 {
        ObservingQuality::new(Poor, "Poor - Very cloudy")
    } else {
        ObservingQuality::new(Poor, "Poor - Bright moon & clouds")
    }
}
