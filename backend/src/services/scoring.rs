//! Merit-based object scoring.
//!
//! Each component is an independent pure function returning a value within its
//! own bounds (see the `*_MAX` constants on [`ScoreBreakdown`]). The total is
//! their unweighted sum, clamped to the category's declared maximum.

use chrono::Datelike;

use crate::models::{
    FieldOfView, NightInfo, NightWeather, ObjectCategory, ObjectProfile, ObjectVisibility,
    ScoreBreakdown, ScoreComponent, ScoredObject, SeeingRating,
};

/// Environmental inputs shared by every object scored for one night.
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    pub night: &'a NightInfo,
    pub weather: Option<&'a NightWeather>,
    pub field_of_view: Option<FieldOfView>,
}

impl<'a> ScoringContext<'a> {
    pub fn new(night: &'a NightInfo) -> Self {
        Self {
            night,
            weather: None,
            field_of_view: None,
        }
    }

    pub fn with_weather(mut self, weather: Option<&'a NightWeather>) -> Self {
        self.weather = weather;
        self
    }

    pub fn with_field_of_view(mut self, fov: Option<FieldOfView>) -> Self {
        self.field_of_view = fov;
        self
    }
}

/// Score one object for one night. Invisible objects yield `None`.
pub fn score_object(
    visibility: &ObjectVisibility,
    profile: &ObjectProfile,
    ctx: &ScoringContext<'_>,
) -> Option<ScoredObject> {
    if !visibility.is_visible {
        log::debug!("Skipping {}: not visible tonight", visibility.object_name);
        return None;
    }

    let category = visibility.category;
    let night = ctx.night;
    let weather = ctx.weather;

    let breakdown = ScoreBreakdown {
        altitude: altitude_score(visibility.max_altitude, visibility.min_airmass),
        moon: moon_interference_score(
            visibility.moon_separation,
            night.moon_illumination,
            category,
            &profile.subtype,
        ),
        timing: peak_timing_score(visibility, night),
        weather: weather_score(weather, category),
        surface_brightness: surface_brightness_score(
            profile.surface_brightness,
            visibility.magnitude,
            visibility.angular_size_arcmin,
        ),
        magnitude: magnitude_score(visibility.magnitude, category),
        type_suitability: type_suitability_score(
            category,
            &profile.subtype,
            night.moon_illumination,
        ),
        transient: transient_bonus(category, profile, visibility, night),
        seasonal: seasonal_score(profile.ra_hours, night.date.ordinal()),
        novelty: novelty_score(&visibility.object_name, &profile.common_name),
        twilight_penalty: twilight_penalty(visibility, night),
        seeing: seeing_score(night, category, visibility.angular_size_arcmin),
        dew_penalty: dew_penalty(weather),
        imaging_window: imaging_window_score(visibility),
        field_of_view: field_of_view_score(
            category,
            visibility.angular_size_arcmin,
            ctx.field_of_view,
        ),
    };

    let total_score = breakdown.sum().clamp(0.0, category.max_score());

    Some(ScoredObject {
        object_name: visibility.object_name.clone(),
        category,
        subtype: profile.subtype.clone(),
        total_score,
        score_breakdown: breakdown,
        reason: score_reason(&breakdown),
        magnitude: visibility.magnitude,
        visibility: visibility.clone(),
    })
}

/// Airmass bands when known, altitude bands otherwise.
pub fn altitude_score(max_altitude: f64, min_airmass: Option<f64>) -> f64 {
    let max = ScoreBreakdown::ALTITUDE_MAX;
    if let Some(airmass) = min_airmass.filter(|a| *a < 99.0) {
        let factor = if airmass <= 1.05 {
            0.95
        } else if airmass <= 1.15 {
            0.90
        } else if airmass <= 1.41 {
            0.75
        } else if airmass <= 2.0 {
            0.55
        } else if airmass <= 3.0 {
            0.30
        } else {
            0.10
        };
        return max * factor;
    }

    let factor = if max_altitude < 15.0 {
        0.0
    } else if max_altitude >= 75.0 {
        0.95
    } else if max_altitude >= 60.0 {
        0.85
    } else if max_altitude >= 45.0 {
        0.70
    } else if max_altitude >= 30.0 {
        0.50
    } else {
        0.30
    };
    max * factor
}

/// How strongly moonlight washes out a subtype (0 = immune, 1 = fully).
fn moon_sensitivity(category: ObjectCategory, subtype: &str) -> f64 {
    match category {
        ObjectCategory::Comet => 0.7,
        ObjectCategory::Dso => match subtype {
            "galaxy" | "galaxy_group" | "galaxy_pair" | "galaxy_triplet" => 0.8,
            "galaxy_cluster" | "cluster_nebula" => 0.7,
            "planetary_nebula" => 0.5,
            "emission_nebula" | "hii_region" => 0.9,
            "reflection_nebula" => 0.95,
            "supernova_remnant" | "nebula" => 0.85,
            "open_cluster" | "stellar_association" => 0.3,
            "globular_cluster" => 0.4,
            "quasar" | "asterism" => 0.2,
            "star" | "double_star" => 0.1,
            _ => 0.5,
        },
        _ => 0.5,
    }
}

pub fn moon_interference_score(
    moon_separation: Option<f64>,
    moon_illumination: f64,
    category: ObjectCategory,
    subtype: &str,
) -> f64 {
    let max = ScoreBreakdown::MOON_MAX;
    if category.is_point_like() {
        return max * 0.9;
    }
    if moon_illumination < 5.0 {
        return max;
    }

    let separation_factor = match moon_separation {
        Some(sep) if sep > 90.0 => 0.3,
        Some(sep) if sep > 60.0 => 0.5,
        Some(sep) if sep > 30.0 => 0.7,
        _ => 1.0,
    };
    let interference =
        moon_illumination / 100.0 * moon_sensitivity(category, subtype) * separation_factor;
    max * (1.0 - interference).clamp(0.0, 1.0)
}

/// Full marks when the object peaks inside astronomical darkness.
pub fn peak_timing_score(visibility: &ObjectVisibility, night: &NightInfo) -> f64 {
    let max = ScoreBreakdown::TIMING_MAX;
    let Some(peak) = visibility.max_altitude_time else {
        return max * 0.3;
    };

    let hours_off = night.dark_window().hours_outside(peak);
    let factor = if hours_off == 0.0 {
        1.0
    } else if hours_off < 1.0 {
        0.8
    } else if hours_off < 2.0 {
        0.6
    } else if hours_off < 4.0 {
        0.4
    } else {
        0.2
    };
    max * factor
}

/// Cloud bands scaled by haze, transparency, precipitation and wind factors.
pub fn weather_score(weather: Option<&NightWeather>, category: ObjectCategory) -> f64 {
    let max = ScoreBreakdown::WEATHER_MAX;
    let Some(w) = weather else {
        return max * 0.7;
    };
    let deep_sky = category.is_deep_sky();
    let planet = category == ObjectCategory::Planet;

    let cloud = w.avg_cloud_cover;
    let base = max
        * if cloud < 10.0 {
            1.0
        } else if cloud < 25.0 {
            0.9
        } else if cloud < 50.0 {
            0.6
        } else if cloud < 75.0 {
            0.3
        } else {
            0.1
        };

    let aod_factor = match w.avg_aerosol_optical_depth {
        Some(aod) if aod < 0.1 => 1.0,
        Some(aod) if aod < 0.2 => pick(deep_sky, 0.95, 0.98),
        Some(aod) if aod < 0.3 => pick(deep_sky, 0.85, 0.92),
        Some(aod) if aod < 0.5 => pick(deep_sky, 0.70, 0.85),
        Some(_) => pick(deep_sky, 0.50, 0.75),
        None => 1.0,
    };

    let transparency_factor = match w.transparency_score {
        Some(t) if deep_sky && t >= 80.0 => 1.05,
        Some(t) if deep_sky && t >= 60.0 => 1.0,
        Some(t) if deep_sky && t >= 40.0 => 0.90,
        Some(_) if deep_sky => 0.75,
        _ => 1.0,
    };

    let precip_factor = match w.max_precip_probability {
        Some(p) if p > 70.0 => 0.3,
        Some(p) if p > 50.0 => 0.5,
        Some(p) if p > 30.0 => 0.7,
        Some(p) if p > 10.0 => 0.9,
        _ => 1.0,
    };

    // Planets use short exposures and tolerate wind better
    let wind_factor = match w.max_wind_gust_kmh {
        Some(g) if g < 15.0 => 1.0,
        Some(g) if g < 25.0 => pick(planet, 0.98, 0.95),
        Some(g) if g < 40.0 => pick(planet, 0.92, 0.80),
        Some(g) if g < 55.0 => pick(planet, 0.80, 0.60),
        Some(_) => pick(planet, 0.60, 0.40),
        None => 1.0,
    };

    (base * aod_factor * transparency_factor * precip_factor * wind_factor).min(max)
}

fn pick(condition: bool, if_true: f64, if_false: f64) -> f64 {
    if condition {
        if_true
    } else {
        if_false
    }
}

/// Catalog surface brightness bands, or an estimate from magnitude spread over the disc.
pub fn surface_brightness_score(
    surface_brightness: Option<f64>,
    magnitude: Option<f64>,
    angular_size_arcmin: f64,
) -> f64 {
    let max = ScoreBreakdown::SURFACE_BRIGHTNESS_MAX;
    if let Some(sb) = surface_brightness {
        let factor = if sb < 20.0 {
            1.0
        } else if sb < 22.0 {
            0.8
        } else if sb < 24.0 {
            0.6
        } else if sb < 26.0 {
            0.4
        } else {
            0.2
        };
        return max * factor;
    }

    match magnitude {
        Some(mag) if angular_size_arcmin > 0.0 => {
            let area_arcsec2 = (angular_size_arcmin * 60.0).powi(2) * std::f64::consts::PI / 4.0;
            let estimated = mag + 2.5 * area_arcsec2.max(1.0).log10();
            let factor = if estimated < 20.0 {
                1.0
            } else if estimated < 22.0 {
                0.7
            } else if estimated < 24.0 {
                0.5
            } else {
                0.3
            };
            max * factor
        }
        _ => max * 0.5,
    }
}

pub fn magnitude_score(magnitude: Option<f64>, category: ObjectCategory) -> f64 {
    let max = ScoreBreakdown::MAGNITUDE_MAX;
    let Some(mag) = magnitude else {
        return max * 0.5;
    };

    let factor = match category {
        ObjectCategory::Planet | ObjectCategory::Moon => {
            if mag < -2.0 {
                1.0
            } else if mag < 0.0 {
                0.9
            } else if mag < 2.0 {
                0.7
            } else {
                0.5
            }
        }
        ObjectCategory::Comet | ObjectCategory::Asteroid | ObjectCategory::DwarfPlanet => {
            if mag < 6.0 {
                1.0
            } else if mag < 8.0 {
                0.8
            } else if mag < 10.0 {
                0.6
            } else if mag < 12.0 {
                0.4
            } else {
                0.2
            }
        }
        ObjectCategory::Dso => {
            if mag < 5.0 {
                1.0
            } else if mag < 7.0 {
                0.9
            } else if mag < 9.0 {
                0.7
            } else if mag < 11.0 {
                0.5
            } else if mag < 13.0 {
                0.3
            } else {
                0.2
            }
        }
    };
    max * factor
}

/// Dark skies favor faint extended targets; a bright moon favors clusters and planets.
pub fn type_suitability_score(category: ObjectCategory, subtype: &str, moon_illumination: f64) -> f64 {
    let max = ScoreBreakdown::TYPE_SUITABILITY_MAX;
    let dso = category == ObjectCategory::Dso;

    let factor = if moon_illumination < 30.0 {
        match (category, subtype) {
            (ObjectCategory::Dso, "emission_nebula" | "reflection_nebula" | "galaxy") => 0.95,
            (ObjectCategory::Dso, "planetary_nebula" | "supernova_remnant") => 0.85,
            (ObjectCategory::Comet, _) => 0.8,
            (ObjectCategory::Dso, "open_cluster" | "globular_cluster") => 0.7,
            (ObjectCategory::Planet | ObjectCategory::Moon, _) => 0.6,
            _ => 0.5,
        }
    } else {
        match (category, subtype) {
            (ObjectCategory::Planet | ObjectCategory::Moon, _) => 1.0,
            (_, "globular_cluster" | "open_cluster") if dso => 0.9,
            (_, "planetary_nebula") if dso => 0.7,
            (ObjectCategory::Comet, _) => 0.5,
            (_, "galaxy" | "emission_nebula") if dso => 0.3,
            _ => 0.4,
        }
    };
    max * factor
}

/// Rarity and event bonuses, summed and capped.
pub fn transient_bonus(
    category: ObjectCategory,
    profile: &ObjectProfile,
    visibility: &ObjectVisibility,
    night: &NightInfo,
) -> f64 {
    let max = ScoreBreakdown::TRANSIENT_MAX;
    let flags = &profile.transients;

    let mut bonus = if profile.is_interstellar {
        max
    } else {
        match category {
            ObjectCategory::Comet if flags.near_perihelion => max * 0.7,
            ObjectCategory::Comet => max * 0.5,
            ObjectCategory::Asteroid => max * 0.3,
            _ => 0.0,
        }
    };

    if flags.at_opposition {
        bonus += 20.0;
    }
    if flags.at_greatest_elongation {
        bonus += 15.0;
    }
    if flags.venus_peak_brightness {
        bonus += 15.0;
    }
    if flags.supermoon && category == ObjectCategory::Moon {
        bonus += 15.0;
    }
    if let Some(transit) = visibility.meridian_transit {
        if night.dark_window().contains(transit) {
            bonus += 5.0;
        }
    }

    bonus.min(max)
}

/// Objects opposite the Sun in right ascension are in season.
pub fn seasonal_score(ra_hours: f64, day_of_year: u32) -> f64 {
    let sun_ra = ((f64::from(day_of_year) - 80.0) / 365.25 * 24.0).rem_euclid(24.0);
    let mut ra_diff = (ra_hours - sun_ra).abs();
    if ra_diff > 12.0 {
        ra_diff = 24.0 - ra_diff;
    }
    ScoreBreakdown::SEASONAL_MAX * (ra_diff / 12.0).clamp(0.0, 1.0)
}

fn is_messier(name: &str) -> bool {
    let first = name.split_whitespace().next().unwrap_or("");
    match first.strip_prefix('M') {
        Some(digits) => !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}

/// Messier objects get full marks, other named objects half.
pub fn novelty_score(object_name: &str, common_name: &str) -> f64 {
    let max = ScoreBreakdown::NOVELTY_MAX;
    if is_messier(object_name) || is_messier(common_name) {
        max
    } else if !common_name.trim().is_empty() {
        max * 0.5
    } else {
        0.0
    }
}

pub fn twilight_penalty(visibility: &ObjectVisibility, night: &NightInfo) -> f64 {
    match visibility.max_altitude_time {
        Some(peak) if night.is_twilight(peak) => {
            if visibility.category.is_deep_sky() {
                ScoreBreakdown::TWILIGHT_PENALTY_MIN
            } else {
                -3.0
            }
        }
        _ => 0.0,
    }
}

/// Small targets and planets benefit most from steady air.
pub fn seeing_score(night: &NightInfo, category: ObjectCategory, angular_size_arcmin: f64) -> f64 {
    let Some(forecast) = night.seeing_forecast else {
        return 0.0;
    };
    let bonus = match forecast.rating {
        SeeingRating::Excellent => 10.0,
        SeeingRating::Good => 7.0,
        SeeingRating::Average => 4.0,
        SeeingRating::Poor => 1.0,
        SeeingRating::Bad => 0.0,
    };
    if category.is_point_like() || angular_size_arcmin < 5.0 {
        bonus
    } else {
        bonus * 0.5
    }
}

pub fn dew_penalty(weather: Option<&NightWeather>) -> f64 {
    match weather.and_then(|w| w.dew_margin_c) {
        Some(margin) if margin < 1.0 => ScoreBreakdown::DEW_PENALTY_MIN,
        Some(margin) if margin < 3.0 => -3.0,
        Some(margin) if margin < 5.0 => -1.0,
        _ => 0.0,
    }
}

pub fn imaging_window_score(visibility: &ObjectVisibility) -> f64 {
    visibility
        .imaging_window
        .as_ref()
        .map(|w| (w.quality_score / 10.0).clamp(0.0, ScoreBreakdown::IMAGING_WINDOW_MAX))
        .unwrap_or(0.0)
}

/// Percentage of the sensor's short side spanned by the object.
/// `None` for point-like categories or without a field of view.
pub fn frame_fill(
    category: ObjectCategory,
    angular_size_arcmin: f64,
    fov: Option<FieldOfView>,
) -> Option<f64> {
    if category.is_point_like() {
        return None;
    }
    let fov = fov?;
    let short = fov.short_side();
    if short <= 0.0 {
        return None;
    }
    Some(angular_size_arcmin / short * 100.0)
}

pub fn field_of_view_score(
    category: ObjectCategory,
    angular_size_arcmin: f64,
    fov: Option<FieldOfView>,
) -> f64 {
    match frame_fill(category, angular_size_arcmin, fov) {
        Some(fill) if (10.0..=80.0).contains(&fill) => ScoreBreakdown::FIELD_OF_VIEW_MAX,
        Some(fill) if (5.0..10.0).contains(&fill) || (80.0..=100.0).contains(&fill) => 6.0,
        Some(fill) if fill > 100.0 => 3.0,
        Some(_) => 2.0,
        None => 0.0,
    }
}

fn component_phrase(component: ScoreComponent) -> &'static str {
    match component {
        ScoreComponent::Altitude => "high in the sky",
        ScoreComponent::Moon => "little moon interference",
        ScoreComponent::Timing => "peaks during darkness",
        ScoreComponent::Weather => "clear skies",
        ScoreComponent::SurfaceBrightness => "bright surface",
        ScoreComponent::Magnitude => "bright target",
        ScoreComponent::TypeSuitability => "suits tonight's sky",
        ScoreComponent::Transient => "rare event",
        ScoreComponent::Seasonal => "peak season",
        ScoreComponent::Novelty => "popular target",
        ScoreComponent::Seeing => "steady seeing",
        ScoreComponent::ImagingWindow => "strong imaging window",
        ScoreComponent::FieldOfView => "fills the frame well",
        ScoreComponent::TwilightPenalty => "peaks in twilight",
        ScoreComponent::DewPenalty => "dew risk",
    }
}

/// Names the two components that reached the largest share of their own ceiling.
pub fn score_reason(breakdown: &ScoreBreakdown) -> String {
    let mut ranked: Vec<(ScoreComponent, f64)> = breakdown
        .components()
        .iter()
        .filter_map(|(component, value)| {
            let ceiling = ScoreBreakdown::ceiling(*component)?;
            (*value > 0.0).then_some((*component, value / ceiling))
        })
        .collect();
    // Stable sort keeps declaration order on ties
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    let phrases: Vec<&str> = ranked
        .iter()
        .take(2)
        .map(|(component, _)| component_phrase(*component))
        .collect();
    if phrases.is_empty() {
        return "Marginal target".to_string();
    }
    capitalize(&phrases.join(", "))
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
