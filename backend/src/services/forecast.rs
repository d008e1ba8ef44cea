//! Assemble per-night forecasts from raw ephemeris and weather inputs.

use serde::{Deserialize, Serialize};

use super::night_quality::assess_night;
use super::scoring::{score_object, ScoringContext};
use crate::models::{
    FieldOfView, NightForecast, NightInfo, NightWeather, ObjectCategory, ObjectProfile,
    ObjectVisibility, SatellitePass, ScoredObject, SkyEvent,
};

/// Visibility record plus catalog traits for one candidate object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectInput {
    pub visibility: ObjectVisibility,
    #[serde(default)]
    pub profile: ObjectProfile,
}

/// Everything the upstream sources supply for one night.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NightInput {
    pub night: NightInfo,
    #[serde(default)]
    pub weather: Option<NightWeather>,
    #[serde(default)]
    pub objects: Vec<ObjectInput>,
    #[serde(default)]
    pub events: Vec<SkyEvent>,
}

fn sort_by_score(objects: &mut [ScoredObject]) {
    objects.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));
}

/// Score every object of the night and group the results by category.
///
/// Passes are kept when they rise inside the night's dark window.
pub fn build_night_forecast(
    input: &NightInput,
    field_of_view: Option<FieldOfView>,
    passes: &[SatellitePass],
) -> NightForecast {
    let ctx = ScoringContext::new(&input.night)
        .with_weather(input.weather.as_ref())
        .with_field_of_view(field_of_view);

    let mut planets = Vec::new();
    let mut dsos = Vec::new();
    let mut comets = Vec::new();
    let mut dwarf_planets = Vec::new();
    let mut asteroids = Vec::new();
    let mut moons = Vec::new();

    for object in &input.objects {
        let Some(scored) = score_object(&object.visibility, &object.profile, &ctx) else {
            continue;
        };
        match scored.category {
            ObjectCategory::Planet => planets.push(scored),
            ObjectCategory::Dso => dsos.push(scored),
            ObjectCategory::Comet => comets.push(scored),
            ObjectCategory::DwarfPlanet => dwarf_planets.push(scored),
            ObjectCategory::Asteroid => asteroids.push(scored),
            ObjectCategory::Moon => moons.push(scored),
        }
    }

    for list in [
        &mut planets,
        &mut dsos,
        &mut comets,
        &mut dwarf_planets,
        &mut asteroids,
        &mut moons,
    ] {
        sort_by_score(list);
    }

    let dark = input.night.dark_window();
    let satellite_passes: Vec<SatellitePass> = passes
        .iter()
        .filter(|p| dark.contains(p.rise_time))
        .cloned()
        .collect();

    log::debug!(
        "Night {}: {} planets, {} deep-sky, {} comets, {} passes",
        input.night.date,
        planets.len(),
        dsos.len(),
        comets.len(),
        satellite_passes.len()
    );

    NightForecast {
        quality: assess_night(&input.night, input.weather.as_ref()),
        night: input.night.clone(),
        weather: input.weather.clone(),
        planets,
        dsos,
        comets,
        dwarf_planets,
        asteroids,
        moon: moons.into_iter().next(),
        satellite_passes,
        events: input.events.clone(),
    }
}
