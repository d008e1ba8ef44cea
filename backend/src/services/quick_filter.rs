//! Named boolean predicates over scored objects, combined with AND.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::ScoredObject;

/// Quick filter catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickFilter {
    /// Has an imaging window tonight
    ImagingWindow,
    /// Moon separation above 30°, or unknown
    MoonClear,
    /// Peaks at 45° or higher
    HighAltitude,
    /// Total score of 100 or more
    TopRated,
    /// Magnitude 6 or brighter
    NakedEye,
    /// Earns a transient-event bonus
    Transient,
}

impl QuickFilter {
    pub const ALL: [QuickFilter; 6] = [
        QuickFilter::ImagingWindow,
        QuickFilter::MoonClear,
        QuickFilter::HighAltitude,
        QuickFilter::TopRated,
        QuickFilter::NakedEye,
        QuickFilter::Transient,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            QuickFilter::ImagingWindow => "imaging_window",
            QuickFilter::MoonClear => "moon_clear",
            QuickFilter::HighAltitude => "high_altitude",
            QuickFilter::TopRated => "top_rated",
            QuickFilter::NakedEye => "naked_eye",
            QuickFilter::Transient => "transient",
        }
    }

    pub fn matches(&self, object: &ScoredObject) -> bool {
        let vis = &object.visibility;
        match self {
            QuickFilter::ImagingWindow => vis.imaging_window.is_some(),
            QuickFilter::MoonClear => vis.moon_separation.map_or(true, |sep| sep > 30.0),
            QuickFilter::HighAltitude => vis.max_altitude >= 45.0,
            QuickFilter::TopRated => object.total_score >= 100.0,
            QuickFilter::NakedEye => object.magnitude.is_some_and(|m| m <= 6.0),
            QuickFilter::Transient => object.score_breakdown.transient > 0.0,
        }
    }
}

impl FromStr for QuickFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "imaging_window" => Ok(Self::ImagingWindow),
            "moon_clear" => Ok(Self::MoonClear),
            "high_altitude" => Ok(Self::HighAltitude),
            "top_rated" => Ok(Self::TopRated),
            "naked_eye" => Ok(Self::NakedEye),
            "transient" => Ok(Self::Transient),
            _ => Err(format!("Unknown quick filter: {}", s)),
        }
    }
}

/// Resolve filter identifiers, dropping unknown ones.
pub fn parse_filters<S: AsRef<str>>(ids: &[S]) -> Vec<QuickFilter> {
    ids.iter()
        .filter_map(|id| match id.as_ref().parse::<QuickFilter>() {
            Ok(filter) => Some(filter),
            Err(e) => {
                log::debug!("Ignoring filter: {}", e);
                None
            }
        })
        .collect()
}

/// Objects passing every filter, in input order.
pub fn apply_filters<'a>(objects: &'a [ScoredObject], filters: &[QuickFilter]) -> Vec<&'a ScoredObject> {
    objects
        .iter()
        .filter(|object| filters.iter().all(|f| f.matches(object)))
        .collect()
}

/// Objects passing every identified filter. No identifiers means no filtering.
pub fn apply_quick_filters<'a, S: AsRef<str>>(
    objects: &'a [ScoredObject],
    ids: &[S],
) -> Vec<&'a ScoredObject> {
    apply_filters(objects, &parse_filters(ids))
}
