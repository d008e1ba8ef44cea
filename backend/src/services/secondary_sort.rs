//! Configurable ordering of scored objects.
//!
//! Each [`SortField`] knows how to extract its value and which direction it
//! sorts in. Missing values always sort last.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::scoring::frame_fill;
use crate::models::{FieldOfView, ScoredObject};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Score,
    Magnitude,
    Altitude,
    MoonSeparation,
    ImagingQuality,
    FrameFill,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortField {
    /// Lower magnitudes are brighter, so magnitude is the only ascending field.
    pub fn direction(&self) -> SortDirection {
        match self {
            SortField::Magnitude => SortDirection::Ascending,
            SortField::Score
            | SortField::Altitude
            | SortField::MoonSeparation
            | SortField::ImagingQuality
            | SortField::FrameFill => SortDirection::Descending,
        }
    }

    /// Value used for ordering, `None` when undefined for this object.
    pub fn value(&self, object: &ScoredObject, fov: Option<FieldOfView>) -> Option<f64> {
        let vis = &object.visibility;
        match self {
            SortField::Score => Some(object.total_score),
            SortField::Magnitude => object.magnitude,
            SortField::Altitude => Some(vis.max_altitude),
            SortField::MoonSeparation => vis.moon_separation,
            SortField::ImagingQuality => vis.imaging_window.as_ref().map(|w| w.quality_score),
            SortField::FrameFill => frame_fill(object.category, vis.angular_size_arcmin, fov),
        }
    }

    /// Parse a field identifier, falling back to [`SortField::Score`].
    pub fn parse_or_default(s: &str) -> Self {
        s.parse().unwrap_or_else(|e| {
            log::debug!("{}, sorting by score", e);
            SortField::default()
        })
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "score" => Ok(Self::Score),
            "magnitude" => Ok(Self::Magnitude),
            "altitude" => Ok(Self::Altitude),
            "moon_separation" | "moon" => Ok(Self::MoonSeparation),
            "imaging_quality" | "imaging" => Ok(Self::ImagingQuality),
            "frame_fill" => Ok(Self::FrameFill),
            _ => Err(format!("Unknown sort field: {}", s)),
        }
    }
}

/// Compare two optional values: defined before undefined, then by direction.
fn compare_values(a: Option<f64>, b: Option<f64>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => match direction {
            SortDirection::Ascending => x.total_cmp(&y),
            SortDirection::Descending => y.total_cmp(&x),
        },
    }
}

/// Build a total-order comparator for `field`. The field of view only matters
/// for [`SortField::FrameFill`].
pub fn compare_by(
    field: SortField,
    fov: Option<FieldOfView>,
) -> impl Fn(&ScoredObject, &ScoredObject) -> Ordering {
    let direction = field.direction();
    move |a: &ScoredObject, b: &ScoredObject| {
        compare_values(field.value(a, fov), field.value(b, fov), direction)
    }
}

/// Stable in-place sort of borrowed objects.
pub fn sort_objects(objects: &mut [&ScoredObject], field: SortField, fov: Option<FieldOfView>) {
    let cmp = compare_by(field, fov);
    objects.sort_by(|a, b| cmp(*a, *b));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ObjectCategory, ObjectVisibility, ScoreBreakdown};

    fn object(name: &str, category: ObjectCategory, magnitude: Option<f64>, size: f64) -> ScoredObject {
        ScoredObject {
            object_name: name.to_string(),
            category,
            subtype: String::new(),
            total_score: 100.0,
            score_breakdown: ScoreBreakdown::default(),
            reason: String::new(),
            magnitude,
            visibility: ObjectVisibility {
                object_name: name.to_string(),
                category,
                is_visible: true,
                max_altitude: 50.0,
                max_altitude_time: None,
                azimuth_at_max: None,
                min_altitude: None,
                above_45: None,
                above_60: None,
                above_75: None,
                meridian_transit: None,
                moon_separation: None,
                imaging_window: None,
                angular_size_arcmin: size,
                min_airmass: None,
                magnitude,
            },
        }
    }

    fn sorted_names(objects: &[ScoredObject], field: SortField, fov: Option<FieldOfView>) -> Vec<&str> {
        let mut refs: Vec<&ScoredObject> = objects.iter().collect();
        sort_objects(&mut refs, field, fov);
        refs.iter().map(|o| o.object_name.as_str()).collect()
    }

    #[test]
    fn test_magnitude_ascending_nulls_last() {
        let objects = vec![
            object("faint", ObjectCategory::Dso, Some(12.0), 5.0),
            object("unknown", ObjectCategory::Dso, None, 5.0),
            object("bright", ObjectCategory::Dso, Some(2.0), 5.0),
        ];
        assert_eq!(
            sorted_names(&objects, SortField::Magnitude, None),
            vec!["bright", "faint", "unknown"]
        );
    }

    #[test]
    fn test_score_descending() {
        let mut objects = vec![
            object("low", ObjectCategory::Dso, None, 5.0),
            object("high", ObjectCategory::Dso, None, 5.0),
        ];
        objects[0].total_score = 40.0;
        objects[1].total_score = 140.0;
        assert_eq!(sorted_names(&objects, SortField::Score, None), vec!["high", "low"]);
    }

    #[test]
    fn test_frame_fill_skips_point_like_and_needs_fov() {
        let objects = vec![
            object("jupiter", ObjectCategory::Planet, Some(-2.5), 0.8),
            object("small", ObjectCategory::Dso, Some(9.0), 8.0),
            object("large", ObjectCategory::Dso, Some(4.0), 60.0),
        ];
        let fov = Some(FieldOfView::new(120.0, 80.0));
        assert_eq!(
            sorted_names(&objects, SortField::FrameFill, fov),
            vec!["large", "small", "jupiter"]
        );

        // Without a field of view every value is undefined and the order is kept
        assert_eq!(
            sorted_names(&objects, SortField::FrameFill, None),
            vec!["jupiter", "small", "large"]
        );
    }

    #[test]
    fn test_two_nulls_compare_equal() {
        assert_eq!(compare_values(None, None, SortDirection::Ascending), Ordering::Equal);
        assert_eq!(compare_values(None, Some(1.0), SortDirection::Descending), Ordering::Greater);
    }

    #[test]
    fn test_unknown_field_falls_back_to_score() {
        assert_eq!(SortField::parse_or_default("popularity"), SortField::Score);
        assert_eq!(SortField::parse_or_default("frame-fill"), SortField::FrameFill);
    }
}
