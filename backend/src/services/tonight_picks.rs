//! Tonight's highlighted objects.
//!
//! Picks are driven by an ordered table of [`PickRule`]s. Rules are evaluated in
//! order and each chosen object leaves the pool, so an object that qualifies for
//! several rules is labelled by the first one.

use crate::models::{ObjectCategory, ScoredObject, TonightPick};

/// Which statistic a pick shows next to its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickStat {
    /// Magnitude when known, otherwise peak altitude
    Brightness,
    PeakAltitude,
    ImagingQuality,
}

/// One entry of the pick table.
#[derive(Clone, Copy)]
pub struct PickRule {
    pub category_label: &'static str,
    pub predicate: fn(&ScoredObject) -> bool,
    pub min_score: f64,
    pub stat: PickStat,
}

impl PickRule {
    pub fn accepts(&self, object: &ScoredObject) -> bool {
        object.total_score >= self.min_score && (self.predicate)(object)
    }
}

fn is_planet(o: &ScoredObject) -> bool {
    o.category == ObjectCategory::Planet
}

fn is_comet(o: &ScoredObject) -> bool {
    o.category == ObjectCategory::Comet
}

fn has_imaging_window(o: &ScoredObject) -> bool {
    o.visibility.imaging_window.is_some()
}

/// Default pick table. Order matters.
pub const DEFAULT_PICK_RULES: [PickRule; 6] = [
    PickRule {
        category_label: "Top Planet",
        predicate: is_planet,
        min_score: 60.0,
        stat: PickStat::Brightness,
    },
    PickRule {
        category_label: "Top Galaxy",
        predicate: ScoredObject::is_galaxy,
        min_score: 80.0,
        stat: PickStat::PeakAltitude,
    },
    PickRule {
        category_label: "Top Nebula",
        predicate: ScoredObject::is_nebula,
        min_score: 80.0,
        stat: PickStat::PeakAltitude,
    },
    PickRule {
        category_label: "Top Cluster",
        predicate: ScoredObject::is_cluster,
        min_score: 70.0,
        stat: PickStat::PeakAltitude,
    },
    PickRule {
        category_label: "Top Comet",
        predicate: is_comet,
        min_score: 60.0,
        stat: PickStat::PeakAltitude,
    },
    PickRule {
        category_label: "Best Imaging Target",
        predicate: has_imaging_window,
        min_score: 100.0,
        stat: PickStat::ImagingQuality,
    },
];

fn display_stat(object: &ScoredObject, stat: PickStat) -> String {
    let imaging = object.visibility.imaging_window.as_ref();
    match (stat, object.magnitude, imaging) {
        (PickStat::ImagingQuality, _, Some(window)) => {
            format!("{:.0}% imaging quality", window.quality_score)
        }
        (PickStat::Brightness, Some(mag), _) => format!("mag {:.1}", mag),
        _ => format!("peaks at {:.0}°", object.visibility.max_altitude),
    }
}

/// Select tonight's picks with the default rule table.
pub fn select_tonight_picks(objects: &[ScoredObject]) -> Vec<TonightPick<'_>> {
    select_picks(objects, &DEFAULT_PICK_RULES)
}

/// At most one pick per rule, never the same object twice. Within a rule the
/// highest score wins and earlier objects win ties.
pub fn select_picks<'a>(objects: &'a [ScoredObject], rules: &[PickRule]) -> Vec<TonightPick<'a>> {
    let mut taken = vec![false; objects.len()];
    let mut picks = Vec::new();

    for rule in rules {
        let mut best: Option<usize> = None;
        for (idx, object) in objects.iter().enumerate() {
            if taken[idx] || !rule.accepts(object) {
                continue;
            }
            let better = match best {
                Some(b) => object.total_score > objects[b].total_score,
                None => true,
            };
            if better {
                best = Some(idx);
            }
        }

        if let Some(idx) = best {
            taken[idx] = true;
            let object = &objects[idx];
            picks.push(TonightPick {
                category_label: rule.category_label,
                object,
                reason: object.reason.clone(),
                display_stat: display_stat(object, rule.stat),
            });
        }
    }

    picks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ImagingWindow, ObjectVisibility, ScoreBreakdown, WindowFactors};
    use chrono::{Duration, TimeZone, Utc};

    fn scored(name: &str, category: ObjectCategory, subtype: &str, score: f64) -> ScoredObject {
        ScoredObject {
            object_name: name.to_string(),
            category,
            subtype: subtype.to_string(),
            total_score: score,
            score_breakdown: ScoreBreakdown::default(),
            reason: "High in the sky".to_string(),
            magnitude: None,
            visibility: ObjectVisibility {
                object_name: name.to_string(),
                category,
                is_visible: true,
                max_altitude: 62.4,
                max_altitude_time: None,
                azimuth_at_max: None,
                min_altitude: None,
                above_45: None,
                above_60: None,
                above_75: None,
                meridian_transit: None,
                moon_separation: None,
                imaging_window: None,
                angular_size_arcmin: 10.0,
                min_airmass: None,
                magnitude: None,
            },
        }
    }

    fn with_window(mut object: ScoredObject, quality: f64) -> ScoredObject {
        let start = Utc.with_ymd_and_hms(2026, 1, 15, 20, 0, 0).unwrap();
        object.visibility.imaging_window = Some(
            ImagingWindow::new(start, start + Duration::hours(2), quality, WindowFactors::default())
                .unwrap(),
        );
        object
    }

    fn labels(picks: &[TonightPick<'_>]) -> Vec<(&'static str, String)> {
        picks
            .iter()
            .map(|p| (p.category_label, p.object.object_name.clone()))
            .collect()
    }

    #[test]
    fn test_subtype_groups() {
        let snr = scored("Veil", ObjectCategory::Dso, "supernova_remnant", 0.0);
        let globular = scored("M13", ObjectCategory::Dso, "globular_cluster", 0.0);
        let spiral = scored("M51", ObjectCategory::Dso, "galaxy_spiral", 0.0);
        assert!(snr.is_nebula() && !snr.is_cluster());
        assert!(globular.is_cluster() && !globular.is_nebula());
        assert!(spiral.is_galaxy());
        // Subtypes only group deep-sky objects
        assert!(!scored("Ceres", ObjectCategory::DwarfPlanet, "galaxy", 0.0).is_galaxy());
    }

    #[test]
    fn test_highest_planet_above_threshold() {
        let objects = vec![
            scored("Mars", ObjectCategory::Planet, "outer", 90.0),
            scored("Jupiter", ObjectCategory::Planet, "outer", 120.0),
            scored("Mercury", ObjectCategory::Planet, "inner", 40.0),
        ];
        let picks = select_tonight_picks(&objects);
        assert_eq!(labels(&picks), vec![("Top Planet", "Jupiter".to_string())]);
    }

    #[test]
    fn test_no_pick_below_threshold() {
        let objects = vec![
            scored("Mars", ObjectCategory::Planet, "outer", 59.0),
            scored("M31", ObjectCategory::Dso, "galaxy", 79.9),
        ];
        assert!(select_tonight_picks(&objects).is_empty());
    }

    #[test]
    fn test_picked_object_leaves_the_pool() {
        // Qualifies for both Top Galaxy and Best Imaging Target
        let objects = vec![
            with_window(scored("M31", ObjectCategory::Dso, "galaxy", 150.0), 90.0),
            with_window(scored("M33", ObjectCategory::Dso, "galaxy", 120.0), 70.0),
        ];
        let picks = select_tonight_picks(&objects);
        assert_eq!(
            labels(&picks),
            vec![
                ("Top Galaxy", "M31".to_string()),
                ("Best Imaging Target", "M33".to_string()),
            ]
        );
        assert_eq!(picks[1].display_stat, "70% imaging quality");
    }

    #[test]
    fn test_rule_order_decides_label() {
        let objects = vec![scored("NGC 2244", ObjectCategory::Dso, "cluster_nebula", 130.0)];
        let picks = select_tonight_picks(&objects);
        // cluster_nebula matches nebula first
        assert_eq!(picks[0].category_label, "Top Nebula");
        assert_eq!(picks.len(), 1);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let objects = vec![
            scored("M13", ObjectCategory::Dso, "globular_cluster", 100.0),
            scored("M92", ObjectCategory::Dso, "globular_cluster", 100.0),
        ];
        let picks = select_tonight_picks(&objects);
        assert_eq!(picks[0].object.object_name, "M13");
    }

    #[test]
    fn test_display_stats() {
        let mut jupiter = scored("Jupiter", ObjectCategory::Planet, "outer", 120.0);
        jupiter.magnitude = Some(-2.46);
        let comet = scored("C/2025 A1", ObjectCategory::Comet, "", 80.0);
        let objects = vec![jupiter, comet];
        let picks = select_tonight_picks(&objects);
        assert_eq!(picks[0].display_stat, "mag -2.5");
        assert_eq!(picks[1].display_stat, "peaks at 62°");
    }
}
