//! Merit-based shortlist of the night's best objects.
//!
//! Objects are taken by score with a soft cap per subtype so one kind of target
//! cannot crowd out the rest. Exceptional scores may exceed the cap.

use std::collections::{HashMap, HashSet};

use crate::models::ScoredObject;

/// Shortlist tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionOptions {
    pub min_score: f64,
    pub soft_cap_per_subtype: usize,
    pub exceptional_score: f64,
    /// Reserve a slot for the best object of each category present
    pub ensure_category_representation: bool,
}

impl Default for SelectionOptions {
    fn default() -> Self {
        Self {
            min_score: 60.0,
            soft_cap_per_subtype: 3,
            exceptional_score: 180.0,
            ensure_category_representation: true,
        }
    }
}

fn ranked_by_score<'a, I>(objects: I) -> Vec<&'a ScoredObject>
where
    I: IntoIterator<Item = &'a ScoredObject>,
{
    let mut ranked: Vec<&ScoredObject> = objects.into_iter().collect();
    ranked.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));
    ranked
}

/// Pick at most `max_objects`, best first.
///
/// When nothing reaches `min_score` the best available objects are returned
/// instead, without caps.
pub fn select_best_objects<'a>(
    objects: &'a [ScoredObject],
    max_objects: usize,
    options: &SelectionOptions,
) -> Vec<&'a ScoredObject> {
    let viable = ranked_by_score(objects.iter().filter(|o| o.total_score >= options.min_score));
    if viable.is_empty() {
        let mut fallback = ranked_by_score(objects);
        fallback.truncate(max_objects);
        return fallback;
    }

    let mut chosen: Vec<usize> = Vec::new();
    let mut subtype_counts: HashMap<&str, usize> = HashMap::new();

    if options.ensure_category_representation {
        let mut seen = HashSet::new();
        for (idx, object) in viable.iter().enumerate() {
            if chosen.len() >= max_objects {
                break;
            }
            if seen.insert(object.category) {
                chosen.push(idx);
                *subtype_counts.entry(object.subtype.as_str()).or_default() += 1;
            }
        }
    }

    for (idx, object) in viable.iter().enumerate() {
        if chosen.len() >= max_objects {
            break;
        }
        if chosen.contains(&idx) {
            continue;
        }
        let count = subtype_counts.entry(object.subtype.as_str()).or_default();
        if *count >= options.soft_cap_per_subtype && object.total_score < options.exceptional_score {
            continue;
        }
        *count += 1;
        chosen.push(idx);
    }

    chosen.sort_unstable();
    chosen.into_iter().map(|idx| viable[idx]).collect()
}
