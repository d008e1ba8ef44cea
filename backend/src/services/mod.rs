//! Service layer: the scoring, detection and selection components.
//!
//! Every service is a synchronous, pure transformation over immutable inputs.
//! The satellite batch is the only one that fans out across threads.

pub mod best_nights;
pub mod element_sets;
pub mod forecast;
pub mod imaging_window;
pub mod night_quality;
pub mod object_selection;
pub mod quick_filter;
pub mod satellite_passes;
pub mod scoring;
pub mod secondary_sort;
pub mod tonight_picks;
pub mod weather_summary;

pub use best_nights::{rank_nights, select_best_nights, RankedNight};
pub use element_sets::parse_element_sets;
pub use forecast::{build_night_forecast, NightInput, ObjectInput};
pub use night_quality::{assess_night, calculate_night_rating, night_quality_score};
pub use object_selection::{select_best_objects, SelectionOptions};
pub use quick_filter::{apply_quick_filters, QuickFilter};
pub use satellite_passes::{
    azimuth_to_compass, estimate_magnitude, PassBatch, PassDetector, PassState, Propagator,
    TabulatedPropagator,
};
pub use scoring::{score_object, ScoringContext};
pub use secondary_sort::{compare_by, sort_objects, SortField};
pub use tonight_picks::{select_tonight_picks, PickRule, DEFAULT_PICK_RULES};
pub use weather_summary::{find_clear_windows, summarize_night_weather};
