//! Grading engine components.
//!
//! Every function here is pure: no I/O, no shared state.

pub mod aggregator;
pub mod anchors;
pub mod classifier;
pub mod localizer;
mod payload;
pub mod pipeline;
pub mod tally;

pub use aggregator::{
    aggregate_passes, parse_passes, population_variance, AggregatorConfig, ConsistencyThresholds,
    RangePolicy, HIGH_CONSISTENCY_MAX_VARIANCE, MODERATE_CONSISTENCY_MAX_VARIANCE,
};
pub use anchors::{corner_anchor, edge_anchor, locate_from_text};
pub use classifier::{classify_condition, classify_json};
pub use localizer::{localize_side, localize_side_str};
pub use payload::{Region, SURFACE_KEY};
pub use pipeline::{grade_event, GradingConfig};
pub use tally::{surface_bucket, tally_defects};
