//! Card Grade Core - grading consensus, defect localization, and condition classification
//!
//! This crate holds the domain types, the three pure engine components
//! (pass aggregation, defect localization, condition classification), and the
//! ports adapters plug into.

pub mod domain;
pub mod engine;
pub mod ports;

pub use domain::{
    AggregatedResult, ConditionTier, Confidence, Consistency, DefectTally, GradingError,
    GradingEvent, GradingPass, GradingReport, OverlayDefect, Severity, Side,
};
pub use engine::{
    aggregate_passes, classify_condition, grade_event, localize_side, tally_defects,
    AggregatorConfig, ConsistencyThresholds, GradingConfig, RangePolicy,
};
pub use ports::{GradingSource, ProgressEvent, ProgressSink, ReportOutput};
