//! Core domain types for card grading.

mod defect;
mod error;
mod pass;
mod report;
mod tier;

pub use defect::{
    Confidence, Corner, DefectReport, DefectSource, Edge, OverlayDefect, Position,
    RawCoordinates, Severity, Side,
};
pub use error::GradingError;
pub use pass::{
    round_score, AggregatedResult, Consistency, DisplayScores, GradingPass, RangeWarning,
    ScoreField, MAX_SCORE, MIN_SCORE, PASS_COUNT,
};
pub use report::{GradingEvent, GradingReport, OverlaySet, SideDefects};
pub use tier::{ConditionTier, DefectTally, SeverityCounts, TallyBucket};
