//! Grading pass and aggregate types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of independent passes in one grading event.
pub const PASS_COUNT: usize = 3;

/// Lowest valid score on the grading scale.
pub const MIN_SCORE: f64 = 1.0;

/// Highest valid score on the grading scale.
pub const MAX_SCORE: f64 = 10.0;

/// One independent condition evaluation produced by the vision pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradingPass {
    /// Centering sub-score.
    pub centering: f64,
    /// Corners sub-score.
    pub corners: f64,
    /// Edges sub-score.
    pub edges: f64,
    /// Surface sub-score.
    pub surface: f64,
    /// Pass-internal final score. Supplied by the pipeline, never recomputed.
    #[serde(rename = "final")]
    pub final_score: f64,
}

impl GradingPass {
    /// Creates a pass from its five scores.
    #[must_use]
    pub const fn new(centering: f64, corners: f64, edges: f64, surface: f64, final_score: f64) -> Self {
        Self {
            centering,
            corners,
            edges,
            surface,
            final_score,
        }
    }

    /// Returns the score stored for `field`.
    #[must_use]
    pub const fn score(&self, field: ScoreField) -> f64 {
        match field {
            ScoreField::Centering => self.centering,
            ScoreField::Corners => self.corners,
            ScoreField::Edges => self.edges,
            ScoreField::Surface => self.surface,
            ScoreField::Final => self.final_score,
        }
    }
}

/// The five scalar fields carried by every pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreField {
    Centering,
    Corners,
    Edges,
    Surface,
    Final,
}

impl ScoreField {
    /// All fields in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Centering,
        Self::Corners,
        Self::Edges,
        Self::Surface,
        Self::Final,
    ];

    /// JSON key for this field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Centering => "centering",
            Self::Corners => "corners",
            Self::Edges => "edges",
            Self::Surface => "surface",
            Self::Final => "final",
        }
    }
}

impl fmt::Display for ScoreField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Agreement level across the three passes' final scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Consistency {
    High,
    Moderate,
    Low,
}

impl fmt::Display for Consistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::High => "high",
            Self::Moderate => "moderate",
            Self::Low => "low",
        };
        f.write_str(s)
    }
}

/// A score outside the grading scale that was accepted under the warn policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeWarning {
    /// 1-based pass number.
    pub pass: usize,
    /// Offending field.
    pub field: ScoreField,
    /// Value as supplied.
    pub value: f64,
}

/// Consensus of three passes.
///
/// Score fields hold unrounded means; use [`AggregatedResult::rounded`] for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedResult {
    pub centering: f64,
    pub corners: f64,
    pub edges: f64,
    pub surface: f64,
    #[serde(rename = "final")]
    pub final_score: f64,
    /// Population variance of the three final scores.
    pub variance: f64,
    pub consistency: Consistency,
    /// Notes from the pipeline, in the order supplied.
    #[serde(default)]
    pub consensus_notes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub range_warnings: Vec<RangeWarning>,
}

impl AggregatedResult {
    /// Display-rounded copy of the five scores.
    #[must_use]
    pub fn rounded(&self) -> DisplayScores {
        DisplayScores {
            centering: round_score(self.centering),
            corners: round_score(self.corners),
            edges: round_score(self.edges),
            surface: round_score(self.surface),
            final_score: round_score(self.final_score),
        }
    }
}

/// Whole-number scores for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayScores {
    pub centering: i64,
    pub corners: i64,
    pub edges: i64,
    pub surface: i64,
    #[serde(rename = "final")]
    pub final_score: i64,
}

/// Rounds a score to the nearest whole number, halves away from zero.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn round_score(value: f64) -> i64 {
    value.round() as i64
}
