//! Grading event input and report output.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{AggregatedResult, ConditionTier, DefectTally, DisplayScores, OverlayDefect};

/// Raw output of the vision pipeline for one card.
///
/// Payloads stay as JSON until each engine component parses the part it
/// needs, so a malformed defect payload cannot fail the numeric grade.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GradingEvent {
    /// Where the event was loaded from. Set by the source adapter.
    #[serde(skip)]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// `{pass_1, pass_2, pass_3}` object or a three-element array.
    #[serde(default)]
    pub passes: Value,
    #[serde(default)]
    pub consensus_notes: Vec<String>,
    #[serde(default)]
    pub defects: SideDefects,
}

impl GradingEvent {
    /// Parses an event document and records its source.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not a valid event document.
    pub fn from_json(source: impl Into<String>, json: &str) -> serde_json::Result<Self> {
        let mut event: Self = serde_json::from_str(json)?;
        event.source = source.into();
        Ok(event)
    }
}

/// Raw per-side defect payloads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SideDefects {
    #[serde(default)]
    pub front: Value,
    #[serde(default)]
    pub back: Value,
}

/// Overlay markers for both sides. IDs restart at 1 on each side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverlaySet {
    pub front: Vec<OverlayDefect>,
    pub back: Vec<OverlayDefect>,
}

impl OverlaySet {
    #[must_use]
    pub fn len(&self) -> usize {
        self.front.len() + self.back.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.front.is_empty() && self.back.is_empty()
    }
}

/// Complete engine output for one grading event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingReport {
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// RFC 3339 timestamp, stamped by the caller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graded_at: Option<String>,
    pub aggregate: AggregatedResult,
    pub display: DisplayScores,
    pub overlay: OverlaySet,
    pub tally: DefectTally,
    pub condition: ConditionTier,
}
