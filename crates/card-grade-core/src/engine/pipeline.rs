//! Runs all three engine components for one grading event.

use tracing::{debug, warn};

use super::aggregator::{aggregate_passes, parse_passes, AggregatorConfig};
use super::classifier::classify_condition;
use super::localizer::localize_side;
use super::tally::tally_defects;
use crate::domain::{
    AggregatedResult, GradingError, GradingEvent, GradingReport, OverlaySet, Side, MAX_SCORE,
    MIN_SCORE,
};

/// Engine configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GradingConfig {
    pub aggregator: AggregatorConfig,
}

/// Grades one event.
///
/// The classifier receives the unrounded final mean, never the display value.
/// When out-of-range passes were accepted with warnings and the mean itself
/// is off the 1-10 scale, the classifier sees the mean clamped to the scale;
/// the report keeps the raw mean and its range warnings. Malformed defect
/// payloads only cost the overlay and tally; malformed passes fail the event.
///
/// # Errors
///
/// Propagates aggregation and classification errors.
pub fn grade_event(
    event: &GradingEvent,
    config: &GradingConfig,
) -> Result<GradingReport, GradingError> {
    let passes = parse_passes(&event.passes)?;
    let aggregate = aggregate_passes(&passes, &event.consensus_notes, &config.aggregator)?;

    let overlay = OverlaySet {
        front: localize_side(&event.defects.front, Side::Front),
        back: localize_side(&event.defects.back, Side::Back),
    };
    let tally = tally_defects(&event.defects.front, &event.defects.back);
    let condition = classify_condition(Some(classifier_grade(&aggregate)), Some(&tally))?;

    debug!(
        "graded {}: final {:.3} ({}), {} marker(s), {condition}",
        event.source,
        aggregate.final_score,
        aggregate.consistency,
        overlay.len()
    );

    Ok(GradingReport {
        source: event.source.clone(),
        id: event.id.clone(),
        graded_at: None,
        display: aggregate.rounded(),
        aggregate,
        overlay,
        tally,
        condition,
    })
}

/// Final mean as handed to the classifier.
fn classifier_grade(aggregate: &AggregatedResult) -> f64 {
    let grade = aggregate.final_score;
    if aggregate.range_warnings.is_empty() || (MIN_SCORE..=MAX_SCORE).contains(&grade) {
        return grade;
    }
    let clamped = grade.clamp(MIN_SCORE, MAX_SCORE);
    warn!("final mean {grade} is off scale, classifying as {clamped}");
    clamped
}
