//! Progress reporting port for UI integration.

use crate::domain::GradingReport;

/// Events emitted while grading a batch.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Grading started for an event.
    Started {
        /// Where the event came from.
        source: String,
        /// Index in the batch (0-based).
        index: usize,
        /// Total events in batch, if known.
        total: Option<usize>,
    },
    /// Grading completed for an event.
    Completed {
        /// The grading report.
        report: Box<GradingReport>,
    },
    /// An event was skipped because it could not be loaded or graded.
    Skipped {
        source: String,
        reason: String,
    },
    /// All events have been processed.
    Finished {
        /// Events graded successfully.
        processed: usize,
        /// Events skipped.
        skipped: usize,
    },
}

/// Port for receiving progress events.
pub trait ProgressSink: Send + Sync {
    /// Called when a progress event occurs.
    fn on_event(&self, event: ProgressEvent);
}
