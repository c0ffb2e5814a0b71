//! Port definitions for hexagonal architecture.
//!
//! These traits define the boundaries between the engine and external adapters.

mod grading_source;
mod progress;
mod report_output;

pub use grading_source::GradingSource;
pub use progress::{ProgressEvent, ProgressSink};
pub use report_output::ReportOutput;
