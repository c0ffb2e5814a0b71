//! Test support utilities for card-grade.
//!
//! Provides mocks, synthetic event builders, and fixture helpers for testing
//! the grading pipeline.
//!
//! # Example
//!
//! ```
//! use card_grade_test_support::{
//!     DefectBuilder, GradingEventBuilder, MockGradingSource, SidePayloadBuilder,
//! };
//!
//! let front = SidePayloadBuilder::new()
//!     .corner("top_left", DefectBuilder::new("whitening", "minor"))
//!     .build();
//! let event = GradingEventBuilder::with_finals([9.0, 9.5, 10.0])
//!     .front(front)
//!     .build("memory://card")
//!     .unwrap();
//!
//! let source = MockGradingSource::new(vec![event]);
//! ```

use std::fs;
use std::path::{Path, PathBuf};

mod builders;
mod mocks;

pub use builders::{
    pass_json, uniform_pass_json, DefectBuilder, GradingEventBuilder, SidePayloadBuilder,
};
pub use mocks::{MockGradingSource, MockProgressSink, MockReportOutput};

/// Writes an event document to `dir/name` and returns its path.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_event(dir: &Path, name: &str, event: &GradingEventBuilder) -> anyhow::Result<PathBuf> {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, serde_json::to_string_pretty(&event.to_json())?)?;
    Ok(path)
}
