//! Grading source port for loading events from various sources.

use crate::domain::GradingEvent;

/// Port for loading grading events.
pub trait GradingSource: Send + Sync {
    /// Returns an iterator over events from this source.
    ///
    /// # Errors
    ///
    /// Individual items may be errors if an event fails to load.
    fn events(&self) -> Box<dyn Iterator<Item = anyhow::Result<GradingEvent>> + Send + '_>;

    /// Returns the total number of events, if known.
    fn count_hint(&self) -> Option<usize>;
}
