//! Filesystem adapter for loading grading events.

use anyhow::{Context, Result};
use card_grade_core::{GradingEvent, GradingSource};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Extension of grading-event documents.
const EVENT_EXTENSION: &str = "json";

/// Filesystem grading-event source adapter.
pub struct FsGradingSource {
    paths: Vec<PathBuf>,
    recursive: bool,
}

impl FsGradingSource {
    /// Creates a new filesystem source.
    ///
    /// # Arguments
    ///
    /// * `paths` - Files or directories to scan
    /// * `recursive` - Whether to recurse into subdirectories
    #[must_use]
    pub const fn new(paths: Vec<PathBuf>, recursive: bool) -> Self {
        Self { paths, recursive }
    }

    /// Collects all event files from the configured paths.
    ///
    /// Explicit file arguments are taken regardless of extension; directory
    /// scans only pick up `.json` files, sorted for a stable batch order.
    fn collect_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for path in &self.paths {
            if path.is_file() {
                files.push(path.clone());
            } else if path.is_dir() {
                let mut found = Vec::new();
                self.collect_from_dir(path, &mut found);
                found.sort();
                files.append(&mut found);
            } else {
                warn!("Path does not exist: {}", path.display());
            }
        }

        files
    }

    fn collect_from_dir(&self, dir: &Path, files: &mut Vec<PathBuf>) {
        let entries = match std::fs::read_dir(dir) {
            Ok(e) => e,
            Err(e) => {
                warn!("Failed to read directory {}: {e}", dir.display());
                return;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_file() && is_event_file(&path) {
                files.push(path);
            } else if path.is_dir() && self.recursive {
                self.collect_from_dir(&path, files);
            }
        }
    }
}

impl GradingSource for FsGradingSource {
    fn events(&self) -> Box<dyn Iterator<Item = Result<GradingEvent>> + Send + '_> {
        let files = self.collect_files();
        debug!("Found {} event files", files.len());

        Box::new(files.into_iter().map(|path| load_event(&path)))
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.collect_files().len())
    }
}

/// Checks if a path has the event document extension.
fn is_event_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(EVENT_EXTENSION))
}

/// Loads a grading event from the filesystem.
fn load_event(path: &Path) -> Result<GradingEvent> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read event: {}", path.display()))?;
    GradingEvent::from_json(path.to_string_lossy(), &content)
        .with_context(|| format!("Failed to parse event: {}", path.display()))
}

/// Reads and parses an arbitrary JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid JSON.
pub fn read_json_file(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}
