//! Configuration file support for card-grade.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/card-grade/config.toml` (lowest priority)
//! - Project-local: `.card-grade.toml` (searched up directory tree)
//! - CLI flags (highest priority, applied separately)

use std::path::{Path, PathBuf};

use card_grade_core::RangePolicy;
use serde::Deserialize;
use tracing::{debug, info};

const APP_DIR: &str = "card-grade";
const PROJECT_FILE: &str = ".card-grade.toml";

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// General options.
    pub general: GeneralConfig,
    /// Pass-consensus settings.
    pub consensus: ConsensusConfig,
    /// Output formatting settings.
    pub output: OutputConfig,
}

/// General configuration options.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Recurse into subdirectories by default.
    pub recursive: Option<bool>,
}

/// Pass-consensus configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ConsensusConfig {
    /// Largest variance reported as high consistency.
    pub high_max_variance: Option<f64>,
    /// Largest variance reported as moderate consistency.
    pub moderate_max_variance: Option<f64>,
    /// Out-of-range score handling: "reject" or "warn".
    pub range_policy: Option<String>,
}

/// Output formatting configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "json" or "jsonl".
    pub format: Option<String>,
    /// Pretty-print JSON output.
    pub pretty: Option<bool>,
    /// Show progress bar.
    pub progress: Option<bool>,
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Priority (lowest to highest):
    /// 1. XDG config: `~/.config/card-grade/config.toml`
    /// 2. Project-local: `.card-grade.toml` (searched up from cwd)
    ///
    /// Missing files are silently ignored. Invalid values are reported as warnings.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(&xdg_path) {
                    config = xdg_config;
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        if let Some(project_path) = find_project_config() {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.merge(project_config);
            }
        }

        if let Err(e) = config.validate() {
            eprintln!("warning: {e}");
        }

        config
    }

    /// Validate configuration values are within acceptable ranges.
    fn validate(&self) -> Result<(), String> {
        let consensus = &self.consensus;
        for (name, value) in [
            ("consensus.high_max_variance", consensus.high_max_variance),
            ("consensus.moderate_max_variance", consensus.moderate_max_variance),
        ] {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(format!("{name} must be a non-negative number, got {v}"));
                }
            }
        }
        if let (Some(high), Some(moderate)) =
            (consensus.high_max_variance, consensus.moderate_max_variance)
        {
            if high > moderate {
                return Err(format!(
                    "consensus.high_max_variance ({high}) exceeds consensus.moderate_max_variance ({moderate})"
                ));
            }
        }

        if let Some(ref p) = consensus.range_policy {
            p.parse::<RangePolicy>()
                .map_err(|e| format!("consensus.range_policy: {e}"))?;
        }

        if let Some(ref f) = self.output.format {
            if f != "json" && f != "jsonl" {
                return Err(format!(
                    "output.format must be 'json' or 'jsonl', got '{f}'"
                ));
            }
        }

        Ok(())
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    fn merge(&mut self, other: Self) {
        self.general.recursive = other.general.recursive.or(self.general.recursive);

        self.consensus.high_max_variance = other
            .consensus
            .high_max_variance
            .or(self.consensus.high_max_variance);
        self.consensus.moderate_max_variance = other
            .consensus
            .moderate_max_variance
            .or(self.consensus.moderate_max_variance);
        self.consensus.range_policy = other
            .consensus
            .range_policy
            .or_else(|| self.consensus.range_policy.take());

        self.output.format = other.output.format.or_else(|| self.output.format.take());
        self.output.pretty = other.output.pretty.or(self.output.pretty);
        self.output.progress = other.output.progress.or(self.output.progress);
    }
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
}

/// Find project-local config by searching up from current directory.
fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

/// Search for `.card-grade.toml` in the given directory and its parents.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(PROJECT_FILE))
        .find(|path| path.exists())
}

/// Load and parse a TOML config file.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!("Failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}
