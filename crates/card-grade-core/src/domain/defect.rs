//! Defect report and overlay types.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Severity of a real defect. `none` is not representable: it means "no defect".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Minor,
    Moderate,
    Heavy,
}

impl Severity {
    /// Parses a raw severity string.
    ///
    /// Returns `None` for `none`, empty, and unrecognized values.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "minor" => Some(Self::Minor),
            "moderate" => Some(Self::Moderate),
            "heavy" => Some(Self::Heavy),
            _ => None,
        }
    }

    /// Sort rank: heavy first.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Heavy => 0,
            Self::Moderate => 1,
            Self::Minor => 2,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Minor => "minor",
            Self::Moderate => "moderate",
            Self::Heavy => "heavy",
        };
        f.write_str(s)
    }
}

/// Card side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Front,
    Back,
}

impl Side {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Back => "back",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural region group a defect was reported under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefectSource {
    Corner,
    Edge,
    Surface,
}

/// How a marker position was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
    /// Structural default, not observed.
    Inferred,
}

impl Confidence {
    /// Parses an observed confidence. `inferred` is never accepted from input.
    #[must_use]
    pub fn parse_observed(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

/// The four card corners, in collection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Self; 4] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::TopLeft => "top_left",
            Self::TopRight => "top_right",
            Self::BottomLeft => "bottom_left",
            Self::BottomRight => "bottom_right",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

/// The four card edges, in collection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    pub const ALL: [Self; 4] = [Self::Top, Self::Bottom, Self::Left, Self::Right];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.key() == key)
    }
}

/// Image-relative position in percent (0-100 on both axes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x_percent: f64,
    pub y_percent: f64,
}

impl Position {
    #[must_use]
    pub const fn new(x_percent: f64, y_percent: f64) -> Self {
        Self {
            x_percent,
            y_percent,
        }
    }

    /// Center of the card image.
    pub const CENTER: Self = Self::new(50.0, 50.0);
}

/// Reads an optional field, treating a value of the wrong type as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Raw observed coordinates as emitted by the vision pipeline.
///
/// Every field is optional and read leniently, so a partially filled or
/// mistyped object degrades to the next resolver instead of discarding the
/// whole defect.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCoordinates {
    #[serde(default, deserialize_with = "lenient")]
    pub x_percent: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub y_percent: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub confidence: Option<String>,
}

/// One raw defect observation attached to a structural region.
///
/// A mistyped field reads as absent; only the severity decides whether the
/// report counts as a defect.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefectReport {
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub defect_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub severity: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub coordinates: Option<RawCoordinates>,
    #[serde(default, deserialize_with = "lenient")]
    pub location: Option<String>,
}

impl DefectReport {
    /// Severity if this report describes a real defect.
    #[must_use]
    pub fn valid_severity(&self) -> Option<Severity> {
        self.severity.as_deref().and_then(Severity::parse)
    }
}

/// A normalized, positioned defect ready for overlay rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayDefect {
    /// 1-based index in severity order. Only stable for one input snapshot.
    pub id: usize,
    #[serde(rename = "type")]
    pub defect_type: String,
    pub severity: Severity,
    pub description: String,
    pub source: DefectSource,
    /// Corner or edge key, or `"surface"`.
    pub structural_key: String,
    pub side: Side,
    pub x_percent: f64,
    pub y_percent: f64,
    pub confidence: Confidence,
}
