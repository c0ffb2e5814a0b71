//! Defect localization for overlay rendering.
//!
//! Flattens one side's corner, edge, and surface reports into a list of
//! positioned markers. Each marker position comes from the first resolver in
//! a fixed chain that produces one:
//! - observed coordinates
//! - structural anchor (corners and edges only)
//! - location keywords
//! - canvas center

use serde_json::{Map, Value};
use tracing::debug;

use super::anchors::{corner_anchor, edge_anchor, locate_from_text};
use super::payload::{walk_side, Region};
use crate::domain::{
    Confidence, Corner, DefectReport, DefectSource, Edge, OverlayDefect, Position, Severity, Side,
};

/// A resolved marker position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Position,
    pub confidence: Confidence,
}

/// One position strategy. Returns `None` to defer to the next resolver.
pub type Resolver = fn(&DefectReport, Region<'_>) -> Option<Placement>;

/// Chain for corner and edge defects.
pub const STRUCTURAL_CHAIN: &[Resolver] = &[
    from_coordinates,
    from_structural_anchor,
    from_location_keywords,
    from_canvas_center,
];

/// Chain for surface defects.
pub const SURFACE_CHAIN: &[Resolver] = &[from_coordinates, from_location_keywords, from_canvas_center];

/// Uses observed coordinates when both axes are finite and within 0-100.
///
/// Confidence is copied through, defaulting to `high`.
#[must_use]
pub fn from_coordinates(report: &DefectReport, _region: Region<'_>) -> Option<Placement> {
    let coords = report.coordinates.as_ref()?;
    let x = coords.x_percent.filter(|v| is_percent(*v))?;
    let y = coords.y_percent.filter(|v| is_percent(*v))?;
    let confidence = coords
        .confidence
        .as_deref()
        .and_then(Confidence::parse_observed)
        .unwrap_or(Confidence::High);

    Some(Placement {
        position: Position::new(x, y),
        confidence,
    })
}

/// Uses the fixed anchor of the corner or edge the defect was reported on.
#[must_use]
pub fn from_structural_anchor(_report: &DefectReport, region: Region<'_>) -> Option<Placement> {
    let position = match region.source {
        DefectSource::Corner => Corner::from_key(region.key).map(corner_anchor),
        DefectSource::Edge => Edge::from_key(region.key).map(edge_anchor),
        DefectSource::Surface => None,
    }?;

    Some(Placement {
        position,
        confidence: Confidence::Inferred,
    })
}

/// Parses the free-text `location` hint.
#[must_use]
pub fn from_location_keywords(report: &DefectReport, _region: Region<'_>) -> Option<Placement> {
    let position = report.location.as_deref().and_then(locate_from_text)?;
    Some(Placement {
        position,
        confidence: Confidence::Medium,
    })
}

/// Last resort: the middle of the card.
#[must_use]
pub fn from_canvas_center(_report: &DefectReport, _region: Region<'_>) -> Option<Placement> {
    Some(CENTER_PLACEMENT)
}

const CENTER_PLACEMENT: Placement = Placement {
    position: Position::CENTER,
    confidence: Confidence::Low,
};

/// Runs a resolver chain, falling back to the canvas center.
#[must_use]
pub fn resolve(chain: &[Resolver], report: &DefectReport, region: Region<'_>) -> Placement {
    chain
        .iter()
        .find_map(|resolver| resolver(report, region))
        .unwrap_or(CENTER_PLACEMENT)
}

fn is_percent(value: f64) -> bool {
    value.is_finite() && (0.0..=100.0).contains(&value)
}

/// Localizes every valid defect on one side.
///
/// Output is sorted heavy, moderate, minor; ties keep discovery order
/// (corners, edges, surface). IDs are assigned from 1 after sorting. A payload
/// that is not a JSON object yields an empty list.
#[must_use]
pub fn localize_side(payload: &Value, side: Side) -> Vec<OverlayDefect> {
    match payload {
        Value::Object(map) => localize_map(map, side),
        Value::Null => Vec::new(),
        _ => {
            debug!("{side} defect payload is not an object, no markers");
            Vec::new()
        }
    }
}

/// Parses `raw` as JSON and localizes it. Unparseable text yields an empty list.
#[must_use]
pub fn localize_side_str(raw: &str, side: Side) -> Vec<OverlayDefect> {
    match serde_json::from_str::<Value>(raw) {
        Ok(payload) => localize_side(&payload, side),
        Err(e) => {
            debug!("{side} defect payload is not valid JSON ({e}), no markers");
            Vec::new()
        }
    }
}

fn localize_map(payload: &Map<String, Value>, side: Side) -> Vec<OverlayDefect> {
    let mut markers = Vec::new();

    walk_side(payload, |region, report| {
        let Some(severity) = report.valid_severity() else {
            return;
        };
        let chain = match region.source {
            DefectSource::Surface => SURFACE_CHAIN,
            DefectSource::Corner | DefectSource::Edge => STRUCTURAL_CHAIN,
        };
        let placement = resolve(chain, &report, region);
        markers.push(build_marker(report, severity, region, side, placement));
    });

    // Stable: equal severities keep discovery order.
    markers.sort_by_key(|m| m.severity.rank());
    for (index, marker) in markers.iter_mut().enumerate() {
        marker.id = index + 1;
    }

    markers
}

fn build_marker(
    report: DefectReport,
    severity: Severity,
    region: Region<'_>,
    side: Side,
    placement: Placement,
) -> OverlayDefect {
    OverlayDefect {
        id: 0,
        defect_type: report.defect_type.unwrap_or_else(|| "unknown".to_string()),
        severity,
        description: report.description.unwrap_or_default(),
        source: region.source,
        structural_key: region.key.to_string(),
        side,
        x_percent: placement.position.x_percent,
        y_percent: placement.position.y_percent,
        confidence: placement.confidence,
    }
}
