//! Traversal of raw per-side defect payloads.
//!
//! A side payload looks like `{corners: {top_left: [...]}, edges: {...}, surface: [...]}`.
//! Vision output is loosely shaped, so each region may also be an object with
//! a `defects` array, and the surface bucket may be keyed by sub-region.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::{Corner, DefectReport, DefectSource, Edge};

/// Key reported for every surface defect.
pub const SURFACE_KEY: &str = "surface";

/// Where a report was found within a side payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region<'a> {
    pub source: DefectSource,
    pub key: &'a str,
}

/// Visits every defect report of a side in discovery order:
/// corners, then edges, then surface.
///
/// Known corner and edge keys come first in their fixed order; any other keys
/// follow in input order. Entries that are not defect objects are skipped.
pub fn walk_side<'a>(payload: &'a Map<String, Value>, mut visit: impl FnMut(Region<'a>, DefectReport)) {
    if let Some(Value::Object(corners)) = payload.get("corners") {
        let known: Vec<&str> = Corner::ALL.iter().map(|c| c.key()).collect();
        walk_structural(corners, DefectSource::Corner, &known, &mut visit);
    }

    if let Some(Value::Object(edges)) = payload.get("edges") {
        let known: Vec<&str> = Edge::ALL.iter().map(|e| e.key()).collect();
        walk_structural(edges, DefectSource::Edge, &known, &mut visit);
    }

    if let Some(surface) = payload.get("surface") {
        let region = Region {
            source: DefectSource::Surface,
            key: SURFACE_KEY,
        };
        match surface {
            Value::Array(_) => {
                for report in region_reports(surface) {
                    visit(region, report);
                }
            }
            Value::Object(map) if map.get("defects").is_some_and(Value::is_array) => {
                for report in region_reports(surface) {
                    visit(region, report);
                }
            }
            Value::Object(map) => {
                for value in map.values().filter(|v| v.is_array()) {
                    for report in region_reports(value) {
                        visit(region, report);
                    }
                }
            }
            _ => debug!("surface bucket is neither an array nor an object"),
        }
    }
}

fn walk_structural<'a>(
    group: &'a Map<String, Value>,
    source: DefectSource,
    known: &[&str],
    visit: &mut impl FnMut(Region<'a>, DefectReport),
) {
    for &key in known {
        if let Some((key, value)) = group.get_key_value(key) {
            for report in region_reports(value) {
                visit(Region { source, key: key.as_str() }, report);
            }
        }
    }

    for (key, value) in group.iter().filter(|(k, _)| !known.contains(&k.as_str())) {
        debug!("unrecognized {source:?} region '{key}'");
        for report in region_reports(value) {
            visit(Region { source, key: key.as_str() }, report);
        }
    }
}

/// Defect reports held by one region value.
fn region_reports(value: &Value) -> Vec<DefectReport> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("defects") {
            Some(Value::Array(items)) => items,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    items
        .iter()
        .filter_map(|item| match DefectReport::deserialize(item) {
            Ok(report) => Some(report),
            Err(e) => {
                debug!("skipping unreadable defect entry: {e}");
                None
            }
        })
        .collect()
}
