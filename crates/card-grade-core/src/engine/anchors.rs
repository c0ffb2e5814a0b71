//! Fixed positions for structural regions and free-text location hints.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::{Corner, Edge, Position};

/// Marker position for a defect reported on `corner`.
#[must_use]
pub const fn corner_anchor(corner: Corner) -> Position {
    match corner {
        Corner::TopLeft => Position::new(8.0, 8.0),
        Corner::TopRight => Position::new(92.0, 8.0),
        Corner::BottomLeft => Position::new(8.0, 92.0),
        Corner::BottomRight => Position::new(92.0, 92.0),
    }
}

/// Marker position for a defect reported on `edge`: the midpoint of that side.
#[must_use]
pub const fn edge_anchor(edge: Edge) -> Position {
    match edge {
        Edge::Top => Position::new(50.0, 4.0),
        Edge::Bottom => Position::new(50.0, 96.0),
        Edge::Left => Position::new(4.0, 50.0),
        Edge::Right => Position::new(96.0, 50.0),
    }
}

/// Location keyword patterns, in match order.
///
/// Compound directions must stay ahead of the single directions they contain,
/// otherwise "upper-left" would resolve as plain "upper".
const LOCATION_PATTERNS: &[(&str, Position)] = &[
    (r"(?i)\b(upper|top)[\s_-]*left\b", Position::new(25.0, 25.0)),
    (r"(?i)\b(upper|top)[\s_-]*right\b", Position::new(75.0, 25.0)),
    (r"(?i)\b(lower|bottom)[\s_-]*left\b", Position::new(25.0, 75.0)),
    (r"(?i)\b(lower|bottom)[\s_-]*right\b", Position::new(75.0, 75.0)),
    (r"(?i)\b(upper|top)\b", Position::new(50.0, 25.0)),
    (r"(?i)\b(lower|bottom)\b", Position::new(50.0, 75.0)),
    (r"(?i)\bleft\b", Position::new(25.0, 50.0)),
    (r"(?i)\bright\b", Position::new(75.0, 50.0)),
    (r"(?i)\b(center|centre|middle|central)\b", Position::new(50.0, 50.0)),
];

static LOCATION_MATCHERS: Lazy<Vec<(Regex, Position)>> = Lazy::new(|| {
    LOCATION_PATTERNS
        .iter()
        .filter_map(|(pattern, position)| Regex::new(pattern).ok().map(|re| (re, *position)))
        .collect()
});

/// Resolves a free-text location hint to the first matching anchor.
#[must_use]
pub fn locate_from_text(location: &str) -> Option<Position> {
    LOCATION_MATCHERS
        .iter()
        .find(|(re, _)| re.is_match(location))
        .map(|(_, position)| *position)
}
