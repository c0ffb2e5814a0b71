//! Severity tallies for classification, built straight from raw side payloads.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde_json::Value;

use super::payload::walk_side;
use crate::domain::{DefectSource, DefectTally, TallyBucket};

/// Word-start patterns per tier-affecting bucket, checked in order.
const BUCKET_PATTERNS: &[(&str, TallyBucket)] = &[
    (r"\b(crease|fold|bend|wrinkl)", TallyBucket::Creases),
    (r"\b(scratch|scuff)", TallyBucket::Scratches),
    (r"\b(stain|dirt|discolo|water|ink|mark)", TallyBucket::Stains),
];

static BUCKET_MATCHERS: Lazy<Vec<(Regex, TallyBucket)>> = Lazy::new(|| {
    BUCKET_PATTERNS
        .iter()
        .filter_map(|(pattern, bucket)| {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .ok()
                .map(|re| (re, *bucket))
        })
        .collect()
});

/// Bucket for a surface defect, chosen from its free-text type.
///
/// Keywords must start a word, so "pink" or "shrinkage" stay print defects.
#[must_use]
pub fn surface_bucket(defect_type: &str) -> TallyBucket {
    BUCKET_MATCHERS
        .iter()
        .find(|(re, _)| re.is_match(defect_type))
        .map_or(TallyBucket::PrintDefects, |(_, bucket)| *bucket)
}

/// Adds one side's valid defects to `tally`. Non-object payloads add nothing.
pub fn tally_side(payload: &Value, tally: &mut DefectTally) {
    let Value::Object(map) = payload else {
        return;
    };

    walk_side(map, |region, report| {
        let Some(severity) = report.valid_severity() else {
            return;
        };
        let bucket = match region.source {
            DefectSource::Corner => TallyBucket::Corners,
            DefectSource::Edge => TallyBucket::Edges,
            DefectSource::Surface => surface_bucket(report.defect_type.as_deref().unwrap_or("")),
        };
        tally.record(bucket, severity);
    });
}

/// Tallies both sides of a card.
#[must_use]
pub fn tally_defects(front: &Value, back: &Value) -> DefectTally {
    let mut tally = DefectTally::default();
    tally_side(front, &mut tally);
    tally_side(back, &mut tally);
    tally
}
