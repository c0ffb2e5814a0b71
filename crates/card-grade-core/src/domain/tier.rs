//! Marketplace condition tiers and the defect tallies they are derived from.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Severity;

/// Marketplace condition category, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConditionTier {
    #[serde(rename = "Near Mint or Better")]
    NearMintOrBetter,
    #[serde(rename = "Excellent")]
    Excellent,
    #[serde(rename = "Very Good")]
    VeryGood,
    #[serde(rename = "Poor")]
    Poor,
}

impl ConditionTier {
    /// All tiers, best to worst.
    pub const ALL: [Self; 4] = [
        Self::NearMintOrBetter,
        Self::Excellent,
        Self::VeryGood,
        Self::Poor,
    ];

    /// Marketplace label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NearMintOrBetter => "Near Mint or Better",
            Self::Excellent => "Excellent",
            Self::VeryGood => "Very Good",
            Self::Poor => "Poor",
        }
    }
}

impl fmt::Display for ConditionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Defect counts by severity for one bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityCounts {
    pub minor: u32,
    pub moderate: u32,
    pub heavy: u32,
}

impl SeverityCounts {
    /// Increments the counter for `severity`.
    pub fn record(&mut self, severity: Severity) {
        let slot = match severity {
            Severity::Minor => &mut self.minor,
            Severity::Moderate => &mut self.moderate,
            Severity::Heavy => &mut self.heavy,
        };
        *slot = slot.saturating_add(1);
    }

    /// Sum of all severities, saturating at `u32::MAX`.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.minor.saturating_add(self.moderate).saturating_add(self.heavy)
    }
}

/// Category a defect is counted under for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TallyBucket {
    Corners,
    Edges,
    Creases,
    Scratches,
    Stains,
    PrintDefects,
}

/// Severity counts across both sides, per bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefectTally {
    pub corners: SeverityCounts,
    pub edges: SeverityCounts,
    pub creases: SeverityCounts,
    pub scratches: SeverityCounts,
    pub stains: SeverityCounts,
    /// Catch-all for surface defects no other bucket claims.
    pub print_defects: SeverityCounts,
}

impl DefectTally {
    #[must_use]
    pub const fn bucket(&self, bucket: TallyBucket) -> &SeverityCounts {
        match bucket {
            TallyBucket::Corners => &self.corners,
            TallyBucket::Edges => &self.edges,
            TallyBucket::Creases => &self.creases,
            TallyBucket::Scratches => &self.scratches,
            TallyBucket::Stains => &self.stains,
            TallyBucket::PrintDefects => &self.print_defects,
        }
    }

    pub fn bucket_mut(&mut self, bucket: TallyBucket) -> &mut SeverityCounts {
        match bucket {
            TallyBucket::Corners => &mut self.corners,
            TallyBucket::Edges => &mut self.edges,
            TallyBucket::Creases => &mut self.creases,
            TallyBucket::Scratches => &mut self.scratches,
            TallyBucket::Stains => &mut self.stains,
            TallyBucket::PrintDefects => &mut self.print_defects,
        }
    }

    /// Records one defect.
    pub fn record(&mut self, bucket: TallyBucket, severity: Severity) {
        self.bucket_mut(bucket).record(severity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_order_best_first() {
        assert!(ConditionTier::NearMintOrBetter < ConditionTier::Excellent);
        assert!(ConditionTier::VeryGood < ConditionTier::Poor);
    }

    #[test]
    fn test_tier_serializes_label() {
        let json = serde_json::to_string(&ConditionTier::NearMintOrBetter).unwrap_or_default();
        assert_eq!(json, "\"Near Mint or Better\"");
        for tier in ConditionTier::ALL {
            assert_eq!(
                serde_json::to_value(tier).unwrap_or_default(),
                serde_json::Value::from(tier.label())
            );
        }
    }

    #[test]
    fn test_partial_tally_defaults_missing_buckets() {
        let tally: DefectTally =
            serde_json::from_str(r#"{"creases": {"moderate": 2}}"#).unwrap_or_default();
        assert_eq!(tally.creases.moderate, 2);
        assert_eq!(tally.creases.heavy, 0);
        assert_eq!(tally.corners, SeverityCounts::default());
    }

    #[test]
    fn test_record_counts() {
        let mut tally = DefectTally::default();
        tally.record(TallyBucket::Stains, Severity::Minor);
        tally.record(TallyBucket::Stains, Severity::Heavy);
        assert_eq!(tally.bucket(TallyBucket::Stains).total(), 2);
        assert_eq!(tally.stains.heavy, 1);
    }

    #[test]
    fn test_total_saturates_on_huge_counts() {
        let counts: SeverityCounts =
            serde_json::from_value(serde_json::json!({"minor": u32::MAX, "heavy": 5}))
                .unwrap_or_default();
        assert_eq!(counts.total(), u32::MAX);

        let mut full = counts;
        full.record(Severity::Minor);
        assert_eq!(full.minor, u32::MAX);
    }
}
