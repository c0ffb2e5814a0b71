//! Marketplace condition classification.
//!
//! Rules are checked worst tier first and the first match wins. This is a
//! precedence cascade, not a score: a card matching both a `Very Good` and an
//! `Excellent` rule is `Very Good`.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::{ConditionTier, DefectTally, GradingError, MAX_SCORE, MIN_SCORE};

/// Grades below this are `Poor`.
pub const POOR_GRADE_CEILING: f64 = 4.0;

/// Grades below this are at best `Very Good`.
pub const VERY_GOOD_GRADE_CEILING: f64 = 7.0;

/// Grades below this are at best `Excellent`.
pub const EXCELLENT_GRADE_CEILING: f64 = 9.0;

/// One cascade step.
#[derive(Clone, Copy)]
pub struct TierRule {
    pub tier: ConditionTier,
    pub matches: fn(f64, &DefectTally) -> bool,
}

/// Cascade, worst first. Cards matching none are `Near Mint or Better`.
pub const TIER_RULES: [TierRule; 3] = [
    TierRule {
        tier: ConditionTier::Poor,
        matches: is_poor,
    },
    TierRule {
        tier: ConditionTier::VeryGood,
        matches: is_very_good,
    },
    TierRule {
        tier: ConditionTier::Excellent,
        matches: is_excellent,
    },
];

fn is_poor(grade: f64, t: &DefectTally) -> bool {
    t.creases.heavy >= 2
        || t.corners.heavy >= 1
        || t.edges.heavy >= 1
        || t.scratches.heavy >= 1
        || t.stains.heavy >= 1
        || grade < POOR_GRADE_CEILING
}

fn is_very_good(grade: f64, t: &DefectTally) -> bool {
    t.creases.moderate >= 2
        || t.creases.heavy >= 1
        // all four corners
        || t.corners.moderate >= 4
        || t.edges.moderate >= 2
        || t.scratches.moderate >= 2
        || t.stains.moderate >= 1
        || grade < VERY_GOOD_GRADE_CEILING
}

fn is_excellent(grade: f64, t: &DefectTally) -> bool {
    t.creases.minor >= 1
        || t.corners.moderate >= 1
        || t.edges.moderate >= 1
        || t.scratches.moderate >= 1
        || t.stains.minor >= 1
        || t.corners.minor >= 2
        || grade < EXCELLENT_GRADE_CEILING
}

/// Classifies a card.
///
/// A missing grade means the card is altered or unauthenticated and is always
/// `Poor`, checked before anything else. A missing tally is treated as
/// defect-free and yields `Near Mint or Better`.
///
/// # Errors
///
/// Returns [`GradingError::GradeOutOfRange`] if the grade is non-finite or
/// outside 1-10.
pub fn classify_condition(
    grade: Option<f64>,
    tally: Option<&DefectTally>,
) -> Result<ConditionTier, GradingError> {
    let Some(grade) = grade else {
        return Ok(ConditionTier::Poor);
    };
    if !grade.is_finite() || !(MIN_SCORE..=MAX_SCORE).contains(&grade) {
        return Err(GradingError::GradeOutOfRange(grade));
    }
    let Some(tally) = tally else {
        return Ok(ConditionTier::NearMintOrBetter);
    };

    Ok(TIER_RULES
        .iter()
        .find(|rule| (rule.matches)(grade, tally))
        .map_or(ConditionTier::NearMintOrBetter, |rule| rule.tier))
}

/// Classifies from JSON values. `null` means absent for both arguments.
///
/// # Errors
///
/// Returns [`GradingError::MalformedInput`] if the grade is not a number or
/// the tally is not a tally object, and [`GradingError::GradeOutOfRange`] as
/// for [`classify_condition`].
pub fn classify_json(grade: &Value, tally: &Value) -> Result<ConditionTier, GradingError> {
    let grade = match grade {
        Value::Null => None,
        Value::Number(n) => n.as_f64(),
        other => {
            return Err(GradingError::malformed(format!(
                "grade must be a number or null, got {other}"
            )))
        }
    };
    let tally = match tally {
        Value::Null => None,
        other => Some(DefectTally::deserialize(other)?),
    };
    classify_condition(grade, tally.as_ref())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::SeverityCounts;
    use serde_json::json;

    fn counts(minor: u32, moderate: u32, heavy: u32) -> SeverityCounts {
        SeverityCounts {
            minor,
            moderate,
            heavy,
        }
    }

    fn classify(grade: f64, tally: &DefectTally) -> ConditionTier {
        classify_condition(Some(grade), Some(tally)).unwrap()
    }

    #[test]
    fn test_missing_grade_is_poor_for_any_tally() {
        let clean = DefectTally::default();
        assert_eq!(classify_condition(None, Some(&clean)).unwrap(), ConditionTier::Poor);
        assert_eq!(classify_condition(None, None).unwrap(), ConditionTier::Poor);
    }

    #[test]
    fn test_missing_tally_is_near_mint() {
        assert_eq!(
            classify_condition(Some(2.0), None).unwrap(),
            ConditionTier::NearMintOrBetter
        );
    }

    #[test]
    fn test_clean_high_grade_is_near_mint() {
        assert_eq!(classify(9.5, &DefectTally::default()), ConditionTier::NearMintOrBetter);
        assert_eq!(classify(9.0, &DefectTally::default()), ConditionTier::NearMintOrBetter);
    }

    #[test]
    fn test_grade_boundaries() {
        let clean = DefectTally::default();
        assert_eq!(classify(3.99, &clean), ConditionTier::Poor);
        assert_eq!(classify(4.0, &clean), ConditionTier::VeryGood);
        assert_eq!(classify(6.99, &clean), ConditionTier::VeryGood);
        assert_eq!(classify(7.0, &clean), ConditionTier::Excellent);
        assert_eq!(classify(8.99, &clean), ConditionTier::Excellent);
    }

    #[test]
    fn test_two_moderate_creases_is_very_good() {
        let tally = DefectTally {
            creases: counts(0, 2, 0),
            ..DefectTally::default()
        };
        assert_eq!(classify(5.0, &tally), ConditionTier::VeryGood);
        assert_eq!(classify(9.8, &tally), ConditionTier::VeryGood);
    }

    #[test]
    fn test_poor_rules() {
        let cases = [
            DefectTally {
                creases: counts(0, 0, 2),
                ..DefectTally::default()
            },
            DefectTally {
                corners: counts(0, 0, 1),
                ..DefectTally::default()
            },
            DefectTally {
                edges: counts(0, 0, 1),
                ..DefectTally::default()
            },
            DefectTally {
                scratches: counts(0, 0, 1),
                ..DefectTally::default()
            },
            DefectTally {
                stains: counts(0, 0, 1),
                ..DefectTally::default()
            },
        ];
        for tally in cases {
            assert_eq!(classify(10.0, &tally), ConditionTier::Poor, "{tally:?}");
        }
    }

    #[test]
    fn test_single_heavy_crease_is_very_good() {
        let tally = DefectTally {
            creases: counts(0, 0, 1),
            ..DefectTally::default()
        };
        assert_eq!(classify(9.5, &tally), ConditionTier::VeryGood);
    }

    #[test]
    fn test_corner_counts() {
        let four = DefectTally {
            corners: counts(0, 4, 0),
            ..DefectTally::default()
        };
        let three = DefectTally {
            corners: counts(0, 3, 0),
            ..DefectTally::default()
        };
        let two_minor = DefectTally {
            corners: counts(2, 0, 0),
            ..DefectTally::default()
        };
        let one_minor = DefectTally {
            corners: counts(1, 0, 0),
            ..DefectTally::default()
        };
        assert_eq!(classify(9.5, &four), ConditionTier::VeryGood);
        assert_eq!(classify(9.5, &three), ConditionTier::Excellent);
        assert_eq!(classify(9.5, &two_minor), ConditionTier::Excellent);
        assert_eq!(classify(9.5, &one_minor), ConditionTier::NearMintOrBetter);
    }

    #[test]
    fn test_excellent_rules() {
        let cases = [
            DefectTally {
                creases: counts(1, 0, 0),
                ..DefectTally::default()
            },
            DefectTally {
                edges: counts(0, 1, 0),
                ..DefectTally::default()
            },
            DefectTally {
                scratches: counts(0, 1, 0),
                ..DefectTally::default()
            },
            DefectTally {
                stains: counts(1, 0, 0),
                ..DefectTally::default()
            },
        ];
        for tally in cases {
            assert_eq!(classify(9.5, &tally), ConditionTier::Excellent, "{tally:?}");
        }
    }

    #[test]
    fn test_print_defects_do_not_downgrade() {
        let tally = DefectTally {
            print_defects: counts(3, 3, 3),
            ..DefectTally::default()
        };
        assert_eq!(classify(9.5, &tally), ConditionTier::NearMintOrBetter);
    }

    #[test]
    fn test_worse_rule_wins() {
        let tally = DefectTally {
            creases: counts(1, 0, 0),
            stains: counts(0, 1, 0),
            edges: counts(0, 0, 1),
            ..DefectTally::default()
        };
        assert_eq!(classify(9.5, &tally), ConditionTier::Poor);
    }

    #[test]
    fn test_grade_out_of_range() {
        let clean = DefectTally::default();
        assert!(matches!(
            classify_condition(Some(0.5), Some(&clean)),
            Err(GradingError::GradeOutOfRange(_))
        ));
        assert!(matches!(
            classify_condition(Some(f64::NAN), None),
            Err(GradingError::GradeOutOfRange(_))
        ));
    }

    #[test]
    fn test_classify_json() {
        let tally = json!({"scratches": {"moderate": 2}});
        assert_eq!(classify_json(&json!(9.5), &tally).unwrap(), ConditionTier::VeryGood);
        assert_eq!(classify_json(&Value::Null, &tally).unwrap(), ConditionTier::Poor);
        assert_eq!(
            classify_json(&json!(9.5), &Value::Null).unwrap(),
            ConditionTier::NearMintOrBetter
        );
    }

    #[test]
    fn test_classify_json_rejects_malformed() {
        assert!(matches!(
            classify_json(&json!("nine"), &Value::Null),
            Err(GradingError::MalformedInput(_))
        ));
        assert!(matches!(
            classify_json(&json!(9.0), &json!({"creases": {"minor": "two"}})),
            Err(GradingError::MalformedInput(_))
        ));
        assert!(matches!(
            classify_json(&json!(9.0), &json!([1, 2])),
            Err(GradingError::MalformedInput(_))
        ));
    }
}
