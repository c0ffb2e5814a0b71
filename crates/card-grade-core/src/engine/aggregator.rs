//! Pass aggregation.
//!
//! Averages three independent passes field by field and derives an agreement
//! signal from the spread of their final scores.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::domain::{
    AggregatedResult, Consistency, GradingError, GradingPass, RangeWarning, ScoreField, MAX_SCORE,
    MIN_SCORE, PASS_COUNT,
};

/// Largest final-score variance still considered high agreement.
pub const HIGH_CONSISTENCY_MAX_VARIANCE: f64 = 0.5;

/// Largest final-score variance still considered moderate agreement.
pub const MODERATE_CONSISTENCY_MAX_VARIANCE: f64 = 1.5;

/// Variance cut points separating the consistency levels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConsistencyThresholds {
    /// Variance at or below this is `high`.
    pub high_max_variance: f64,
    /// Variance at or below this (and above `high_max_variance`) is `moderate`.
    pub moderate_max_variance: f64,
}

impl Default for ConsistencyThresholds {
    fn default() -> Self {
        Self {
            high_max_variance: HIGH_CONSISTENCY_MAX_VARIANCE,
            moderate_max_variance: MODERATE_CONSISTENCY_MAX_VARIANCE,
        }
    }
}

impl ConsistencyThresholds {
    /// Maps a variance to its consistency level.
    #[must_use]
    pub fn classify(&self, variance: f64) -> Consistency {
        if variance <= self.high_max_variance {
            Consistency::High
        } else if variance <= self.moderate_max_variance {
            Consistency::Moderate
        } else {
            Consistency::Low
        }
    }
}

/// What to do with a finite score outside the 1-10 scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangePolicy {
    /// Fail aggregation with [`GradingError::ScoreOutOfRange`].
    #[default]
    Reject,
    /// Aggregate anyway and record a [`RangeWarning`].
    Warn,
}

impl FromStr for RangePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reject" => Ok(Self::Reject),
            "warn" => Ok(Self::Warn),
            other => Err(format!("range policy must be 'reject' or 'warn', got '{other}'")),
        }
    }
}

/// Configuration for pass aggregation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AggregatorConfig {
    pub thresholds: ConsistencyThresholds,
    pub range_policy: RangePolicy,
}

/// Aggregates exactly three passes.
///
/// Means are left unrounded. `consensus_notes` are copied through in order.
///
/// # Errors
///
/// Returns [`GradingError::NonFiniteScore`] for NaN or infinite scores, and
/// [`GradingError::ScoreOutOfRange`] for out-of-scale scores under
/// [`RangePolicy::Reject`].
pub fn aggregate_passes(
    passes: &[GradingPass; PASS_COUNT],
    consensus_notes: &[String],
    config: &AggregatorConfig,
) -> Result<AggregatedResult, GradingError> {
    let range_warnings = validate_passes(passes, config.range_policy)?;

    let mean_of = |field: ScoreField| mean(&passes.map(|p| p.score(field)));
    let finals = passes.map(|p| p.final_score);
    let variance = population_variance(&finals);

    Ok(AggregatedResult {
        centering: mean_of(ScoreField::Centering),
        corners: mean_of(ScoreField::Corners),
        edges: mean_of(ScoreField::Edges),
        surface: mean_of(ScoreField::Surface),
        final_score: mean_of(ScoreField::Final),
        variance,
        consistency: config.thresholds.classify(variance),
        consensus_notes: consensus_notes.to_vec(),
        range_warnings,
    })
}

/// Parses the three passes from `{pass_1, pass_2, pass_3}` or a three-element array.
///
/// # Errors
///
/// Returns [`GradingError::MalformedInput`] if a pass is missing, a field is
/// missing or not a number, or the array does not hold exactly three passes.
pub fn parse_passes(value: &Value) -> Result<[GradingPass; PASS_COUNT], GradingError> {
    let raw: Vec<&Value> = match value {
        Value::Array(items) => {
            if items.len() != PASS_COUNT {
                return Err(GradingError::malformed(format!(
                    "expected {PASS_COUNT} passes, got {}",
                    items.len()
                )));
            }
            items.iter().collect()
        }
        Value::Object(map) => (1..=PASS_COUNT)
            .map(|n| {
                let key = format!("pass_{n}");
                map.get(&key)
                    .ok_or_else(|| GradingError::malformed(format!("missing {key}")))
            })
            .collect::<Result<_, _>>()?,
        Value::Null => return Err(GradingError::malformed("passes are missing")),
        _ => return Err(GradingError::malformed("passes must be an object or array")),
    };

    let mut parsed = Vec::with_capacity(PASS_COUNT);
    for (index, item) in raw.into_iter().enumerate() {
        let pass = GradingPass::deserialize(item)
            .map_err(|e| GradingError::malformed(format!("pass {}: {e}", index + 1)))?;
        parsed.push(pass);
    }

    parsed
        .try_into()
        .map_err(|_| GradingError::malformed("pass count changed during parsing"))
}

/// Population variance, `sum((x - mean)^2) / n`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn population_variance(values: &[f64; PASS_COUNT]) -> f64 {
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / PASS_COUNT as f64
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: &[f64; PASS_COUNT]) -> f64 {
    values.iter().sum::<f64>() / PASS_COUNT as f64
}

fn validate_passes(
    passes: &[GradingPass; PASS_COUNT],
    policy: RangePolicy,
) -> Result<Vec<RangeWarning>, GradingError> {
    let mut warnings = Vec::new();

    for (index, pass) in passes.iter().enumerate() {
        let number = index + 1;
        for field in ScoreField::ALL {
            let value = pass.score(field);
            if !value.is_finite() {
                return Err(GradingError::NonFiniteScore {
                    pass: number,
                    field,
                });
            }
            if (MIN_SCORE..=MAX_SCORE).contains(&value) {
                continue;
            }
            match policy {
                RangePolicy::Reject => {
                    return Err(GradingError::ScoreOutOfRange {
                        pass: number,
                        field,
                        value,
                    });
                }
                RangePolicy::Warn => {
                    warn!("pass {number} {field} score {value} is outside {MIN_SCORE}-{MAX_SCORE}");
                    warnings.push(RangeWarning {
                        pass: number,
                        field,
                        value,
                    });
                }
            }
        }
    }

    Ok(warnings)
}
