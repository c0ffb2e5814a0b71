//! Typed failures raised by the aggregator and classifier.

use thiserror::Error;

use super::ScoreField;

/// Why a grading step could not produce a result.
#[derive(Debug, Error)]
pub enum GradingError {
    /// Input JSON is missing a field, has the wrong type, or the wrong pass count.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// A finite pass score outside 1-10, rejected under the reject policy.
    #[error("pass {pass} {field} score {value} is outside 1-10")]
    ScoreOutOfRange {
        pass: usize,
        field: ScoreField,
        value: f64,
    },

    /// A pass score is NaN or infinite.
    #[error("pass {pass} {field} score is not a finite number")]
    NonFiniteScore { pass: usize, field: ScoreField },

    /// The grade handed to the classifier is off the 1-10 scale.
    #[error("grade {0} is outside 1-10")]
    GradeOutOfRange(f64),
}

impl GradingError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedInput(message.into())
    }
}

impl From<serde_json::Error> for GradingError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedInput(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_pass_and_field() {
        let err = GradingError::ScoreOutOfRange {
            pass: 2,
            field: ScoreField::Corners,
            value: 11.5,
        };
        assert_eq!(err.to_string(), "pass 2 corners score 11.5 is outside 1-10");

        let err = GradingError::NonFiniteScore {
            pass: 1,
            field: ScoreField::Final,
        };
        assert_eq!(err.to_string(), "pass 1 final score is not a finite number");
    }

    #[test]
    fn test_json_errors_become_malformed_input() {
        let err: GradingError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, GradingError::MalformedInput(_)));
        assert!(GradingError::malformed("three passes expected")
            .to_string()
            .starts_with("malformed input: "));
    }
}
