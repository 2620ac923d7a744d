//! Error taxonomy shared by every analysis operation.
//!
//! Each precondition violation is a distinct variant; no operation silently
//! turns a violation into a missing or NaN value.

use bioassay_stats::descriptive::InsufficientDataError;

/// Failure of an analysis operation on a single column or group.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum AnalysisError {
    #[display("unknown column '{column}'")]
    UnknownColumn { column: String },
    #[display("unknown group '{group}'")]
    UnknownGroup { group: String },
    #[display("mean of control column '{column}' is zero")]
    DivisionByZero { column: String },
    #[display("'{column}' has {retained} usable value(s), which is not enough")]
    InsufficientData { column: String, retained: usize },
    #[display("group '{group}' has no subjects at risk")]
    EmptySample { group: String },
    #[display("malformed input in '{context}': {reason}")]
    MalformedInput {
        context: String,
        reason: MalformedReason,
    },
}

impl AnalysisError {
    pub(crate) fn malformed(context: impl Into<String>, reason: MalformedReason) -> Self {
        Self::MalformedInput {
            context: context.into(),
            reason,
        }
    }

    pub(crate) fn insufficient(column: impl Into<String>, err: InsufficientDataError) -> Self {
        Self::InsufficientData {
            column: column.into(),
            retained: err.actual,
        }
    }
}

/// The concrete shape violation behind [`AnalysisError::MalformedInput`].
#[derive(Debug, Clone, PartialEq, derive_more::Display)]
pub enum MalformedReason {
    #[display("{dead} deaths exceed cohort of {total} at time {time}")]
    DeadExceedsTotal { time: f64, dead: u32, total: u32 },
    #[display("{dead} cumulative deaths exceed cohort of {total} at time {time}")]
    CumulativeDeadExceedsTotal { time: f64, dead: u32, total: u32 },
    #[display("cumulative death count decreases at time {time} ({previous} -> {dead})")]
    DecreasingCumulativeCount { time: f64, previous: u32, dead: u32 },
    #[display("time {time} does not follow {previous}")]
    NonIncreasingTime { previous: f64, time: f64 },
    #[display("time {time} is negative or not finite")]
    InvalidTime { time: f64 },
    #[display("cohort size changes from {expected} to {actual} at time {time}")]
    InconsistentTotal {
        time: f64,
        expected: u32,
        actual: u32,
    },
    #[display("series has no time bins")]
    EmptySeries,
    #[display("column '{column}' has {actual} rows, expected {expected}")]
    RaggedColumn {
        column: String,
        expected: usize,
        actual: usize,
    },
    #[display("column '{column}' appears more than once")]
    DuplicateColumn { column: String },
    #[display("row {row} is out of range (table has {rows} rows)")]
    RowOutOfRange { row: usize, rows: usize },
    #[display("column '{column}' row {row} is not a finite number")]
    NonFiniteValue { column: String, row: usize },
    #[display("{expected} concentrations but {actual} readings")]
    LengthMismatch { expected: usize, actual: usize },
    #[display("invalid synthetic parameters: {detail}")]
    InvalidSyntheticParameters { detail: String },
    #[display("confidence level {level} is not inside (0, 1)")]
    InvalidConfidenceLevel { level: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offender() {
        let err = AnalysisError::malformed(
            "Control/replicate 1",
            MalformedReason::DeadExceedsTotal {
                time: 24.0,
                dead: 70,
                total: 60,
            },
        );
        assert_eq!(
            err.to_string(),
            "malformed input in 'Control/replicate 1': 70 deaths exceed cohort of 60 at time 24"
        );

        let err = AnalysisError::DivisionByZero {
            column: "7".to_owned(),
        };
        assert_eq!(err.to_string(), "mean of control column '7' is zero");
    }
}
