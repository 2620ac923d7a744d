//! JSON file formats read and written by the CLI.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

pub(crate) mod config;
pub(crate) mod report;

/// Envelope of every JSON report.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct Report<T> {
    /// Timestamp when the report was generated (ISO 8601 format)
    pub generated_at: DateTime<Utc>,
    /// Version of the tool that produced the report
    pub tool_version: &'static str,
    pub report: T,
}

impl<T> Report<T> {
    pub fn new(report: T) -> Self {
        Self {
            generated_at: Utc::now(),
            tool_version: env!("CARGO_PKG_VERSION"),
            report,
        }
    }
}

/// Per-entry result: either the computed value or the error message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Outcome<T> {
    Ok(T),
    Error(String),
}

impl<T, E> From<Result<T, E>> for Outcome<T>
where
    E: fmt::Display,
{
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Ok(value),
            Err(err) => Self::Error(err.to_string()),
        }
    }
}

/// A named entry of a report (condition, group or agent).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct Named<T> {
    pub name: String,
    #[serde(flatten)]
    pub outcome: Outcome<T>,
}

impl<T> Named<T> {
    pub fn new<E>(name: impl Into<String>, result: Result<T, E>) -> Self
    where
        E: fmt::Display,
    {
        Self {
            name: name.into(),
            outcome: result.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_outcome_serialization() {
        let ok = Named::new("a", Ok::<_, String>(1.5));
        let err = Named::new("b", Err::<f64, _>("broken".to_owned()));
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            serde_json::json!({"name": "a", "ok": 1.5})
        );
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            serde_json::json!({"name": "b", "error": "broken"})
        );
    }

    #[test]
    fn test_envelope_carries_version() {
        let value = serde_json::to_value(Report::new(42)).unwrap();
        assert_eq!(value["tool_version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(value["report"], 42);
        assert!(value["generated_at"].is_string());
    }
}
