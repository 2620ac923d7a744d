//! Minimum inhibitory concentration from a serial dilution series.
//!
//! Growth readings of each agent are compared against a threshold placed a
//! fixed fraction of the way from the negative to the positive control. The
//! first tested concentration whose reading falls to or below the threshold is
//! the MIC.

use std::fmt;

use bioassay_stats::descriptive;

use crate::{
    error::{AnalysisError, MalformedReason},
    table::Column,
};

/// Averages replicate columns of one agent row by row.
///
/// A row's average uses the replicates present in that row and is missing
/// when none is.
///
/// # Errors
///
/// - [`AnalysisError::InsufficientData`] if `replicates` is empty.
/// - [`AnalysisError::MalformedInput`] if the replicates differ in length.
pub fn average_replicates(name: &str, replicates: &[Column]) -> Result<Column, AnalysisError> {
    let rows = replicates
        .first()
        .ok_or_else(|| AnalysisError::InsufficientData {
            column: name.to_owned(),
            retained: 0,
        })?
        .values
        .len();
    if let Some(ragged) = replicates.iter().find(|c| c.values.len() != rows) {
        return Err(AnalysisError::malformed(
            name,
            MalformedReason::RaggedColumn {
                column: ragged.name.clone(),
                expected: rows,
                actual: ragged.values.len(),
            },
        ));
    }

    let values = (0..rows)
        .map(|row| {
            let present = replicates
                .iter()
                .filter_map(|c| c.values[row])
                .collect::<Vec<_>>();
            descriptive::mean(&present)
        })
        .collect();
    Ok(Column {
        name: name.to_owned(),
        values,
    })
}

/// Growth threshold separating inhibited from uninhibited wells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MicThreshold {
    /// Mean reading of the negative (growth) control.
    pub negative_control: f64,
    /// Mean reading of the positive (no growth) control.
    pub positive_control: f64,
    pub fraction: f64,
    /// `negative + (positive − negative) · fraction`.
    pub value: f64,
}

impl MicThreshold {
    pub const DEFAULT_FRACTION: f64 = 0.1;

    /// Places the threshold `fraction` of the way from the mean negative
    /// control reading to the mean positive control reading.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InsufficientData`] if a control has no reading.
    ///
    /// # Examples
    ///
    /// ```
    /// use bioassay_analysis::mic::MicThreshold;
    ///
    /// let threshold = MicThreshold::between(&[1.0, 1.2], &[0.1, 0.1], 0.1).unwrap();
    /// assert!((threshold.value - 1.0).abs() < 1e-12);
    /// ```
    pub fn between(negative: &[f64], positive: &[f64], fraction: f64) -> Result<Self, AnalysisError> {
        let negative_control =
            descriptive::mean(negative).ok_or_else(|| AnalysisError::InsufficientData {
                column: "negative control".to_owned(),
                retained: 0,
            })?;
        let positive_control =
            descriptive::mean(positive).ok_or_else(|| AnalysisError::InsufficientData {
                column: "positive control".to_owned(),
                retained: 0,
            })?;
        Ok(Self {
            negative_control,
            positive_control,
            fraction,
            value: negative_control + (positive_control - negative_control) * fraction,
        })
    }
}

/// Result of a threshold scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MicOutcome {
    /// The first tested concentration at or below the threshold.
    Inhibited { concentration: f64, reading: f64 },
    /// No tested concentration crossed the threshold.
    AboveRange { highest_tested: f64 },
}

impl MicOutcome {
    #[must_use]
    pub fn concentration(&self) -> Option<f64> {
        match self {
            Self::Inhibited { concentration, .. } => Some(*concentration),
            Self::AboveRange { .. } => None,
        }
    }
}

impl fmt::Display for MicOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inhibited { concentration, .. } => write!(f, "{concentration:.1}"),
            Self::AboveRange { highest_tested } => write!(f, ">{highest_tested}"),
        }
    }
}

/// Scans `readings` in tested order for the first one at or below `threshold`.
///
/// `readings[i]` is the reading at `concentrations[i]`; missing readings are
/// skipped.
///
/// # Errors
///
/// - [`AnalysisError::MalformedInput`] if the two slices differ in length.
/// - [`AnalysisError::InsufficientData`] if there are no concentrations.
///
/// # Examples
///
/// ```
/// use bioassay_analysis::mic::{MicOutcome, MicThreshold, find_mic};
///
/// let threshold = MicThreshold::between(&[1.0], &[0.0], 0.1).unwrap();
/// let concentrations = [180.0, 90.0, 45.0];
/// let readings = [Some(1.0), Some(0.95), Some(0.92)];
/// let outcome = find_mic("thyme", &concentrations, &readings, &threshold).unwrap();
/// assert_eq!(outcome, MicOutcome::AboveRange { highest_tested: 180.0 });
/// assert_eq!(outcome.to_string(), ">180");
/// ```
pub fn find_mic(
    agent: &str,
    concentrations: &[f64],
    readings: &[Option<f64>],
    threshold: &MicThreshold,
) -> Result<MicOutcome, AnalysisError> {
    if concentrations.len() != readings.len() {
        return Err(AnalysisError::malformed(
            agent,
            MalformedReason::LengthMismatch {
                expected: concentrations.len(),
                actual: readings.len(),
            },
        ));
    }
    let highest_tested = concentrations
        .iter()
        .copied()
        .reduce(f64::max)
        .ok_or_else(|| AnalysisError::InsufficientData {
            column: agent.to_owned(),
            retained: 0,
        })?;

    let crossing = concentrations
        .iter()
        .zip(readings)
        .find_map(|(&concentration, reading)| {
            reading
                .filter(|r| *r <= threshold.value)
                .map(|reading| MicOutcome::Inhibited {
                    concentration,
                    reading,
                })
        });
    let outcome = crossing.unwrap_or(MicOutcome::AboveRange { highest_tested });
    log::debug!("'{agent}': MIC {outcome} (threshold {})", threshold.value);
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONCENTRATIONS: [f64; 7] = [180.0, 90.0, 45.0, 22.5, 11.25, 5.625, 2.8125];

    #[test]
    fn test_average_replicates() {
        let averaged = average_replicates(
            "cinnamon",
            &[
                Column {
                    name: "cin_1".to_owned(),
                    values: vec![Some(0.2), None, None],
                },
                Column {
                    name: "cin_2".to_owned(),
                    values: vec![Some(0.4), Some(0.6), None],
                },
            ],
        )
        .unwrap();
        assert_eq!(averaged.name, "cinnamon");
        assert!((averaged.values[0].unwrap() - 0.3).abs() < 1e-12);
        assert_eq!(averaged.values[1], Some(0.6));
        assert_eq!(averaged.values[2], None);

        assert!(average_replicates("x", &[]).is_err());
        let ragged = [
            Column::from_values("a", [1.0]),
            Column::from_values("b", [1.0, 2.0]),
        ];
        assert!(matches!(
            average_replicates("x", &ragged),
            Err(AnalysisError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_first_crossing_in_tested_order() {
        let threshold = MicThreshold::between(&[1.1, 0.9], &[0.05, 0.05], 0.1).unwrap();
        assert!((threshold.value - 0.905).abs() < 1e-12);

        // growth recovers at low concentrations; the scan stops at the first crossing
        let readings = [0.1, 0.2, 0.5, 0.95, 1.0, 1.0, 1.0].map(Some);
        let outcome = find_mic("clove", &CONCENTRATIONS, &readings, &threshold).unwrap();
        assert_eq!(
            outcome,
            MicOutcome::Inhibited {
                concentration: 180.0,
                reading: 0.1
            }
        );
        assert_eq!(outcome.to_string(), "180.0");
    }

    #[test]
    fn test_threshold_is_inclusive_and_missing_skipped() {
        let threshold = MicThreshold::between(&[1.0], &[0.0], 0.5).unwrap();
        let readings = [None, Some(0.9), Some(0.5), Some(0.1), None, None, None];
        let outcome = find_mic("thyme", &CONCENTRATIONS, &readings, &threshold).unwrap();
        assert_eq!(outcome.concentration(), Some(45.0));
    }

    #[test]
    fn test_invalid_inputs() {
        let threshold = MicThreshold::between(&[1.0], &[0.0], 0.1).unwrap();
        assert!(matches!(
            find_mic("a", &[1.0, 2.0], &[Some(1.0)], &threshold),
            Err(AnalysisError::MalformedInput {
                reason: MalformedReason::LengthMismatch {
                    expected: 2,
                    actual: 1
                },
                ..
            })
        ));
        assert!(matches!(
            find_mic("a", &[], &[], &threshold),
            Err(AnalysisError::InsufficientData { .. })
        ));
        assert!(MicThreshold::between(&[], &[0.0], 0.1).is_err());
    }
}
