//! Two-sample comparisons of raw replicate measurements per condition.

use bioassay_stats::{
    descriptive::DescriptiveStats,
    ttest::{TTestError, TwoSampleTTest, VarianceAssumption},
};
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Replicates of one condition measured under two settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionSamples {
    pub condition: String,
    pub first: Vec<f64>,
    pub second: Vec<f64>,
}

/// Mean and sample standard deviation of raw replicates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanStd {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
}

impl MeanStd {
    /// Summarizes `values` without any outlier exclusion.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InsufficientData`] for fewer than two values.
    pub fn new(column: &str, values: &[f64]) -> Result<Self, AnalysisError> {
        let stats = DescriptiveStats::new(values.iter().copied())
            .map_err(|e| AnalysisError::insufficient(column, e))?;
        Ok(Self {
            count: stats.count,
            mean: stats.mean,
            std_dev: stats.std_dev,
        })
    }
}

/// Per-sample summaries and t-test of one condition.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionComparison {
    pub condition: String,
    pub first: MeanStd,
    pub second: MeanStd,
    pub test: TwoSampleTTest,
}

/// Compares the two samples of a condition with a two-sided t-test.
///
/// # Errors
///
/// - [`AnalysisError::InsufficientData`] if a sample has fewer than two values.
/// - [`AnalysisError::DivisionByZero`] if both samples have zero variance.
///
/// # Examples
///
/// ```
/// use bioassay_analysis::comparison::{ConditionSamples, compare_condition};
/// use bioassay_stats::ttest::VarianceAssumption;
///
/// let samples = ConditionSamples {
///     condition: "clove".to_owned(),
///     first: vec![14.0, 15.0, 16.0],
///     second: vec![10.0, 11.0, 12.0],
/// };
/// let comparison = compare_condition(&samples, VarianceAssumption::Equal).unwrap();
/// assert_eq!(comparison.first.mean, 15.0);
/// assert!(comparison.test.p_value < 0.05);
/// ```
pub fn compare_condition(
    samples: &ConditionSamples,
    assumption: VarianceAssumption,
) -> Result<ConditionComparison, AnalysisError> {
    let name = &samples.condition;
    let first = MeanStd::new(name, &samples.first)?;
    let second = MeanStd::new(name, &samples.second)?;
    let test = TwoSampleTTest::new(&samples.first, &samples.second, assumption).map_err(|e| {
        match e {
            TTestError::InsufficientData(e) => AnalysisError::insufficient(name, e),
            TTestError::ZeroVariance => AnalysisError::DivisionByZero {
                column: name.clone(),
            },
        }
    })?;
    Ok(ConditionComparison {
        condition: name.clone(),
        first,
        second,
        test,
    })
}

/// Compares every condition independently, in input order.
#[must_use]
pub fn compare_conditions(
    conditions: &[ConditionSamples],
    assumption: VarianceAssumption,
) -> Vec<Result<ConditionComparison, AnalysisError>> {
    conditions
        .iter()
        .map(|samples| {
            let result = compare_condition(samples, assumption);
            if let Err(err) = &result {
                log::warn!("skipping comparison of '{}': {err}", samples.condition);
            }
            result
        })
        .collect()
}
