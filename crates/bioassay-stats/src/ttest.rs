use crate::{
    descriptive::{DescriptiveStats, InsufficientDataError},
    special::student_t_two_sided_p,
};

/// Variance assumption of a two-sample t-test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VarianceAssumption {
    /// Student's test with pooled variance.
    #[default]
    Equal,
    /// Welch's test with Welch–Satterthwaite degrees of freedom.
    Unequal,
}

/// Error returned by [`TwoSampleTTest::new`].
#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum TTestError {
    #[display("{_0}")]
    InsufficientData(InsufficientDataError),
    #[display("both samples have zero variance")]
    ZeroVariance,
}

/// Two-sided, two-sample t-test on independent samples.
///
/// # Examples
///
/// ```
/// use bioassay_stats::ttest::{TwoSampleTTest, VarianceAssumption};
///
/// let a = [6.815, 6.835, 4.653];
/// let b = [4.226, 3.057, 2.097];
/// let test = TwoSampleTTest::new(&a, &b, VarianceAssumption::Equal).unwrap();
/// assert_eq!(test.degrees_of_freedom, 4.0);
/// assert!(test.statistic > 0.0);
/// assert!(test.p_value > 0.0 && test.p_value < 0.1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoSampleTTest {
    /// t statistic (`mean(first) − mean(second)` over its standard error).
    pub statistic: f64,
    /// Degrees of freedom of the reference t-distribution.
    pub degrees_of_freedom: f64,
    /// Two-sided p-value.
    pub p_value: f64,
    /// Difference of sample means, `mean(first) − mean(second)`.
    pub mean_difference: f64,
}

impl TwoSampleTTest {
    /// Runs the test on `first` against `second`.
    ///
    /// # Errors
    ///
    /// - [`TTestError::InsufficientData`] if a sample has fewer than two values.
    /// - [`TTestError::ZeroVariance`] if the standard error of the difference is zero.
    #[expect(clippy::cast_precision_loss)]
    pub fn new(
        first: &[f64],
        second: &[f64],
        assumption: VarianceAssumption,
    ) -> Result<Self, TTestError> {
        let a = DescriptiveStats::new(first.iter().copied())?;
        let b = DescriptiveStats::new(second.iter().copied())?;
        let (na, nb) = (a.count as f64, b.count as f64);

        let (std_err, degrees_of_freedom) = match assumption {
            VarianceAssumption::Equal => {
                let df = na + nb - 2.0;
                let pooled = ((na - 1.0) * a.variance + (nb - 1.0) * b.variance) / df;
                ((pooled * (1.0 / na + 1.0 / nb)).sqrt(), df)
            }
            VarianceAssumption::Unequal => {
                let va = a.variance / na;
                let vb = b.variance / nb;
                let df = (va + vb).powi(2) / (va.powi(2) / (na - 1.0) + vb.powi(2) / (nb - 1.0));
                ((va + vb).sqrt(), df)
            }
        };

        if std_err <= 0.0 || !std_err.is_finite() {
            return Err(TTestError::ZeroVariance);
        }

        let mean_difference = a.mean - b.mean;
        let statistic = mean_difference / std_err;
        Ok(Self {
            statistic,
            degrees_of_freedom,
            p_value: student_t_two_sided_p(statistic, degrees_of_freedom),
            mean_difference,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_hand_computed() {
        // means 2 and 5, variances 1 and 1, pooled 1, se = sqrt(2/3)
        let test =
            TwoSampleTTest::new(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], VarianceAssumption::Equal)
                .unwrap();
        let expected = -3.0 / (2.0_f64 / 3.0).sqrt();
        assert!((test.statistic - expected).abs() < 1e-12);
        assert_eq!(test.degrees_of_freedom, 4.0);
        // two-sided tail of t(4) at 3.674..., integrated numerically
        assert!((test.p_value - 0.021_311_641_128_767).abs() < 1e-9);
    }

    #[test]
    fn test_welch_matches_student_for_balanced_equal_variance() {
        let a = [1.0, 2.0, 3.0];
        let b = [4.0, 5.0, 6.0];
        let student = TwoSampleTTest::new(&a, &b, VarianceAssumption::Equal).unwrap();
        let welch = TwoSampleTTest::new(&a, &b, VarianceAssumption::Unequal).unwrap();
        assert!((student.statistic - welch.statistic).abs() < 1e-12);
        assert!((welch.degrees_of_freedom - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_identical_constant_samples() {
        let err = TwoSampleTTest::new(&[0.0; 3], &[0.0; 3], VarianceAssumption::Equal).unwrap_err();
        assert_eq!(err, TTestError::ZeroVariance);
    }

    #[test]
    fn test_single_value_sample() {
        let err = TwoSampleTTest::new(&[1.0], &[1.0, 2.0], VarianceAssumption::Equal).unwrap_err();
        assert!(matches!(err, TTestError::InsufficientData(_)));
    }
}
