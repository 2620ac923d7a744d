/// Error returned when a dataset is too small for the requested statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("at least {required} values are required, got {actual}")]
pub struct InsufficientDataError {
    /// Minimum number of values the statistic needs.
    pub required: usize,
    /// Number of values actually supplied.
    pub actual: usize,
}

/// Descriptive statistics summarizing a sample of replicate measurements.
///
/// Dispersion is reported with the sample (Bessel-corrected, `n − 1`)
/// variance, so at least two values are required.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptiveStats {
    /// Number of values in the sample.
    pub count: usize,
    /// The minimum value in the sample.
    pub min: f64,
    /// The maximum value in the sample.
    pub max: f64,
    /// The arithmetic mean of the sample.
    pub mean: f64,
    /// The median of the sample (mean of the two middle values for even counts).
    pub median: f64,
    /// The sample variance (denominator `n − 1`).
    pub variance: f64,
    /// The sample standard deviation.
    pub std_dev: f64,
    /// The standard error of the mean (`std_dev / √n`).
    pub sem: f64,
}

impl DescriptiveStats {
    /// Minimum sample size for which dispersion is defined.
    pub const MIN_COUNT: usize = 2;

    /// Computes descriptive statistics from unsorted values.
    ///
    /// # Errors
    ///
    /// Returns [`InsufficientDataError`] if fewer than two values are supplied.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bioassay_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::new([5.0, 2.0, 4.0, 1.0, 3.0]).unwrap();
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// assert_eq!(stats.mean, 3.0);
    /// assert_eq!(stats.median, 3.0);
    /// assert!((stats.variance - 2.5).abs() < 1e-12);
    /// ```
    pub fn new<I>(values: I) -> Result<Self, InsufficientDataError>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f64::total_cmp);
        Self::from_sorted(&values)
    }

    /// Computes descriptive statistics from pre-sorted values.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[expect(clippy::cast_precision_loss)]
    pub fn from_sorted(sorted_values: &[f64]) -> Result<Self, InsufficientDataError> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let count = sorted_values.len();
        if count < Self::MIN_COUNT {
            return Err(InsufficientDataError {
                required: Self::MIN_COUNT,
                actual: count,
            });
        }

        let n = count as f64;
        let min = sorted_values[0];
        let max = sorted_values[count - 1];
        let mean = sorted_values.iter().sum::<f64>() / n;
        let median = if count % 2 == 1 {
            sorted_values[count / 2]
        } else {
            f64::midpoint(sorted_values[count / 2 - 1], sorted_values[count / 2])
        };
        // Two-pass variance; the samples handled here are small.
        let variance = sorted_values
            .iter()
            .map(|v| (v - mean).powi(2))
            .sum::<f64>()
            / (n - 1.0);
        let std_dev = variance.sqrt();
        let sem = std_dev / n.sqrt();

        Ok(Self {
            count,
            min,
            max,
            mean,
            median,
            variance,
            std_dev,
            sem,
        })
    }
}

/// Arithmetic mean, or `None` for an empty slice.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_sample_has_zero_dispersion() {
        let stats = DescriptiveStats::new([50.0, 50.0, 50.0]).unwrap();
        assert_eq!(stats.mean, 50.0);
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.sem, 0.0);
    }

    #[test]
    fn test_sem_is_std_over_sqrt_n() {
        let stats = DescriptiveStats::new([1.0, 4.0, 2.0, 8.0]).unwrap();
        assert!((stats.sem - stats.std_dev / 2.0).abs() < 1e-12);
        assert_eq!(stats.median, 3.0);
    }

    #[test]
    fn test_single_value_is_insufficient() {
        let err = DescriptiveStats::new([1.0]).unwrap_err();
        assert_eq!(err.required, 2);
        assert_eq!(err.actual, 1);
        assert!(DescriptiveStats::new([]).is_err());
    }

    #[test]
    fn test_mean_of_empty_slice() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[0.5, 0.5, 0.5]), Some(0.5));
    }
}
