use crate::percentiles::Percentiles;

/// Tukey fences derived from the interquartile range of a dataset.
///
/// Values strictly outside `[Q1 − k·IQR, Q3 + k·IQR]` are outliers; values
/// lying exactly on a fence are kept.
///
/// # Examples
///
/// ```
/// use bioassay_stats::fences::TukeyFences;
///
/// let fences = TukeyFences::from_values(&[1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
/// assert_eq!(fences.q1, 2.0);
/// assert_eq!(fences.q3, 4.0);
/// assert!(fences.contains(7.0));
/// assert!(!fences.contains(100.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TukeyFences {
    /// First quartile (25th percentile).
    pub q1: f64,
    /// Third quartile (75th percentile).
    pub q3: f64,
    /// Lower fence, `Q1 − k·IQR`.
    pub lower: f64,
    /// Upper fence, `Q3 + k·IQR`.
    pub upper: f64,
}

impl TukeyFences {
    /// Multiplier for the conventional "outer" box-plot whiskers.
    pub const DEFAULT_MULTIPLIER: f64 = 1.5;

    /// Computes fences with the default multiplier of 1.5.
    ///
    /// Returns `None` for an empty dataset.
    #[must_use]
    pub fn from_values(values: &[f64]) -> Option<Self> {
        Self::with_multiplier(values, Self::DEFAULT_MULTIPLIER)
    }

    /// Computes fences `k·IQR` away from the quartiles.
    #[must_use]
    pub fn with_multiplier(values: &[f64], k: f64) -> Option<Self> {
        let quartiles = Percentiles::new(values, &[25.0, 75.0]);
        let q1 = quartiles.get(25.0)?;
        let q3 = quartiles.get(75.0)?;
        let iqr = q3 - q1;
        Some(Self {
            q1,
            q3,
            lower: q1 - k * iqr,
            upper: q3 + k * iqr,
        })
    }

    /// Interquartile range, `Q3 − Q1`.
    #[must_use]
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Whether `value` lies within the fences (inclusive).
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        (self.lower..=self.upper).contains(&value)
    }

    /// Splits `values` into (retained, excluded), preserving input order in both.
    #[must_use]
    pub fn partition(&self, values: &[f64]) -> (Vec<f64>, Vec<f64>) {
        values.iter().partition(|v| self.contains(**v))
    }
}
