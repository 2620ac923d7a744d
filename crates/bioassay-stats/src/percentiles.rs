/// Precomputed percentile values for a dataset.
///
/// This structure stores percentile-value pairs for efficient lookup
/// of commonly used percentile points.
///
/// # Examples
///
/// ```
/// use bioassay_stats::percentiles::Percentiles;
///
/// let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
/// let percentiles = Percentiles::new(&values, &[25.0, 50.0, 75.0]);
///
/// assert_eq!(percentiles.get(25.0), Some(2.0));
/// assert_eq!(percentiles.get(50.0), Some(3.0));
/// assert_eq!(percentiles.get(75.0), Some(4.0));
/// ```
#[derive(Debug, Clone)]
pub struct Percentiles {
    /// Percentile-value pairs in the order they were requested.
    /// Each tuple contains (percentile, value) where percentile is 0.0-100.0.
    values: Vec<(f64, f64)>,
}

impl Percentiles {
    /// Computes percentiles from sorted values.
    ///
    /// Percentiles of an empty dataset are not stored, so every lookup on the
    /// result returns `None`.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64], percentile_points: &[f64]) -> Self {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let values = percentile_points
            .iter()
            .filter_map(|&p| compute_percentile(sorted_values, p).map(|v| (p, v)))
            .collect();
        Self { values }
    }

    /// Computes percentiles from unsorted values.
    ///
    /// This method will sort the values internally before computing percentiles.
    #[must_use]
    pub fn new(values: &[f64], percentile_points: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted, percentile_points)
    }

    /// Gets the value at a specific percentile.
    ///
    /// Returns `None` if the percentile was not precomputed.
    #[must_use]
    pub fn get(&self, percentile: f64) -> Option<f64> {
        self.values.iter().find_map(|(p, value)| {
            if (*p - percentile).abs() < f64::EPSILON {
                Some(*value)
            } else {
                None
            }
        })
    }

    /// Returns an iterator over all (percentile, value) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.values.iter().copied()
    }
}

/// Computes a single percentile value from sorted data.
///
/// Uses linear interpolation between closest ranks (Hyndman & Fan type 7,
/// the default quantile definition of most numeric libraries). For `n`
/// values and percentile `p`, the rank is `h = (n − 1) · p / 100` and the
/// result interpolates between `x[⌊h⌋]` and `x[⌊h⌋ + 1]`.
///
/// Returns `None` for an empty dataset or a percentile outside `0..=100`.
///
/// # Examples
///
/// ```
/// use bioassay_stats::percentiles::compute_percentile;
///
/// let values = [1.0, 2.0, 3.0, 4.0];
/// assert_eq!(compute_percentile(&values, 50.0), Some(2.5));
/// assert_eq!(compute_percentile(&values, 25.0), Some(1.75));
/// assert_eq!(compute_percentile(&values, 100.0), Some(4.0));
/// assert_eq!(compute_percentile(&[], 50.0), None);
/// ```
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
#[must_use]
pub fn compute_percentile(sorted_values: &[f64], percentile: f64) -> Option<f64> {
    if sorted_values.is_empty() || !(0.0..=100.0).contains(&percentile) {
        return None;
    }
    let last = sorted_values.len() - 1;
    let rank = last as f64 * percentile / 100.0;
    let lower = (rank.floor() as usize).min(last);
    let upper = (lower + 1).min(last);
    let weight = rank - rank.floor();
    Some(sorted_values[lower] + weight * (sorted_values[upper] - sorted_values[lower]))
}
