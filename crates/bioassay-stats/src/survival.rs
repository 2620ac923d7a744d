//! Kaplan-Meier survival curves.

use crate::special::inverse_normal_cdf;

/// A single subject record for survival analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurvivalObservation {
    /// Time of the event or of the last observation.
    pub time: f64,
    /// `true` if the event (death) was observed at `time`,
    /// `false` if the subject was censored (still alive at `time`).
    pub event_observed: bool,
}

impl SurvivalObservation {
    /// An observed event at `time`.
    #[must_use]
    pub fn event(time: f64) -> Self {
        Self {
            time,
            event_observed: true,
        }
    }

    /// A censored record at `time`.
    #[must_use]
    pub fn censored(time: f64) -> Self {
        Self {
            time,
            event_observed: false,
        }
    }
}

/// Kaplan-Meier survival curve for survival analysis.
///
/// The Kaplan-Meier estimator is a non-parametric statistic used to estimate the survival
/// function from lifetime data. It accounts for censored data (observations where the event
/// of interest has not occurred by the end of the study period).
///
/// # Fields
///
/// The curve stores parallel vectors describing the step function at each time
/// where at least one event occurred. The curve implicitly starts at `(0, 1.0)`;
/// see [`KaplanMeierCurve::points`].
///
/// Subjects censored exactly at an event time are counted as at risk at that
/// time, and all deaths sharing a time are applied as one multiplicative step
/// `(n − d) / n`.
///
/// The confidence band uses the exponential Greenwood formula (a log(−log)
/// transform of the survival probability), which keeps both bounds inside
/// `[0, 1]`:
///
/// ```text
/// v(t)  = Σ d / (n (n − d))  /  (ln S(t))²
/// lower = exp(−exp(ln(−ln S(t)) + z·√v(t)))
/// upper = exp(−exp(ln(−ln S(t)) − z·√v(t)))
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct KaplanMeierCurve {
    /// Time points where events (non-censored observations) occurred.
    pub times: Vec<f64>,
    /// Survival probability just after each corresponding time point.
    pub survival_prob: Vec<f64>,
    /// Number of subjects at risk (time ≥ time point) at each time point.
    pub at_risk: Vec<usize>,
    /// Number of events that occurred at each time point.
    pub events: Vec<usize>,
    /// Number of censored observations recorded at each time point.
    pub censored: Vec<usize>,
    /// Lower bound of the pointwise confidence band.
    pub ci_lower: Vec<f64>,
    /// Upper bound of the pointwise confidence band.
    pub ci_upper: Vec<f64>,
    /// Confidence level of the band (e.g. 0.95).
    pub confidence_level: f64,
}

impl KaplanMeierCurve {
    /// Confidence level used by [`Self::from_data`].
    pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

    /// Computes the Kaplan-Meier survival curve with a 95% confidence band.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bioassay_stats::survival::{KaplanMeierCurve, SurvivalObservation};
    /// let data = vec![
    ///     SurvivalObservation::event(10.0),
    ///     SurvivalObservation::censored(20.0),
    ///     SurvivalObservation::event(30.0),
    /// ];
    /// let curve = KaplanMeierCurve::from_data(data);
    /// assert_eq!(curve.times, vec![10.0, 30.0]);
    /// assert!((curve.survival_prob[0] - 2.0 / 3.0).abs() < 1e-12);
    /// assert_eq!(curve.survival_prob[1], 0.0);
    /// ```
    #[must_use]
    pub fn from_data(data: Vec<SurvivalObservation>) -> Self {
        Self::with_confidence_level(data, Self::DEFAULT_CONFIDENCE_LEVEL)
    }

    /// Computes the Kaplan-Meier survival curve with a band at `confidence_level`.
    ///
    /// # Panics
    ///
    /// Panics if `confidence_level` is not inside `(0, 1)`.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn with_confidence_level(mut data: Vec<SurvivalObservation>, confidence_level: f64) -> Self {
        assert!(
            confidence_level > 0.0 && confidence_level < 1.0,
            "confidence level must be inside (0, 1)"
        );
        let z = inverse_normal_cdf(0.5 + confidence_level / 2.0);

        let mut curve = Self {
            times: vec![],
            survival_prob: vec![],
            at_risk: vec![],
            events: vec![],
            censored: vec![],
            ci_lower: vec![],
            ci_upper: vec![],
            confidence_level,
        };

        data.sort_by(|a, b| a.time.total_cmp(&b.time));

        let total = data.len();
        let mut current_survival = 1.0;
        let mut greenwood_sum = 0.0;

        let mut i = 0;
        while i < data.len() {
            let current_time = data[i].time;
            let at_risk = total - i;

            // A NaN time never compares equal to itself; it still forms its own group.
            let tied = data[i + 1..]
                .iter()
                .take_while(|o| o.time == current_time)
                .count();
            let j = i + 1 + tied;
            let event_count = data[i..j].iter().filter(|o| o.event_observed).count();
            let censored_count = (j - i) - event_count;

            if event_count > 0 {
                let n = at_risk as f64;
                let d = event_count as f64;
                current_survival *= (n - d) / n;
                if at_risk > event_count {
                    greenwood_sum += d / (n * (n - d));
                }

                let (lower, upper) = exponential_greenwood_band(current_survival, greenwood_sum, z);

                curve.times.push(current_time);
                curve.survival_prob.push(current_survival);
                curve.at_risk.push(at_risk);
                curve.events.push(event_count);
                curve.censored.push(censored_count);
                curve.ci_lower.push(lower);
                curve.ci_upper.push(upper);
            }

            i = j;
        }

        curve
    }

    /// Number of breakpoints (distinct event times).
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether no event was observed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Iterates over the step function as `(time, survival probability)`,
    /// starting with the origin `(0, 1.0)`.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        std::iter::once((0.0, 1.0)).chain(
            self.times
                .iter()
                .copied()
                .zip(self.survival_prob.iter().copied()),
        )
    }

    /// Returns the median survival time.
    ///
    /// This is the first event time at which the survival probability drops
    /// to or below 50%, or `None` if it never does.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bioassay_stats::survival::{KaplanMeierCurve, SurvivalObservation};
    /// let data = [10.0, 20.0, 30.0].map(SurvivalObservation::event).to_vec();
    /// let curve = KaplanMeierCurve::from_data(data);
    /// assert_eq!(curve.median_survival(), Some(20.0));
    /// ```
    #[must_use]
    pub fn median_survival(&self) -> Option<f64> {
        self.survival_prob
            .iter()
            .position(|&p| p <= 0.5)
            .map(|i| self.times[i])
    }

    /// Returns the survival probability at a specific time.
    ///
    /// The step function is right-continuous: a step at `time` is included.
    /// Returns `1.0` before the first event.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bioassay_stats::survival::{KaplanMeierCurve, SurvivalObservation};
    /// let data = vec![SurvivalObservation::event(10.0), SurvivalObservation::event(20.0)];
    /// let curve = KaplanMeierCurve::from_data(data);
    ///
    /// assert_eq!(curve.survival_at(5.0), 1.0);
    /// assert_eq!(curve.survival_at(10.0), 0.5);
    /// assert_eq!(curve.survival_at(15.0), 0.5);
    /// ```
    #[must_use]
    pub fn survival_at(&self, time: f64) -> f64 {
        let steps = self.times.partition_point(|&t| t <= time);
        steps
            .checked_sub(1)
            .map_or(1.0, |i| self.survival_prob[i])
    }
}

fn exponential_greenwood_band(survival: f64, greenwood_sum: f64, z: f64) -> (f64, f64) {
    if survival <= 0.0 {
        return (0.0, 0.0);
    }
    if survival >= 1.0 {
        return (1.0, 1.0);
    }
    let log_survival = survival.ln();
    let std_err = (greenwood_sum / (log_survival * log_survival)).sqrt();
    let center = (-log_survival).ln();
    let lower = (-(center + z * std_err).exp()).exp();
    let upper = (-(center - z * std_err).exp()).exp();
    (lower, upper)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observations(events: &[(f64, usize)], censored: &[(f64, usize)]) -> Vec<SurvivalObservation> {
        let mut data = vec![];
        for &(time, count) in events {
            data.extend(std::iter::repeat_n(SurvivalObservation::event(time), count));
        }
        for &(time, count) in censored {
            data.extend(std::iter::repeat_n(SurvivalObservation::censored(time), count));
        }
        data
    }

    #[test]
    fn test_empty_data() {
        let curve = KaplanMeierCurve::from_data(vec![]);
        assert!(curve.is_empty());
        assert_eq!(curve.points().collect::<Vec<_>>(), vec![(0.0, 1.0)]);
        assert_eq!(curve.survival_at(100.0), 1.0);
        assert_eq!(curve.median_survival(), None);
    }

    #[test]
    fn test_tied_deaths_form_one_step() {
        let data = observations(&[(0.0, 10), (24.0, 15)], &[(24.0, 35)]);
        let curve = KaplanMeierCurve::from_data(data);

        assert_eq!(curve.times, vec![0.0, 24.0]);
        assert_eq!(curve.at_risk, vec![60, 50]);
        assert_eq!(curve.events, vec![10, 15]);
        assert_eq!(curve.censored, vec![0, 35]);
        assert!((curve.survival_prob[0] - 50.0 / 60.0).abs() < 1e-12);
        assert!((curve.survival_prob[1] - 50.0 / 60.0 * 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_censored_at_event_time_counted_at_risk() {
        let data = observations(&[(5.0, 1)], &[(5.0, 1), (8.0, 2)]);
        let curve = KaplanMeierCurve::from_data(data);
        assert_eq!(curve.at_risk, vec![4]);
        assert_eq!(curve.survival_prob, vec![0.75]);
    }

    #[test]
    fn test_survival_non_increasing_and_starts_at_one() {
        let data = observations(&[(1.0, 2), (3.0, 1), (4.0, 4), (9.0, 1)], &[(2.0, 3), (9.0, 2)]);
        let curve = KaplanMeierCurve::from_data(data);
        let points = curve.points().collect::<Vec<_>>();
        assert_eq!(points[0], (0.0, 1.0));
        assert!(points.windows(2).all(|w| w[0].0 <= w[1].0 && w[1].1 <= w[0].1));
    }

    #[test]
    fn test_confidence_band_brackets_estimate() {
        let data = observations(&[(0.0, 10), (24.0, 15)], &[(24.0, 35)]);
        let curve = KaplanMeierCurve::from_data(data);
        for i in 0..curve.len() {
            assert!(curve.ci_lower[i] < curve.survival_prob[i]);
            assert!(curve.survival_prob[i] < curve.ci_upper[i]);
            assert!(curve.ci_lower[i] >= 0.0 && curve.ci_upper[i] <= 1.0);
        }
    }

    #[test]
    fn test_confidence_band_width_formula() {
        // Single step: S = 50/60, Greenwood sum = 10 / (60 * 50).
        let data = observations(&[(0.0, 10)], &[(24.0, 50)]);
        let curve = KaplanMeierCurve::from_data(data);

        let s: f64 = 50.0 / 60.0;
        let v = (10.0 / (60.0 * 50.0)) / s.ln().powi(2);
        let z = 1.959_963_984_540_054;
        let center = (-s.ln()).ln();
        let lower = (-(center + z * v.sqrt()).exp()).exp();
        let upper = (-(center - z * v.sqrt()).exp()).exp();

        assert!((curve.ci_lower[0] - lower).abs() < 1e-9);
        assert!((curve.ci_upper[0] - upper).abs() < 1e-9);
    }

    #[test]
    fn test_wider_band_at_higher_confidence() {
        let data = observations(&[(1.0, 3), (2.0, 3)], &[(3.0, 6)]);
        let narrow = KaplanMeierCurve::with_confidence_level(data.clone(), 0.80);
        let wide = KaplanMeierCurve::with_confidence_level(data, 0.99);
        assert!(wide.ci_lower[1] < narrow.ci_lower[1]);
        assert!(wide.ci_upper[1] > narrow.ci_upper[1]);
    }

    #[test]
    fn test_band_collapses_when_everyone_dies() {
        let data = observations(&[(1.0, 2), (2.0, 2)], &[]);
        let curve = KaplanMeierCurve::from_data(data);
        assert_eq!(curve.survival_prob[1], 0.0);
        assert_eq!((curve.ci_lower[1], curve.ci_upper[1]), (0.0, 0.0));
    }

    #[test]
    fn test_nan_time_does_not_stall() {
        let data = vec![
            SurvivalObservation::event(f64::NAN),
            SurvivalObservation::event(1.0),
            SurvivalObservation::censored(f64::NAN),
        ];
        let curve = KaplanMeierCurve::from_data(data);
        assert_eq!(curve.times[0], 1.0);
        assert_eq!(curve.events.iter().sum::<usize>(), 2);
    }

    #[test]
    fn test_median_never_reached() {
        let data = observations(&[(1.0, 1)], &[(5.0, 9)]);
        let curve = KaplanMeierCurve::from_data(data);
        assert_eq!(curve.median_survival(), None);
    }
}
