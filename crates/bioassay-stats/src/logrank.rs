//! Log-rank test for comparing two survival distributions.

use crate::{special::chi_squared_sf, survival::SurvivalObservation};

/// Error returned when one of the compared samples has no subjects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("{side} sample has no subjects at risk")]
pub struct EmptySampleError {
    /// Which of the two samples is empty.
    pub side: SampleSide,
}

/// Identifies one of the two samples of a two-sample test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum SampleSide {
    #[display("first")]
    First,
    #[display("second")]
    Second,
}

/// Result of a two-sample log-rank test.
///
/// At every distinct event time of the pooled sample, the deaths observed in
/// the first sample are compared with the deaths expected under the null
/// hypothesis of identical survival, given the number of subjects at risk in
/// each sample. The standardized squared difference follows a chi-squared
/// distribution with one degree of freedom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogRankTest {
    /// Chi-squared test statistic.
    pub statistic: f64,
    /// Upper-tail p-value of `statistic` under χ²(1).
    pub p_value: f64,
    /// Observed events in the first sample.
    pub observed_first: usize,
    /// Expected events in the first sample under the null hypothesis.
    pub expected_first: f64,
    /// Observed events in the second sample.
    pub observed_second: usize,
    /// Expected events in the second sample under the null hypothesis.
    pub expected_second: f64,
}

impl LogRankTest {
    /// Compares the survival of `first` against `second`.
    ///
    /// If no pooled event time carries variance (for instance when nobody
    /// dies), the statistic is 0 and the p-value is 1.
    ///
    /// # Errors
    ///
    /// Returns [`EmptySampleError`] if either sample is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use bioassay_stats::{logrank::LogRankTest, survival::SurvivalObservation};
    ///
    /// let sample = [1.0, 2.0, 2.0, 5.0].map(SurvivalObservation::event);
    /// let test = LogRankTest::new(&sample, &sample).unwrap();
    /// assert!(test.statistic.abs() < 1e-12);
    /// assert!((test.p_value - 1.0).abs() < 1e-12);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    pub fn new(
        first: &[SurvivalObservation],
        second: &[SurvivalObservation],
    ) -> Result<Self, EmptySampleError> {
        if first.is_empty() {
            return Err(EmptySampleError {
                side: SampleSide::First,
            });
        }
        if second.is_empty() {
            return Err(EmptySampleError {
                side: SampleSide::Second,
            });
        }

        let first = sorted_by_time(first);
        let second = sorted_by_time(second);

        let mut event_times = first
            .iter()
            .chain(&second)
            .filter(|o| o.event_observed)
            .map(|o| o.time)
            .collect::<Vec<_>>();
        event_times.sort_by(f64::total_cmp);
        event_times.dedup();

        let mut first_cursor = TimeCursor::new(&first);
        let mut second_cursor = TimeCursor::new(&second);

        let mut observed_first = 0;
        let mut observed_second = 0;
        let mut expected_first = 0.0;
        let mut expected_second = 0.0;
        let mut variance = 0.0;

        for &time in &event_times {
            let (n1, d1) = first_cursor.advance_to(time);
            let (n2, d2) = second_cursor.advance_to(time);
            observed_first += d1;
            observed_second += d2;

            let n = (n1 + n2) as f64;
            let d = (d1 + d2) as f64;
            let (n1, n2) = (n1 as f64, n2 as f64);

            expected_first += d * n1 / n;
            expected_second += d * n2 / n;
            if n > 1.0 {
                variance += d * (n1 / n) * (n2 / n) * (n - d) / (n - 1.0);
            }
        }

        let statistic = if variance > 0.0 {
            (observed_first as f64 - expected_first).powi(2) / variance
        } else {
            0.0
        };
        let p_value = chi_squared_sf(statistic, 1.0);

        Ok(Self {
            statistic,
            p_value,
            observed_first,
            expected_first,
            observed_second,
            expected_second,
        })
    }
}

fn sorted_by_time(sample: &[SurvivalObservation]) -> Vec<SurvivalObservation> {
    let mut sorted = sample.to_vec();
    sorted.sort_by(|a, b| a.time.total_cmp(&b.time));
    sorted
}

/// Walks a time-sorted sample, reporting at-risk and event counts per time.
struct TimeCursor<'a> {
    sample: &'a [SurvivalObservation],
    position: usize,
}

impl<'a> TimeCursor<'a> {
    fn new(sample: &'a [SurvivalObservation]) -> Self {
        Self {
            sample,
            position: 0,
        }
    }

    /// Returns `(at_risk, events)` at `time`. Times must be visited in ascending order.
    fn advance_to(&mut self, time: f64) -> (usize, usize) {
        while self.position < self.sample.len() && self.sample[self.position].time < time {
            self.position += 1;
        }
        let at_risk = self.sample.len() - self.position;
        let events = self.sample[self.position..]
            .iter()
            .take_while(|o| o.time == time)
            .filter(|o| o.event_observed)
            .count();
        (at_risk, events)
    }
}
