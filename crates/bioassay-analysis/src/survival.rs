//! Survival comparison of binned mortality counts against a control group.
//!
//! Input rows record, for each (group, replicate, time bin), how many subjects
//! died and the replicate's cohort size. Rows are validated per replicate,
//! expanded into per-subject observations, turned into Kaplan-Meier curves,
//! and every treatment group is compared with the control by a log-rank test.

use std::{iter, num::NonZeroUsize, thread};

use bioassay_stats::{
    logrank::{LogRankTest, SampleSide},
    survival::{KaplanMeierCurve, SurvivalObservation},
};
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, MalformedReason};

/// Meaning of the `dead` count of a time bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathCountConvention {
    /// New deaths since the previous recorded bin.
    #[default]
    Incremental,
    /// Deaths to date, including those of earlier bins.
    Cumulative,
}

/// One time bin of a replicate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurvivalBin {
    pub time: f64,
    pub dead: u32,
    /// Cohort size of the replicate.
    pub total: u32,
}

/// A flat input row: one time bin of one replicate of one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRow {
    pub group: String,
    pub replicate: u32,
    pub time: f64,
    pub dead: u32,
    pub total: u32,
}

/// A validated replicate with incremental death counts.
///
/// Invariants: at least one bin; times finite, non-negative and strictly
/// increasing; every bin reports the same cohort size; deaths never exceed
/// the cohort, neither per bin nor in total.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplicateSeries {
    bins: Vec<SurvivalBin>,
    total: u32,
    deaths: u32,
}

impl ReplicateSeries {
    /// Validates `bins` read under `convention`. `context` names the replicate
    /// in error messages.
    ///
    /// Cumulative counts are converted to increments.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::MalformedInput`] describing the first violated
    /// invariant.
    pub fn new(
        context: &str,
        bins: &[SurvivalBin],
        convention: DeathCountConvention,
    ) -> Result<Self, AnalysisError> {
        let malformed = |reason| AnalysisError::malformed(context, reason);

        let first = bins.first().ok_or_else(|| malformed(MalformedReason::EmptySeries))?;
        let total = first.total;
        let mut previous_time = None;
        let mut previous_cumulative = 0;
        let mut deaths = 0_u32;
        let mut incremental = Vec::with_capacity(bins.len());

        for bin in bins {
            let time = bin.time;
            if !time.is_finite() || time < 0.0 {
                return Err(malformed(MalformedReason::InvalidTime { time }));
            }
            if let Some(previous) = previous_time
                && time <= previous
            {
                return Err(malformed(MalformedReason::NonIncreasingTime { previous, time }));
            }
            previous_time = Some(time);

            if bin.total != total {
                return Err(malformed(MalformedReason::InconsistentTotal {
                    time,
                    expected: total,
                    actual: bin.total,
                }));
            }

            let dead = match convention {
                DeathCountConvention::Incremental => {
                    if bin.dead > total {
                        return Err(malformed(MalformedReason::DeadExceedsTotal {
                            time,
                            dead: bin.dead,
                            total,
                        }));
                    }
                    bin.dead
                }
                DeathCountConvention::Cumulative => {
                    if bin.dead < previous_cumulative {
                        return Err(malformed(MalformedReason::DecreasingCumulativeCount {
                            time,
                            previous: previous_cumulative,
                            dead: bin.dead,
                        }));
                    }
                    let dead = bin.dead - previous_cumulative;
                    previous_cumulative = bin.dead;
                    dead
                }
            };

            deaths = deaths.saturating_add(dead);
            if deaths > total {
                return Err(malformed(MalformedReason::CumulativeDeadExceedsTotal {
                    time,
                    dead: deaths,
                    total,
                }));
            }
            incremental.push(SurvivalBin { time, dead, total });
        }

        Ok(Self {
            bins: incremental,
            total,
            deaths,
        })
    }

    /// Bins with incremental death counts.
    #[must_use]
    pub fn bins(&self) -> &[SurvivalBin] {
        &self.bins
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn deaths(&self) -> u32 {
        self.deaths
    }

    /// Subjects still alive at the final bin.
    #[must_use]
    pub fn censored(&self) -> u32 {
        self.total - self.deaths
    }

    /// Time of the final recorded bin.
    #[must_use]
    pub fn last_time(&self) -> f64 {
        self.bins.last().map_or(0.0, |bin| bin.time)
    }
}

/// Expands a replicate into one observation per subject.
///
/// Each bin contributes `dead` events at its time; the survivors are censored
/// at the final bin's time. The returned iterator is cheap to clone and can be
/// replayed from the start.
///
/// # Examples
///
/// ```
/// use bioassay_analysis::survival::{
///     DeathCountConvention, ReplicateSeries, SurvivalBin, expand_to_subjects,
/// };
///
/// let bins = [
///     SurvivalBin { time: 0.0, dead: 10, total: 60 },
///     SurvivalBin { time: 24.0, dead: 15, total: 60 },
/// ];
/// let series = ReplicateSeries::new("rep", &bins, DeathCountConvention::Incremental).unwrap();
/// let subjects = expand_to_subjects(&series);
/// assert_eq!(subjects.clone().count(), 60);
/// assert_eq!(subjects.filter(|s| !s.event_observed).count(), 35);
/// ```
pub fn expand_to_subjects(
    series: &ReplicateSeries,
) -> impl Iterator<Item = SurvivalObservation> + Clone + '_ {
    let events = series
        .bins
        .iter()
        .flat_map(|bin| iter::repeat_n(SurvivalObservation::event(bin.time), bin.dead as usize));
    let survivors = iter::repeat_n(
        SurvivalObservation::censored(series.last_time()),
        series.censored() as usize,
    );
    events.chain(survivors)
}

/// Per-subject observations of one group.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectSample {
    pub group: String,
    pub subjects: Vec<SurvivalObservation>,
}

/// Builds the Kaplan-Meier curve of `sample` with a band at `confidence_level`.
///
/// # Errors
///
/// - [`AnalysisError::EmptySample`] if the sample has no subjects.
/// - [`AnalysisError::MalformedInput`] if `confidence_level` is not inside
///   `(0, 1)`, or a subject time is negative or not finite.
pub fn kaplan_meier(
    sample: &SubjectSample,
    confidence_level: f64,
) -> Result<KaplanMeierCurve, AnalysisError> {
    check_confidence_level(confidence_level)?;
    check_subject_times(sample)?;
    if sample.subjects.is_empty() {
        return Err(AnalysisError::EmptySample {
            group: sample.group.clone(),
        });
    }
    Ok(KaplanMeierCurve::with_confidence_level(
        sample.subjects.clone(),
        confidence_level,
    ))
}

/// Log-rank test of `group` against `control`.
///
/// # Errors
///
/// - [`AnalysisError::MalformedInput`] if a subject time of either sample is
///   negative or not finite.
/// - [`AnalysisError::EmptySample`] naming the sample without subjects.
pub fn logrank_test(
    group: &SubjectSample,
    control: &SubjectSample,
) -> Result<LogRankTest, AnalysisError> {
    check_subject_times(group)?;
    check_subject_times(control)?;
    LogRankTest::new(&group.subjects, &control.subjects).map_err(|err| {
        let empty = match err.side {
            SampleSide::First => group,
            SampleSide::Second => control,
        };
        AnalysisError::EmptySample {
            group: empty.group.clone(),
        }
    })
}

fn check_subject_times(sample: &SubjectSample) -> Result<(), AnalysisError> {
    match sample
        .subjects
        .iter()
        .find(|s| !s.time.is_finite() || s.time < 0.0)
    {
        Some(subject) => Err(AnalysisError::malformed(
            &sample.group,
            MalformedReason::InvalidTime { time: subject.time },
        )),
        None => Ok(()),
    }
}

fn check_confidence_level(level: f64) -> Result<(), AnalysisError> {
    if level > 0.0 && level < 1.0 {
        Ok(())
    } else {
        Err(AnalysisError::malformed(
            "confidence level",
            MalformedReason::InvalidConfidenceLevel { level },
        ))
    }
}

/// A group and its validated replicates, or the reason it could not be built.
#[derive(Debug, Clone, PartialEq)]
pub struct SurvivalGroup {
    pub name: String,
    pub replicates: Result<Vec<ReplicateSeries>, AnalysisError>,
}

impl SurvivalGroup {
    /// Concatenates the expansions of every replicate of the group.
    ///
    /// # Errors
    ///
    /// Returns the group's validation error, or [`AnalysisError::EmptySample`]
    /// if the replicates hold no subjects.
    pub fn subjects(&self) -> Result<SubjectSample, AnalysisError> {
        let replicates = self.replicates.as_ref().map_err(Clone::clone)?;
        let subjects = replicates
            .iter()
            .flat_map(expand_to_subjects)
            .collect::<Vec<_>>();
        if subjects.is_empty() {
            return Err(AnalysisError::EmptySample {
                group: self.name.clone(),
            });
        }
        log::debug!(
            "group '{}': {} subject(s) from {} replicate(s), {} event(s)",
            self.name,
            subjects.len(),
            replicates.len(),
            subjects.iter().filter(|s| s.event_observed).count()
        );
        Ok(SubjectSample {
            group: self.name.clone(),
            subjects,
        })
    }
}

/// Event rows grouped by group and replicate, in first-appearance order.
#[derive(Debug, Clone, PartialEq)]
pub struct SurvivalDataset {
    groups: Vec<SurvivalGroup>,
}

impl SurvivalDataset {
    /// Groups `rows` and validates every replicate under `convention`.
    ///
    /// Rows of a replicate are taken in the order given. A malformed replicate
    /// marks its whole group as failed; other groups are unaffected.
    #[must_use]
    pub fn from_rows(rows: &[EventRow], convention: DeathCountConvention) -> Self {
        let mut grouped: Vec<(&str, Vec<(u32, Vec<SurvivalBin>)>)> = vec![];
        for row in rows {
            let bin = SurvivalBin {
                time: row.time,
                dead: row.dead,
                total: row.total,
            };
            let index = match grouped.iter().position(|(name, _)| *name == row.group) {
                Some(index) => index,
                None => {
                    grouped.push((&row.group, vec![]));
                    grouped.len() - 1
                }
            };
            let replicates = &mut grouped[index].1;
            match replicates.iter_mut().find(|(id, _)| *id == row.replicate) {
                Some((_, bins)) => bins.push(bin),
                None => replicates.push((row.replicate, vec![bin])),
            }
        }

        let groups = grouped
            .into_iter()
            .map(|(name, replicates)| SurvivalGroup {
                name: name.to_owned(),
                replicates: replicates
                    .iter()
                    .map(|(id, bins)| {
                        ReplicateSeries::new(&format!("{name}/replicate {id}"), bins, convention)
                    })
                    .collect(),
            })
            .collect();
        Self { groups }
    }

    #[must_use]
    pub fn groups(&self) -> &[SurvivalGroup] {
        &self.groups
    }

    #[must_use]
    pub fn group(&self, name: &str) -> Option<&SurvivalGroup> {
        self.groups.iter().find(|g| g.name == name)
    }
}

/// Options of [`compare_against_control`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonOptions {
    /// Confidence level of every curve's band.
    pub confidence_level: f64,
}

impl Default for ComparisonOptions {
    fn default() -> Self {
        Self {
            confidence_level: KaplanMeierCurve::DEFAULT_CONFIDENCE_LEVEL,
        }
    }
}

/// Curve of one group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupCurve {
    pub group: String,
    pub curve: Result<KaplanMeierCurve, AnalysisError>,
}

/// Log-rank test of one treatment group against the control.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupTest {
    pub group: String,
    pub result: Result<LogRankTest, AnalysisError>,
}

/// Curves of every group and tests of every treatment group against the control.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonReport {
    pub control: String,
    /// One entry per group (control included), in dataset order.
    pub curves: Vec<GroupCurve>,
    /// One entry per non-control group, in dataset order.
    pub tests: Vec<GroupTest>,
}

impl ComparisonReport {
    /// Treatment groups whose p-value is below `alpha`.
    pub fn significant_groups(&self, alpha: f64) -> impl Iterator<Item = &GroupTest> + '_ {
        self.tests
            .iter()
            .filter(move |t| t.result.as_ref().is_ok_and(|r| r.p_value < alpha))
    }
}

/// Runs `f` on every item, spreading contiguous chunks over at most
/// [`thread::available_parallelism`] scoped threads.
fn for_each_parallel<T, F>(items: &mut [T], f: F)
where
    T: Send,
    F: Fn(&mut T) + Sync,
{
    let workers = thread::available_parallelism().map_or(1, NonZeroUsize::get);
    let chunk_len = items.len().div_ceil(workers).max(1);
    thread::scope(|s| {
        for chunk in items.chunks_mut(chunk_len) {
            let f = &f;
            s.spawn(move || chunk.iter_mut().for_each(f));
        }
    });
}

struct GroupWork<'a> {
    group: &'a SurvivalGroup,
    sample: Option<Result<SubjectSample, AnalysisError>>,
    curve: Option<Result<KaplanMeierCurve, AnalysisError>>,
}

/// Builds every group's curve and tests each treatment group against `control`.
///
/// Groups are split across scoped worker threads, at most one per available
/// core, and gathered in dataset order. A failing group only affects its own entries; a failing control
/// group makes every test report the control's error.
///
/// # Errors
///
/// - [`AnalysisError::UnknownGroup`] if `control` is not in the dataset.
/// - [`AnalysisError::MalformedInput`] if the confidence level is not inside `(0, 1)`.
pub fn compare_against_control(
    dataset: &SurvivalDataset,
    control: &str,
    options: &ComparisonOptions,
) -> Result<ComparisonReport, AnalysisError> {
    check_confidence_level(options.confidence_level)?;
    if dataset.group(control).is_none() {
        return Err(AnalysisError::UnknownGroup {
            group: control.to_owned(),
        });
    }

    let mut work = dataset
        .groups()
        .iter()
        .map(|group| GroupWork {
            group,
            sample: None,
            curve: None,
        })
        .collect::<Vec<_>>();

    for_each_parallel(&mut work, |item| {
        let sample = item.group.subjects();
        item.curve = Some(
            sample
                .as_ref()
                .map_err(Clone::clone)
                .and_then(|sample| kaplan_meier(sample, options.confidence_level)),
        );
        item.sample = Some(sample);
    });

    let control_sample = work
        .iter()
        .find(|w| w.group.name == control)
        .and_then(|w| w.sample.clone())
        .ok_or_else(|| AnalysisError::UnknownGroup {
            group: control.to_owned(),
        })?;

    let mut tests = work
        .iter()
        .filter(|w| w.group.name != control)
        .map(|w| (w, None))
        .collect::<Vec<(&GroupWork<'_>, Option<Result<LogRankTest, AnalysisError>>)>>();

    for_each_parallel(&mut tests, |(item, result)| {
        *result = Some(match (&item.sample, &control_sample) {
            (_, Err(err)) | (Some(Err(err)), _) => Err(err.clone()),
            (Some(Ok(sample)), Ok(control)) => logrank_test(sample, control),
            (None, _) => Err(AnalysisError::EmptySample {
                group: item.group.name.clone(),
            }),
        });
    });

    let tests = tests
        .into_iter()
        .map(|(item, result)| {
            let group = item.group.name.clone();
            let result = result.unwrap_or_else(|| {
                Err(AnalysisError::EmptySample {
                    group: group.clone(),
                })
            });
            if let Err(err) = &result {
                log::warn!("log-rank test of '{group}' against '{control}' failed: {err}");
            }
            GroupTest { group, result }
        })
        .collect();

    let curves = work
        .into_iter()
        .map(|item| {
            let group = item.group.name.clone();
            let curve = item.curve.unwrap_or_else(|| {
                Err(AnalysisError::EmptySample {
                    group: group.clone(),
                })
            });
            if let Err(err) = &curve {
                log::warn!("survival curve of '{group}' failed: {err}");
            }
            GroupCurve { group, curve }
        })
        .collect();

    Ok(ComparisonReport {
        control: control.to_owned(),
        curves,
        tests,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    fn row(group: &str, replicate: u32, time: f64, dead: u32, total: u32) -> EventRow {
        EventRow {
            group: group.to_owned(),
            replicate,
            time,
            dead,
            total,
        }
    }

    fn bin(time: f64, dead: u32, total: u32) -> SurvivalBin {
        SurvivalBin { time, dead, total }
    }

    #[test]
    fn test_sixty_subject_scenario() {
        let series = ReplicateSeries::new(
            "g",
            &[bin(0.0, 10, 60), bin(24.0, 15, 60)],
            DeathCountConvention::Incremental,
        )
        .unwrap();
        let subjects = expand_to_subjects(&series).collect::<Vec<_>>();
        assert_eq!(subjects.len(), 60);
        assert_eq!(
            subjects.iter().filter(|s| s.event_observed && s.time == 0.0).count(),
            10
        );
        assert_eq!(
            subjects.iter().filter(|s| s.event_observed && s.time == 24.0).count(),
            15
        );
        assert_eq!(
            subjects.iter().filter(|s| !s.event_observed && s.time == 24.0).count(),
            35
        );

        let sample = SubjectSample {
            group: "g".to_owned(),
            subjects,
        };
        let curve = kaplan_meier(&sample, 0.95).unwrap();
        assert_close(curve.survival_prob[0], 50.0 / 60.0);
        assert_close(curve.survival_prob[1], 50.0 / 60.0 * 0.7);
    }

    #[test]
    fn test_expansion_is_restartable() {
        let series = ReplicateSeries::new(
            "g",
            &[bin(1.0, 2, 5), bin(3.0, 1, 5)],
            DeathCountConvention::Incremental,
        )
        .unwrap();
        let subjects = expand_to_subjects(&series);
        let first = subjects.clone().collect::<Vec<_>>();
        let second = subjects.collect::<Vec<_>>();
        assert_eq!(first, second);
    }

    #[test]
    fn test_cumulative_convention_converts_to_increments() {
        let series = ReplicateSeries::new(
            "g",
            &[bin(0.0, 10, 60), bin(24.0, 25, 60)],
            DeathCountConvention::Cumulative,
        )
        .unwrap();
        assert_eq!(series.bins()[1].dead, 15);
        assert_eq!(series.censored(), 35);

        let err = ReplicateSeries::new(
            "g",
            &[bin(0.0, 10, 60), bin(24.0, 5, 60)],
            DeathCountConvention::Cumulative,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::MalformedInput {
                reason: MalformedReason::DecreasingCumulativeCount { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_replicate_validation() {
        let reason = |bins: &[SurvivalBin]| {
            match ReplicateSeries::new("g", bins, DeathCountConvention::Incremental) {
                Err(AnalysisError::MalformedInput { reason, .. }) => reason,
                other => panic!("expected malformed input, got {other:?}"),
            }
        };
        assert_eq!(reason(&[]), MalformedReason::EmptySeries);
        assert!(matches!(
            reason(&[bin(0.0, 70, 60)]),
            MalformedReason::DeadExceedsTotal { dead: 70, .. }
        ));
        assert!(matches!(
            reason(&[bin(0.0, 40, 60), bin(1.0, 40, 60)]),
            MalformedReason::CumulativeDeadExceedsTotal { dead: 80, .. }
        ));
        assert!(matches!(
            reason(&[bin(5.0, 1, 60), bin(5.0, 1, 60)]),
            MalformedReason::NonIncreasingTime { .. }
        ));
        assert!(matches!(
            reason(&[bin(-1.0, 1, 60)]),
            MalformedReason::InvalidTime { .. }
        ));
        assert!(matches!(
            reason(&[bin(0.0, 1, 60), bin(1.0, 1, 50)]),
            MalformedReason::InconsistentTotal { .. }
        ));
    }

    #[test]
    fn test_dataset_groups_in_first_appearance_order() {
        let rows = [
            row("b", 1, 0.0, 1, 10),
            row("a", 1, 0.0, 2, 10),
            row("b", 2, 0.0, 0, 10),
            row("b", 1, 24.0, 3, 10),
        ];
        let dataset = SurvivalDataset::from_rows(&rows, DeathCountConvention::Incremental);
        let names = dataset.groups().iter().map(|g| g.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["b", "a"]);

        let b = dataset.group("b").unwrap();
        let replicates = b.replicates.as_ref().unwrap();
        assert_eq!(replicates.len(), 2);
        assert_eq!(replicates[0].deaths(), 4);
        assert_eq!(b.subjects().unwrap().subjects.len(), 20);
    }

    #[test]
    fn test_malformed_group_is_isolated() {
        let rows = [
            row("control", 1, 0.0, 1, 20),
            row("control", 1, 24.0, 2, 20),
            row("bad", 1, 0.0, 30, 20),
            row("good", 1, 0.0, 10, 20),
            row("good", 1, 24.0, 5, 20),
        ];
        let dataset = SurvivalDataset::from_rows(&rows, DeathCountConvention::Incremental);
        let report =
            compare_against_control(&dataset, "control", &ComparisonOptions::default()).unwrap();

        assert_eq!(report.curves.len(), 3);
        assert!(report.curves[0].curve.is_ok());
        assert!(matches!(
            report.curves[1].curve,
            Err(AnalysisError::MalformedInput { .. })
        ));

        let groups = report.tests.iter().map(|t| t.group.as_str()).collect::<Vec<_>>();
        assert_eq!(groups, ["bad", "good"]);
        assert!(matches!(
            report.tests[0].result,
            Err(AnalysisError::MalformedInput { .. })
        ));
        let good = report.tests[1].result.as_ref().unwrap();
        assert!(good.p_value < 0.05);
        assert_eq!(
            report.significant_groups(0.05).map(|t| t.group.as_str()).collect::<Vec<_>>(),
            ["good"]
        );
    }

    #[test]
    fn test_control_failure_reaches_every_test() {
        let rows = [
            row("control", 1, 0.0, 99, 20),
            row("a", 1, 0.0, 1, 20),
            row("b", 1, 0.0, 2, 20),
        ];
        let dataset = SurvivalDataset::from_rows(&rows, DeathCountConvention::Incremental);
        let report =
            compare_against_control(&dataset, "control", &ComparisonOptions::default()).unwrap();
        let control_err = report.curves[0].curve.clone().unwrap_err();
        for test in &report.tests {
            assert_eq!(test.result.as_ref().unwrap_err(), &control_err);
        }
    }

    #[test]
    fn test_self_comparison() {
        let rows = [
            row("control", 1, 0.0, 3, 30),
            row("control", 1, 24.0, 7, 30),
            row("copy", 1, 0.0, 3, 30),
            row("copy", 1, 24.0, 7, 30),
        ];
        let dataset = SurvivalDataset::from_rows(&rows, DeathCountConvention::Incremental);
        let report =
            compare_against_control(&dataset, "control", &ComparisonOptions::default()).unwrap();
        let test = report.tests[0].result.as_ref().unwrap();
        assert!(test.statistic.abs() < 1e-12);
        assert_close(test.p_value, 1.0);
    }

    #[test]
    fn test_unknown_control_and_bad_confidence() {
        let rows = [row("a", 1, 0.0, 1, 10)];
        let dataset = SurvivalDataset::from_rows(&rows, DeathCountConvention::Incremental);
        assert_eq!(
            compare_against_control(&dataset, "control", &ComparisonOptions::default())
                .unwrap_err(),
            AnalysisError::UnknownGroup {
                group: "control".to_owned()
            }
        );
        let options = ComparisonOptions {
            confidence_level: 1.5,
        };
        assert!(compare_against_control(&dataset, "a", &options).is_err());
    }

    fn sample(group: &str, subjects: Vec<SurvivalObservation>) -> SubjectSample {
        SubjectSample {
            group: group.to_owned(),
            subjects,
        }
    }

    fn invalid_time(result: Result<impl std::fmt::Debug, AnalysisError>) -> (String, f64) {
        match result {
            Err(AnalysisError::MalformedInput {
                context,
                reason: MalformedReason::InvalidTime { time },
            }) => (context, time),
            other => panic!("expected invalid time, got {other:?}"),
        }
    }

    #[test]
    fn test_nan_subject_time_is_rejected() {
        let nan = sample(
            "g",
            vec![SurvivalObservation::event(f64::NAN), SurvivalObservation::event(1.0)],
        );
        let (context, time) = invalid_time(kaplan_meier(&nan, 0.95));
        assert_eq!(context, "g");
        assert!(time.is_nan());

        let control = sample("control", vec![SurvivalObservation::event(2.0)]);
        assert_eq!(invalid_time(logrank_test(&nan, &control)).0, "g");
        assert_eq!(invalid_time(logrank_test(&control, &nan)).0, "g");
    }

    #[test]
    fn test_negative_subject_time_is_rejected() {
        let negative = sample(
            "g",
            vec![SurvivalObservation::event(-5.0), SurvivalObservation::censored(1.0)],
        );
        assert_eq!(invalid_time(kaplan_meier(&negative, 0.95)), ("g".to_owned(), -5.0));

        let infinite = sample("h", vec![SurvivalObservation::censored(f64::INFINITY)]);
        assert_eq!(invalid_time(kaplan_meier(&infinite, 0.95)).0, "h");

        let control = sample("control", vec![SurvivalObservation::event(2.0)]);
        assert_eq!(invalid_time(logrank_test(&negative, &control)).0, "g");
    }

    #[test]
    fn test_empty_sample_names_its_own_group() {
        let group = sample("g", vec![SurvivalObservation::event(1.0)]);
        let empty = sample("control", vec![]);
        assert_eq!(
            logrank_test(&group, &empty).unwrap_err(),
            AnalysisError::EmptySample {
                group: "control".to_owned()
            }
        );
        assert_eq!(
            logrank_test(&empty, &group).unwrap_err(),
            AnalysisError::EmptySample {
                group: "control".to_owned()
            }
        );
    }

    #[test]
    fn test_many_groups_keep_dataset_order() {
        let mut rows = vec![row("control", 1, 0.0, 1, 20), row("control", 1, 24.0, 2, 20)];
        let names = (0..64).map(|i| format!("g{i:02}")).collect::<Vec<_>>();
        for (i, name) in (0_u32..).zip(&names) {
            rows.push(row(name, 1, 0.0, i % 20, 20));
        }
        let dataset = SurvivalDataset::from_rows(&rows, DeathCountConvention::Incremental);
        let report =
            compare_against_control(&dataset, "control", &ComparisonOptions::default()).unwrap();

        assert_eq!(report.curves.len(), 65);
        assert_eq!(report.curves[0].group, "control");
        let tested = report.tests.iter().map(|t| t.group.as_str()).collect::<Vec<_>>();
        assert_eq!(tested, names);
        assert!(report.tests.iter().all(|t| t.result.is_ok()));
    }

    #[test]
    fn test_empty_group() {
        let rows = [row("control", 1, 0.0, 0, 0), row("a", 1, 0.0, 1, 10)];
        let dataset = SurvivalDataset::from_rows(&rows, DeathCountConvention::Incremental);
        assert_eq!(
            dataset.group("control").unwrap().subjects().unwrap_err(),
            AnalysisError::EmptySample {
                group: "control".to_owned()
            }
        );
    }
}
