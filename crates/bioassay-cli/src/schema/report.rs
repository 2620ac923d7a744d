//! Report bodies written by each subcommand.

use bioassay_analysis::{
    comparison::{ConditionComparison, MeanStd},
    mic::{MicOutcome, MicThreshold},
    summary::SummaryRow,
    survival::{ComparisonReport, DeathCountConvention},
    synthetic::{LabelledColumn, Provenance},
};
use bioassay_stats::{logrank::LogRankTest, survival::KaplanMeierCurve};
use serde::Serialize;

use crate::schema::Named;

#[derive(Debug, Clone, Serialize)]
pub(crate) struct SummaryReport {
    /// Control column the values were normalized against, if any
    pub control: Option<String>,
    pub provenance: Provenance,
    pub conditions: Vec<Named<SummaryEntry>>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct SummaryEntry {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub sem: f64,
    pub q1: f64,
    pub q3: f64,
    pub lower_fence: f64,
    pub upper_fence: f64,
    pub excluded: Vec<f64>,
}

impl From<SummaryRow> for SummaryEntry {
    fn from(row: SummaryRow) -> Self {
        Self {
            count: row.count,
            mean: row.mean,
            std_dev: row.std_dev,
            sem: row.sem,
            q1: row.fences.q1,
            q3: row.fences.q3,
            lower_fence: row.fences.lower,
            upper_fence: row.fences.upper,
            excluded: row.excluded,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct SurvivalReport {
    pub control: String,
    pub convention: DeathCountConvention,
    pub confidence_level: f64,
    pub alpha: f64,
    /// Curves of every group; each starts at survival 1 at time 0
    pub curves: Vec<Named<CurveEntry>>,
    pub tests: Vec<Named<LogRankEntry>>,
    /// Treatment groups with a p-value below `alpha`
    pub significant: Vec<String>,
}

impl SurvivalReport {
    pub fn new(
        report: ComparisonReport,
        convention: DeathCountConvention,
        confidence_level: f64,
        alpha: f64,
    ) -> Self {
        let significant = report
            .significant_groups(alpha)
            .map(|t| t.group.clone())
            .collect::<Vec<_>>();
        Self {
            control: report.control,
            convention,
            confidence_level,
            alpha,
            curves: report
                .curves
                .into_iter()
                .map(|c| Named::new(c.group, c.curve.map(CurveEntry::from)))
                .collect(),
            tests: report
                .tests
                .into_iter()
                .map(|t| {
                    let significant = significant.contains(&t.group);
                    Named::new(
                        t.group,
                        t.result.map(|test| LogRankEntry::new(&test, significant)),
                    )
                })
                .collect(),
            significant,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct CurveEntry {
    pub median_survival: Option<f64>,
    pub steps: Vec<CurveStep>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct CurveStep {
    pub time: f64,
    pub survival: f64,
    pub at_risk: usize,
    pub events: usize,
    pub censored: usize,
    pub ci_lower: f64,
    pub ci_upper: f64,
}

impl From<KaplanMeierCurve> for CurveEntry {
    fn from(curve: KaplanMeierCurve) -> Self {
        let steps = (0..curve.len())
            .map(|i| CurveStep {
                time: curve.times[i],
                survival: curve.survival_prob[i],
                at_risk: curve.at_risk[i],
                events: curve.events[i],
                censored: curve.censored[i],
                ci_lower: curve.ci_lower[i],
                ci_upper: curve.ci_upper[i],
            })
            .collect();
        Self {
            median_survival: curve.median_survival(),
            steps,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct LogRankEntry {
    pub statistic: f64,
    pub p_value: f64,
    pub observed: usize,
    pub expected: f64,
    pub control_observed: usize,
    pub control_expected: f64,
    pub significant: bool,
}

impl LogRankEntry {
    fn new(test: &LogRankTest, significant: bool) -> Self {
        Self {
            statistic: test.statistic,
            p_value: test.p_value,
            observed: test.observed_first,
            expected: test.expected_first,
            control_observed: test.observed_second,
            control_expected: test.expected_second,
            significant,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct MicReport {
    pub negative_control: f64,
    pub positive_control: f64,
    pub fraction: f64,
    pub threshold: f64,
    pub agents: Vec<Named<MicEntry>>,
}

impl MicReport {
    pub fn new(threshold: &MicThreshold, agents: Vec<Named<MicEntry>>) -> Self {
        Self {
            negative_control: threshold.negative_control,
            positive_control: threshold.positive_control,
            fraction: threshold.fraction,
            threshold: threshold.value,
            agents,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct MicEntry {
    /// MIC as printed, e.g. `22.5` or `>180`
    pub mic: String,
    pub concentration: Option<f64>,
    pub reading: Option<f64>,
}

impl From<MicOutcome> for MicEntry {
    fn from(outcome: MicOutcome) -> Self {
        let reading = match outcome {
            MicOutcome::Inhibited { reading, .. } => Some(reading),
            MicOutcome::AboveRange { .. } => None,
        };
        Self {
            mic: outcome.to_string(),
            concentration: outcome.concentration(),
            reading,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct CompareReport {
    pub first_label: String,
    pub second_label: String,
    /// `student` (pooled variance) or `welch`
    pub test: &'static str,
    pub conditions: Vec<Named<ComparisonEntry>>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct SampleEntry {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ComparisonEntry {
    pub first: SampleEntry,
    pub second: SampleEntry,
    pub statistic: f64,
    pub degrees_of_freedom: f64,
    pub p_value: f64,
}

impl From<ConditionComparison> for ComparisonEntry {
    fn from(comparison: ConditionComparison) -> Self {
        let sample = |s: MeanStd| SampleEntry {
            count: s.count,
            mean: s.mean,
            std_dev: s.std_dev,
        };
        Self {
            first: sample(comparison.first),
            second: sample(comparison.second),
            statistic: comparison.test.statistic,
            degrees_of_freedom: comparison.test.degrees_of_freedom,
            p_value: comparison.test.p_value,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct SyntheticReport {
    pub name: String,
    pub provenance: Provenance,
    pub mean: f64,
    pub std_dev: f64,
    pub values: Vec<f64>,
}

impl SyntheticReport {
    pub fn new(labelled: LabelledColumn, mean: f64, std_dev: f64) -> Self {
        Self {
            values: labelled.column.present_values().collect(),
            name: labelled.column.name,
            provenance: labelled.provenance,
            mean,
            std_dev,
        }
    }
}
