//! Survival comparison command
//!
//! Builds a Kaplan-Meier curve per group from binned mortality counts and
//! tests every treatment group against the control with a log-rank test.

use std::{
    io::{self, Write as _},
    path::PathBuf,
};

use anyhow::Context;
use bioassay_analysis::survival::{
    ComparisonOptions, DeathCountConvention, SurvivalDataset, compare_against_control,
};
use clap::{Args, ValueEnum};

use crate::{
    schema::{Outcome, config::SurvivalConfig, report::SurvivalReport},
    util::{self, Output, OutputArg},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ConventionArg {
    /// `dead` counts new deaths since the previous time bin
    Incremental,
    /// `dead` counts all deaths up to the time bin
    Cumulative,
}

impl From<ConventionArg> for DeathCountConvention {
    fn from(arg: ConventionArg) -> Self {
        match arg {
            ConventionArg::Incremental => Self::Incremental,
            ConventionArg::Cumulative => Self::Cumulative,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub(crate) struct SurvivalArg {
    /// Path to the event-time configuration JSON file
    pub config: PathBuf,

    /// How the `dead` field of each row is counted
    #[arg(long, value_enum, default_value_t = ConventionArg::Incremental)]
    pub convention: ConventionArg,

    /// Significance level of the log-rank tests
    #[arg(long, default_value_t = 0.05)]
    pub alpha: f64,

    /// Confidence level of the survival curve bands
    #[arg(long, default_value_t = 0.95)]
    pub confidence: f64,

    #[clap(flatten)]
    pub output: OutputArg,
}

pub(crate) fn run(arg: &SurvivalArg) -> anyhow::Result<()> {
    let config: SurvivalConfig = util::read_json_file("survival config", &arg.config)?;
    let convention = DeathCountConvention::from(arg.convention);

    let dataset = SurvivalDataset::from_rows(&config.rows, convention);
    log::info!(
        "Comparing {} group(s) against '{}'",
        dataset.groups().len(),
        config.control
    );
    let options = ComparisonOptions {
        confidence_level: arg.confidence,
    };
    let comparison = compare_against_control(&dataset, &config.control, &options)
        .context("Failed to compare survival against the control group")?;

    let report = SurvivalReport::new(comparison, convention, arg.confidence, arg.alpha);
    arg.output.emit(report, print_survival)
}

fn print_survival(out: &mut Output, report: &SurvivalReport) -> io::Result<()> {
    writeln!(
        out,
        "Survival (Kaplan-Meier, {:.0}% band, convention: {:?})",
        report.confidence_level * 100.0,
        report.convention
    )?;
    writeln!(out)?;

    for entry in &report.curves {
        writeln!(out, "  {}", entry.name)?;
        match &entry.outcome {
            Outcome::Ok(curve) => {
                writeln!(
                    out,
                    "    {:>8} {:>8} {:>7} {:>9} {:>10} {:>10}",
                    "Time", "AtRisk", "Events", "Survival", "Lower", "Upper"
                )?;
                writeln!(out, "    {:>8} {:>8} {:>7} {:>9.4} {:>10} {:>10}", 0, "", "", 1.0, "", "")?;
                for step in &curve.steps {
                    writeln!(
                        out,
                        "    {:>8} {:>8} {:>7} {:>9.4} {:>10.4} {:>10.4}",
                        step.time, step.at_risk, step.events, step.survival, step.ci_lower, step.ci_upper
                    )?;
                }
                writeln!(
                    out,
                    "    median survival: {}",
                    util::fmt_opt(curve.median_survival, 1)
                )?;
            }
            Outcome::Error(err) => writeln!(out, "    error: {err}")?,
        }
        writeln!(out)?;
    }

    writeln!(out, "Log-rank tests against '{}' (alpha = {})", report.control, report.alpha)?;
    writeln!(
        out,
        "  {:<20} {:>10} {:>10} {:>8} {:>9}",
        "Group", "Chi2", "p-value", "O/E", ""
    )?;
    writeln!(out, "  {}", "-".repeat(61))?;
    for entry in &report.tests {
        match &entry.outcome {
            Outcome::Ok(test) => {
                let observed_expected = format!("{}/{:.1}", test.observed, test.expected);
                writeln!(
                    out,
                    "  {:<20} {:>10.4} {:>10} {:>8} {:>9}",
                    entry.name,
                    test.statistic,
                    util::fmt_p_value(test.p_value),
                    observed_expected,
                    if test.significant { "*" } else { "" },
                )?;
            }
            Outcome::Error(err) => writeln!(out, "  {:<20} error: {err}", entry.name)?,
        }
    }
    Ok(())
}
