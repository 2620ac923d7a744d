//! Robust summary command
//!
//! Normalizes replicate readings to percent inhibition against a control
//! column (when one is configured), drops Tukey outliers per condition, and
//! reports mean, standard deviation and SEM.

use std::{
    io::{self, Write as _},
    path::PathBuf,
};

use anyhow::Context;
use bioassay_analysis::{
    inhibition::normalize_to_control, summary::summarize, synthetic::Provenance,
};
use clap::Args;

use crate::{
    schema::{
        Named, Outcome,
        config::SummarizeConfig,
        report::{SummaryEntry, SummaryReport},
    },
    util::{self, Output, OutputArg},
};

#[derive(Debug, Clone, Args)]
pub(crate) struct SummarizeArg {
    /// Path to the dataset configuration JSON file
    pub config: PathBuf,

    #[clap(flatten)]
    pub output: OutputArg,
}

pub(crate) fn run(arg: &SummarizeArg) -> anyhow::Result<()> {
    let config: SummarizeConfig = util::read_json_file("summary config", &arg.config)?;

    let table = match &config.control {
        Some(control) => normalize_to_control(&config.table, control, &config.discard)
            .with_context(|| format!("Failed to normalize to control column '{control}'"))?,
        None => config
            .table
            .with_discarded(&config.discard)
            .context("Failed to apply discarded cells")?,
    };

    let conditions = table
        .column_names()
        .zip(summarize(&table))
        .map(|(name, row)| Named::new(name, row.map(SummaryEntry::from)))
        .collect();
    let report = SummaryReport {
        control: config.control,
        provenance: Provenance::Measured,
        conditions,
    };

    arg.output.emit(report, print_summary)
}

fn print_summary(out: &mut Output, report: &SummaryReport) -> io::Result<()> {
    match &report.control {
        Some(control) => writeln!(out, "Inhibition (%) relative to '{control}'")?,
        None => writeln!(out, "Raw values")?,
    }
    writeln!(out)?;
    writeln!(
        out,
        "  {:<20} {:>6} {:>10} {:>10} {:>10} {:>21}  Excluded",
        "Condition", "N", "Mean", "Std", "SEM", "Fences"
    )?;
    writeln!(out, "  {}", "-".repeat(92))?;
    for entry in &report.conditions {
        match &entry.outcome {
            Outcome::Ok(row) => {
                let excluded = row
                    .excluded
                    .iter()
                    .map(|v| format!("{v:.2}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                let fences = format!("[{:.2}, {:.2}]", row.lower_fence, row.upper_fence);
                writeln!(
                    out,
                    "  {:<20} {:>6} {:>10.2} {:>10.2} {:>10.2} {:>21}  {}",
                    entry.name,
                    row.count,
                    row.mean,
                    row.std_dev,
                    row.sem,
                    fences,
                    excluded,
                )?;
            }
            Outcome::Error(err) => writeln!(out, "  {:<20} error: {err}", entry.name)?,
        }
    }
    Ok(())
}
