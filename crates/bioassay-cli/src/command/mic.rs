use std::{
    io::{self, Write as _},
    path::PathBuf,
};

use anyhow::Context;
use bioassay_analysis::mic::{MicThreshold, average_replicates, find_mic};
use clap::Args;

use crate::{
    schema::{
        Named, Outcome,
        config::MicConfig,
        report::{MicEntry, MicReport},
    },
    util::{self, Output, OutputArg},
};

#[derive(Debug, Clone, Args)]
pub(crate) struct MicArg {
    /// Path to the dilution-series configuration JSON file
    pub config: PathBuf,

    #[clap(flatten)]
    pub output: OutputArg,
}

pub(crate) fn run(arg: &MicArg) -> anyhow::Result<()> {
    let config: MicConfig = util::read_json_file("MIC config", &arg.config)?;
    let threshold = MicThreshold::between(
        &config.negative_control,
        &config.positive_control,
        config.fraction,
    )
    .context("Failed to derive the MIC threshold from the controls")?;

    let agents = config
        .agents
        .iter()
        .map(|agent| {
            let outcome = average_replicates(&agent.name, &agent.replicate_columns()).and_then(
                |averaged| {
                    find_mic(
                        &agent.name,
                        &config.concentrations,
                        &averaged.values,
                        &threshold,
                    )
                },
            );
            Named::new(&agent.name, outcome.map(MicEntry::from))
        })
        .collect();

    arg.output.emit(MicReport::new(&threshold, agents), print_mic)
}

fn print_mic(out: &mut Output, report: &MicReport) -> io::Result<()> {
    writeln!(
        out,
        "MIC threshold: {:.4} (negative {:.4}, positive {:.4}, fraction {})",
        report.threshold, report.negative_control, report.positive_control, report.fraction
    )?;
    writeln!(out)?;
    writeln!(out, "  {:<20} {:>10} {:>10}", "Agent", "MIC", "Reading")?;
    writeln!(out, "  {}", "-".repeat(42))?;
    for entry in &report.agents {
        match &entry.outcome {
            Outcome::Ok(mic) => writeln!(
                out,
                "  {:<20} {:>10} {:>10}",
                entry.name,
                mic.mic,
                util::fmt_opt(mic.reading, 4)
            )?,
            Outcome::Error(err) => writeln!(out, "  {:<20} error: {err}", entry.name)?,
        }
    }
    Ok(())
}
