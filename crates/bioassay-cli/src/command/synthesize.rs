use std::io::{self, Write as _};

use anyhow::Context;
use bioassay_analysis::synthetic::{SyntheticParameters, generate};
use clap::Args;

use crate::{
    schema::report::SyntheticReport,
    util::{Output, OutputArg},
};

#[derive(Debug, Clone, Args)]
pub(crate) struct SynthesizeArg {
    /// Name of the generated column
    #[arg(long, default_value = "synthetic")]
    pub name: String,

    /// Reported mean
    #[arg(long)]
    pub mean: f64,

    /// Reported standard deviation
    #[arg(long)]
    pub std_dev: f64,

    /// Number of replicates to draw
    #[arg(long)]
    pub count: usize,

    /// Seed of the random number generator
    #[arg(long)]
    pub seed: u64,

    #[clap(flatten)]
    pub output: OutputArg,
}

pub(crate) fn run(arg: &SynthesizeArg) -> anyhow::Result<()> {
    let params = SyntheticParameters {
        mean: arg.mean,
        std_dev: arg.std_dev,
        count: arg.count,
        seed: arg.seed,
    };
    let labelled = generate(&arg.name, &params).context("Failed to generate synthetic replicates")?;
    log::warn!(
        "'{}' holds synthetic values, not measurements (seed {})",
        arg.name,
        arg.seed
    );

    let report = SyntheticReport::new(labelled, arg.mean, arg.std_dev);
    arg.output.emit(report, print_synthetic)
}

fn print_synthetic(out: &mut Output, report: &SyntheticReport) -> io::Result<()> {
    writeln!(
        out,
        "SYNTHETIC data '{}' ({:?}), drawn from N({}, {}²)",
        report.name, report.provenance, report.mean, report.std_dev
    )?;
    for (i, value) in report.values.iter().enumerate() {
        writeln!(out, "  {:>4} {value:>12.4}", i + 1)?;
    }
    Ok(())
}
