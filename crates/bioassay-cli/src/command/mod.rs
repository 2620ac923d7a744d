use clap::{Parser, Subcommand};

use self::{
    compare::CompareArg, mic::MicArg, summarize::SummarizeArg, survival::SurvivalArg,
    synthesize::SynthesizeArg,
};

mod compare;
mod mic;
mod summarize;
mod survival;
mod synthesize;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Analysis to run
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Summarize replicate measurements with outlier exclusion
    Summarize(#[clap(flatten)] SummarizeArg),
    /// Compare survival of every group against a control group
    Survival(#[clap(flatten)] SurvivalArg),
    /// Find the minimum inhibitory concentration of each agent
    Mic(#[clap(flatten)] MicArg),
    /// Run a two-sample t-test per condition
    Compare(#[clap(flatten)] CompareArg),
    /// Generate labelled synthetic replicates from reported statistics
    Synthesize(#[clap(flatten)] SynthesizeArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Summarize(arg) => summarize::run(&arg)?,
        Mode::Survival(arg) => survival::run(&arg)?,
        Mode::Mic(arg) => mic::run(&arg)?,
        Mode::Compare(arg) => compare::run(&arg)?,
        Mode::Synthesize(arg) => synthesize::run(&arg)?,
    }
    Ok(())
}
