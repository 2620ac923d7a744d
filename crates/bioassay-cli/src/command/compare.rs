use std::{
    io::{self, Write as _},
    path::PathBuf,
};

use bioassay_analysis::comparison::compare_conditions;
use bioassay_stats::ttest::VarianceAssumption;
use clap::Args;

use crate::{
    schema::{
        Named, Outcome,
        config::CompareConfig,
        report::{CompareReport, ComparisonEntry},
    },
    util::{self, Output, OutputArg},
};

#[derive(Debug, Clone, Args)]
pub(crate) struct CompareArg {
    /// Path to the condition-comparison configuration JSON file
    pub config: PathBuf,

    /// Use Welch's test instead of the pooled-variance Student test
    #[arg(long)]
    pub welch: bool,

    #[clap(flatten)]
    pub output: OutputArg,
}

pub(crate) fn run(arg: &CompareArg) -> anyhow::Result<()> {
    let config: CompareConfig = util::read_json_file("comparison config", &arg.config)?;
    let (assumption, test) = if arg.welch {
        (VarianceAssumption::Unequal, "welch")
    } else {
        (VarianceAssumption::Equal, "student")
    };

    let conditions = config
        .conditions
        .iter()
        .zip(compare_conditions(&config.conditions, assumption))
        .map(|(samples, result)| Named::new(&samples.condition, result.map(ComparisonEntry::from)))
        .collect();
    let report = CompareReport {
        first_label: config.first_label,
        second_label: config.second_label,
        test,
        conditions,
    };

    arg.output.emit(report, print_comparison)
}

fn print_comparison(out: &mut Output, report: &CompareReport) -> io::Result<()> {
    writeln!(
        out,
        "{} vs {} ({} t-test, two-sided)",
        report.first_label, report.second_label, report.test
    )?;
    writeln!(out)?;
    writeln!(
        out,
        "  {:<20} {:>18} {:>18} {:>9} {:>7} {:>10}",
        "Condition", report.first_label, report.second_label, "t", "df", "p-value"
    )?;
    writeln!(out, "  {}", "-".repeat(87))?;
    for entry in &report.conditions {
        match &entry.outcome {
            Outcome::Ok(c) => {
                let first = format!("{:.2} ± {:.2}", c.first.mean, c.first.std_dev);
                let second = format!("{:.2} ± {:.2}", c.second.mean, c.second.std_dev);
                writeln!(
                    out,
                    "  {:<20} {:>18} {:>18} {:>9.3} {:>7.2} {:>10}",
                    entry.name,
                    first,
                    second,
                    c.statistic,
                    c.degrees_of_freedom,
                    util::fmt_p_value(c.p_value)
                )?;
            }
            Outcome::Error(err) => writeln!(out, "  {:<20} error: {err}", entry.name)?,
        }
    }
    Ok(())
}
