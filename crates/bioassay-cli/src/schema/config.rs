//! Dataset configurations, one per subcommand.
//!
//! Missing cells are written as JSON `null`.

use bioassay_analysis::{
    comparison::ConditionSamples,
    mic::MicThreshold,
    survival::EventRow,
    table::{CellRef, Column, MeasurementTable},
};
use serde::{Deserialize, Serialize};

/// Input of `bioassay summarize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct SummarizeConfig {
    /// Control column to normalize against; raw values are summarized when absent
    #[serde(default)]
    pub control: Option<String>,
    /// Cells to treat as missing before any computation
    #[serde(default)]
    pub discard: Vec<CellRef>,
    pub table: MeasurementTable,
}

/// Input of `bioassay survival`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct SurvivalConfig {
    pub control: String,
    pub rows: Vec<EventRow>,
}

/// Replicate readings of one agent along the dilution series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct MicAgent {
    pub name: String,
    pub replicates: Vec<Vec<Option<f64>>>,
}

impl MicAgent {
    pub fn replicate_columns(&self) -> Vec<Column> {
        self.replicates
            .iter()
            .enumerate()
            .map(|(i, values)| Column {
                name: format!("{}_{}", self.name, i + 1),
                values: values.clone(),
            })
            .collect()
    }
}

/// Input of `bioassay mic`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct MicConfig {
    /// Tested concentrations, in the order they were read
    pub concentrations: Vec<f64>,
    pub negative_control: Vec<f64>,
    pub positive_control: Vec<f64>,
    #[serde(default = "default_fraction")]
    pub fraction: f64,
    pub agents: Vec<MicAgent>,
}

fn default_fraction() -> f64 {
    MicThreshold::DEFAULT_FRACTION
}

/// Input of `bioassay compare`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CompareConfig {
    #[serde(default = "default_first_label")]
    pub first_label: String,
    #[serde(default = "default_second_label")]
    pub second_label: String,
    pub conditions: Vec<ConditionSamples>,
}

fn default_first_label() -> String {
    "first".to_owned()
}

fn default_second_label() -> String {
    "second".to_owned()
}
