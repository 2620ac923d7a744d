//! Measurement tables of replicate readings grouped by condition.
//!
//! Rows are replicate positions (no identity beyond their index), columns are
//! named conditions. A cell is either a finite number or missing.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, MalformedReason};

/// A named condition and its replicate values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Condition name, unique within a table.
    pub name: String,
    /// One entry per replicate row; `None` marks a missing cell.
    pub values: Vec<Option<f64>>,
}

impl Column {
    /// Creates a column where every value is present.
    #[must_use]
    pub fn from_values<I>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Some).collect(),
        }
    }

    /// Iterates over the non-missing values in row order.
    pub fn present_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().filter_map(|v| *v)
    }
}

/// Address of a single cell, used to discard known-bad wells.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRef {
    /// Zero-based replicate row.
    pub row: usize,
    /// Column (condition) name.
    pub column: String,
}

impl CellRef {
    #[must_use]
    pub fn new(row: usize, column: impl Into<String>) -> Self {
        Self {
            row,
            column: column.into(),
        }
    }
}

/// A validated table of replicate measurements.
///
/// All columns have the same number of rows, column names are unique, and
/// every present value is finite.
///
/// # Examples
///
/// ```
/// use bioassay_analysis::table::{Column, MeasurementTable};
///
/// let table = MeasurementTable::new(vec![
///     Column::from_values("control", [0.5, 0.5, 0.5]),
///     Column {
///         name: "treated".to_owned(),
///         values: vec![Some(0.25), None, Some(0.2)],
///     },
/// ])
/// .unwrap();
/// assert_eq!(table.rows(), 3);
/// assert_eq!(table.column_names().collect::<Vec<_>>(), ["control", "treated"]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Column>", into = "Vec<Column>")]
pub struct MeasurementTable {
    columns: Vec<Column>,
    rows: usize,
}

impl MeasurementTable {
    /// Validates and wraps `columns`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::MalformedInput`] for ragged or duplicate
    /// columns and for non-finite values.
    pub fn new(columns: Vec<Column>) -> Result<Self, AnalysisError> {
        let rows = columns.first().map_or(0, |c| c.values.len());
        let mut seen = HashSet::new();

        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(AnalysisError::malformed(
                    &column.name,
                    MalformedReason::DuplicateColumn {
                        column: column.name.clone(),
                    },
                ));
            }
            if column.values.len() != rows {
                return Err(AnalysisError::malformed(
                    &column.name,
                    MalformedReason::RaggedColumn {
                        column: column.name.clone(),
                        expected: rows,
                        actual: column.values.len(),
                    },
                ));
            }
            if let Some(row) = column
                .values
                .iter()
                .position(|v| v.is_some_and(|v| !v.is_finite()))
            {
                return Err(AnalysisError::malformed(
                    &column.name,
                    MalformedReason::NonFiniteValue {
                        column: column.name.clone(),
                        row,
                    },
                ));
            }
        }

        Ok(Self { columns, rows })
    }

    /// Number of replicate rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Columns in input order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Looks up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Returns a copy of the table with the given cells set to missing.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::UnknownColumn`] if a cell names a column not in the table.
    /// - [`AnalysisError::MalformedInput`] if a cell's row is out of range.
    pub fn with_discarded(&self, cells: &[CellRef]) -> Result<Self, AnalysisError> {
        let mut table = self.clone();
        for cell in cells {
            let rows = table.rows;
            let column = table
                .columns
                .iter_mut()
                .find(|c| c.name == cell.column)
                .ok_or_else(|| AnalysisError::UnknownColumn {
                    column: cell.column.clone(),
                })?;
            let slot = column.values.get_mut(cell.row).ok_or_else(|| {
                AnalysisError::malformed(
                    &cell.column,
                    MalformedReason::RowOutOfRange {
                        row: cell.row,
                        rows,
                    },
                )
            })?;
            *slot = None;
        }
        Ok(table)
    }

    pub(crate) fn from_validated(columns: Vec<Column>, rows: usize) -> Self {
        debug_assert!(columns.iter().all(|c| c.values.len() == rows));
        Self { columns, rows }
    }
}

impl TryFrom<Vec<Column>> for MeasurementTable {
    type Error = AnalysisError;

    fn try_from(columns: Vec<Column>) -> Result<Self, Self::Error> {
        Self::new(columns)
    }
}

impl From<MeasurementTable> for Vec<Column> {
    fn from(table: MeasurementTable) -> Self {
        table.columns
    }
}
