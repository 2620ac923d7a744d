//! Normalization of raw readings to percent inhibition relative to a control.

use bioassay_stats::descriptive;

use crate::{
    error::{AnalysisError, MalformedReason},
    table::{CellRef, Column, MeasurementTable},
};

/// Converts every non-control cell to percent inhibition against the mean of
/// `control`.
///
/// Discarded cells are set to missing before the control mean is taken. The
/// control column is dropped from the result; the remaining columns keep their
/// order and row alignment, and missing cells stay missing. Negative
/// inhibition (a treatment reading above the control) is a valid outcome.
///
/// # Errors
///
/// - [`AnalysisError::UnknownColumn`] if `control` or a discarded cell's column is absent.
/// - [`AnalysisError::MalformedInput`] if a discarded cell's row is out of range.
/// - [`AnalysisError::InsufficientData`] if no control value remains after discards.
/// - [`AnalysisError::DivisionByZero`] if the control mean is exactly zero.
/// - [`AnalysisError::MalformedInput`] if a computed inhibition is not finite,
///   as happens when the control mean is subnormal.
///
/// # Examples
///
/// ```
/// use bioassay_analysis::{
///     inhibition::normalize_to_control,
///     table::{Column, MeasurementTable},
/// };
///
/// let table = MeasurementTable::new(vec![
///     Column::from_values("control", [0.5, 0.5, 0.5]),
///     Column::from_values("treated", [0.25, 0.25, 0.25]),
/// ])
/// .unwrap();
/// let inhibition = normalize_to_control(&table, "control", &[]).unwrap();
/// assert_eq!(inhibition.column_names().collect::<Vec<_>>(), ["treated"]);
/// assert_eq!(inhibition.columns()[0].values, vec![Some(50.0); 3]);
/// ```
pub fn normalize_to_control(
    table: &MeasurementTable,
    control: &str,
    discards: &[CellRef],
) -> Result<MeasurementTable, AnalysisError> {
    if table.column(control).is_none() {
        return Err(AnalysisError::UnknownColumn {
            column: control.to_owned(),
        });
    }

    let table = table.with_discarded(discards)?;
    let control_values = table
        .column(control)
        .map(|c| c.present_values().collect::<Vec<_>>())
        .unwrap_or_default();

    let control_mean =
        descriptive::mean(&control_values).ok_or_else(|| AnalysisError::InsufficientData {
            column: control.to_owned(),
            retained: 0,
        })?;
    if control_mean == 0.0 {
        return Err(AnalysisError::DivisionByZero {
            column: control.to_owned(),
        });
    }
    log::debug!(
        "control '{control}': mean {control_mean} over {} value(s)",
        control_values.len()
    );

    let columns = table
        .columns()
        .iter()
        .filter(|c| c.name != control)
        .map(|c| Column {
            name: c.name.clone(),
            values: c
                .values
                .iter()
                .map(|v| v.map(|raw| inhibition(control_mean, raw)))
                .collect(),
        })
        .collect::<Vec<_>>();

    for column in &columns {
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

    Ok(MeasurementTable::from_validated(columns, table.rows()))
}

/// Percent inhibition of `raw` relative to `control_mean`.
#[must_use]
pub fn inhibition(control_mean: f64, raw: f64) -> f64 {
    (control_mean - raw) / control_mean * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: Vec<Column>) -> MeasurementTable {
        MeasurementTable::new(columns).unwrap()
    }

    #[test]
    fn test_control_column_is_dropped() {
        let table = table(vec![
            Column::from_values("a", [1.0, 2.0]),
            Column::from_values("control", [2.0, 2.0]),
            Column::from_values("b", [3.0, 4.0]),
        ]);
        let result = normalize_to_control(&table, "control", &[]).unwrap();
        assert_eq!(result.column_names().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(result.rows(), 2);
        assert_eq!(result.column("b").unwrap().values, vec![Some(-50.0), Some(-100.0)]);
    }

    #[test]
    fn test_value_equal_to_control_mean_is_zero() {
        let table = table(vec![
            Column::from_values("control", [0.25, 0.5, 0.75]),
            Column::from_values("same", [0.5, 0.5, 0.5]),
        ]);
        let result = normalize_to_control(&table, "control", &[]).unwrap();
        for value in result.columns()[0].present_values() {
            assert_eq!(value, 0.0);
        }
    }

    #[test]
    fn test_missing_cells_propagate() {
        let table = table(vec![
            Column::from_values("control", [1.0, 1.0]),
            Column {
                name: "t".to_owned(),
                values: vec![None, Some(0.5)],
            },
        ]);
        let result = normalize_to_control(&table, "control", &[]).unwrap();
        assert_eq!(result.columns()[0].values, vec![None, Some(50.0)]);
    }

    #[test]
    fn test_discards_change_control_mean() {
        let table = table(vec![
            Column::from_values("control", [1.0, 1.0, 100.0]),
            Column::from_values("t", [0.5, 0.5, 0.5]),
        ]);
        let result = normalize_to_control(&table, "control", &[CellRef::new(2, "control")]).unwrap();
        assert_eq!(result.columns()[0].values, vec![Some(50.0); 3]);
    }

    #[test]
    fn test_overflowing_inhibition_is_rejected() {
        let table = table(vec![
            Column::from_values("control", [1e-310, 1e-310]),
            Column::from_values("t", [1e-310, 1.0]),
        ]);
        assert_eq!(
            normalize_to_control(&table, "control", &[]).unwrap_err(),
            AnalysisError::MalformedInput {
                context: "t".to_owned(),
                reason: MalformedReason::NonFiniteValue {
                    column: "t".to_owned(),
                    row: 1
                }
            }
        );
    }

    #[test]
    fn test_errors() {
        let table = table(vec![
            Column::from_values("control", [0.0, 0.0]),
            Column::from_values("t", [1.0, 2.0]),
        ]);
        assert_eq!(
            normalize_to_control(&table, "missing", &[]).unwrap_err(),
            AnalysisError::UnknownColumn {
                column: "missing".to_owned()
            }
        );
        assert_eq!(
            normalize_to_control(&table, "control", &[]).unwrap_err(),
            AnalysisError::DivisionByZero {
                column: "control".to_owned()
            }
        );
        let all_discarded = [CellRef::new(0, "control"), CellRef::new(1, "control")];
        assert_eq!(
            normalize_to_control(&table, "control", &all_discarded).unwrap_err(),
            AnalysisError::InsufficientData {
                column: "control".to_owned(),
                retained: 0
            }
        );
    }
}
