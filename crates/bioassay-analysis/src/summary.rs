//! Robust per-condition summaries with Tukey outlier exclusion.

use bioassay_stats::{descriptive::DescriptiveStats, fences::TukeyFences};

use crate::{
    error::AnalysisError,
    table::{Column, MeasurementTable},
};

/// A column's values split by its own Tukey fences.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredColumn {
    /// Values inside the fences, in input order.
    pub retained: Vec<f64>,
    /// Values strictly outside the fences, in input order.
    pub excluded: Vec<f64>,
    /// Fences computed from the column's present values; `None` when the column
    /// has no present value.
    pub fences: Option<TukeyFences>,
}

/// Summary statistics of one condition after outlier exclusion.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub condition: String,
    /// Number of retained values.
    pub count: usize,
    /// Values removed as outliers.
    pub excluded: Vec<f64>,
    pub mean: f64,
    /// Sample standard deviation (denominator `n − 1`).
    pub std_dev: f64,
    /// Standard error of the mean, `std_dev / √count`.
    pub sem: f64,
    pub fences: TukeyFences,
}

/// Repeats Tukey filtering on `values` until a pass excludes nothing.
///
/// Returns the fences of the final pass and, per input value, whether it was
/// kept. At least one value always survives a pass, so the loop ends after at
/// most `values.len()` passes.
fn stable_fences(values: &[f64]) -> Option<(TukeyFences, Vec<bool>)> {
    let mut kept = vec![true; values.len()];
    loop {
        let current = values
            .iter()
            .zip(&kept)
            .filter_map(|(v, k)| k.then_some(*v))
            .collect::<Vec<_>>();
        let fences = TukeyFences::from_values(&current)?;
        let mut changed = false;
        for (v, k) in values.iter().zip(&mut kept) {
            if *k && !fences.contains(*v) {
                *k = false;
                changed = true;
            }
        }
        if !changed {
            return Some((fences, kept));
        }
    }
}

/// Splits the present values of `column` into retained values and outliers.
///
/// Quartiles come from the column's own present values; missing cells are
/// ignored and never counted as outliers. Excluding an outlier shifts the
/// quartiles, so the fences are recomputed on the retained values until no
/// further value falls outside them. Filtering the retained values again
/// therefore excludes nothing.
///
/// # Examples
///
/// ```
/// use bioassay_analysis::{summary::filter_outliers, table::Column};
///
/// let column = Column::from_values("t", [48.0, 51.0, 50.0, 49.0, 95.0]);
/// let filtered = filter_outliers(&column);
/// assert_eq!(filtered.retained, [48.0, 51.0, 50.0, 49.0]);
/// assert_eq!(filtered.excluded, [95.0]);
/// ```
#[must_use]
pub fn filter_outliers(column: &Column) -> FilteredColumn {
    let values = column.present_values().collect::<Vec<_>>();
    let Some((fences, kept)) = stable_fences(&values) else {
        return FilteredColumn {
            retained: vec![],
            excluded: vec![],
            fences: None,
        };
    };
    let (retained, excluded): (Vec<_>, Vec<_>) = values
        .iter()
        .zip(&kept)
        .partition(|(_, k)| **k);
    let retained = retained.into_iter().map(|(v, _)| *v).collect::<Vec<_>>();
    let excluded = excluded.into_iter().map(|(v, _)| *v).collect::<Vec<_>>();
    if !excluded.is_empty() {
        log::debug!(
            "'{}': excluded {} outlier(s), final fences [{}, {}]",
            column.name,
            excluded.len(),
            fences.lower,
            fences.upper
        );
    }
    FilteredColumn {
        retained,
        excluded,
        fences: Some(fences),
    }
}

/// Returns `table` with every outlier cell set to missing.
///
/// Cells are excluded exactly as [`filter_outliers`] excludes them. Row
/// alignment is preserved so that plotting code can draw box plots from the
/// filtered data.
#[must_use]
pub fn filter_outliers_table(table: &MeasurementTable) -> MeasurementTable {
    let columns = table
        .columns()
        .iter()
        .map(|column| {
            let values = column.present_values().collect::<Vec<_>>();
            let mut kept = stable_fences(&values)
                .map(|(_, kept)| kept)
                .unwrap_or_default()
                .into_iter();
            Column {
                name: column.name.clone(),
                values: column
                    .values
                    .iter()
                    .map(|v| v.filter(|_| kept.next().unwrap_or(false)))
                    .collect(),
            }
        })
        .collect();
    MeasurementTable::from_validated(columns, table.rows())
}

/// Summarizes one column after outlier exclusion.
///
/// # Errors
///
/// Returns [`AnalysisError::InsufficientData`] if fewer than two values
/// remain after filtering.
pub fn summarize_column(column: &Column) -> Result<SummaryRow, AnalysisError> {
    let filtered = filter_outliers(column);
    let fences = filtered.fences.ok_or_else(|| AnalysisError::InsufficientData {
        column: column.name.clone(),
        retained: 0,
    })?;
    let stats = DescriptiveStats::new(filtered.retained.iter().copied())
        .map_err(|e| AnalysisError::insufficient(&column.name, e))?;
    Ok(SummaryRow {
        condition: column.name.clone(),
        count: stats.count,
        excluded: filtered.excluded,
        mean: stats.mean,
        std_dev: stats.std_dev,
        sem: stats.sem,
        fences,
    })
}

/// Summarizes every column of `table` independently, in column order.
///
/// A column that cannot be summarized yields its own error without affecting
/// the others.
///
/// # Examples
///
/// ```
/// use bioassay_analysis::{
///     summary::summarize,
///     table::{Column, MeasurementTable},
/// };
///
/// let table = MeasurementTable::new(vec![
///     Column::from_values("a", [50.0, 50.0, 50.0]),
///     Column::from_values("b", [1.0, 2.0, 3.0]),
/// ])
/// .unwrap();
/// let rows = summarize(&table);
/// let a = rows[0].as_ref().unwrap();
/// assert_eq!((a.mean, a.std_dev, a.sem), (50.0, 0.0, 0.0));
/// assert_eq!(rows[1].as_ref().unwrap().mean, 2.0);
/// ```
#[must_use]
pub fn summarize(table: &MeasurementTable) -> Vec<Result<SummaryRow, AnalysisError>> {
    table
        .columns()
        .iter()
        .map(|column| {
            let row = summarize_column(column);
            if let Err(err) = &row {
                log::warn!("skipping summary of '{}': {err}", column.name);
            }
            row
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let column = Column::from_values("t", [10.0, 12.0, 11.0, 13.0, 60.0, -40.0, 12.5]);
        let once = filter_outliers(&column);
        assert_eq!(once.excluded, [60.0, -40.0]);

        let again = filter_outliers(&Column::from_values("t", once.retained.clone()));
        assert!(again.excluded.is_empty());
        assert_eq!(again.retained, once.retained);
    }

    #[test]
    fn test_filtering_repeats_until_stable() {
        // Dropping 0 moves Q1 from 11.75 to 17, which puts 10 outside the fences.
        let column = Column::from_values("t", [0.0, 17.0, 17.0, 19.0, 19.0, 10.0]);
        let once = filter_outliers(&column);
        assert_eq!(once.retained, [17.0, 17.0, 19.0, 19.0]);
        assert_eq!(once.excluded, [0.0, 10.0]);
        let fences = once.fences.unwrap();
        assert!(once.retained.iter().all(|v| fences.contains(*v)));

        let again = filter_outliers(&Column::from_values("t", once.retained.clone()));
        assert!(again.excluded.is_empty());
        assert_eq!(again.retained, once.retained);

        let table = MeasurementTable::new(vec![Column {
            name: "t".to_owned(),
            values: vec![Some(0.0), Some(17.0), None, Some(17.0), Some(19.0), Some(19.0), Some(10.0)],
        }])
        .unwrap();
        assert_eq!(
            filter_outliers_table(&table).columns()[0].values,
            vec![None, Some(17.0), None, Some(17.0), Some(19.0), Some(19.0), None]
        );

        let row = summarize_column(&column).unwrap();
        assert_eq!(row.count, 4);
        assert_eq!(row.excluded, [0.0, 10.0]);
    }

    #[test]
    fn test_missing_values_are_not_outliers() {
        let column = Column {
            name: "t".to_owned(),
            values: vec![Some(1.0), None, Some(2.0), Some(3.0)],
        };
        let filtered = filter_outliers(&column);
        assert_eq!(filtered.retained, [1.0, 2.0, 3.0]);
        assert!(filtered.excluded.is_empty());

        let empty = Column {
            name: "e".to_owned(),
            values: vec![None, None],
        };
        assert_eq!(filter_outliers(&empty).fences, None);
    }

    #[test]
    fn test_sem_is_std_over_sqrt_n() {
        let table = MeasurementTable::new(vec![
            Column::from_values("a", [3.1, 4.7, 2.2, 5.9, 4.4]),
            Column::from_values("b", [10.0, 11.5, 9.25, 10.75]),
        ])
        .unwrap();
        for row in summarize(&table) {
            let row = row.unwrap();
            #[expect(clippy::cast_precision_loss)]
            let n = row.count as f64;
            assert_close(row.sem, row.std_dev / n.sqrt());
        }
    }

    #[test]
    fn test_single_retained_value_is_insufficient() {
        let table = MeasurementTable::new(vec![
            Column {
                name: "lonely".to_owned(),
                values: vec![Some(1.0), None, None],
            },
            Column::from_values("ok", [1.0, 2.0, 3.0]),
        ])
        .unwrap();
        let rows = summarize(&table);
        assert_eq!(
            rows[0],
            Err(AnalysisError::InsufficientData {
                column: "lonely".to_owned(),
                retained: 1
            })
        );
        assert!(rows[1].is_ok());
    }

    #[test]
    fn test_filter_table_keeps_alignment() {
        let table = MeasurementTable::new(vec![Column {
            name: "t".to_owned(),
            values: vec![Some(48.0), None, Some(51.0), Some(50.0), Some(49.0), Some(95.0)],
        }])
        .unwrap();
        let filtered = filter_outliers_table(&table);
        assert_eq!(
            filtered.columns()[0].values,
            vec![Some(48.0), None, Some(51.0), Some(50.0), Some(49.0), None]
        );
    }

    #[test]
    fn test_inhibition_scenario_summary() {
        let table = MeasurementTable::new(vec![Column::from_values("t", [50.0; 3])]).unwrap();
        let row = summarize(&table).remove(0).unwrap();
        assert_eq!(row.count, 3);
        assert_eq!(row.mean, 50.0);
        assert_eq!(row.std_dev, 0.0);
        assert_eq!(row.sem, 0.0);
    }
}
