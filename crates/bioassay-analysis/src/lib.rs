//! Analysis engines for replicate-based bioassays.
//!
//! This crate turns typed experimental tables into statistical results:
//!
//! - **Robust summaries**: percent inhibition relative to a control column,
//!   Tukey outlier exclusion, and mean / standard deviation / SEM per condition
//! - **Survival comparison**: binned mortality counts expanded to per-subject
//!   records, Kaplan-Meier curves, and log-rank tests against a control group
//! - **MIC detection**: first dilution whose growth reading crosses a
//!   control-derived threshold
//! - **Condition comparison**: two-sample t-tests of raw replicates
//! - **Synthetic replicates**: explicitly labelled, seeded draws from reported
//!   statistics
//!
//! Every operation is a pure function of its inputs. Precondition violations
//! are reported as [`AnalysisError`] values; when a batch of columns or groups
//! is processed, each entry carries its own result.
//!
//! # Modules
//!
//! - [`table`]: Validated measurement tables
//! - [`inhibition`]: Normalization to a control column
//! - [`summary`]: Outlier filtering and summary statistics
//! - [`survival`]: Event-time series, Kaplan-Meier curves and log-rank tests
//! - [`mic`]: Minimum inhibitory concentration
//! - [`comparison`]: Per-condition t-tests
//! - [`synthetic`]: Seeded synthetic replicates
//! - [`error`]: Error taxonomy
//!
//! # Examples
//!
//! ```
//! use bioassay_analysis::{
//!     inhibition::normalize_to_control,
//!     summary::summarize,
//!     table::{Column, MeasurementTable},
//! };
//!
//! let table = MeasurementTable::new(vec![
//!     Column::from_values("control", [0.5, 0.5, 0.5]),
//!     Column::from_values("treated", [0.25, 0.25, 0.25]),
//! ])
//! .unwrap();
//! let inhibition = normalize_to_control(&table, "control", &[]).unwrap();
//! let row = summarize(&inhibition).remove(0).unwrap();
//! assert_eq!(row.condition, "treated");
//! assert_eq!((row.mean, row.std_dev, row.sem), (50.0, 0.0, 0.0));
//! ```

pub use self::error::{AnalysisError, MalformedReason};

pub mod comparison;
pub mod error;
pub mod inhibition;
pub mod mic;
pub mod summary;
pub mod survival;
pub mod synthetic;
pub mod table;
