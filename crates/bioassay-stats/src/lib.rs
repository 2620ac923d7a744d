//! Statistical primitives for bioassay analysis.
//!
//! This crate provides domain-agnostic numeric building blocks:
//!
//! - **Descriptive statistics**: mean, median, sample variance, standard deviation, SEM
//! - **Percentiles**: linear-interpolation percentiles of a dataset
//! - **Tukey fences**: IQR-based outlier bounds
//! - **Survival analysis**: Kaplan-Meier estimator with exponential Greenwood confidence band
//! - **Log-rank test**: two-sample comparison of survival distributions
//! - **t-test**: two-sample Student and Welch tests
//! - **Special functions**: incomplete gamma/beta, normal distribution, chi-squared tail
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing replicate measurements
//! - [`percentiles`]: Percentile computation and storage
//! - [`fences`]: Interquartile-range outlier fences
//! - [`survival`]: Kaplan-Meier survival curves for time-to-event data
//! - [`logrank`]: Log-rank test between two survival samples
//! - [`ttest`]: Two-sample t-tests
//! - [`special`]: Special functions backing p-values and confidence bands
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use bioassay_stats::descriptive::DescriptiveStats;
//!
//! let stats = DescriptiveStats::new([1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! assert!((stats.sem - stats.std_dev / 5.0_f64.sqrt()).abs() < 1e-12);
//! ```
//!
//! ## Filtering outliers
//!
//! ```
//! use bioassay_stats::fences::TukeyFences;
//!
//! let values = [48.0, 51.0, 50.0, 49.0, 95.0];
//! let fences = TukeyFences::from_values(&values).unwrap();
//! let (retained, excluded) = fences.partition(&values);
//! assert_eq!(retained, vec![48.0, 51.0, 50.0, 49.0]);
//! assert_eq!(excluded, vec![95.0]);
//! ```
//!
//! ## Analyzing survival data
//!
//! ```
//! use bioassay_stats::{
//!     logrank::LogRankTest,
//!     survival::{KaplanMeierCurve, SurvivalObservation},
//! };
//!
//! let treated = vec![
//!     SurvivalObservation::event(24.0),
//!     SurvivalObservation::censored(72.0),
//!     SurvivalObservation::censored(72.0),
//! ];
//! let control = vec![
//!     SurvivalObservation::event(24.0),
//!     SurvivalObservation::event(48.0),
//!     SurvivalObservation::event(48.0),
//! ];
//!
//! let curve = KaplanMeierCurve::from_data(treated.clone());
//! assert!((curve.survival_at(48.0) - 2.0 / 3.0).abs() < 1e-12);
//!
//! let test = LogRankTest::new(&treated, &control).unwrap();
//! assert!(test.p_value < 1.0);
//! ```

pub mod descriptive;
pub mod fences;
pub mod logrank;
pub mod percentiles;
pub mod special;
pub mod survival;
pub mod ttest;
