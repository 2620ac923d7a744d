//! Opt-in generation of replicate values from reported summary statistics.
//!
//! Nothing else in this crate calls into this module. Generated columns are
//! always tagged with [`Provenance::Synthetic`] and the seed that reproduces
//! them.

use rand::{Rng as _, SeedableRng as _};
use rand_distr::Normal;
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};

use crate::{
    error::{AnalysisError, MalformedReason},
    table::Column,
};

/// Where the values of a column came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Provenance {
    Measured,
    /// Drawn from a normal distribution with the given seed.
    Synthetic { seed: u64 },
}

/// Reported statistics to draw replicates from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SyntheticParameters {
    pub mean: f64,
    pub std_dev: f64,
    pub count: usize,
    pub seed: u64,
}

/// A column together with the origin of its values.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelledColumn {
    pub column: Column,
    pub provenance: Provenance,
}

/// Draws `count` normally distributed replicates.
///
/// The same parameters always produce the same values.
///
/// # Errors
///
/// Returns [`AnalysisError::MalformedInput`] for a zero count, a non-finite
/// mean, or a negative or non-finite standard deviation.
///
/// # Examples
///
/// ```
/// use bioassay_analysis::synthetic::{Provenance, SyntheticParameters, generate};
///
/// let params = SyntheticParameters { mean: 12.0, std_dev: 1.5, count: 5, seed: 7 };
/// let a = generate("tensile", &params).unwrap();
/// let b = generate("tensile", &params).unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.provenance, Provenance::Synthetic { seed: 7 });
/// assert_eq!(a.column.values.len(), 5);
/// ```
pub fn generate(name: &str, params: &SyntheticParameters) -> Result<LabelledColumn, AnalysisError> {
    let invalid = |detail: &str| {
        AnalysisError::malformed(
            name,
            MalformedReason::InvalidSyntheticParameters {
                detail: detail.to_owned(),
            },
        )
    };
    if params.count == 0 {
        return Err(invalid("count must be positive"));
    }
    if !params.mean.is_finite() {
        return Err(invalid("mean must be finite"));
    }
    if !params.std_dev.is_finite() || params.std_dev < 0.0 {
        return Err(invalid("standard deviation must be finite and non-negative"));
    }
    let normal = Normal::new(params.mean, params.std_dev)
        .map_err(|e| invalid(&e.to_string()))?;

    let mut rng = Pcg64::seed_from_u64(params.seed);
    let column = Column::from_values(name, (0..params.count).map(|_| rng.sample(normal)));
    log::debug!(
        "generated {} synthetic value(s) for '{name}' (seed {})",
        params.count,
        params.seed
    );
    Ok(LabelledColumn {
        column,
        provenance: Provenance::Synthetic { seed: params.seed },
    })
}
