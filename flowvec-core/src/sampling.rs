//! Exact weighted sampling over small categorical distributions.
//!
//! Draws use a cumulative table and a binary search, so a candidate is chosen
//! with probability exactly proportional to its weight (up to `f64`
//! rounding). Zero-weight candidates occupy an empty interval of the table
//! and are never selected.

use rand::{Rng, distributions::Standard};

use crate::error::SamplingError;

/// A normalized categorical distribution with a cumulative lookup table.
///
/// Indices refer to positions in whatever candidate list the weights were
/// aligned with, typically a node's neighbour list.
///
/// # Examples
/// ```
/// use flowvec_core::Distribution;
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let dist = Distribution::from_weights(&[1.0, 0.0, 3.0])?;
/// assert_eq!(dist.probabilities(), &[0.25, 0.0, 0.75]);
///
/// let mut rng = SmallRng::seed_from_u64(7);
/// for _ in 0..100 {
///     assert_ne!(dist.sample(&mut rng), 1);
/// }
/// # Ok::<(), flowvec_core::SamplingError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Distribution {
    probabilities: Vec<f64>,
    cumulative: Vec<f64>,
    last_positive: usize,
}

impl Distribution {
    /// Normalizes `weights` into a distribution.
    ///
    /// Weights need not sum to one. When their sum overflows they are first
    /// scaled by their maximum.
    ///
    /// # Errors
    /// Returns [`SamplingError::Empty`] for an empty slice,
    /// [`SamplingError::InvalidWeight`] for a negative or non-finite weight,
    /// and [`SamplingError::NonPositiveTotal`] when every weight is zero.
    pub fn from_weights(weights: &[f64]) -> Result<Self, SamplingError> {
        if weights.is_empty() {
            return Err(SamplingError::Empty);
        }

        let mut max = 0.0_f64;
        for (index, &weight) in weights.iter().enumerate() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(SamplingError::InvalidWeight { index, weight });
            }
            max = max.max(weight);
        }
        if max <= 0.0 {
            return Err(SamplingError::NonPositiveTotal {
                total: weights.iter().sum(),
            });
        }

        let total: f64 = weights.iter().sum();
        let probabilities: Vec<f64> = if total.is_finite() {
            weights.iter().map(|w| w / total).collect()
        } else {
            let scaled_total: f64 = weights.iter().map(|w| w / max).sum();
            weights.iter().map(|w| (w / max) / scaled_total).collect()
        };

        let mut cumulative = Vec::with_capacity(probabilities.len());
        let mut running = 0.0_f64;
        let mut last_positive = 0;
        for (index, &probability) in probabilities.iter().enumerate() {
            running += probability;
            cumulative.push(running);
            if probability > 0.0 {
                last_positive = index;
            }
        }

        Ok(Self {
            probabilities,
            cumulative,
            last_positive,
        })
    }

    /// Returns the normalized probabilities.
    #[must_use]
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Returns the probability assigned to `index`, or zero when out of range.
    #[must_use]
    pub fn probability(&self, index: usize) -> f64 {
        self.probabilities.get(index).copied().unwrap_or(0.0)
    }

    /// Returns the number of candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    /// Returns whether the distribution has no candidates. Always `false` for
    /// a successfully constructed distribution.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// Draws one candidate index.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let total = self.cumulative.last().copied().unwrap_or(0.0);
        let draw: f64 = rng.sample(Standard);
        let target = draw * total;
        let index = self.cumulative.partition_point(|&edge| edge <= target);
        // `draw * total` can round up to `total`; fall back to the last
        // candidate that actually carries mass.
        if index > self.last_positive {
            self.last_positive
        } else {
            index
        }
    }
}

/// Draws an index from un-normalized, non-negative `weights`.
///
/// # Errors
/// Returns the same errors as [`Distribution::from_weights`].
///
/// # Examples
/// ```
/// use flowvec_core::choose_weighted;
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let mut rng = SmallRng::seed_from_u64(1);
/// assert_eq!(choose_weighted(&mut rng, &[5.0])?, 0);
/// assert_eq!(choose_weighted(&mut rng, &[0.0, 2.0, 0.0])?, 1);
/// # Ok::<(), flowvec_core::SamplingError>(())
/// ```
pub fn choose_weighted<R: Rng + ?Sized>(
    rng: &mut R,
    weights: &[f64],
) -> Result<usize, SamplingError> {
    Distribution::from_weights(weights).map(|dist| dist.sample(rng))
}

/// Draws one of `candidates` with probability proportional to the parallel
/// entry of `weights`.
///
/// # Errors
/// Returns [`SamplingError::LengthMismatch`] when the slices differ in length,
/// otherwise the same errors as [`Distribution::from_weights`].
pub fn choose_weighted_from<'a, T, R: Rng + ?Sized>(
    rng: &mut R,
    candidates: &'a [T],
    weights: &[f64],
) -> Result<&'a T, SamplingError> {
    if candidates.len() != weights.len() {
        return Err(SamplingError::LengthMismatch {
            candidates: candidates.len(),
            weights: weights.len(),
        });
    }
    let index = choose_weighted(rng, weights)?;
    candidates.get(index).ok_or(SamplingError::Empty)
}
