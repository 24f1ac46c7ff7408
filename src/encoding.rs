//! Conversions between optimizer representations and feature masks.
//!
//! The GA searches bit strings directly, while PSO and SA move through the
//! continuous box `[0, 1]^n`. Both reach the fitness evaluator through a
//! [`FeatureMask`].
//!
//! Rounding rule for continuous coordinates: values are first clamped to
//! `[0, 1]`, then `x >= 0.5` selects the column. A coordinate of exactly
//! `0.5` therefore always selects.
//!
//! # Example
//!
//! ```
//! use featsel::encoding::{decode_continuous, FeatureMask};
//!
//! let mask = decode_continuous(&[0.1, 0.5, 0.9, -3.0]);
//! assert_eq!(mask.selected(), vec![1, 2]);
//! assert_eq!(mask.to_unit(), vec![0.0, 1.0, 1.0, 0.0]);
//! ```

use crate::error::{FeatselError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Threshold at or above which a continuous coordinate selects its column.
pub const SELECTION_THRESHOLD: f64 = 0.5;

/// Boolean selector over the columns of a feature matrix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureMask(Vec<bool>);

impl FeatureMask {
    /// Wraps raw bits.
    #[must_use]
    pub fn new(bits: Vec<bool>) -> Self {
        Self(bits)
    }

    /// Mask selecting every column.
    #[must_use]
    pub fn all(n: usize) -> Self {
        Self(vec![true; n])
    }

    /// Mask selecting no column.
    #[must_use]
    pub fn none(n: usize) -> Self {
        Self(vec![false; n])
    }

    /// Mask of length `n` selecting `indices`. Out-of-range indices are ignored.
    #[must_use]
    pub fn from_indices(n: usize, indices: &[usize]) -> Self {
        let mut bits = vec![false; n];
        for &i in indices {
            if let Some(b) = bits.get_mut(i) {
                *b = true;
            }
        }
        Self(bits)
    }

    /// Indices of the selected columns, ascending.
    #[must_use]
    pub fn selected(&self) -> Vec<usize> {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(i, &b)| b.then_some(i))
            .collect()
    }

    /// Number of selected columns.
    #[must_use]
    pub fn count(&self) -> usize {
        self.0.iter().filter(|&&b| b).count()
    }

    /// Mask length (total column count).
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for a zero-length mask.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when no column is selected.
    #[must_use]
    pub fn is_none_selected(&self) -> bool {
        !self.0.iter().any(|&b| b)
    }

    /// Whether column `i` is selected.
    #[must_use]
    pub fn is_selected(&self, i: usize) -> bool {
        self.0.get(i).copied().unwrap_or(false)
    }

    /// Coordinates in `{0.0, 1.0}` that decode back to this mask.
    #[must_use]
    pub fn to_unit(&self) -> Vec<f64> {
        self.0.iter().map(|&b| if b { 1.0 } else { 0.0 }).collect()
    }

    /// Underlying bits.
    #[must_use]
    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    /// Consumes the mask, returning its bits.
    #[must_use]
    pub fn into_inner(self) -> Vec<bool> {
        self.0
    }
}

impl From<Vec<bool>> for FeatureMask {
    fn from(bits: Vec<bool>) -> Self {
        Self(bits)
    }
}

impl fmt::Display for FeatureMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            f.write_str(if b { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// GA bit strings are already masks.
#[must_use]
pub fn encode_ga(bits: &[bool]) -> FeatureMask {
    FeatureMask(bits.to_vec())
}

/// Round a single coordinate: clamp to `[0, 1]`, then select at `>= 0.5`.
///
/// NaN never selects.
#[inline]
#[must_use]
pub fn decode_coordinate(x: f64) -> bool {
    x.clamp(0.0, 1.0) >= SELECTION_THRESHOLD
}

/// Decode a point of `[0, 1]^n` into a mask.
///
/// Callers own the dimensionality; use [`decode_continuous_checked`] when the
/// vector comes from outside the optimizer.
#[must_use]
pub fn decode_continuous(params: &[f64]) -> FeatureMask {
    FeatureMask(params.iter().map(|&x| decode_coordinate(x)).collect())
}

/// Decode with an explicit dimensionality check.
///
/// # Errors
///
/// Returns [`FeatselError::InvalidMaskLength`] if `params.len() != n_features`.
pub fn decode_continuous_checked(params: &[f64], n_features: usize) -> Result<FeatureMask> {
    if params.len() != n_features {
        return Err(FeatselError::InvalidMaskLength {
            expected: n_features,
            actual: params.len(),
        });
    }
    Ok(decode_continuous(params))
}
