//! Column standardization applied by dataset providers.
//!
//! The search itself never rescales data; providers hand over columns that
//! are already centered and scaled.
//!
//! # Example
//!
//! ```
//! use featsel::primitives::Matrix;
//! use featsel::preprocessing::StandardScaler;
//!
//! let data = Matrix::from_vec(4, 2, vec![
//!     1.0, 100.0,
//!     2.0, 200.0,
//!     3.0, 300.0,
//!     4.0, 400.0,
//! ]).expect("valid matrix dimensions");
//!
//! let mut scaler = StandardScaler::new();
//! let scaled = scaler.fit_transform(&data).expect("fit_transform should succeed");
//! assert!(scaled.get(0, 0).abs() < 2.0);
//! ```

use crate::error::{FeatselError, Result};
use crate::primitives::Matrix;
use serde::{Deserialize, Serialize};

/// Standardizes features by removing mean and scaling to unit variance.
///
/// The standard score of a sample x is: z = (x - mean) / std.
/// Constant columns are centered but left unscaled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Option<Vec<f32>>,
    std: Option<Vec<f32>>,
}

impl StandardScaler {
    /// Creates an unfitted scaler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the scaler has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.mean.is_some()
    }

    /// Per-column means, once fitted.
    #[must_use]
    pub fn mean(&self) -> Option<&[f32]> {
        self.mean.as_deref()
    }

    /// Per-column population standard deviations, once fitted.
    #[must_use]
    pub fn std(&self) -> Option<&[f32]> {
        self.std.as_deref()
    }

    /// Learns per-column mean and standard deviation.
    ///
    /// # Errors
    ///
    /// Returns an error if `x` has no rows.
    pub fn fit(&mut self, x: &Matrix<f32>) -> Result<()> {
        let (n_samples, n_features) = x.shape();
        if n_samples == 0 {
            return Err(FeatselError::data("cannot fit scaler on zero rows"));
        }

        let n = n_samples as f32;
        let mut mean = vec![0.0f32; n_features];
        let mut std = vec![0.0f32; n_features];

        for (j, m) in mean.iter_mut().enumerate() {
            *m = x.column(j).iter().sum::<f32>() / n;
        }
        for (j, s) in std.iter_mut().enumerate() {
            let var = x
                .column(j)
                .iter()
                .map(|v| (v - mean[j]).powi(2))
                .sum::<f32>()
                / n;
            *s = var.sqrt();
        }

        self.mean = Some(mean);
        self.std = Some(std);
        Ok(())
    }

    /// Applies the learned standardization.
    ///
    /// # Errors
    ///
    /// Returns an error if the scaler is not fitted or dimensions mismatch.
    pub fn transform(&self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        let (Some(mean), Some(std)) = (self.mean.as_ref(), self.std.as_ref()) else {
            return Err(FeatselError::data("scaler not fitted"));
        };

        let (n_samples, n_features) = x.shape();
        if n_features != mean.len() {
            return Err(FeatselError::data(format!(
                "scaler fitted on {} columns, got {n_features}",
                mean.len()
            )));
        }

        let mut result = Matrix::<f32>::zeros(n_samples, n_features);
        for i in 0..n_samples {
            for j in 0..n_features {
                let mut val = x.get(i, j) - mean[j];
                if std[j] > 1e-10 {
                    val /= std[j];
                }
                result.set(i, j, val);
            }
        }
        Ok(result)
    }

    /// Fits and transforms in one step.
    ///
    /// # Errors
    ///
    /// Returns an error if `x` has no rows.
    pub fn fit_transform(&mut self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        self.fit(x)?;
        self.transform(x)
    }
}
