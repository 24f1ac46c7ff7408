//! Synthetic majority-vote classification data.
//!
//! Every column is an independent standard normal draw. The label is 1 when
//! a strict majority of the informative columns are positive, 0 otherwise,
//! optionally flipped with probability `label_noise`. All other columns are
//! pure noise, so a good subset search recovers the informative ones.

use super::{Dataset, DatasetProvider};
use crate::error::{FeatselError, Result};
use crate::primitives::{randn, Matrix};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generator for the majority-vote dataset.
///
/// # Examples
///
/// ```
/// use featsel::data::synthetic::MajorityVote;
/// use featsel::data::DatasetProvider;
///
/// let ds = MajorityVote::new(200).with_seed(1).load_dataset().expect("valid generator");
/// assert_eq!(ds.n_features(), 10);
/// assert_eq!(ds.n_classes(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MajorityVote {
    n_samples: usize,
    n_features: usize,
    informative: Vec<usize>,
    label_noise: f64,
    seed: u64,
}

impl MajorityVote {
    /// `n_samples` rows, 10 columns, informative columns `{2, 5, 7}`.
    #[must_use]
    pub fn new(n_samples: usize) -> Self {
        Self {
            n_samples,
            n_features: 10,
            informative: vec![2, 5, 7],
            label_noise: 0.0,
            seed: 0,
        }
    }

    #[must_use]
    pub fn with_n_features(mut self, n_features: usize) -> Self {
        self.n_features = n_features;
        self
    }

    /// Columns that vote on the label.
    #[must_use]
    pub fn with_informative(mut self, informative: Vec<usize>) -> Self {
        self.informative = informative;
        self
    }

    /// Probability of flipping each label.
    #[must_use]
    pub fn with_label_noise(mut self, label_noise: f64) -> Self {
        self.label_noise = label_noise;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// The informative column indices.
    #[must_use]
    pub fn informative(&self) -> &[usize] {
        &self.informative
    }

    fn validate(&self) -> Result<()> {
        if self.n_samples < 2 {
            return Err(FeatselError::config("n_samples", self.n_samples, ">= 2"));
        }
        if self.n_features == 0 {
            return Err(FeatselError::config("n_features", self.n_features, ">= 1"));
        }
        if self.informative.is_empty() {
            return Err(FeatselError::config("informative", "[]", "at least one column"));
        }
        if let Some(&bad) = self.informative.iter().find(|&&i| i >= self.n_features) {
            return Err(FeatselError::config(
                "informative",
                bad,
                format!("< n_features ({})", self.n_features),
            ));
        }
        if !(0.0..=0.5).contains(&self.label_noise) {
            return Err(FeatselError::config("label_noise", self.label_noise, "in [0, 0.5]"));
        }
        Ok(())
    }
}

impl DatasetProvider for MajorityVote {
    fn load_dataset(&self) -> Result<Dataset> {
        self.validate()?;
        let mut rng = StdRng::seed_from_u64(self.seed);

        let mut values = Vec::with_capacity(self.n_samples * self.n_features);
        let mut y = Vec::with_capacity(self.n_samples);
        for _ in 0..self.n_samples {
            let row: Vec<f32> = (0..self.n_features).map(|_| randn(&mut rng) as f32).collect();
            let votes = self.informative.iter().filter(|&&i| row[i] > 0.0).count();
            let mut label = usize::from(2 * votes > self.informative.len());
            if self.label_noise > 0.0 && rng.gen::<f64>() < self.label_noise {
                label = 1 - label;
            }
            values.extend(row);
            y.push(label);
        }

        let x = Matrix::from_vec(self.n_samples, self.n_features, values)
            .map_err(FeatselError::data)?;
        let names = (0..self.n_features).map(|i| format!("x{i}")).collect();
        tracing::debug!(
            rows = self.n_samples,
            features = self.n_features,
            informative = ?self.informative,
            "generated majority-vote dataset"
        );
        Dataset::new(names, x, y, vec!["0".into(), "1".into()])
    }
}
