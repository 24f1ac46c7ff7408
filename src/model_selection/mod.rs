//! Train/test partitioning.
//!
//! Uses the same per-class grouping and seeded shuffle as a stratified
//! K-fold, cut once at `train_ratio` instead of into folds.

use crate::data::Dataset;
use crate::error::{FeatselError, Result};
use crate::primitives::Matrix;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;

/// A fixed train/test partition of one dataset.
#[derive(Debug, Clone, Serialize)]
pub struct Split {
    /// Training features.
    pub train_x: Matrix<f32>,
    /// Training labels.
    pub train_y: Vec<usize>,
    /// Held-out features.
    pub test_x: Matrix<f32>,
    /// Held-out labels.
    pub test_y: Vec<usize>,
    /// Size of the class space both label vectors index into.
    pub n_classes: usize,
    /// Column names shared by both partitions.
    pub feature_names: Vec<String>,
}

impl Split {
    /// Number of feature columns.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.train_x.n_cols()
    }

    /// Names of the columns a mask selects.
    #[must_use]
    pub fn selected_names(&self, selected: &[usize]) -> Vec<String> {
        selected
            .iter()
            .filter_map(|&i| self.feature_names.get(i).cloned())
            .collect()
    }
}

/// Stratified train/test split.
///
/// Each class keeps `round(count * train_ratio)` rows in the training part,
/// bounded so that a class with at least two rows appears on both sides.
/// A class with a single row goes to training.
///
/// # Errors
///
/// - [`FeatselError::ConfigurationError`] if `train_ratio` is not in `(0, 1)`.
/// - [`FeatselError::Data`] if the test partition would be empty.
///
/// # Examples
///
/// ```
/// use featsel::data::synthetic::MajorityVote;
/// use featsel::data::DatasetProvider;
/// use featsel::model_selection::stratified_split;
///
/// let ds = MajorityVote::new(100).with_seed(3).load_dataset().expect("dataset");
/// let split = stratified_split(&ds, 0.7, 123).expect("split");
/// assert_eq!(split.train_y.len() + split.test_y.len(), 100);
/// ```
pub fn stratified_split(dataset: &Dataset, train_ratio: f64, seed: u64) -> Result<Split> {
    if !(train_ratio > 0.0 && train_ratio < 1.0) {
        return Err(FeatselError::config("train_ratio", train_ratio, "in (0, 1)"));
    }

    let mut class_indices: Vec<Vec<usize>> = vec![Vec::new(); dataset.n_classes()];
    for (i, &label) in dataset.y().iter().enumerate() {
        class_indices[label].push(i);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train_idx = Vec::new();
    let mut test_idx = Vec::new();
    for indices in &mut class_indices {
        let count = indices.len();
        if count == 0 {
            continue;
        }
        indices.shuffle(&mut rng);
        let n_train = if count == 1 {
            1
        } else {
            ((count as f64 * train_ratio).round() as usize).clamp(1, count - 1)
        };
        train_idx.extend_from_slice(&indices[..n_train]);
        test_idx.extend_from_slice(&indices[n_train..]);
    }

    if test_idx.is_empty() {
        return Err(FeatselError::data(
            "stratified split left no rows for testing",
        ));
    }
    train_idx.sort_unstable();
    test_idx.sort_unstable();

    let y = dataset.y();
    tracing::debug!(
        train = train_idx.len(),
        test = test_idx.len(),
        seed,
        "stratified split"
    );
    Ok(Split {
        train_x: dataset.x().select_rows(&train_idx),
        train_y: train_idx.iter().map(|&i| y[i]).collect(),
        test_x: dataset.x().select_rows(&test_idx),
        test_y: test_idx.iter().map(|&i| y[i]).collect(),
        n_classes: dataset.n_classes(),
        feature_names: dataset.names().to_vec(),
    })
}

#[cfg(test)]
#[path = "tests_split_contract.rs"]
mod tests_split_contract;
