//! Subset fitness: train on the selected columns, score macro-F1 on the
//! held-out fold.
//!
//! This is the expensive objective every optimizer calls. Scores are not
//! cached: the forest is stochastic, so the same mask may score slightly
//! differently on repeated calls. Every score lies in `[0, 1]`.
//!
//! An empty selection scores exactly `0.0` and never reaches the
//! classifier.
//!
//! # Example
//!
//! ```
//! use featsel::classifier::StubClassifier;
//! use featsel::data::synthetic::MajorityVote;
//! use featsel::data::DatasetProvider;
//! use featsel::encoding::FeatureMask;
//! use featsel::fitness::FitnessEvaluator;
//! use featsel::model_selection::stratified_split;
//!
//! let ds = MajorityVote::new(120).with_seed(5).load_dataset().expect("dataset");
//! let split = stratified_split(&ds, 0.7, 123).expect("split");
//! let evaluator = FitnessEvaluator::new(StubClassifier::new());
//!
//! let none = evaluator.evaluate(&FeatureMask::none(10), &split, 25).expect("valid mask");
//! assert_eq!(none, 0.0);
//!
//! let informative = FeatureMask::from_indices(10, &[2, 5, 7]);
//! let score = evaluator.evaluate(&informative, &split, 25).expect("valid mask");
//! assert!((0.0..=1.0).contains(&score));
//! ```

use crate::classifier::{ClassModel, ProbabilisticClassifier};
use crate::encoding::FeatureMask;
use crate::error::{FeatselError, Result};
use crate::metaheuristics::SubsetObjective;
use crate::metrics::macro_f1;
use crate::model_selection::Split;
use crate::primitives::Matrix;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Score of the empty selection.
pub const EMPTY_SUBSET_FITNESS: f64 = 0.0;

/// Score one mask against one train/test pair.
///
/// Projects both folds onto the selected columns, trains `classifier` with
/// `model_budget` trees, takes the most probable class per test row (ties
/// to the lowest class index) and returns macro-F1 over the union of true
/// and predicted labels.
///
/// # Errors
///
/// - [`FeatselError::InvalidMaskLength`] if `mask` does not match the column
///   count of either fold.
/// - [`FeatselError::LabelMismatch`] if a label vector is not row-aligned.
/// - [`FeatselError::TrainingError`] from the classifier.
#[allow(clippy::too_many_arguments)]
pub fn evaluate<C: ProbabilisticClassifier>(
    classifier: &C,
    mask: &FeatureMask,
    train_x: &Matrix<f32>,
    train_y: &[usize],
    test_x: &Matrix<f32>,
    test_y: &[usize],
    model_budget: usize,
    seed: u64,
) -> Result<f64> {
    for cols in [train_x.n_cols(), test_x.n_cols()] {
        if mask.len() != cols {
            return Err(FeatselError::InvalidMaskLength {
                expected: cols,
                actual: mask.len(),
            });
        }
    }
    if train_y.len() != train_x.n_rows() {
        return Err(FeatselError::label_mismatch(format!(
            "{} training labels for {} rows",
            train_y.len(),
            train_x.n_rows()
        )));
    }
    if test_y.len() != test_x.n_rows() {
        return Err(FeatselError::label_mismatch(format!(
            "{} test labels for {} rows",
            test_y.len(),
            test_x.n_rows()
        )));
    }

    let selected = mask.selected();
    if selected.is_empty() {
        tracing::trace!(selected = 0, score = EMPTY_SUBSET_FITNESS, "empty subset");
        return Ok(EMPTY_SUBSET_FITNESS);
    }

    let train = train_x.select_columns(&selected);
    let test = test_x.select_columns(&selected);
    let model = classifier.train(&train, train_y, model_budget, seed)?;
    let predicted = model.predict_proba(&test)?.argmax_rows();
    let score = macro_f1(&predicted, test_y).clamp(0.0, 1.0);

    tracing::trace!(selected = selected.len(), score, "evaluated subset");
    Ok(score)
}

/// Evaluator shared by all optimizers of a run.
///
/// Holds the classifier and counts evaluations across threads. Training
/// seeds are `seed + n` for the n-th call.
#[derive(Debug)]
pub struct FitnessEvaluator<C> {
    classifier: C,
    seed: u64,
    evaluations: AtomicUsize,
}

impl<C: ProbabilisticClassifier> FitnessEvaluator<C> {
    /// Evaluator with base seed 0.
    #[must_use]
    pub fn new(classifier: C) -> Self {
        Self {
            classifier,
            seed: 0,
            evaluations: AtomicUsize::new(0),
        }
    }

    /// Base seed for classifier training.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// The wrapped classifier.
    #[must_use]
    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Calls made so far, including empty subsets.
    #[must_use]
    pub fn evaluations(&self) -> usize {
        self.evaluations.load(Ordering::Relaxed)
    }

    /// Score `mask` on `split` with `model_budget` trees.
    ///
    /// # Errors
    ///
    /// As for [`evaluate`]; additionally [`FeatselError::LabelMismatch`] when a
    /// label lies outside `0..split.n_classes`.
    pub fn evaluate(&self, mask: &FeatureMask, split: &Split, model_budget: usize) -> Result<f64> {
        let n = self.evaluations.fetch_add(1, Ordering::Relaxed);
        if let Some(&bad) = split
            .train_y
            .iter()
            .chain(&split.test_y)
            .find(|&&label| label >= split.n_classes)
        {
            return Err(FeatselError::label_mismatch(format!(
                "label {bad} outside {} classes",
                split.n_classes
            )));
        }
        evaluate(
            &self.classifier,
            mask,
            &split.train_x,
            &split.train_y,
            &split.test_x,
            &split.test_y,
            model_budget,
            self.seed.wrapping_add(n as u64),
        )
    }

    /// Fix the split and budget, producing an optimizer objective.
    #[must_use]
    pub fn bind<'a>(&'a self, split: &'a Split, model_budget: usize) -> BoundEvaluator<'a, C> {
        BoundEvaluator {
            evaluator: self,
            split,
            model_budget,
        }
    }
}

/// A [`FitnessEvaluator`] tied to one split and tree budget.
#[derive(Debug)]
pub struct BoundEvaluator<'a, C> {
    evaluator: &'a FitnessEvaluator<C>,
    split: &'a Split,
    model_budget: usize,
}

impl<C: ProbabilisticClassifier> SubsetObjective for BoundEvaluator<'_, C> {
    fn n_features(&self) -> usize {
        self.split.n_features()
    }

    fn fitness(&self, mask: &FeatureMask) -> Result<f64> {
        self.evaluator.evaluate(mask, self.split, self.model_budget)
    }
}

#[cfg(test)]
#[path = "fitness_tests.rs"]
mod tests;
