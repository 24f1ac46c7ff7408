//! Probabilistic classifiers as a black-box capability.
//!
//! The fitness evaluator only needs `train` and `predict_proba`. Two
//! implementations ship with the crate:
//!
//! - [`ForestClassifier`]: bagged CART forest from [`crate::tree`], tree
//!   fitting parallelized on a dedicated rayon pool.
//! - [`StubClassifier`]: deterministic nearest-centroid stand-in that counts
//!   how often it is trained.

use crate::error::{FeatselError, Result};
use crate::primitives::Matrix;
use crate::tree::{MaxFeatures, RandomForestClassifier};
use rayon::ThreadPool;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A trained model producing per-class probabilities.
pub trait ClassModel: Send + Sync {
    /// Probability matrix of shape `(n_rows, n_classes)`; column `c` is class
    /// index `c`.
    ///
    /// # Errors
    ///
    /// Returns an error if `x` has a different column count than the
    /// training data.
    fn predict_proba(&self, x: &Matrix<f32>) -> Result<Matrix<f32>>;

    /// Number of probability columns.
    fn n_classes(&self) -> usize;
}

/// Something that can fit a [`ClassModel`] under a tree budget.
pub trait ProbabilisticClassifier: Sync {
    /// Model type returned by [`train`](Self::train).
    type Model: ClassModel;

    /// Fits a model on `x`/`y` with `num_trees` ensemble members.
    ///
    /// # Errors
    ///
    /// Returns [`FeatselError::TrainingError`] if `y` has fewer than two
    /// distinct classes or the budget is zero.
    fn train(&self, x: &Matrix<f32>, y: &[usize], num_trees: usize, seed: u64)
        -> Result<Self::Model>;
}

fn require_two_classes(y: &[usize]) -> Result<()> {
    let first = y.first().copied();
    if first.map_or(true, |c| y.iter().all(|&l| l == c)) {
        return Err(FeatselError::training(
            "need at least 2 distinct classes in training labels",
        ));
    }
    Ok(())
}

/// Random forest trainer.
///
/// # Examples
///
/// ```
/// use featsel::classifier::{ClassModel, ForestClassifier, ProbabilisticClassifier};
/// use featsel::primitives::Matrix;
///
/// let x = Matrix::from_vec(4, 1, vec![0.0, 0.1, 1.0, 1.1]).expect("4x1");
/// let clf = ForestClassifier::new(1).expect("pool");
/// let model = clf.train(&x, &[0, 0, 1, 1], 10, 7).expect("train");
/// assert_eq!(model.predict_proba(&x).expect("proba").shape(), (4, 2));
/// ```
#[derive(Debug, Clone)]
pub struct ForestClassifier {
    pool: Arc<ThreadPool>,
    max_depth: Option<usize>,
    max_features: MaxFeatures,
}

impl ForestClassifier {
    /// Forest trainer with its own pool of `n_threads` workers
    /// (0 = rayon's default, one per core).
    ///
    /// # Errors
    ///
    /// Returns [`FeatselError::ConfigurationError`] if the pool cannot be built.
    pub fn new(n_threads: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(n_threads)
            .thread_name(|i| format!("featsel-forest-{i}"))
            .build()
            .map_err(|e| FeatselError::config("n_threads", n_threads, e.to_string()))?;
        Ok(Self {
            pool: Arc::new(pool),
            max_depth: None,
            max_features: MaxFeatures::Sqrt,
        })
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    #[must_use]
    pub fn with_max_features(mut self, max_features: MaxFeatures) -> Self {
        self.max_features = max_features;
        self
    }

    /// Worker count of the training pool.
    #[must_use]
    pub fn n_threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

impl ProbabilisticClassifier for ForestClassifier {
    type Model = RandomForestClassifier;

    fn train(
        &self,
        x: &Matrix<f32>,
        y: &[usize],
        num_trees: usize,
        seed: u64,
    ) -> Result<RandomForestClassifier> {
        require_two_classes(y)?;
        let mut forest = RandomForestClassifier::new(num_trees)
            .with_max_features(self.max_features)
            .with_random_state(seed);
        if let Some(depth) = self.max_depth {
            forest = forest.with_max_depth(depth);
        }
        self.pool.install(|| forest.fit(x, y))?;
        Ok(forest)
    }
}

impl ClassModel for RandomForestClassifier {
    fn predict_proba(&self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        RandomForestClassifier::predict_proba(self, x)
    }

    fn n_classes(&self) -> usize {
        RandomForestClassifier::n_classes(self)
    }
}

/// Deterministic classifier for tests.
///
/// Predicts the class whose training centroid is nearest (squared Euclidean)
/// and puts all probability mass on it. Every `train` call is counted.
#[derive(Debug, Default)]
pub struct StubClassifier {
    train_calls: AtomicUsize,
}

impl StubClassifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times [`ProbabilisticClassifier::train`] has run.
    #[must_use]
    pub fn train_calls(&self) -> usize {
        self.train_calls.load(Ordering::Relaxed)
    }
}

/// Per-class centroids fitted by [`StubClassifier`].
#[derive(Debug, Clone)]
pub struct CentroidModel {
    centroids: Vec<Option<Vec<f32>>>,
    n_features: usize,
}

impl ProbabilisticClassifier for StubClassifier {
    type Model = CentroidModel;

    fn train(&self, x: &Matrix<f32>, y: &[usize], num_trees: usize, _seed: u64) -> Result<CentroidModel> {
        self.train_calls.fetch_add(1, Ordering::Relaxed);
        if x.n_rows() != y.len() {
            return Err(FeatselError::label_mismatch(format!(
                "{} labels for {} rows",
                y.len(),
                x.n_rows()
            )));
        }
        if num_trees == 0 {
            return Err(FeatselError::training("model budget must be positive"));
        }
        require_two_classes(y)?;

        let n_classes = y.iter().max().map_or(0, |&m| m + 1);
        let n_features = x.n_cols();
        let mut sums = vec![vec![0.0f32; n_features]; n_classes];
        let mut counts = vec![0usize; n_classes];
        for (r, &label) in y.iter().enumerate() {
            counts[label] += 1;
            for (acc, &v) in sums[label].iter_mut().zip(x.row(r)) {
                *acc += v;
            }
        }
        let centroids = sums
            .into_iter()
            .zip(counts)
            .map(|(sum, n)| (n > 0).then(|| sum.into_iter().map(|s| s / n as f32).collect()))
            .collect();
        Ok(CentroidModel {
            centroids,
            n_features,
        })
    }
}

impl ClassModel for CentroidModel {
    fn predict_proba(&self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        if x.n_cols() != self.n_features {
            return Err(FeatselError::data(format!(
                "model fitted on {} columns, got {}",
                self.n_features,
                x.n_cols()
            )));
        }
        let n_classes = self.centroids.len();
        let mut proba = Matrix::<f32>::zeros(x.n_rows(), n_classes);
        for r in 0..x.n_rows() {
            let row = x.row(r);
            let nearest = self
                .centroids
                .iter()
                .enumerate()
                .filter_map(|(c, centroid)| {
                    centroid.as_ref().map(|cen| {
                        let d: f32 = cen.iter().zip(row).map(|(a, b)| (a - b).powi(2)).sum();
                        (c, d)
                    })
                })
                .fold(None::<(usize, f32)>, |best, (c, d)| match best {
                    Some((_, bd)) if bd <= d => best,
                    _ => Some((c, d)),
                });
            if let Some((c, _)) = nearest {
                proba.set(r, c, 1.0);
            }
        }
        Ok(proba)
    }

    fn n_classes(&self) -> usize {
        self.centroids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blobs() -> (Matrix<f32>, Vec<usize>) {
        let x = Matrix::from_vec(6, 1, vec![0.0, 0.2, 0.1, 5.0, 5.2, 5.1]).expect("6x1");
        (x, vec![0, 0, 0, 1, 1, 1])
    }

    #[test]
    fn test_stub_is_deterministic_and_counts_calls() {
        let (x, y) = blobs();
        let stub = StubClassifier::new();
        let a = stub.train(&x, &y, 1, 0).expect("train a");
        let b = stub.train(&x, &y, 1, 99).expect("train b");
        assert_eq!(stub.train_calls(), 2);
        assert_eq!(
            a.predict_proba(&x).expect("a").as_slice(),
            b.predict_proba(&x).expect("b").as_slice()
        );
        assert_eq!(a.predict_proba(&x).expect("a").argmax_rows(), y);
    }

    #[test]
    fn test_single_class_is_training_error() {
        let (x, _) = blobs();
        let stub = StubClassifier::new();
        let err = stub.train(&x, &[1; 6], 1, 0).expect_err("one class");
        assert!(matches!(err, FeatselError::TrainingError { .. }));

        let forest = ForestClassifier::new(1).expect("pool");
        assert!(matches!(
            forest.train(&x, &[0; 6], 5, 0),
            Err(FeatselError::TrainingError { .. })
        ));
    }

    #[test]
    fn test_forest_trains_on_its_pool() {
        let (x, y) = blobs();
        let clf = ForestClassifier::new(2).expect("pool");
        assert_eq!(clf.n_threads(), 2);
        let model = clf.train(&x, &y, 15, 3).expect("train");
        assert_eq!(model.n_classes(), 2);
        assert_eq!(model.predict(&x).expect("predict"), y);
    }

    #[test]
    fn test_stub_rejects_column_mismatch() {
        let (x, y) = blobs();
        let model = StubClassifier::new().train(&x, &y, 1, 0).expect("train");
        let wide = Matrix::from_vec(1, 2, vec![0.0, 0.0]).expect("1x2");
        assert!(model.predict_proba(&wide).is_err());
    }
}
