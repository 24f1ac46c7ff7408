//! Decision tree classifier and random forest ensemble.
//!
//! This module implements:
//! - CART (Classification and Regression Trees) using Gini impurity
//! - Random Forest: bagged CART trees with per-split feature subsampling,
//!   fitted in parallel, with probability-averaging prediction
//!
//! # Example
//!
//! ```
//! use featsel::primitives::Matrix;
//! use featsel::tree::RandomForestClassifier;
//!
//! let x = Matrix::from_vec(6, 1, vec![0.0, 0.1, 0.2, 1.0, 1.1, 1.2]).expect("6x1");
//! let y = vec![0, 0, 0, 1, 1, 1];
//!
//! let mut forest = RandomForestClassifier::new(10).with_random_state(42);
//! forest.fit(&x, &y).expect("two classes present");
//!
//! let proba = forest.predict_proba(&x).expect("same column count");
//! assert_eq!(proba.shape(), (6, 2));
//! ```

mod helpers;

pub use helpers::gini_impurity;

use crate::error::{FeatselError, Result};
use crate::primitives::Matrix;
use helpers::{
    best_split_for_feature, bootstrap_sample, class_counts, gini_from_counts, majority_class,
    sample_features,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Internal node in a decision tree.
///
/// Contains a split condition (feature and threshold) and pointers to
/// left and right subtrees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Index of the feature to split on
    pub feature_idx: usize,
    /// Threshold value for the split
    pub threshold: f32,
    /// Left subtree (samples where feature <= threshold)
    pub left: Box<TreeNode>,
    /// Right subtree (samples where feature > threshold)
    pub right: Box<TreeNode>,
}

/// Leaf node in a decision tree.
///
/// Keeps the full class distribution of the training samples that reached
/// it so the forest can average probabilities instead of hard votes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Leaf {
    /// Predicted class label for this leaf
    pub class_label: usize,
    /// Fraction of samples per class (length = number of classes)
    pub distribution: Vec<f32>,
    /// Number of training samples in this leaf
    pub n_samples: usize,
}

impl Leaf {
    fn from_counts(counts: &[usize], n_samples: usize) -> Self {
        let n = n_samples.max(1) as f32;
        Self {
            class_label: majority_class(counts),
            distribution: counts.iter().map(|&c| c as f32 / n).collect(),
            n_samples,
        }
    }
}

/// A node in a decision tree (either internal node or leaf).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    /// Internal decision node with split condition
    Node(Node),
    /// Leaf node with class distribution
    Leaf(Leaf),
}

impl TreeNode {
    /// Returns the depth of the tree rooted at this node.
    ///
    /// Leaf nodes have depth 0, internal nodes have depth 1 + max(left, right).
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf(_) => 0,
            TreeNode::Node(node) => 1 + node.left.depth().max(node.right.depth()),
        }
    }

    fn leaf_for(&self, sample: &[f32]) -> &Leaf {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf(leaf) => return leaf,
                TreeNode::Node(internal) => {
                    node = if sample[internal.feature_idx] <= internal.threshold {
                        &internal.left
                    } else {
                        &internal.right
                    };
                }
            }
        }
    }
}

/// How many candidate features each split considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaxFeatures {
    /// Every feature (plain CART)
    All,
    /// `⌊√p⌋` features, at least one (random forest default)
    Sqrt,
    /// A fixed number of features, capped at `p`
    Count(usize),
}

impl MaxFeatures {
    /// Number of candidate features for a dataset with `n_features` columns.
    #[must_use]
    pub fn resolve(self, n_features: usize) -> usize {
        let k = match self {
            Self::All => n_features,
            Self::Sqrt => (n_features as f64).sqrt().floor() as usize,
            Self::Count(k) => k,
        };
        k.clamp(1, n_features.max(1))
    }
}

/// Nodes with fewer samples become leaves.
const MIN_SAMPLES_SPLIT: usize = 2;

struct GrowContext<'a> {
    x: &'a Matrix<f32>,
    y: &'a [usize],
    n_classes: usize,
    max_depth: Option<usize>,
    max_features: usize,
}

fn grow(ctx: &GrowContext<'_>, indices: Vec<usize>, depth: usize, rng: &mut StdRng) -> TreeNode {
    let n_samples = indices.len();
    let counts = class_counts(ctx.y, &indices, ctx.n_classes);

    let pure = counts.iter().filter(|&&c| c > 0).count() <= 1;
    let too_small = n_samples < MIN_SAMPLES_SPLIT;
    let too_deep = ctx.max_depth.is_some_and(|d| depth >= d);
    if pure || too_small || too_deep {
        return TreeNode::Leaf(Leaf::from_counts(&counts, n_samples));
    }

    let parent_impurity = gini_from_counts(&counts, n_samples);
    let candidates = sample_features(ctx.x.n_cols(), ctx.max_features, rng);

    let mut best: Option<(usize, f32, f32)> = None;
    for &feature in &candidates {
        if let Some((threshold, impurity)) =
            best_split_for_feature(ctx.x, ctx.y, &indices, feature, ctx.n_classes)
        {
            if impurity < parent_impurity - 1e-7 && best.map_or(true, |(_, _, b)| impurity < b) {
                best = Some((feature, threshold, impurity));
            }
        }
    }

    let Some((feature_idx, threshold, _)) = best else {
        return TreeNode::Leaf(Leaf::from_counts(&counts, n_samples));
    };

    let (left, right): (Vec<usize>, Vec<usize>) = indices
        .into_iter()
        .partition(|&i| ctx.x.get(i, feature_idx) <= threshold);
    if left.is_empty() || right.is_empty() {
        return TreeNode::Leaf(Leaf::from_counts(&counts, n_samples));
    }

    TreeNode::Node(Node {
        feature_idx,
        threshold,
        left: Box::new(grow(ctx, left, depth + 1, rng)),
        right: Box::new(grow(ctx, right, depth + 1, rng)),
    })
}

fn validate_training_data(x: &Matrix<f32>, y: &[usize]) -> Result<()> {
    let n_rows = x.n_rows();
    if n_rows != y.len() {
        return Err(FeatselError::label_mismatch(format!(
            "{} feature rows but {} labels",
            n_rows,
            y.len()
        )));
    }
    if n_rows == 0 {
        return Err(FeatselError::training("cannot fit with zero samples"));
    }
    if x.n_cols() == 0 {
        return Err(FeatselError::training("cannot fit with zero features"));
    }
    Ok(())
}

/// Decision tree classifier using the CART algorithm.
///
/// Uses Gini impurity for splitting criterion and builds trees recursively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTreeClassifier {
    tree: Option<TreeNode>,
    max_depth: Option<usize>,
    max_features: MaxFeatures,
    random_state: Option<u64>,
    /// Number of features the model was trained on (for validation)
    n_features: Option<usize>,
    n_classes: usize,
}

impl DecisionTreeClassifier {
    /// Creates a new decision tree classifier with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: None,
            max_depth: None,
            max_features: MaxFeatures::All,
            random_state: None,
            n_features: None,
            n_classes: 0,
        }
    }

    /// Sets the maximum depth of the tree (root has depth 0).
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Sets how many features each split considers.
    #[must_use]
    pub fn with_max_features(mut self, max_features: MaxFeatures) -> Self {
        self.max_features = max_features;
        self
    }

    /// Sets the random state used for feature subsampling.
    #[must_use]
    pub fn with_random_state(mut self, random_state: u64) -> Self {
        self.random_state = Some(random_state);
        self
    }

    /// Fits the decision tree to training data.
    ///
    /// # Arguments
    ///
    /// * `x` - Training features (n_samples × n_features)
    /// * `y` - Training labels (n_samples class indices)
    ///
    /// # Errors
    ///
    /// Returns an error if the data is empty or `x` and `y` disagree in length.
    pub fn fit(&mut self, x: &Matrix<f32>, y: &[usize]) -> Result<()> {
        validate_training_data(x, y)?;
        let n_classes = y.iter().max().map_or(0, |&m| m + 1);
        let mut rng = match self.random_state {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.grow_on(x, y, (0..x.n_rows()).collect(), n_classes, &mut rng);
        Ok(())
    }

    fn grow_on(
        &mut self,
        x: &Matrix<f32>,
        y: &[usize],
        indices: Vec<usize>,
        n_classes: usize,
        rng: &mut StdRng,
    ) {
        let ctx = GrowContext {
            x,
            y,
            n_classes,
            max_depth: self.max_depth,
            max_features: self.max_features.resolve(x.n_cols()),
        };
        self.tree = Some(grow(&ctx, indices, 0, rng));
        self.n_features = Some(x.n_cols());
        self.n_classes = n_classes;
    }

    fn fitted(&self, x: &Matrix<f32>) -> Result<&TreeNode> {
        let tree = self
            .tree
            .as_ref()
            .ok_or_else(|| FeatselError::training("model not fitted"))?;
        if let Some(expected) = self.n_features {
            if x.n_cols() != expected {
                return Err(FeatselError::data(format!(
                    "feature count mismatch: model was trained with {expected} features but input has {}",
                    x.n_cols()
                )));
            }
        }
        Ok(tree)
    }

    /// Predicts class labels for samples.
    ///
    /// # Errors
    ///
    /// Returns an error if called before `fit` or if the column count differs.
    pub fn predict(&self, x: &Matrix<f32>) -> Result<Vec<usize>> {
        let tree = self.fitted(x)?;
        Ok((0..x.n_rows())
            .map(|r| tree.leaf_for(x.row(r)).class_label)
            .collect())
    }

    /// Class distribution of the leaf each sample lands in.
    ///
    /// # Errors
    ///
    /// Returns an error if called before `fit` or if the column count differs.
    pub fn predict_proba(&self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        let tree = self.fitted(x)?;
        let mut data = Vec::with_capacity(x.n_rows() * self.n_classes);
        for r in 0..x.n_rows() {
            data.extend_from_slice(&tree.leaf_for(x.row(r)).distribution);
        }
        Matrix::from_vec(x.n_rows(), self.n_classes, data).map_err(FeatselError::data)
    }

    /// Depth of the fitted tree, 0 when unfitted.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.tree.as_ref().map_or(0, TreeNode::depth)
    }

    /// Number of classes seen during fit.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }
}

impl Default for DecisionTreeClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Random Forest classifier - an ensemble of decision trees.
///
/// Each tree is trained on a bootstrap sample with `√p` candidate features
/// per split. Trees are fitted in parallel on the current rayon pool;
/// predictions average the per-tree leaf distributions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestClassifier {
    trees: Vec<DecisionTreeClassifier>,
    n_estimators: usize,
    max_depth: Option<usize>,
    max_features: MaxFeatures,
    random_state: Option<u64>,
    n_classes: usize,
    n_features: usize,
}

impl RandomForestClassifier {
    /// Creates a new Random Forest classifier.
    ///
    /// # Arguments
    ///
    /// * `n_estimators` - Number of trees in the forest
    #[must_use]
    pub fn new(n_estimators: usize) -> Self {
        Self {
            trees: Vec::new(),
            n_estimators,
            max_depth: None,
            max_features: MaxFeatures::Sqrt,
            random_state: None,
            n_classes: 0,
            n_features: 0,
        }
    }

    /// Sets the maximum depth for each tree.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Sets how many features each split considers.
    #[must_use]
    pub fn with_max_features(mut self, max_features: MaxFeatures) -> Self {
        self.max_features = max_features;
        self
    }

    /// Sets the random state for reproducibility.
    #[must_use]
    pub fn with_random_state(mut self, random_state: u64) -> Self {
        self.random_state = Some(random_state);
        self
    }

    /// Fits the random forest to training data.
    ///
    /// # Errors
    ///
    /// Returns [`FeatselError::TrainingError`] if there are no trees to fit or
    /// fewer than two distinct classes, and [`FeatselError::LabelMismatch`]
    /// if `x` and `y` disagree in length.
    pub fn fit(&mut self, x: &Matrix<f32>, y: &[usize]) -> Result<()> {
        validate_training_data(x, y)?;
        if self.n_estimators == 0 {
            return Err(FeatselError::training("forest needs at least one tree"));
        }

        let mut distinct: Vec<usize> = y.to_vec();
        distinct.sort_unstable();
        distinct.dedup();
        if distinct.len() < 2 {
            return Err(FeatselError::training(format!(
                "need at least 2 distinct classes, found {}",
                distinct.len()
            )));
        }

        let n_classes = distinct.last().map_or(0, |&m| m + 1);
        let n_samples = x.n_rows();

        // Tree seeds come from one stream so nearby random states share none.
        let mut seeder = match self.random_state {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        let seeds: Vec<u64> = (0..self.n_estimators).map(|_| seeder.gen()).collect();

        let template = DecisionTreeClassifier {
            max_depth: self.max_depth,
            max_features: self.max_features,
            ..DecisionTreeClassifier::new()
        };

        self.trees = seeds
            .into_par_iter()
            .map(|seed| {
                let mut rng = StdRng::seed_from_u64(seed);
                let sample = bootstrap_sample(n_samples, &mut rng);
                let mut tree = template.clone();
                tree.grow_on(x, y, sample, n_classes, &mut rng);
                tree
            })
            .collect();
        self.n_classes = n_classes;
        self.n_features = x.n_cols();

        Ok(())
    }

    /// Predict class probabilities for input features.
    ///
    /// Returns a `(n_samples, n_classes)` matrix whose columns are class
    /// indices and whose rows sum to 1.
    ///
    /// # Errors
    ///
    /// Returns an error if the forest is unfitted or the column count differs.
    pub fn predict_proba(&self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        if self.trees.is_empty() {
            return Err(FeatselError::training("model not fitted"));
        }

        let n_samples = x.n_rows();
        let mut proba = vec![0.0f32; n_samples * self.n_classes];
        for tree in &self.trees {
            let tree_proba = tree.predict_proba(x)?;
            for (acc, &p) in proba.iter_mut().zip(tree_proba.as_slice()) {
                *acc += p;
            }
        }

        let n_trees = self.trees.len() as f32;
        for p in &mut proba {
            *p /= n_trees;
        }

        Matrix::from_vec(n_samples, self.n_classes, proba).map_err(FeatselError::data)
    }

    /// Predicts the class with the highest averaged probability.
    ///
    /// # Errors
    ///
    /// Returns an error if the forest is unfitted or the column count differs.
    pub fn predict(&self, x: &Matrix<f32>) -> Result<Vec<usize>> {
        Ok(self.predict_proba(x)?.argmax_rows())
    }

    /// Number of fitted trees.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Number of classes (probability columns).
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Number of feature columns the forest was fitted on.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
