//! Helper functions for tree building algorithms.
//!
//! Internal helpers used by the decision tree and the random forest.
//! Everything operates on row indices into the shared training matrix so
//! bootstrap samples never copy feature data.

use crate::primitives::Matrix;
use rand::Rng;
use std::cmp::Ordering;

/// Calculate Gini impurity for a set of labels.
///
/// Formula: Gini = 1 - `Σ(p_i²)` where `p_i` is the proportion of class i
#[must_use]
pub fn gini_impurity(labels: &[usize]) -> f32 {
    if labels.is_empty() {
        return 0.0;
    }

    // Count occurrences of each class (BTreeMap for deterministic iteration order)
    let mut counts = std::collections::BTreeMap::new();
    for &label in labels {
        *counts.entry(label).or_insert(0usize) += 1;
    }
    let counts: Vec<usize> = counts.into_values().collect();
    gini_from_counts(&counts, labels.len())
}

/// Gini impurity from per-class counts summing to `total`.
pub(super) fn gini_from_counts(counts: &[usize], total: usize) -> f32 {
    if total == 0 {
        return 0.0;
    }
    let n = total as f32;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f32 / n;
            p * p
        })
        .sum::<f32>()
}

/// Per-class counts of the labels at `indices`.
pub(super) fn class_counts(y: &[usize], indices: &[usize], n_classes: usize) -> Vec<usize> {
    let mut counts = vec![0usize; n_classes];
    for &i in indices {
        counts[y[i]] += 1;
    }
    counts
}

/// Index of the most frequent class; ties go to the lowest class index.
pub(super) fn majority_class(counts: &[usize]) -> usize {
    let mut best = 0;
    for (class, &count) in counts.iter().enumerate() {
        if count > counts[best] {
            best = class;
        }
    }
    best
}

/// Find the threshold on one feature that minimizes weighted child Gini.
///
/// Returns `(threshold, weighted_impurity)`, or `None` when the feature is
/// constant over `indices`. Candidate thresholds are midpoints between
/// consecutive distinct sorted values.
pub(super) fn best_split_for_feature(
    x: &Matrix<f32>,
    y: &[usize],
    indices: &[usize],
    feature: usize,
    n_classes: usize,
) -> Option<(f32, f32)> {
    let n = indices.len();
    if n < 2 {
        return None;
    }

    let mut order: Vec<(f32, usize)> = indices.iter().map(|&i| (x.get(i, feature), y[i])).collect();
    order.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

    let mut left = vec![0usize; n_classes];
    let mut right = vec![0usize; n_classes];
    for &(_, label) in &order {
        right[label] += 1;
    }

    let mut best: Option<(f32, f32)> = None;
    for i in 0..n - 1 {
        let (value, label) = order[i];
        left[label] += 1;
        right[label] -= 1;

        let next = order[i + 1].0;
        if next - value <= 1e-7 {
            continue;
        }

        let n_left = i + 1;
        let n_right = n - n_left;
        let impurity = (n_left as f32 * gini_from_counts(&left, n_left)
            + n_right as f32 * gini_from_counts(&right, n_right))
            / n as f32;

        if best.map_or(true, |(_, b)| impurity < b) {
            best = Some(((value + next) / 2.0, impurity));
        }
    }

    best
}

/// Draw `n_samples` row indices with replacement.
pub(super) fn bootstrap_sample(n_samples: usize, rng: &mut impl Rng) -> Vec<usize> {
    (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect()
}

/// Draw `k` distinct feature indices out of `n_features`.
pub(super) fn sample_features(n_features: usize, k: usize, rng: &mut impl Rng) -> Vec<usize> {
    let k = k.clamp(1, n_features.max(1));
    if k >= n_features {
        return (0..n_features).collect();
    }
    rand::seq::index::sample(rng, n_features, k).into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_gini_pure_node() {
        assert!(gini_impurity(&[1, 1, 1, 1]).abs() < 1e-6);
    }

    #[test]
    fn test_gini_balanced_binary() {
        assert!((gini_impurity(&[0, 1, 0, 1]) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_gini_empty() {
        assert_eq!(gini_impurity(&[]), 0.0);
    }

    #[test]
    fn test_majority_class_tie_goes_low() {
        assert_eq!(majority_class(&[2, 3, 3]), 1);
        assert_eq!(majority_class(&[0, 0, 0]), 0);
    }

    #[test]
    fn test_class_counts_with_duplicate_indices() {
        let y = vec![0, 1, 2, 1];
        assert_eq!(class_counts(&y, &[1, 1, 3, 0], 3), vec![1, 3, 0]);
    }

    #[test]
    fn test_best_split_separates_classes() {
        let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 10.0, 11.0]).expect("4x1");
        let y = vec![0, 0, 1, 1];
        let (threshold, impurity) =
            best_split_for_feature(&x, &y, &[0, 1, 2, 3], 0, 2).expect("split exists");
        assert!((threshold - 6.0).abs() < 1e-6);
        assert!(impurity.abs() < 1e-6);
    }

    #[test]
    fn test_best_split_constant_feature() {
        let x = Matrix::from_vec(3, 1, vec![5.0, 5.0, 5.0]).expect("3x1");
        let y = vec![0, 1, 0];
        assert!(best_split_for_feature(&x, &y, &[0, 1, 2], 0, 2).is_none());
    }

    #[test]
    fn test_bootstrap_sample_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let sample = bootstrap_sample(50, &mut rng);
        assert_eq!(sample.len(), 50);
        assert!(sample.iter().all(|&i| i < 50));
    }

    #[test]
    fn test_sample_features_distinct() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut features = sample_features(10, 3, &mut rng);
        assert_eq!(features.len(), 3);
        features.sort_unstable();
        features.dedup();
        assert_eq!(features.len(), 3);
        assert!(features.iter().all(|&f| f < 10));
    }

    #[test]
    fn test_sample_features_all_when_k_large() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(sample_features(4, 9, &mut rng), vec![0, 1, 2, 3]);
    }
}
