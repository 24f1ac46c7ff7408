//! Classification metrics for scoring candidate subsets.
//!
//! Provides accuracy, per-class F1, macro-F1 and the confusion matrix
//! over the union of true and predicted labels.

use crate::primitives::Matrix;

/// Compute classification accuracy.
///
/// accuracy = `correct_predictions` / `total_predictions`
///
/// # Panics
///
/// Panics if vectors have different lengths.
///
/// # Examples
///
/// ```
/// use featsel::metrics::classification::accuracy;
///
/// let y_true = vec![0, 1, 2, 0, 1, 2];
/// let y_pred = vec![0, 2, 1, 0, 0, 1];
/// let acc = accuracy(&y_pred, &y_true);
/// assert!((acc - 0.333333).abs() < 0.001);
/// ```
#[must_use]
pub fn accuracy(y_pred: &[usize], y_true: &[usize]) -> f64 {
    assert_eq!(y_pred.len(), y_true.len(), "Vectors must have same length");
    if y_true.is_empty() {
        return 0.0;
    }

    let correct = y_pred
        .iter()
        .zip(y_true.iter())
        .filter(|(p, t)| p == t)
        .count();

    correct as f64 / y_true.len() as f64
}

/// Sorted union of the labels appearing in either vector.
#[must_use]
pub fn label_union(y_pred: &[usize], y_true: &[usize]) -> Vec<usize> {
    let mut labels: Vec<usize> = y_true.iter().chain(y_pred.iter()).copied().collect();
    labels.sort_unstable();
    labels.dedup();
    labels
}

/// Compute the confusion matrix over the union of labels.
///
/// Element `[i, j]` counts samples whose true label is `labels[i]` and
/// predicted label is `labels[j]`, where `labels` is [`label_union`].
/// Labels missing from one side simply get zero rows or columns.
///
/// # Panics
///
/// Panics if vectors have different lengths.
///
/// # Examples
///
/// ```
/// use featsel::metrics::classification::confusion_matrix;
///
/// // class 7 is only ever predicted, never true
/// let y_true = vec![0, 0, 1, 1];
/// let y_pred = vec![0, 7, 1, 1];
/// let (labels, cm) = confusion_matrix(&y_pred, &y_true);
/// assert_eq!(labels, vec![0, 1, 7]);
/// assert_eq!(cm.get(0, 2), 1);
/// assert_eq!(cm.get(2, 2), 0);
/// ```
#[must_use]
pub fn confusion_matrix(y_pred: &[usize], y_true: &[usize]) -> (Vec<usize>, Matrix<usize>) {
    assert_eq!(y_pred.len(), y_true.len(), "Vectors must have same length");

    let labels = label_union(y_pred, y_true);
    let k = labels.len();
    let mut cm = Matrix::<usize>::zeros(k, k);

    for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
        // labels is sorted and contains every value seen, so lookups succeed
        let i = labels.binary_search(&t).unwrap_or(0);
        let j = labels.binary_search(&p).unwrap_or(0);
        cm.set(i, j, cm.get(i, j) + 1);
    }

    (labels, cm)
}

/// F1 of a single class from its confusion counts.
///
/// An undefined precision or recall (zero denominator) makes the whole
/// class score 0, as does precision + recall = 0.
#[must_use]
pub fn class_f1(tp: usize, fp: usize, fn_count: usize) -> f64 {
    if tp + fp == 0 || tp + fn_count == 0 {
        return 0.0;
    }
    let precision = tp as f64 / (tp + fp) as f64;
    let recall = tp as f64 / (tp + fn_count) as f64;
    if precision + recall == 0.0 {
        return 0.0;
    }
    2.0 * precision * recall / (precision + recall)
}

/// Per-class F1 scores read off a square confusion matrix
/// (rows = true class, columns = predicted class).
///
/// # Panics
///
/// Panics if the matrix is not square.
#[must_use]
pub fn f1_per_class_from_confusion(cm: &Matrix<usize>) -> Vec<f64> {
    let (rows, cols) = cm.shape();
    assert_eq!(rows, cols, "Confusion matrix must be square");

    (0..rows)
        .map(|c| {
            let tp = cm.get(c, c);
            let predicted: usize = (0..rows).map(|r| cm.get(r, c)).sum();
            let actual: usize = cm.row(c).iter().sum();
            class_f1(tp, predicted - tp, actual - tp)
        })
        .collect()
}

/// Macro-F1 of a confusion matrix: the unweighted mean of per-class F1.
///
/// Returns 0 for an empty matrix.
///
/// # Examples
///
/// ```
/// use featsel::metrics::classification::macro_f1_from_confusion;
/// use featsel::primitives::Matrix;
///
/// // class 0: P = 1, R = 0.5 -> F1 = 2/3; class 1: P = 0.5, R = 1 -> F1 = 2/3
/// let cm = Matrix::from_vec(2, 2, vec![1, 1, 0, 1]).expect("2x2");
/// assert!((macro_f1_from_confusion(&cm) - 2.0 / 3.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn macro_f1_from_confusion(cm: &Matrix<usize>) -> f64 {
    let per_class = f1_per_class_from_confusion(cm);
    if per_class.is_empty() {
        return 0.0;
    }
    per_class.iter().sum::<f64>() / per_class.len() as f64
}

/// Per-class F1 over the union of true and predicted labels.
///
/// Returned pairs are `(label, f1)` in ascending label order.
///
/// # Panics
///
/// Panics if vectors have different lengths.
#[must_use]
pub fn f1_per_class(y_pred: &[usize], y_true: &[usize]) -> Vec<(usize, f64)> {
    let (labels, cm) = confusion_matrix(y_pred, y_true);
    labels
        .into_iter()
        .zip(f1_per_class_from_confusion(&cm))
        .collect()
}

/// Macro-averaged F1 over the union of true and predicted labels.
///
/// Every label that occurs on either side counts once, regardless of
/// support. Empty inputs score 0.
///
/// # Panics
///
/// Panics if vectors have different lengths.
///
/// # Examples
///
/// ```
/// use featsel::metrics::classification::macro_f1;
///
/// let y_true = vec![0, 1, 2, 0, 1, 2];
/// let y_pred = vec![0, 2, 1, 0, 0, 1];
/// let f1 = macro_f1(&y_pred, &y_true);
/// assert!(f1 >= 0.0 && f1 <= 1.0);
/// ```
#[must_use]
pub fn macro_f1(y_pred: &[usize], y_true: &[usize]) -> f64 {
    let (_, cm) = confusion_matrix(y_pred, y_true);
    macro_f1_from_confusion(&cm)
}

#[cfg(test)]
#[path = "tests_classification_contract.rs"]
mod tests_classification_contract;
