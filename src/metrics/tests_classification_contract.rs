// =========================================================================
// Classification metric contract: macro-F1 over the label union
//
// Scores feed every fitness evaluation, so these pin the exact arithmetic:
// per-class F1 from a full confusion matrix, zero-denominator -> 0, and a
// uniform (not support-weighted) mean.
// =========================================================================

use super::*;

#[test]
fn accuracy_bounded() {
    let y_true = vec![0, 1, 2, 0, 1, 2];
    let y_pred = vec![0, 2, 1, 0, 0, 1];
    let acc = accuracy(&y_pred, &y_true);
    assert!((0.0..=1.0).contains(&acc), "accuracy={acc} not in [0, 1]");
}

#[test]
fn accuracy_empty_is_zero() {
    assert_eq!(accuracy(&[], &[]), 0.0);
}

#[test]
fn perfect_predictions_score_one() {
    let y = vec![0, 1, 2, 0, 1, 2];
    assert!((macro_f1(&y, &y) - 1.0).abs() < 1e-12);
}

#[test]
fn label_union_is_sorted_and_deduplicated() {
    assert_eq!(label_union(&[4, 1, 1], &[2, 4, 0]), vec![0, 1, 2, 4]);
}

#[test]
fn confusion_matrix_counts() {
    let y_true = vec![0, 0, 1, 1, 2, 2];
    let y_pred = vec![0, 1, 1, 1, 2, 0];
    let (labels, cm) = confusion_matrix(&y_pred, &y_true);
    assert_eq!(labels, vec![0, 1, 2]);
    assert_eq!(cm.shape(), (3, 3));
    assert_eq!(cm.get(0, 0), 1);
    assert_eq!(cm.get(0, 1), 1);
    assert_eq!(cm.get(1, 1), 2);
    assert_eq!(cm.get(2, 0), 1);
    assert_eq!(cm.get(2, 2), 1);
    assert_eq!(cm.as_slice().iter().sum::<usize>(), 6);
}

/// Hand-computed 3-class confusion matrix.
///
/// ```text
///            pred 0  pred 1  pred 2
/// true 0        4       1       0
/// true 1        2       3       0
/// true 2        0       0       0
/// ```
/// class 0: P = 4/6, R = 4/5 -> F1 = 8/11
/// class 1: P = 3/4, R = 3/5 -> F1 = 2/3
/// class 2: never true, never predicted -> 0 by the zero-denominator rule
#[test]
fn macro_f1_matches_hand_computed_with_zero_denominator() {
    let cm = Matrix::from_vec(3, 3, vec![4, 1, 0, 2, 3, 0, 0, 0, 0]).expect("3x3");
    let per_class = f1_per_class_from_confusion(&cm);
    assert!((per_class[0] - 8.0 / 11.0).abs() < 1e-12);
    assert!((per_class[1] - 2.0 / 3.0).abs() < 1e-12);
    assert_eq!(per_class[2], 0.0);

    let expected = (8.0 / 11.0 + 2.0 / 3.0 + 0.0) / 3.0;
    assert!((macro_f1_from_confusion(&cm) - expected).abs() < 1e-12);
}

#[test]
fn class_never_predicted_scores_zero() {
    // class 1 has support but precision is 0/0
    assert_eq!(class_f1(0, 0, 3), 0.0);
    // class predicted but never true: recall is 0/0
    assert_eq!(class_f1(0, 2, 0), 0.0);
    // P = R = 0 with both denominators positive
    assert_eq!(class_f1(0, 1, 1), 0.0);
}

#[test]
fn macro_is_unweighted_by_support() {
    // class 0: 8 correct of 8; class 1: 0 of 2 (always predicted as 0)
    let y_true = vec![0, 0, 0, 0, 0, 0, 0, 0, 1, 1];
    let y_pred = vec![0; 10];
    // class 0: P = 0.8, R = 1 -> F1 = 8/9; class 1: 0
    let f1 = macro_f1(&y_pred, &y_true);
    assert!((f1 - (8.0 / 9.0) / 2.0).abs() < 1e-12);
}

#[test]
fn predicted_only_label_joins_the_union() {
    // label 5 appears only in predictions; it counts as a zero-F1 class
    let y_true = vec![0, 0, 1, 1];
    let y_pred = vec![0, 0, 1, 5];
    let per_class = f1_per_class(&y_pred, &y_true);
    assert_eq!(per_class.len(), 3);
    assert_eq!(per_class[2], (5, 0.0));
    let expected = (1.0 + 2.0 / 3.0 + 0.0) / 3.0;
    assert!((macro_f1(&y_pred, &y_true) - expected).abs() < 1e-12);
}

#[test]
fn empty_inputs_score_zero() {
    assert_eq!(macro_f1(&[], &[]), 0.0);
}

#[test]
#[should_panic(expected = "same length")]
fn mismatched_lengths_panic() {
    let _ = macro_f1(&[0, 1], &[0]);
}
