use super::*;

fn two_blobs() -> (Matrix<f32>, Vec<usize>) {
    // feature 0 separates the classes, feature 1 is noise
    let x = Matrix::from_vec(
        8,
        2,
        vec![
            0.0, 0.3, //
            0.1, 0.9, //
            0.2, 0.1, //
            0.3, 0.5, //
            1.0, 0.4, //
            1.1, 0.2, //
            1.2, 0.8, //
            1.3, 0.6, //
        ],
    )
    .expect("8x2");
    let y = vec![0, 0, 0, 0, 1, 1, 1, 1];
    (x, y)
}

#[test]
fn test_tree_fits_separable_data() {
    let (x, y) = two_blobs();
    let mut tree = DecisionTreeClassifier::new().with_random_state(1);
    tree.fit(&x, &y).expect("fit should succeed");
    assert_eq!(tree.predict(&x).expect("fitted"), y);
    assert_eq!(tree.depth(), 1);
    assert_eq!(tree.n_classes(), 2);
}

#[test]
fn test_tree_max_depth_zero_is_single_leaf() {
    let (x, y) = two_blobs();
    let mut tree = DecisionTreeClassifier::new().with_max_depth(0);
    tree.fit(&x, &y).expect("fit should succeed");
    assert_eq!(tree.depth(), 0);
    let proba = tree.predict_proba(&x).expect("fitted");
    assert!((proba.get(0, 0) - 0.5).abs() < 1e-6);
    assert!((proba.get(0, 1) - 0.5).abs() < 1e-6);
}

#[test]
fn test_tree_predict_before_fit_errors() {
    let (x, _) = two_blobs();
    let tree = DecisionTreeClassifier::new();
    assert!(tree.predict(&x).is_err());
}

#[test]
fn test_tree_rejects_mismatched_labels() {
    let (x, _) = two_blobs();
    let mut tree = DecisionTreeClassifier::new();
    let err = tree.fit(&x, &[0, 1]).expect_err("length mismatch");
    assert!(matches!(err, FeatselError::LabelMismatch { .. }));
}

#[test]
fn test_max_features_resolve() {
    assert_eq!(MaxFeatures::All.resolve(9), 9);
    assert_eq!(MaxFeatures::Sqrt.resolve(9), 3);
    assert_eq!(MaxFeatures::Sqrt.resolve(1), 1);
    assert_eq!(MaxFeatures::Sqrt.resolve(3), 1);
    assert_eq!(MaxFeatures::Count(20).resolve(4), 4);
    assert_eq!(MaxFeatures::Count(0).resolve(4), 1);
}

#[test]
fn test_forest_predicts_separable_data() {
    let (x, y) = two_blobs();
    let mut forest = RandomForestClassifier::new(25)
        .with_max_features(MaxFeatures::All)
        .with_random_state(42);
    forest.fit(&x, &y).expect("fit should succeed");
    assert_eq!(forest.n_trees(), 25);
    let predictions = forest.predict(&x).expect("fitted");
    assert!(crate::metrics::accuracy(&predictions, &y) > 0.99);
}

#[test]
fn test_forest_proba_rows_sum_to_one() {
    let (x, y) = two_blobs();
    let mut forest = RandomForestClassifier::new(10).with_random_state(7);
    forest.fit(&x, &y).expect("fit should succeed");
    let proba = forest.predict_proba(&x).expect("fitted");
    assert_eq!(proba.shape(), (8, 2));
    for r in 0..proba.n_rows() {
        let sum: f32 = proba.row(r).iter().sum();
        assert!((sum - 1.0).abs() < 1e-5, "row {r} sums to {sum}");
    }
}

#[test]
fn test_forest_is_reproducible_with_seed() {
    let (x, y) = two_blobs();
    let mut a = RandomForestClassifier::new(8).with_random_state(3);
    let mut b = RandomForestClassifier::new(8).with_random_state(3);
    a.fit(&x, &y).expect("fit a");
    b.fit(&x, &y).expect("fit b");
    assert_eq!(
        a.predict_proba(&x).expect("a").as_slice(),
        b.predict_proba(&x).expect("b").as_slice()
    );
}

#[test]
fn test_forest_columns_follow_class_indices() {
    let (x, y) = two_blobs();
    let gapped: Vec<usize> = y.iter().map(|&c| c * 2).collect();
    let mut forest = RandomForestClassifier::new(5).with_random_state(1);
    forest.fit(&x, &gapped).expect("fit should succeed");
    assert_eq!(forest.n_classes(), 3);
    let proba = forest.predict_proba(&x).expect("fitted");
    assert_eq!(proba.n_cols(), 3);
    assert!(proba.column(1).iter().all(|&p| p == 0.0));
}

#[test]
fn test_forest_single_class_is_training_error() {
    let (x, _) = two_blobs();
    let mut forest = RandomForestClassifier::new(5);
    let err = forest.fit(&x, &[1; 8]).expect_err("one class");
    assert!(matches!(err, FeatselError::TrainingError { .. }));
}

#[test]
fn test_forest_zero_trees_is_training_error() {
    let (x, y) = two_blobs();
    let mut forest = RandomForestClassifier::new(0);
    assert!(matches!(
        forest.fit(&x, &y),
        Err(FeatselError::TrainingError { .. })
    ));
}

#[test]
fn test_forest_column_mismatch_errors() {
    let (x, y) = two_blobs();
    let mut forest = RandomForestClassifier::new(3).with_random_state(1);
    forest.fit(&x, &y).expect("fit should succeed");
    let narrow = x.select_columns(&[0]);
    assert!(forest.predict_proba(&narrow).is_err());
}

#[test]
fn test_adjacent_random_states_do_not_share_trees() {
    use rand::{Rng, SeedableRng};
    let mut rng = rand::rngs::StdRng::seed_from_u64(0);
    let data: Vec<f32> = (0..60 * 4).map(|_| rng.gen()).collect();
    let x = Matrix::from_vec(60, 4, data).expect("60x4");
    let y: Vec<usize> = (0..60).map(|_| rng.gen_range(0..3)).collect();

    let mut a = RandomForestClassifier::new(6).with_random_state(10);
    let mut b = RandomForestClassifier::new(6).with_random_state(11);
    a.fit(&x, &y).expect("fit a");
    b.fit(&x, &y).expect("fit b");

    let shifted_a = serde_json::to_string(&a.trees[1..]).expect("serialize");
    let leading_b = serde_json::to_string(&b.trees[..5]).expect("serialize");
    assert_ne!(shifted_a, leading_b);
}
